//! Pushes a resolved column list out to rendered elements: per-column width
//! and sticky-offset custom properties, recomputed whenever column layout
//! changes.

use crate::element_factory::ElementFactory;
use crate::model::{ResolvedColumn, Row};

/// Writes `resolved`'s widths and frozen-column offsets through `factory`.
/// `resolved` is assumed already in display order (what
/// [`super::column_model::resolve`] produces); this function does no
/// reordering of its own, it only pushes widths and running offsets.
pub fn apply<EF: ElementFactory>(factory: &mut EF, resolved: &[ResolvedColumn]) {
    let mut offset: i64 = 0;
    for column in resolved {
        factory.set_column_width_var(&column.key, column.width);
        if column.is_frozen {
            factory.set_column_offset_var(&column.key, offset);
            offset += column.width;
        }
    }
}

/// Applies every resolved column's [`crate::props::RenderFn`] (if declared)
/// to a copy of `row`, so the element factory is handed already-formatted
/// display text rather than raw cell values for those columns.
pub fn format_row(resolved: &[ResolvedColumn], row: &Row) -> Row {
    let mut formatted = row.clone();
    for column in resolved {
        if column.render.is_some() {
            let text = column.format_cell(row);
            formatted.insert(column.key.clone(), serde_json::Value::String(text));
        }
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DataType;

    #[derive(Default)]
    struct RecordingFactory {
        widths: Vec<(String, i64)>,
        offsets: Vec<(String, i64)>,
    }

    impl ElementFactory for RecordingFactory {
        type Element = ();

        fn create_row(&mut self, _row_index: usize, _data: &crate::model::Row) -> Self::Element {}
        fn create_skeleton_row(&mut self, _row_index: usize) -> Self::Element {}
        fn remove_element(&mut self, _element: Self::Element) {}
        fn set_translate_y(&mut self, _element: &Self::Element, _y: i64) {}

        fn set_column_width_var(&mut self, key: &str, width: i64) {
            self.widths.push((key.to_string(), width));
        }

        fn set_column_offset_var(&mut self, key: &str, offset: i64) {
            self.offsets.push((key.to_string(), offset));
        }

        fn set_content_height(&mut self, _height: i64) {}
    }

    fn resolved(key: &str, width: i64, is_frozen: bool) -> ResolvedColumn {
        ResolvedColumn {
            key: key.to_string(),
            title: key.to_string(),
            data_type: DataType::String,
            summary_type: crate::model::SummaryType::None,
            width,
            is_frozen,
            render: None,
        }
    }

    #[test]
    fn frozen_columns_get_cumulative_offsets() {
        let mut factory = RecordingFactory::default();
        let columns = vec![resolved("a", 100, true), resolved("b", 150, true), resolved("c", 80, false)];
        apply(&mut factory, &columns);

        assert_eq!(
            factory.widths,
            vec![
                ("a".to_string(), 100),
                ("b".to_string(), 150),
                ("c".to_string(), 80)
            ]
        );
        assert_eq!(
            factory.offsets,
            vec![("a".to_string(), 0), ("b".to_string(), 100)]
        );
    }

    #[test]
    fn format_row_rewrites_only_columns_with_a_render_fn() {
        let mut plain = resolved("a", 100, false);
        plain.render = None;
        let mut rendered = resolved("b", 100, false);
        rendered.render = Some(crate::props::RenderFn::new(|v| format!("${v}")));

        let mut row = Row::new();
        row.insert("a".to_string(), serde_json::json!(5));
        row.insert("b".to_string(), serde_json::json!(5));

        let formatted = format_row(&[plain, rendered], &row);
        assert_eq!(formatted["a"], serde_json::json!(5));
        assert_eq!(formatted["b"], serde_json::json!("$5"));
    }
}
