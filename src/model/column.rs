//! Column definitions.

use serde::{Deserialize, Serialize};

use crate::props::{FilterFn, RenderFn, SorterFn};

/// Declared cell type, used by the default sorter and by summary aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Number,
    Date,
    Boolean,
}

/// Aggregation applied to a column's cells when rendering a summary row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryType {
    None,
    Sum,
    Avg,
    Count,
    Max,
    Min,
}

impl Default for SummaryType {
    fn default() -> Self {
        SummaryType::None
    }
}

/// Width specification accepted from user config: a fixed pixel width, a
/// flex weight sharing remaining space, or automatic even distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidthSpec {
    /// Honor the given pixel width (clamped to `min_width`).
    Fixed(u32),
    /// Share `remaining` space proportional to this weight.
    Flex(u32),
    /// Share whatever is left over evenly with other `Auto` columns.
    Auto,
}

/// A column as supplied by the host application.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Unique identifier. Must be non-empty and unique across columns.
    pub key: String,
    /// Display label.
    pub title: String,
    /// Width specification; `None` behaves like [`WidthSpec::Auto`].
    pub width: Option<WidthSpec>,
    /// Minimum width honored by the width solver.
    pub min_width: u32,
    pub data_type: DataType,
    pub summary_type: SummaryType,
    /// Overrides [`crate::model::stringify_cell`] for this column's display text.
    pub render: Option<RenderFn>,
    /// Overrides the default numeric-then-string comparison when sorting by
    /// this column.
    pub sorter: Option<SorterFn>,
    /// A standing eligibility gate applied to every row in addition to the
    /// query's text and per-column-value filters; unlike
    /// [`crate::model::ColumnFilter`] it can inspect the whole row, not just
    /// this column's cell.
    pub filter: Option<FilterFn>,
}

impl Column {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            width: None,
            min_width: 40,
            data_type: DataType::String,
            summary_type: SummaryType::None,
            render: None,
            sorter: None,
            filter: None,
        }
    }

    pub fn width(mut self, width: WidthSpec) -> Self {
        self.width = Some(width);
        self
    }

    pub fn min_width(mut self, min_width: u32) -> Self {
        self.min_width = min_width;
        self
    }

    pub fn data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn summary_type(mut self, summary_type: SummaryType) -> Self {
        self.summary_type = summary_type;
        self
    }

    pub fn render(mut self, render: RenderFn) -> Self {
        self.render = Some(render);
        self
    }

    pub fn sorter(mut self, sorter: SorterFn) -> Self {
        self.sorter = Some(sorter);
        self
    }

    pub fn filter(mut self, filter: FilterFn) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// A [`Column`] augmented with a definitive resolved width and freeze flag,
/// produced by [`crate::engine::column_model::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumn {
    pub key: String,
    pub title: String,
    pub data_type: DataType,
    pub summary_type: SummaryType,
    pub width: i64,
    pub is_frozen: bool,
    pub render: Option<RenderFn>,
}

impl ResolvedColumn {
    /// Formats `row`'s cell for this column: the configured [`RenderFn`] if
    /// one was declared, the default [`crate::model::stringify_cell`]
    /// otherwise.
    pub fn format_cell(&self, row: &crate::model::Row) -> String {
        let value = row.get(&self.key).unwrap_or(&serde_json::Value::Null);
        match &self.render {
            Some(render) => render.apply(value),
            None => crate::model::stringify_cell(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let col = Column::new("name", "Name");
        assert_eq!(col.key, "name");
        assert_eq!(col.min_width, 40);
        assert_eq!(col.width, None);
        assert_eq!(col.data_type, DataType::String);
        assert_eq!(col.summary_type, SummaryType::None);
        assert!(col.render.is_none());
        assert!(col.sorter.is_none());
        assert!(col.filter.is_none());
    }

    #[test]
    fn builder_overrides() {
        let col = Column::new("amount", "Amount")
            .width(WidthSpec::Fixed(120))
            .min_width(80)
            .data_type(DataType::Number)
            .summary_type(SummaryType::Sum);
        assert_eq!(col.width, Some(WidthSpec::Fixed(120)));
        assert_eq!(col.min_width, 80);
        assert_eq!(col.data_type, DataType::Number);
        assert_eq!(col.summary_type, SummaryType::Sum);
    }

    #[test]
    fn render_sorter_and_filter_builders_attach_the_given_prop() {
        let col = Column::new("amount", "Amount")
            .render(RenderFn::new(|v| format!("${v}")))
            .sorter(SorterFn::new(|_, _| std::cmp::Ordering::Equal))
            .filter(FilterFn::new(|_| true));
        assert!(col.render.is_some());
        assert!(col.sorter.is_some());
        assert!(col.filter.is_some());
    }

    #[test]
    fn format_cell_uses_the_configured_render_fn() {
        let resolved = ResolvedColumn {
            key: "amount".to_string(),
            title: "Amount".to_string(),
            data_type: DataType::Number,
            summary_type: SummaryType::None,
            width: 80,
            is_frozen: false,
            render: Some(RenderFn::new(|v| format!("${v}"))),
        };
        let mut row = crate::model::Row::new();
        row.insert("amount".to_string(), serde_json::json!(5));
        assert_eq!(resolved.format_cell(&row), "$5");
    }

    #[test]
    fn format_cell_falls_back_to_stringify_cell_without_a_render_fn() {
        let resolved = ResolvedColumn {
            key: "amount".to_string(),
            title: "Amount".to_string(),
            data_type: DataType::Number,
            summary_type: SummaryType::None,
            width: 80,
            is_frozen: false,
            render: None,
        };
        let mut row = crate::model::Row::new();
        row.insert("amount".to_string(), serde_json::json!(5));
        assert_eq!(resolved.format_cell(&row), "5");
    }
}
