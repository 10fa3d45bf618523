//! Owns the live set of rendered row elements, diffing them against the
//! scroller's visible window on every scroll/resize/data change.

use std::collections::HashMap;

use futures::future::LocalBoxFuture;
use indexmap::IndexMap;

use crate::element_factory::ElementFactory;
use crate::model::ResolvedColumn;

use super::column_manager;
use super::data_strategy::DataStrategy;
use super::scroller::Scroller;

pub struct Viewport<EF: ElementFactory> {
    scroller: Scroller,
    element_factory: EF,
    visible_row_map: IndexMap<usize, EF::Element>,
    /// Row index -> the query generation in effect when its skeleton was
    /// created. `refresh` only swaps a skeleton for real data if that
    /// generation still matches the current one, so a slow page fetch from
    /// a superseded query can never land stale content.
    skeleton_rows: HashMap<usize, u64>,
}

impl<EF: ElementFactory> Viewport<EF> {
    pub fn new(scroller: Scroller, element_factory: EF) -> Self {
        Self {
            scroller,
            element_factory,
            visible_row_map: IndexMap::new(),
            skeleton_rows: HashMap::new(),
        }
    }

    pub fn set_scroller(&mut self, scroller: Scroller) {
        self.scroller = scroller;
    }

    pub fn element_factory_mut(&mut self) -> &mut EF {
        &mut self.element_factory
    }

    pub fn get_visible_rows(&self) -> impl Iterator<Item = (&usize, &EF::Element)> {
        self.visible_row_map.iter()
    }

    /// Recomputes the visible window for the given scroll position and
    /// drops/creates elements to match it. Rows with no data yet get a
    /// skeleton element; the futures returned resolve once their page has
    /// settled, at which point the caller should call [`Viewport::refresh`].
    pub fn update_visible_rows(
        &mut self,
        strategy: &dyn DataStrategy,
        scroll_top: f64,
        viewport_height: f64,
        row_count: usize,
        generation: u64,
        resolved_columns: &[ResolvedColumn],
    ) -> Vec<LocalBoxFuture<'static, ()>> {
        let window = self.scroller.window(scroll_top, viewport_height, row_count);
        let wanted: std::collections::HashSet<usize> = (window.start_row..window.end_row).collect();

        let stale: Vec<usize> = self
            .visible_row_map
            .keys()
            .copied()
            .filter(|i| !wanted.contains(i))
            .collect();
        for row_index in stale {
            if let Some(element) = self.visible_row_map.shift_remove(&row_index) {
                self.element_factory.remove_element(element);
            }
            self.skeleton_rows.remove(&row_index);
        }

        let mut pending = Vec::new();
        for row_index in window.start_row..window.end_row {
            if self.visible_row_map.contains_key(&row_index) {
                continue;
            }
            match strategy.get_row(row_index) {
                Some(data) => {
                    let formatted = column_manager::format_row(resolved_columns, &data);
                    let element = self.element_factory.create_row(row_index, &formatted);
                    self.visible_row_map.insert(row_index, element);
                }
                None => {
                    let element = self.element_factory.create_skeleton_row(row_index);
                    self.visible_row_map.insert(row_index, element);
                    self.skeleton_rows.insert(row_index, generation);
                    pending.push(strategy.ensure_page_for_row(row_index));
                }
            }
        }

        let row_height = self.scroller.row_height as i64;
        for (row_index, element) in self.visible_row_map.iter() {
            self.element_factory.set_translate_y(element, *row_index as i64 * row_height);
        }
        self.element_factory
            .set_content_height(self.scroller.scroll_height(row_count));

        pending
    }

    /// Replaces any skeleton row whose data has arrived since the last
    /// [`Viewport::update_visible_rows`] call, provided its skeleton was
    /// created under the current query `generation`. A skeleton left over
    /// from a superseded query is never swapped in, even if its fetch does
    /// eventually settle; the next `update_visible_rows` call will have
    /// already dropped it from the window.
    pub fn refresh(&mut self, strategy: &dyn DataStrategy, generation: u64, resolved_columns: &[ResolvedColumn]) {
        let settled: Vec<usize> = self
            .skeleton_rows
            .iter()
            .filter(|(i, gen)| **gen == generation && strategy.get_row(**i).is_some())
            .map(|(i, _)| *i)
            .collect();

        for row_index in settled {
            let data = match strategy.get_row(row_index) {
                Some(data) => data,
                None => continue,
            };
            if let Some(old) = self.visible_row_map.shift_remove(&row_index) {
                self.element_factory.remove_element(old);
            }
            let formatted = column_manager::format_row(resolved_columns, &data);
            let element = self.element_factory.create_row(row_index, &formatted);
            self.visible_row_map.insert(row_index, element);
            self.skeleton_rows.remove(&row_index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::data_strategy::InMemoryStrategy;
    use crate::model::{Column, Row};
    use serde_json::json;

    #[derive(Default)]
    struct RecordingFactory {
        created: Vec<usize>,
        skeletons: Vec<usize>,
        removed: usize,
        last_created_row: Option<Row>,
    }

    impl ElementFactory for RecordingFactory {
        type Element = usize;

        fn create_row(&mut self, row_index: usize, data: &Row) -> Self::Element {
            self.created.push(row_index);
            self.last_created_row = Some(data.clone());
            row_index
        }

        fn create_skeleton_row(&mut self, row_index: usize) -> Self::Element {
            self.skeletons.push(row_index);
            row_index
        }

        fn remove_element(&mut self, _element: Self::Element) {
            self.removed += 1;
        }

        fn set_translate_y(&mut self, _element: &Self::Element, _y: i64) {}
        fn set_column_width_var(&mut self, _key: &str, _width: i64) {}
        fn set_column_offset_var(&mut self, _key: &str, _offset: i64) {}
        fn set_content_height(&mut self, _height: i64) {}
    }

    fn data(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| {
                let mut row = Row::new();
                row.insert("a".to_string(), json!(i));
                row
            })
            .collect()
    }

    #[test]
    fn window_creates_rows_present_in_the_in_memory_strategy() {
        let strategy = InMemoryStrategy::new(data(100), vec![Column::new("a", "A")]);
        let mut viewport = Viewport::new(Scroller::new(20, 0), RecordingFactory::default());
        let pending = viewport.update_visible_rows(&strategy, 0.0, 100.0, 100, 0, &[]);
        assert!(pending.is_empty());
        assert_eq!(viewport.get_visible_rows().count(), 6);
        assert!(viewport.element_factory.skeletons.is_empty());
    }

    #[test]
    fn scrolling_past_a_row_removes_its_element() {
        let strategy = InMemoryStrategy::new(data(1000), vec![Column::new("a", "A")]);
        let mut viewport = Viewport::new(Scroller::new(20, 0), RecordingFactory::default());
        viewport.update_visible_rows(&strategy, 0.0, 100.0, 1000, 0, &[]);
        viewport.update_visible_rows(&strategy, 2000.0, 100.0, 1000, 0, &[]);
        assert!(viewport.element_factory.removed > 0);
        assert!(!viewport.visible_row_map.contains_key(&0));
    }

    #[test]
    fn refresh_ignores_a_skeleton_whose_query_generation_has_been_superseded() {
        let strategy = InMemoryStrategy::new(data(10), vec![Column::new("a", "A")]);
        let mut viewport = Viewport::new(Scroller::new(20, 0), RecordingFactory::default());
        // row 3 has no data yet under generation 0.
        viewport.skeleton_rows.insert(3, 0);
        viewport.visible_row_map.insert(3, 3);
        // the query moved on to generation 1 before this skeleton's fetch settled.
        viewport.refresh(&strategy, 1, &[]);
        assert!(viewport.skeleton_rows.contains_key(&3));
        assert!(viewport.element_factory.created.is_empty());
    }

    #[test]
    fn update_visible_rows_applies_a_resolved_columns_render_fn() {
        let strategy = InMemoryStrategy::new(data(5), vec![Column::new("a", "A")]);
        let mut viewport = Viewport::new(Scroller::new(20, 0), RecordingFactory::default());
        let resolved = vec![ResolvedColumn {
            key: "a".to_string(),
            title: "A".to_string(),
            data_type: crate::model::DataType::Number,
            summary_type: crate::model::SummaryType::None,
            width: 80,
            is_frozen: false,
            render: Some(crate::props::RenderFn::new(|v| format!("#{v}"))),
        }];
        viewport.update_visible_rows(&strategy, 0.0, 100.0, 5, 0, &resolved);
        let rendered = viewport.element_factory.last_created_row.unwrap();
        assert_eq!(rendered["a"], json!("#0"));
    }
}
