//! The boundary between this crate and wherever rows actually get drawn.
//!
//! Nothing in `engine` constructs or mutates a rendered element directly;
//! every such call goes through an `ElementFactory` the host supplies, the
//! same way the rest of the engine only ever reads rows through a
//! [`crate::engine::data_strategy::DataStrategy`]. A host targeting the DOM,
//! a canvas, or a terminal grid each implements this once.
pub trait ElementFactory {
    /// Whatever handle the host uses to refer to a rendered row: a DOM
    /// node, a canvas draw-list index, a terminal cell range, and so on.
    type Element;

    /// Creates the element for `row_index` populated with `data`.
    fn create_row(&mut self, row_index: usize, data: &crate::model::Row) -> Self::Element;

    /// Creates a placeholder element for a row whose data has not arrived
    /// yet (a page still loading behind a paged remote strategy).
    fn create_skeleton_row(&mut self, row_index: usize) -> Self::Element;

    fn remove_element(&mut self, element: Self::Element);

    /// Repositions `element` to `y` pixels from the top of the scrollable
    /// content, the one per-frame operation virtual scrolling needs.
    fn set_translate_y(&mut self, element: &Self::Element, y: i64);

    fn set_column_width_var(&mut self, key: &str, width: i64);

    /// Sets the sticky-offset custom property for a frozen column, the
    /// running sum of the widths of the frozen columns before it.
    fn set_column_offset_var(&mut self, key: &str, offset: i64);

    /// Updates the scrollable container's content height so the scrollbar
    /// reflects the current (possibly still-estimated) row count.
    fn set_content_height(&mut self, height: i64);
}
