//! Pure row-window arithmetic: no DOM, no component lifecycle, just the
//! math a virtual scroll viewport needs every time scroll position or
//! viewport size changes.

/// Computes which row range is visible for a given scroll offset, the way a
/// fixed-row-height virtual scroller's `onscroll` handler does, lifted out
/// of the event handler into a value type so it is unit-testable without a
/// DOM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scroller {
    pub row_height: u32,
    pub overscan: usize,
}

/// The row window to render plus the offset to translate it to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start_row: usize,
    pub end_row: usize,
    pub translate_y: i64,
}

impl Scroller {
    pub fn new(row_height: u32, overscan: usize) -> Self {
        Self { row_height, overscan }
    }

    /// Total scrollable height for `row_count` rows.
    pub fn scroll_height(&self, row_count: usize) -> i64 {
        row_count as i64 * self.row_height as i64
    }

    /// The `[start_row, end_row)` window visible at `scroll_top`, given a
    /// `viewport_height` in pixels, padded by `overscan` rows on both ends
    /// and clamped to `row_count`.
    pub fn window(&self, scroll_top: f64, viewport_height: f64, row_count: usize) -> Window {
        if row_count == 0 || self.row_height == 0 {
            return Window {
                start_row: 0,
                end_row: 0,
                translate_y: 0,
            };
        }

        let row_height = self.row_height as f64;
        let raw_start = (scroll_top / row_height).floor() as i64;
        let start = raw_start.saturating_sub(self.overscan as i64).max(0) as usize;

        let visible_rows = (viewport_height / row_height).ceil() as usize + 1;
        let end = (start + visible_rows + self.overscan).min(row_count);
        let start = start.min(end);

        Window {
            start_row: start,
            end_row: end,
            translate_y: start as i64 * self.row_height as i64,
        }
    }
}
