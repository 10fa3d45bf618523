use std::rc::Rc;

use derivative::Derivative;

use crate::model::Row;

/// A host-supplied function that returns the stable identity of a row.
///
/// The scroller and the pivot tree both key rows by this string rather than
/// by position, so that scroll-window and expand/collapse state survives a
/// re-sort or a page refetch that reorders the underlying data.
#[derive(Derivative)]
#[derivative(Clone(bound = ""), PartialEq(bound = ""))]
pub struct ExtractKeyFn(#[derivative(PartialEq(compare_with = "Rc::ptr_eq"))] Rc<dyn Fn(&Row) -> String>);

impl ExtractKeyFn {
    pub fn new(get_key: impl 'static + Fn(&Row) -> String) -> Self {
        Self(Rc::new(get_key))
    }

    pub fn apply(&self, row: &Row) -> String {
        (self.0)(row)
    }
}

impl std::fmt::Debug for ExtractKeyFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ExtractKeyFn(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn apply_extracts_the_configured_field() {
        let key_fn = ExtractKeyFn::new(|row: &Row| {
            row.get("id").map(crate::model::stringify_cell).unwrap_or_default()
        });
        let mut row = Row::new();
        row.insert("id".to_string(), json!("row-7"));
        assert_eq!(key_fn.apply(&row), "row-7");
    }
}
