use std::rc::Rc;

use derivative::Derivative;

use crate::model::Row;

/// A host-supplied predicate overriding the default global-text-filter
/// behavior for a row.
///
/// Wraps `Rc` around `Fn` so it can be cloned and compared cheaply when
/// threaded through dispatched actions and stored state.
#[derive(Derivative)]
#[derivative(Clone(bound = ""), PartialEq(bound = ""))]
pub struct FilterFn(#[derivative(PartialEq(compare_with = "Rc::ptr_eq"))] Rc<dyn Fn(&Row) -> bool>);

impl FilterFn {
    pub fn new(filter: impl 'static + Fn(&Row) -> bool) -> Self {
        Self(Rc::new(filter))
    }

    pub fn apply(&self, row: &Row) -> bool {
        (self.0)(row)
    }
}

impl std::fmt::Debug for FilterFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FilterFn(..)")
    }
}
