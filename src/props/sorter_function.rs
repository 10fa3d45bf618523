use std::cmp::Ordering;
use std::rc::Rc;

use serde_json::Value;

/// A host-supplied comparator overriding the default sort order for one
/// column's cell values.
///
/// Wraps `Rc` around `Fn` so it can be cloned and compared cheaply.
pub struct SorterFn(Rc<dyn Fn(&Value, &Value) -> Ordering>);

impl SorterFn {
    pub fn new(sorter: impl 'static + Fn(&Value, &Value) -> Ordering) -> Self {
        Self(Rc::new(sorter))
    }

    pub fn cmp(&self, a: &Value, b: &Value) -> Ordering {
        (self.0)(a, b)
    }
}

impl Clone for SorterFn {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl PartialEq for SorterFn {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for SorterFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SorterFn(..)")
    }
}
