use std::rc::Rc;

use derivative::Derivative;
use serde_json::Value;

/// A host-supplied function that formats a cell value as display text,
/// overriding the default [`crate::model::stringify_cell`] rendering.
///
/// Wraps `Rc` around `Fn` so it can be cloned and compared cheaply when a
/// [`crate::model::Column`] carrying one flows through dispatched actions.
#[derive(Derivative)]
#[derivative(Clone(bound = ""), PartialEq(bound = ""))]
pub struct RenderFn(#[derivative(PartialEq(compare_with = "Rc::ptr_eq"))] Rc<dyn Fn(&Value) -> String>);

impl RenderFn {
    pub fn new(renderer: impl 'static + Fn(&Value) -> String) -> Self {
        Self(Rc::new(renderer))
    }

    pub fn apply(&self, value: &Value) -> String {
        (self.0)(value)
    }
}

impl std::fmt::Debug for RenderFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RenderFn(..)")
    }
}
