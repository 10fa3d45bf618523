//! Callback wrapper types passed into columns and grid configuration:
//! cheaply cloneable, pointer-equality-comparable `Rc<dyn Fn>` props.

mod extract_key_function;
pub use extract_key_function::ExtractKeyFn;

mod filter_function;
pub use filter_function::FilterFn;

mod render_function;
pub use render_function::RenderFn;

mod sorter_function;
pub use sorter_function::SorterFn;
