//! Single-source-of-truth state store: actions in, reduced state and effect
//! classes out, column-layout persistence through a host key/value store.

mod actions;
pub use actions::{Action, EffectClass, GridMode, ViewMode};

mod store;
pub use store::{Reducer, Store, StoreObserver, StoreReadGuard};

mod persistence;
pub use persistence::{KeyValueStore, PersistenceAdapter};
