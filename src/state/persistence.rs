//! Persistence of column layout across sessions, through a host-supplied
//! key/value store rather than a hardcoded storage backend.

use std::rc::Rc;

use log::warn;
use serde::{de::DeserializeOwned, Serialize};

/// Out-of-scope collaborator: a host-provided synchronous key/value store
/// (typically backed by browser local storage, a config file, or similar).
/// The grid core never chooses a concrete implementation.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// The three named slots column layout persists to, load-on-construct and
/// store-on-update, failures logged and swallowed rather than surfaced:
/// a grid that can't persist its layout should still function.
///
/// Holds the store as `Rc<dyn KeyValueStore>` rather than a generic
/// parameter: `Lifecycle` is already generic over its element factory, and
/// persistence is optional, so a trait object keeps a second generic off
/// every `GridConfig`/`Lifecycle` that doesn't use it.
pub struct PersistenceAdapter {
    store: Rc<dyn KeyValueStore>,
    namespace: String,
}

const COLUMN_WIDTHS_SUFFIX: &str = "column-widths";
const COLUMN_ORDER_SUFFIX: &str = "column-order";
const TABLE_WIDTH_SUFFIX: &str = "table-width";

impl PersistenceAdapter {
    pub fn new(store: Rc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    pub fn load_column_widths(&self) -> Option<Vec<(String, u32)>> {
        self.load(COLUMN_WIDTHS_SUFFIX)
    }

    pub fn store_column_widths(&self, widths: &[(String, u32)]) {
        self.store(COLUMN_WIDTHS_SUFFIX, &widths.to_vec());
    }

    pub fn load_column_order(&self) -> Option<Vec<String>> {
        self.load(COLUMN_ORDER_SUFFIX)
    }

    pub fn store_column_order(&self, order: &[String]) {
        self.store(COLUMN_ORDER_SUFFIX, &order.to_vec());
    }

    pub fn load_table_width(&self) -> Option<u32> {
        self.load(TABLE_WIDTH_SUFFIX)
    }

    pub fn store_table_width(&self, width: u32) {
        self.store(TABLE_WIDTH_SUFFIX, &width);
    }

    fn key(&self, suffix: &str) -> String {
        format!("{}:{}", self.namespace, suffix)
    }

    fn load<T: DeserializeOwned>(&self, suffix: &str) -> Option<T> {
        let key = self.key(suffix);
        let raw = self.store.get(&key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("failed to deserialize persisted state for {key}: {err}");
                None
            }
        }
    }

    fn store<T: Serialize>(&self, suffix: &str, value: &T) {
        let key = self.key(suffix);
        match serde_json::to_string(value) {
            Ok(raw) => self.store.set(&key, &raw),
            Err(err) => warn!("failed to serialize state for {key}: {err}"),
        }
    }
}
