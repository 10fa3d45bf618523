//! Pure transform from the original column declarations plus overlay state
//! to the laid-out column list the rest of the engine renders.

use indexmap::{IndexMap, IndexSet};

use crate::error::GridError;
use crate::model::{Column, ResolvedColumn};

/// The column-layout slice of the store's state: everything [`resolve`]
/// needs besides the original column declarations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnState {
    pub order: Vec<String>,
    pub width_overrides: IndexMap<String, u32>,
    pub hidden_keys: IndexSet<String>,
    pub frozen_count: usize,
}

/// Checks uniqueness of column keys; called once at construction, per the
/// requirement that duplicate keys are a fatal configuration error rather
/// than a silently-shadowed one.
pub fn check_unique_keys(columns: &[Column]) -> Result<(), GridError> {
    let mut seen = IndexSet::new();
    for col in columns {
        if !seen.insert(col.key.clone()) {
            return Err(GridError::DuplicateColumnKey(col.key.clone()));
        }
    }
    Ok(())
}

/// Resolve `original` columns against `state` into the list that the column
/// manager lays out: hidden columns dropped, order applied with stability
/// for keys the order doesn't mention, width overrides layered on, and a
/// freeze flag for the leading `frozen_count` entries.
pub fn resolve(original: &[Column], state: &ColumnState) -> Vec<ResolvedColumn> {
    let visible: IndexMap<&str, &Column> = original
        .iter()
        .filter(|c| !state.hidden_keys.contains(&c.key))
        .map(|c| (c.key.as_str(), c))
        .collect();

    let mut ordered_keys: Vec<&str> = state
        .order
        .iter()
        .map(|k| k.as_str())
        .filter(|k| visible.contains_key(k))
        .collect();

    for (key, _) in visible.iter() {
        if !ordered_keys.contains(key) {
            ordered_keys.push(key);
        }
    }

    ordered_keys
        .into_iter()
        .enumerate()
        .map(|(index, key)| {
            let col = visible[key];
            let width = state
                .width_overrides
                .get(key)
                .copied()
                .or_else(|| match col.width {
                    Some(crate::model::WidthSpec::Fixed(w)) => Some(w),
                    _ => None,
                })
                .unwrap_or(col.min_width) as i64;
            ResolvedColumn {
                key: col.key.clone(),
                title: col.title.clone(),
                data_type: col.data_type,
                summary_type: col.summary_type,
                width,
                is_frozen: index < state.frozen_count,
                render: col.render.clone(),
            }
        })
        .collect()
}

/// Reconciles a `COLUMN_ORDER_SET` payload against known keys: unknown keys
/// are dropped, missing known keys are appended in their original order.
pub fn normalize_order(payload: Vec<String>, known_keys: &[String]) -> Vec<String> {
    let known: IndexSet<&str> = known_keys.iter().map(|k| k.as_str()).collect();
    let mut normalized: Vec<String> = Vec::new();
    let mut seen = IndexSet::new();
    for key in payload {
        if known.contains(key.as_str()) && seen.insert(key.clone()) {
            normalized.push(key);
        }
    }
    for key in known_keys {
        if !seen.contains(key.as_str()) {
            normalized.push(key.clone());
            seen.insert(key.clone());
        }
    }
    normalized
}
