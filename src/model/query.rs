//! Query: the sort/filter state a [`crate::engine::data_strategy::DataStrategy`]
//! is asked to apply.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub key: String,
    pub direction: SortDirection,
}

/// Tagged union of column filter kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ColumnFilter {
    /// Row passes iff the stringified cell is in `values` (empty = pass).
    Set { values: Vec<String> },
    /// Case-insensitive substring match.
    Text { value: String },
    /// Lexicographic comparison of the cell as a string.
    DateRange {
        #[serde(skip_serializing_if = "Option::is_none")]
        start: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        end: Option<String>,
    },
    /// Numeric comparison, inclusive on both ends: `min <= x && x <= max`.
    NumberRange {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
}

/// The query passed to `fetch_page`/`fetch_summary` and to the in-memory
/// strategy's `apply_query`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Sort>,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub filter_text: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub column_filters: IndexMap<String, ColumnFilter>,
}

impl ColumnFilter {
    /// Evaluate this filter against one cell's stringified/parsed forms.
    pub fn matches(&self, value: &serde_json::Value) -> bool {
        use crate::model::row::{cell_as_f64, stringify_cell};

        match self {
            ColumnFilter::Set { values } => {
                if values.is_empty() {
                    return true;
                }
                let s = stringify_cell(value);
                values.iter().any(|v| v == &s)
            }
            ColumnFilter::Text { value: needle } => {
                let haystack = stringify_cell(value).to_lowercase();
                haystack.contains(&needle.to_lowercase())
            }
            ColumnFilter::DateRange { start, end } => {
                let s = stringify_cell(value);
                if let Some(start) = start {
                    if s.as_str() < start.as_str() {
                        return false;
                    }
                }
                if let Some(end) = end {
                    if s.as_str() > end.as_str() {
                        return false;
                    }
                }
                true
            }
            ColumnFilter::NumberRange { min, max } => {
                let n = match cell_as_f64(value) {
                    Some(n) => n,
                    None => return false,
                };
                if let Some(min) = min {
                    if n < *min {
                        return false;
                    }
                }
                if let Some(max) = max {
                    if n > *max {
                        return false;
                    }
                }
                true
            }
        }
    }
}
