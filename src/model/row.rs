//! Row and cell representation.
//!
//! Rows are column-keyed maps of dynamic [`serde_json::Value`] cells rather
//! than a fixed Rust struct: the grid is generic over an unknown, caller
//! supplied column set, so the only representation that does not force a
//! code-generation step per dataset is a dynamic one.

use indexmap::IndexMap;
use serde_json::Value;

/// A single table row: column key -> cell value.
pub type Row = IndexMap<String, Value>;

/// Stringify a cell the same way for sorting, filtering and summaries.
///
/// `Value::String` is returned as-is (no surrounding quotes); every other
/// variant uses its JSON rendering. `Value::Null` stringifies to `""` so
/// that missing cells behave like empty text under substring/set filters.
pub fn stringify_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse a cell as a finite number, the way the in-memory sort and the pivot
/// aggregations do: numeric cells pass through, numeric strings parse,
/// everything else (including non-finite results) is "not a number".
pub fn cell_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Look up a cell by column key, defaulting to `Value::Null` for absent keys.
pub fn cell<'a>(row: &'a Row, key: &str) -> &'a Value {
    static NULL: Value = Value::Null;
    row.get(key).unwrap_or(&NULL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stringify_passes_strings_through_unquoted() {
        assert_eq!(stringify_cell(&json!("abc")), "abc");
        assert_eq!(stringify_cell(&json!(42)), "42");
        assert_eq!(stringify_cell(&Value::Null), "");
        assert_eq!(stringify_cell(&json!(true)), "true");
    }

    #[test]
    fn cell_as_f64_parses_numeric_strings() {
        assert_eq!(cell_as_f64(&json!(3.5)), Some(3.5));
        assert_eq!(cell_as_f64(&json!(" 3.5 ")), Some(3.5));
        assert_eq!(cell_as_f64(&json!("abc")), None);
        assert_eq!(cell_as_f64(&Value::Null), None);
    }

    #[test]
    fn cell_defaults_to_null_for_missing_key() {
        let row: Row = IndexMap::new();
        assert_eq!(cell(&row, "missing"), &Value::Null);
    }
}
