use thiserror::Error;

pub type GridResult<T> = Result<T, GridError>;

/// Closed set of configuration and invariant failures: mistakes a host makes
/// wiring up a grid, not runtime conditions a data source can hit.
/// Recoverable, host-originated failures (a failed fetch, a persistence
/// read) use `anyhow::Error` instead: "this call was malformed" versus
/// "this call failed at runtime".
#[derive(Error, Debug)]
pub enum GridError {
    #[error("duplicate column key: {0}")]
    DuplicateColumnKey(String),

    #[error("grid configuration must declare at least one column")]
    EmptyColumns,

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_column_key_message() {
        let err = GridError::DuplicateColumnKey("amount".to_string());
        assert_eq!(err.to_string(), "duplicate column key: amount");
    }
}
