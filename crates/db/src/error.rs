use scylla::errors::{
    DeserializationError, ExecutionError, FirstRowError, IntoRowsResultError,
    MaybeFirstRowError, NewSessionError, PrepareError, RowsError,
};
use todos_core::types::TodoId;

/// Errors raised by the store layer.
///
/// Every variant is a server-side failure; "no such row" is reported through
/// `Option`/`bool` return values, never through this type. Driver errors stay
/// reachable through [`std::error::Error::source`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to connect to store: {0}")]
    Connect(#[from] NewSessionError),

    #[error("Failed to prepare statement: {0}")]
    Prepare(#[from] PrepareError),

    #[error("Query execution failed: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Failed to decode result rows: {0}")]
    Decode(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Todo {0} already exists")]
    AlreadyExists(TodoId),

    #[error("Store is closed")]
    Closed,
}

macro_rules! decode_error_from {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for StoreError {
                fn from(err: $source) -> Self {
                    StoreError::Decode(Box::new(err))
                }
            }
        )+
    };
}

decode_error_from!(
    IntoRowsResultError,
    RowsError,
    DeserializationError,
    MaybeFirstRowError,
    FirstRowError,
);

#[cfg(test)]
mod tests {
    use std::error::Error;

    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn decode_errors_keep_their_source() {
        let err = StoreError::from(FirstRowError::RowsEmpty);
        assert_matches!(err, StoreError::Decode(_));

        let source = err.source().expect("decode error has a source");
        assert_matches!(
            source.downcast_ref::<FirstRowError>(),
            Some(FirstRowError::RowsEmpty)
        );
    }

    #[test]
    fn decode_display_includes_driver_message() {
        let err = StoreError::Decode("column `created` is not a bigint".into());
        assert_eq!(
            err.to_string(),
            "Failed to decode result rows: column `created` is not a bigint"
        );
    }
}
