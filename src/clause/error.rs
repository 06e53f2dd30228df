use thiserror::Error;

/// Caller input errors raised while building a clause. None of these are
/// retryable; the HTTP boundary reports all of them as 400.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClauseError {
    #[error("No data")]
    EmptyPayload,

    #[error("Filtering parameter not accepted: {0}")]
    UnsupportedFilterField(String),

    #[error("{min_field} cannot be greater than {max_field}")]
    InvalidRange {
        min_field: &'static str,
        max_field: &'static str,
    },

    #[error("Invalid value for filter '{field}': {value}")]
    InvalidFilterValue { field: &'static str, value: String },
}
