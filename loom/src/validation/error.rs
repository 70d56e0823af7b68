use thiserror::Error;

/// Errors raised while building validation rules.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid pattern for field {field}: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },
}
