use thiserror::Error;

/// Errors raised by the tagged wire codec for upload results.
///
/// Variant errors only occur when decoding; encoding can only fail with `Json`.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The record result object carries no variant key at all.
    #[error("record result has no variant key")]
    MissingVariant,
    /// More than one recognized variant key is present.
    #[error("record result has more than one variant key: {}", .0.join(", "))]
    AmbiguousVariant(Vec<String>),
    /// A key that is not one of the record result variant names.
    #[error("unknown record result variant: {0}")]
    UnknownVariant(String),
    /// A field is missing or has the wrong shape.
    #[error("malformed {context}: {message}")]
    Malformed { context: String, message: String },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodecError {
    pub(crate) fn malformed(context: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::Malformed {
            context: context.into(),
            message: message.into(),
        }
    }
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
