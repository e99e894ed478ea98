use thiserror::Error;

/// Errors reported by a backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store refused the write because a business rule rejected it.
    #[error("business rule violated: {0}")]
    BusinessRule(String),
    /// Any other store failure.
    #[error("store error: {0}")]
    Backend(String),
}

/// Errors that abort processing of a row.
///
/// Row outcomes (no match, multiple matches, rejected records) are not
/// errors; they are reported through the upload result tree.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    /// A must-match table is never created, forced or not.
    #[error("cannot force upload of must-match table {0}")]
    ForceUploadMustMatch(String),
    #[error("invalid upload options: {0}")]
    Options(#[from] toml::de::Error),
    #[error("invalid upload plan: {0}")]
    InvalidPlan(String),
}

/// Result type for binding and upload operations.
pub type Result<T> = std::result::Result<T, UploadError>;
