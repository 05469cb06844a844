//! Error types for folio_reveal

use folio_core::FolioError;
use thiserror::Error;

/// Errors raised while building or running reveal triggers
#[derive(Error, Debug)]
pub enum RevealError {
    /// A trigger line such as `top 90%` could not be parsed
    #[error("invalid trigger line `{0}`")]
    TriggerLine(String),

    /// A template's selector or values were rejected by the document model
    #[error(transparent)]
    Document(#[from] FolioError),

    /// A template is internally inconsistent
    #[error("template `{selector}`: {message}")]
    Template { selector: String, message: String },
}

/// Result type for folio_reveal operations
pub type Result<T> = std::result::Result<T, RevealError>;

/// Swallow a cosmetic animation failure
///
/// A broken reveal must never break the page, so failures in optional
/// animation setup are logged here and dropped.
pub fn report_animation_error(context: &str, error: &RevealError) {
    tracing::warn!(context, %error, "Animation warning");
}
