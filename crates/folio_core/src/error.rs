//! Error types for folio_core

use thiserror::Error;

/// Errors raised by the document model and its collaborators
#[derive(Error, Debug)]
pub enum FolioError {
    /// A selector string could not be parsed
    #[error("invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },

    /// A property name is not part of the animatable vocabulary
    #[error("unknown property `{0}`")]
    UnknownProperty(String),

    /// A property value could not be parsed
    #[error("invalid value `{value}` for property `{property}`")]
    InvalidValue { property: String, value: String },

    /// A page fixture or store file contained malformed JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a store file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for folio_core operations
pub type Result<T> = std::result::Result<T, FolioError>;
