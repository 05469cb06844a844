//! Error types for folio_chrome

use folio_core::FolioError;
use thiserror::Error;

/// Failure delivering a contact message through the relay
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RelayError {
    /// The relay answered but refused the message
    #[error("relay rejected the message ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The relay could not be reached
    #[error("network error: {0}")]
    Network(String),

    /// Public key, service id or template id missing from the contact configuration
    #[error("contact relay is not configured")]
    NotConfigured,
}

/// Errors raised by the chrome controllers
#[derive(Error, Debug)]
pub enum ChromeError {
    #[error(transparent)]
    Document(#[from] FolioError),

    #[error(transparent)]
    Relay(#[from] RelayError),

    /// A validation pattern failed to compile
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result type for folio_chrome operations
pub type Result<T> = std::result::Result<T, ChromeError>;
