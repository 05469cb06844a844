//! Error types for folio_app

use folio_chrome::{ChromeError, RelayError};
use folio_core::FolioError;
use folio_reveal::RevealError;
use thiserror::Error;

/// Errors that can occur while running a site
#[derive(Error, Debug)]
pub enum SiteError {
    #[error(transparent)]
    Document(#[from] FolioError),

    #[error(transparent)]
    Reveal(#[from] RevealError),

    #[error(transparent)]
    Chrome(#[from] ChromeError),

    #[error(transparent)]
    Relay(#[from] RelayError),

    /// The site configuration file is not valid TOML for [`SiteConfig`](crate::SiteConfig)
    #[error("invalid site configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for folio_app operations
pub type Result<T> = std::result::Result<T, SiteError>;
