//! Site configuration
//!
//! Loaded from a `site.toml`; every section and field is optional.
//!
//! ```toml
//! store_path = ".folio/store.json"
//!
//! [reveal]
//! debug = true
//! sweep_delay_ms = 3000
//!
//! [contact]
//! public_key = "pk_live"
//! service_id = "service_portfolio"
//! template_id = "template_contact"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use folio_chrome::ContactConfig;
use folio_core::{JsonFileStore, KvStore, MemoryStore};
use folio_reveal::RevealConfig;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// JSON file persisting visitor preferences; kept in memory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
    pub reveal: RevealConfig,
    pub contact: ContactConfig,
}

impl SiteConfig {
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = Self::from_toml(&fs::read_to_string(path)?)?;
        tracing::debug!(path = %path.display(), "Loaded site configuration");
        Ok(config)
    }

    /// Open the preference store this configuration names
    pub fn open_store(&self) -> Result<Box<dyn KvStore>> {
        Ok(match &self.store_path {
            Some(path) => Box::new(JsonFileStore::open(path)?),
            None => Box::new(MemoryStore::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SiteConfig::from_toml("").unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.reveal.sweep_delay_ms, 3000.0);
        assert!(!config.contact.is_configured());
    }

    #[test]
    fn test_sections() {
        let config = SiteConfig::from_toml(
            r#"
            store_path = "prefs.json"

            [reveal]
            debug = true
            resize_debounce_ms = 100

            [contact]
            public_key = "pk_live"
            service_id = "service_portfolio"
            template_id = "template_contact"
            "#,
        )
        .unwrap();
        assert_eq!(config.store_path, Some(PathBuf::from("prefs.json")));
        assert!(config.reveal.debug);
        assert_eq!(config.reveal.resize_debounce_ms, 100.0);
        assert_eq!(config.reveal.ready_delay_ms, 100.0);
        assert!(config.contact.is_configured());
    }

    #[test]
    fn test_malformed_config() {
        assert!(SiteConfig::from_toml("[reveal]\ndebug = \"sometimes\"").is_err());
    }

    #[test]
    fn test_memory_store_by_default() {
        let mut store = SiteConfig::default().open_store().unwrap();
        store.set("theme", "dark").unwrap();
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
    }
}
