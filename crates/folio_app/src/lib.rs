//! Folio App
//!
//! Runs one portfolio page headlessly. [`Site`] wires the reveal engine
//! (`folio_reveal`) and the page chrome (`folio_chrome`) to browser-style
//! events and a virtual clock, so a whole visit (load, scroll, resize,
//! clicks, a contact form submission) can be replayed deterministically.
//!
//! # Example
//!
//! ```rust
//! use folio_app::{Site, SiteConfig};
//! use folio_core::PageFixture;
//!
//! let fixture = PageFixture::from_json(r#"{
//!     "elements": [
//!         { "tag": "div", "classes": ["service-card"], "bounds": [0, 1400, 400, 300] },
//!         { "tag": "footer", "bounds": [0, 2400, 1280, 400] }
//!     ]
//! }"#).unwrap();
//!
//! let mut site = Site::from_fixture(&fixture, SiteConfig::default()).unwrap();
//! site.on_dom_ready();
//! site.on_load();
//! site.advance(200.0);
//!
//! let card = site.document().query_selector(".service-card").unwrap().unwrap();
//! assert_eq!(site.document().opacity(card), 0.0);
//!
//! site.scroll_to(900.0);
//! site.advance(1000.0);
//! assert_eq!(site.document().opacity(card), 1.0);
//! ```

pub mod config;
pub mod error;
pub mod site;

pub use config::SiteConfig;
pub use error::{Result, SiteError};
pub use site::{Site, SiteBuilder, SiteEvent, SiteTask};
