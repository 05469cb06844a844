//! Folio Core
//!
//! Foundational primitives for the folio site engine:
//!
//! - **Document**: an arena of elements with classes, attributes, inline
//!   style, animated visual properties and document-space bounds
//! - **Selectors**: a CSS selector subset (type, id, class, attribute,
//!   descendant, lists) used by every controller to discover its targets
//! - **Timers**: a virtual-clock timer queue and a trailing debouncer
//! - **Store**: origin-scoped key-value persistence
//!
//! # Example
//!
//! ```rust
//! use folio_core::{Document, ElementSpec, Rect};
//!
//! let mut doc = Document::new(1280.0, 800.0);
//! let body = doc.body();
//! ElementSpec::new("div")
//!     .class("service-card")
//!     .bounds(Rect::new(0.0, 1200.0, 300.0, 200.0))
//!     .mount(&mut doc, body);
//!
//! let cards = doc.query_selector_all(".service-card").unwrap();
//! assert_eq!(cards.len(), 1);
//! ```

pub mod dom;
pub mod error;
pub mod fixture;
pub mod geometry;
pub mod selector;
pub mod store;
pub mod style;
pub mod timer;

pub use dom::{Document, Element, ElementId};
pub use error::{FolioError, Result};
pub use fixture::{ElementSpec, PageFixture};
pub use geometry::{Rect, Viewport};
pub use selector::Selector;
pub use store::{JsonFileStore, KvStore, MemoryStore};
pub use style::{PropValue, Property, PropertyMap, Visual};
pub use timer::{Debouncer, TimerId, TimerQueue};
