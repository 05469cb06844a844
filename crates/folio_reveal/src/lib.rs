//! Folio Reveal
//!
//! Scroll-driven reveal engine. A declarative table of element categories is
//! turned into triggers at page-ready time; an observer reports when each
//! trigger line is crossed; a dispatcher plays the transition; a fallback
//! sweep after load guarantees nothing stays hidden.
//!
//! ```text
//! selector_table() ──► register_all() ──► VisibilityObserver ──► AnimationDispatcher
//!                          │ (hide)             ▲ refresh              │
//!                          ▼                    │                      ▼
//!                       Document ◄──────────────┴────────────── AnimationScheduler
//! ```
//!
//! # Example
//!
//! ```rust
//! use folio_core::{Document, ElementSpec, Rect};
//! use folio_reveal::{RevealConfig, RevealController};
//!
//! let mut doc = Document::new(1280.0, 800.0);
//! let body = doc.body();
//! let card = ElementSpec::new("div")
//!     .class("service-card")
//!     .bounds(Rect::new(0.0, 1400.0, 400.0, 300.0))
//!     .mount(&mut doc, body);
//!
//! let mut reveal = RevealController::new(RevealConfig::default()).unwrap();
//! reveal.on_ready(&mut doc);
//! assert_eq!(doc.opacity(card), 0.0);
//!
//! doc.set_scroll(900.0);
//! reveal.on_scroll(&mut doc);
//! reveal.tick(&mut doc, 1000.0);
//! assert_eq!(doc.opacity(card), 1.0);
//! ```

pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod hero;
pub mod magnetic;
pub mod observer;
pub mod parallax;
pub mod refresh;
pub mod registry;
pub mod spec;
pub mod sweeper;
pub mod table;
pub mod transitions;

pub use config::RevealConfig;
pub use controller::{Frame, RevealController, RevealEvent};
pub use dispatcher::AnimationDispatcher;
pub use error::{report_animation_error, Result, RevealError};
pub use observer::{VisibilityEvent, VisibilityKind, VisibilityObserver, WatchId};
pub use refresh::{RefreshController, RefreshReason};
pub use registry::{register, register_all};
pub use spec::{
    Edge, Offset, PlayOptions, RepeatPolicy, Scope, TriggerItem, TriggerLine, TriggerSpec,
    TriggerTemplate,
};
pub use sweeper::FallbackSweeper;
pub use table::{selector_table, SWEEP_SELECTORS};
pub use transitions::{is_internal_link, PageTransitions};
