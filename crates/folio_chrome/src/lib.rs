//! Folio Chrome
//!
//! Page furniture around the reveal engine: navigation, theme switching,
//! statistic counters, the contact form and its email relay, the FAQ
//! accordion and the project grid.
//!
//! Controllers mutate the [`Document`](folio_core::Document) directly and
//! never own timers or scroll the window. Delayed work comes back as
//! [`Deferred`] tasks and window requests as [`ChromeAction`]s; the host
//! schedules the former and performs the latter.
//!
//! # Example
//!
//! ```rust
//! use folio_core::{Document, ElementSpec, MemoryStore};
//! use folio_chrome::Chrome;
//!
//! let mut doc = Document::new(1280.0, 800.0);
//! let body = doc.body();
//! let navbar = ElementSpec::new("nav").id("navbar").mount(&mut doc, body);
//!
//! let store = MemoryStore::new();
//! let mut chrome = Chrome::setup(&mut doc, "/index.html", &store).unwrap();
//! doc.set_scroll(250.0);
//! chrome.on_scroll(&mut doc);
//! assert!(doc.has_class(navbar, "scrolled"));
//! ```

pub mod back_to_top;
pub mod chrome;
pub mod counters;
pub mod error;
pub mod faq;
pub mod form;
pub mod navigation;
pub mod preloader;
pub mod projects;
pub mod relay;
pub mod task;
pub mod theme;
pub mod visibility;

pub use back_to_top::BackToTop;
pub use chrome::{Chrome, Reaction};
pub use counters::Counters;
pub use error::{ChromeError, RelayError, Result};
pub use faq::FaqAccordion;
pub use form::{ContactForm, ContactSubmission, Field, FieldError, SubmitOutcome, Validator};
pub use navigation::{anchor_target, current_page, MobileMenu, Navbar};
pub use preloader::Preloader;
pub use projects::ProjectGrid;
pub use relay::{ContactConfig, DryRunRelay, EmailRelay, SentMessage, TemplateParams};
pub use task::{ChromeAction, ChromeTask, CompletionTasks, Deferred};
pub use theme::{Theme, ThemeSwitcher, THEME_KEY};
pub use visibility::VisibilityClasses;
