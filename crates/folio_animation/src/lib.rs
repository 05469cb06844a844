//! Folio Animation System
//!
//! Property transitions for the document model.
//!
//! # Features
//!
//! - **Easing**: the named presets the site uses (`power2.out`,
//!   `back.out(1.7)`, `elastic.out(1, 0.5)`, ...)
//! - **Tweens**: from/to property maps with duration, delay and easing
//! - **Scheduler**: ticks active tweens and keeps an explicit per-element,
//!   per-property map of the current transition so a new request on the same
//!   property overwrites the old one instead of fighting it
//! - **Timelines**: sequenced entries with relative positions (`-=0.4`) and
//!   per-entry stagger

pub mod easing;
pub mod scheduler;
pub mod timeline;
pub mod tween;
pub mod values;

pub use easing::{Easing, EasingParseError};
pub use scheduler::{AnimationScheduler, TweenEvent, TweenId};
pub use timeline::{Position, Timeline, TimelineEntry};
pub use tween::Tween;
pub use values::Interpolate;
