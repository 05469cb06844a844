//! From/to property tweens
//!
//! A [`Tween`] describes one element's transition: an optional explicit
//! from-state, the to-state, duration, delay and easing. Tweens are plain
//! data; the [`AnimationScheduler`](crate::AnimationScheduler) owns their
//! progress.

use folio_core::{ElementId, PropertyMap};

use crate::easing::Easing;
use crate::values::Interpolate;

/// A single element transition
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    pub target: ElementId,
    /// Explicit start state, applied the moment the tween is played.
    /// `None` starts from whatever the element shows when the delay elapses.
    pub from: Option<PropertyMap>,
    pub to: PropertyMap,
    pub duration_ms: f32,
    pub delay_ms: f32,
    pub easing: Easing,
}

impl Tween {
    /// Tween from the element's current values to `to`
    pub fn to(target: ElementId, to: PropertyMap) -> Self {
        Self {
            target,
            from: None,
            to,
            duration_ms: 500.0,
            delay_ms: 0.0,
            easing: Easing::default(),
        }
    }

    /// Tween from an explicit state to `to`
    pub fn from_to(target: ElementId, from: PropertyMap, to: PropertyMap) -> Self {
        Self {
            from: Some(from),
            ..Self::to(target, to)
        }
    }

    pub fn duration(mut self, ms: f32) -> Self {
        self.duration_ms = ms.max(0.0);
        self
    }

    pub fn delay(mut self, ms: f32) -> Self {
        self.delay_ms = ms.max(0.0);
        self
    }

    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Total time from play to completion
    pub fn total_ms(&self) -> f32 {
        self.delay_ms + self.duration_ms
    }

    /// Linear (un-eased) progress after `elapsed_ms`, or `None` while delayed
    pub fn progress_at(&self, elapsed_ms: f32) -> Option<f32> {
        if elapsed_ms < self.delay_ms {
            return None;
        }
        if self.duration_ms <= 0.0 {
            return Some(1.0);
        }
        Some(((elapsed_ms - self.delay_ms) / self.duration_ms).min(1.0))
    }

    /// Values of every to-property after `elapsed_ms`, starting from `start`
    ///
    /// Properties missing from `start` jump straight to their to-value.
    /// Completed tweens return `to` exactly.
    pub fn sample(&self, start: &PropertyMap, elapsed_ms: f32) -> Option<PropertyMap> {
        let progress = self.progress_at(elapsed_ms)?;
        if progress >= 1.0 {
            return Some(self.to.clone());
        }
        let eased = self.easing.apply(progress);
        Some(
            self.to
                .iter()
                .map(|(property, to)| {
                    let value = match start.get(property) {
                        Some(from) => from.lerp(to, eased),
                        None => *to,
                    };
                    (*property, value)
                })
                .collect(),
        )
    }
}
