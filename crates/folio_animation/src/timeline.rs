//! Sequenced entrance timelines
//!
//! A timeline is a list of entries, each fading a group of elements in from
//! an offset state, placed relative to what came before it:
//!
//! ```text
//! greeting  |=======|
//! title         |==========|          -=400
//! subtitle          |=======|         -=600
//! buttons                |==|==|      -=400, stagger 200
//! ```
//!
//! Positions are resolved when entries are added, so the start of every entry
//! is known before anything plays.

use folio_core::{Document, ElementId, PropertyMap};

use crate::easing::Easing;
use crate::scheduler::{AnimationScheduler, TweenId};
use crate::tween::Tween;

/// Where an entry starts
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Position {
    /// At the current end of the timeline
    Sequential,
    /// Offset from the current end (negative overlaps, like `-=0.4`)
    Relative(f32),
    /// Absolute time from the timeline start
    At(f32),
}

/// One step: animate `targets` in from `from` to their current values
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineEntry {
    pub targets: Vec<ElementId>,
    pub from: PropertyMap,
    pub duration_ms: f32,
    pub stagger_ms: f32,
    /// Falls back to the timeline's default easing
    pub easing: Option<Easing>,
}

impl TimelineEntry {
    pub fn from_state(targets: Vec<ElementId>, from: PropertyMap) -> Self {
        Self {
            targets,
            from,
            duration_ms: 500.0,
            stagger_ms: 0.0,
            easing: None,
        }
    }

    pub fn duration(mut self, ms: f32) -> Self {
        self.duration_ms = ms.max(0.0);
        self
    }

    pub fn stagger(mut self, ms: f32) -> Self {
        self.stagger_ms = ms.max(0.0);
        self
    }

    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    /// Time from the first target's start to the last target's end
    pub fn span_ms(&self) -> f32 {
        let extra = self.targets.len().saturating_sub(1) as f32 * self.stagger_ms;
        self.duration_ms + extra
    }
}

/// An ordered set of entries with resolved start times
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    delay_ms: f32,
    default_easing: Easing,
    entries: Vec<(f32, TimelineEntry)>,
    end_ms: f32,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay before the first entry
    pub fn delay(mut self, ms: f32) -> Self {
        self.delay_ms = ms.max(0.0);
        self
    }

    pub fn default_easing(mut self, easing: Easing) -> Self {
        self.default_easing = easing;
        self
    }

    /// Append an entry; entries without targets are skipped
    pub fn add(mut self, entry: TimelineEntry, position: Position) -> Self {
        self.push(entry, position);
        self
    }

    pub fn push(&mut self, entry: TimelineEntry, position: Position) {
        if entry.targets.is_empty() {
            return;
        }
        let start = match position {
            Position::Sequential => self.end_ms,
            Position::Relative(offset) => self.end_ms + offset,
            Position::At(at) => at,
        }
        .max(0.0);
        self.end_ms = self.end_ms.max(start + entry.span_ms());
        self.entries.push((start, entry));
    }

    /// Entries with their start times (relative to the timeline start)
    pub fn entries(&self) -> impl Iterator<Item = (f32, &TimelineEntry)> {
        self.entries.iter().map(|(start, entry)| (*start, entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Length from start to the end of the last entry, excluding the delay
    pub fn duration_ms(&self) -> f32 {
        self.end_ms
    }

    /// Play every entry on `scheduler`
    ///
    /// To-values are the targets' values at play time; every from-state is
    /// applied immediately so nothing flashes before its entry begins.
    pub fn play(&self, scheduler: &mut AnimationScheduler, doc: &mut Document) -> Vec<TweenId> {
        let mut ids = Vec::new();
        for (start, entry) in &self.entries {
            let easing = entry.easing.unwrap_or(self.default_easing);
            for (index, target) in entry.targets.iter().enumerate() {
                let to: PropertyMap = entry
                    .from
                    .keys()
                    .map(|p| (*p, doc.prop(*target, *p).unwrap_or_else(|| p.identity())))
                    .collect();
                let delay = self.delay_ms + start + entry.stagger_ms * index as f32;
                let tween = Tween::from_to(*target, entry.from.clone(), to)
                    .duration(entry.duration_ms)
                    .delay(delay)
                    .ease(easing);
                ids.push(scheduler.play(doc, tween));
            }
        }
        tracing::debug!(
            entries = self.entries.len(),
            tweens = ids.len(),
            duration_ms = self.delay_ms + self.end_ms,
            "Timeline started"
        );
        ids
    }
}
