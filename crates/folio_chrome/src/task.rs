//! Delayed work and host requests
//!
//! Chrome controllers never own timers. Anything that must happen later is
//! returned as a [`Deferred`] for the host to queue, and anything the host
//! must do itself (scrolling the window) is returned as a [`ChromeAction`].

use folio_animation::{TweenEvent, TweenId};
use folio_core::ElementId;
use rustc_hash::FxHashMap;

/// Work a chrome controller asks to run later
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChromeTask {
    HidePreloader,
    /// Advance one animated counter by a step
    CounterStep(ElementId),
    HideSuccessBanner,
    /// Reveal a card that matched the active project filter
    ShowFilteredCard(ElementId),
    /// Reveal a card uncovered by "load more"
    ShowMoreCard(ElementId),
    /// Collapse a card that faded out of the active filter
    CollapseCard(ElementId),
    /// Take an element out of layout (`display: none`)
    Undisplay(ElementId),
    RemoveElement(ElementId),
}

/// A task paired with the delay after which it should run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Deferred {
    pub delay_ms: f64,
    pub task: ChromeTask,
}

impl Deferred {
    pub fn after(delay_ms: f64, task: ChromeTask) -> Self {
        Self { delay_ms, task }
    }
}

/// Request for the host window
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChromeAction {
    /// Smooth-scroll the window to an absolute offset
    ScrollTo { y: f32 },
    /// Smooth-scroll until the element is in view
    ScrollIntoView { element: ElementId },
}

/// Tasks waiting on a tween to complete
///
/// A tween that is overwritten or cancelled never runs its task.
#[derive(Debug, Default)]
pub struct CompletionTasks {
    pending: FxHashMap<TweenId, ChromeTask>,
}

impl CompletionTasks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_complete(&mut self, tween: TweenId, task: ChromeTask) {
        self.pending.insert(tween, task);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// The task to run for `event`, if any
    pub fn resolve(&mut self, event: &TweenEvent) -> Option<ChromeTask> {
        match event {
            TweenEvent::Completed { id, .. } => self.pending.remove(id),
            TweenEvent::Cancelled { id, .. } => {
                self.pending.remove(id);
                None
            }
            TweenEvent::Started { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_animation::{AnimationScheduler, Tween};
    use folio_core::style::props;
    use folio_core::{Document, Property};

    #[test]
    fn test_completion_runs_once_and_skips_cancelled() {
        let mut doc = Document::new(1280.0, 800.0);
        let body = doc.body();
        let el = doc.create_element("div");
        doc.append_child(body, el);

        let mut scheduler = AnimationScheduler::new();
        let mut tasks = CompletionTasks::new();
        let fade = scheduler.play(
            &mut doc,
            Tween::to(el, props([(Property::Opacity, 0.0)])).duration(300.0),
        );
        tasks.on_complete(fade, ChromeTask::Undisplay(el));

        let resolved: Vec<_> = scheduler
            .tick(&mut doc, 400.0)
            .iter()
            .filter_map(|e| tasks.resolve(e))
            .collect();
        assert_eq!(resolved, vec![ChromeTask::Undisplay(el)]);
        assert!(tasks.is_empty());

        let fade = scheduler.play(
            &mut doc,
            Tween::to(el, props([(Property::Opacity, 1.0)])).duration(300.0),
        );
        tasks.on_complete(fade, ChromeTask::RemoveElement(el));
        scheduler.play(
            &mut doc,
            Tween::to(el, props([(Property::Opacity, 0.5)])).duration(300.0),
        );
        let resolved: Vec<_> = scheduler
            .tick(&mut doc, 400.0)
            .iter()
            .filter_map(|e| tasks.resolve(e))
            .collect();
        assert!(resolved.is_empty());
        assert!(tasks.is_empty());
    }
}
