//! Visibility observer
//!
//! Watches elements against the viewport. Each watch caches the scroll
//! offset at which its trigger line is reached; [`VisibilityObserver::update`]
//! compares the current scroll position with those offsets and reports
//! crossings. Cached offsets only change on [`VisibilityObserver::refresh`],
//! so layout shifts are picked up when the host asks for a refresh.

use folio_core::{Document, ElementId};
use slotmap::{new_key_type, Key, SlotMap};

use crate::spec::{RepeatPolicy, TriggerLine};

new_key_type! {
    /// Handle to a live watch; dropping the watch is explicit via `unwatch`
    pub struct WatchId;
}

impl WatchId {
    pub fn to_raw(self) -> u64 {
        self.data().as_ffi()
    }
}

/// What happened to a watch
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VisibilityKind {
    /// The trigger line was crossed moving into view
    Entered,
    /// The trigger line was crossed moving back up (reversible watches only)
    Left,
    /// Scrub progress between the start and end lines
    Progress(f32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityEvent {
    pub watch: WatchId,
    pub element: ElementId,
    pub kind: VisibilityKind,
}

#[derive(Debug)]
enum WatchState {
    Line {
        line: TriggerLine,
        policy: RepeatPolicy,
        start: f32,
        inside: bool,
    },
    Scrub {
        start_line: TriggerLine,
        end_line: TriggerLine,
        start: f32,
        end: f32,
        progress: Option<f32>,
    },
}

#[derive(Debug)]
struct Watch {
    element: ElementId,
    state: WatchState,
}

/// Tracks trigger lines and scrub ranges for registered elements
#[derive(Debug, Default)]
pub struct VisibilityObserver {
    watches: SlotMap<WatchId, Watch>,
    order: Vec<WatchId>,
    refreshes: usize,
}

impl VisibilityObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn start_of(doc: &Document, element: ElementId, line: &TriggerLine) -> f32 {
        let bounds = doc.bounds(element).unwrap_or_default();
        line.start_scroll(bounds, doc.viewport().height)
    }

    fn insert(&mut self, watch: Watch) -> WatchId {
        let id = self.watches.insert(watch);
        self.order.push(id);
        id
    }

    /// Watch `element` crossing `line`
    pub fn watch(
        &mut self,
        doc: &Document,
        element: ElementId,
        line: TriggerLine,
        policy: RepeatPolicy,
    ) -> WatchId {
        let start = Self::start_of(doc, element, &line);
        self.insert(Watch {
            element,
            state: WatchState::Line {
                line,
                policy,
                start,
                inside: false,
            },
        })
    }

    /// Watch scroll progress of `element` between two lines
    pub fn watch_scrub(
        &mut self,
        doc: &Document,
        element: ElementId,
        start_line: TriggerLine,
        end_line: TriggerLine,
    ) -> WatchId {
        let start = Self::start_of(doc, element, &start_line);
        let end = Self::start_of(doc, element, &end_line);
        self.insert(Watch {
            element,
            state: WatchState::Scrub {
                start_line,
                end_line,
                start,
                end,
                progress: None,
            },
        })
    }

    pub fn unwatch(&mut self, id: WatchId) -> bool {
        self.watches.remove(id).is_some()
    }

    /// Release every watch on `element`
    pub fn unwatch_element(&mut self, element: ElementId) -> Vec<WatchId> {
        let ids: Vec<WatchId> = self
            .watches
            .iter()
            .filter(|(_, w)| w.element == element)
            .map(|(id, _)| id)
            .collect();
        for id in &ids {
            self.watches.remove(*id);
        }
        ids
    }

    pub fn is_watching(&self, id: WatchId) -> bool {
        self.watches.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.watches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watches.is_empty()
    }

    /// Scroll offset at which a line watch fires
    pub fn start_scroll(&self, id: WatchId) -> Option<f32> {
        match self.watches.get(id)?.state {
            WatchState::Line { start, .. } | WatchState::Scrub { start, .. } => Some(start),
        }
    }

    /// Number of geometry recomputations so far
    pub fn refresh_count(&self) -> usize {
        self.refreshes
    }

    /// Recompute every cached line from current layout and viewport
    pub fn refresh(&mut self, doc: &Document) {
        self.refreshes += 1;
        for watch in self.watches.values_mut() {
            match &mut watch.state {
                WatchState::Line { line, start, .. } => {
                    *start = Self::start_of(doc, watch.element, line);
                }
                WatchState::Scrub {
                    start_line,
                    end_line,
                    start,
                    end,
                    ..
                } => {
                    *start = Self::start_of(doc, watch.element, start_line);
                    *end = Self::start_of(doc, watch.element, end_line);
                }
            }
        }
        tracing::debug!(watches = self.watches.len(), "Observer geometry refreshed");
    }

    /// Compare the current scroll position against every watch
    ///
    /// `once` watches are released as they fire. Watches whose element has
    /// left the document are released silently.
    pub fn update(&mut self, doc: &Document) -> Vec<VisibilityEvent> {
        let scroll_y = doc.viewport().scroll_y;
        let mut events = Vec::new();
        let mut released = Vec::new();

        self.order.retain(|id| self.watches.contains_key(*id));
        for &id in &self.order {
            let Some(watch) = self.watches.get_mut(id) else {
                continue;
            };
            let element = watch.element;
            if !doc.contains(element) {
                tracing::debug!(watch = id.to_raw(), "Watched element left the document");
                released.push(id);
                continue;
            }

            match &mut watch.state {
                WatchState::Line {
                    policy,
                    start,
                    inside,
                    ..
                } => {
                    let reached = scroll_y >= *start;
                    if reached && !*inside {
                        *inside = true;
                        events.push(VisibilityEvent {
                            watch: id,
                            element,
                            kind: VisibilityKind::Entered,
                        });
                        if *policy == RepeatPolicy::Once {
                            released.push(id);
                        }
                    } else if !reached && *inside {
                        *inside = false;
                        events.push(VisibilityEvent {
                            watch: id,
                            element,
                            kind: VisibilityKind::Left,
                        });
                    }
                }
                WatchState::Scrub {
                    start,
                    end,
                    progress,
                    ..
                } => {
                    let span = *end - *start;
                    let p = if span <= 0.0 {
                        if scroll_y >= *start {
                            1.0
                        } else {
                            0.0
                        }
                    } else {
                        ((scroll_y - *start) / span).clamp(0.0, 1.0)
                    };
                    if *progress != Some(p) {
                        *progress = Some(p);
                        events.push(VisibilityEvent {
                            watch: id,
                            element,
                            kind: VisibilityKind::Progress(p),
                        });
                    }
                }
            }
        }

        for id in released {
            self.watches.remove(id);
        }
        tracing::trace!(scroll_y, events = events.len(), "Observer pass");
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{ElementSpec, Rect};

    fn page_with_box(top: f32) -> (Document, ElementId) {
        let mut doc = Document::new(1280.0, 800.0);
        let body = doc.body();
        let el = ElementSpec::new("div")
            .bounds(Rect::new(0.0, top, 400.0, 300.0))
            .mount(&mut doc, body);
        (doc, el)
    }

    fn kinds(events: &[VisibilityEvent]) -> Vec<VisibilityKind> {
        events.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_once_fires_exactly_once() {
        let (mut doc, el) = page_with_box(1520.0);
        let mut observer = VisibilityObserver::new();
        let id = observer.watch(&doc, el, TriggerLine::top(90.0), RepeatPolicy::Once);
        assert!((observer.start_scroll(id).unwrap() - 800.0).abs() < 1e-3);

        let mut fired = 0;
        for scroll in [0.0, 900.0, 100.0, 1200.0, 0.0, 2000.0] {
            doc.set_scroll(scroll);
            fired += observer
                .update(&doc)
                .iter()
                .filter(|e| e.kind == VisibilityKind::Entered)
                .count();
        }
        assert_eq!(fired, 1);
        assert!(!observer.is_watching(id));
    }

    #[test]
    fn test_reversible_enter_leave_enter() {
        let (mut doc, el) = page_with_box(1520.0);
        let mut observer = VisibilityObserver::new();
        observer.watch(&doc, el, TriggerLine::top(90.0), RepeatPolicy::Reversible);

        let mut seen = Vec::new();
        for scroll in [0.0, 900.0, 3000.0, 100.0, 850.0] {
            doc.set_scroll(scroll);
            seen.extend(kinds(&observer.update(&doc)));
        }
        assert_eq!(
            seen,
            vec![
                VisibilityKind::Entered,
                VisibilityKind::Left,
                VisibilityKind::Entered
            ]
        );
    }

    #[test]
    fn test_first_pass_fires_for_elements_already_past_the_line() {
        let (doc, el) = page_with_box(200.0);
        let mut observer = VisibilityObserver::new();
        observer.watch(&doc, el, TriggerLine::top(90.0), RepeatPolicy::Once);
        assert_eq!(kinds(&observer.update(&doc)), vec![VisibilityKind::Entered]);
    }

    #[test]
    fn test_lines_are_stale_until_refresh() {
        let (mut doc, el) = page_with_box(1520.0);
        let mut observer = VisibilityObserver::new();
        let id = observer.watch(&doc, el, TriggerLine::top(90.0), RepeatPolicy::Once);

        doc.set_bounds(el, Rect::new(0.0, 2520.0, 400.0, 300.0));
        assert!((observer.start_scroll(id).unwrap() - 800.0).abs() < 1e-3);
        observer.refresh(&doc);
        assert!((observer.start_scroll(id).unwrap() - 1800.0).abs() < 1e-3);
        assert_eq!(observer.refresh_count(), 1);

        doc.set_scroll(1000.0);
        assert!(observer.update(&doc).is_empty());
    }

    #[test]
    fn test_scrub_progress() {
        let (mut doc, hero) = page_with_box(0.0);
        doc.set_bounds(hero, Rect::new(0.0, 0.0, 1280.0, 800.0));
        let mut observer = VisibilityObserver::new();
        observer.watch_scrub(
            &doc,
            hero,
            TriggerLine::parse("top top").unwrap(),
            TriggerLine::parse("bottom top").unwrap(),
        );

        assert_eq!(kinds(&observer.update(&doc)), vec![VisibilityKind::Progress(0.0)]);
        assert!(observer.update(&doc).is_empty());
        doc.set_scroll(400.0);
        assert_eq!(kinds(&observer.update(&doc)), vec![VisibilityKind::Progress(0.5)]);
        doc.set_scroll(5000.0);
        assert_eq!(kinds(&observer.update(&doc)), vec![VisibilityKind::Progress(1.0)]);
    }

    #[test]
    fn test_removed_elements_are_released() {
        let (mut doc, el) = page_with_box(1520.0);
        let mut observer = VisibilityObserver::new();
        observer.watch(&doc, el, TriggerLine::top(90.0), RepeatPolicy::Reversible);
        doc.remove(el);
        assert!(observer.update(&doc).is_empty());
        assert!(observer.is_empty());
    }
}
