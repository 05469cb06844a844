//! Reveal controller
//!
//! Owns the reveal pipeline for one page: registered triggers, the observer
//! watching them, the dispatcher playing their transitions, and the hero,
//! parallax, magnetic and page-transition effects sharing that dispatcher.
//! The host feeds it page events and the clock.

use folio_animation::TweenEvent;
use folio_core::{Document, ElementId, TimerId, TimerQueue};
use rustc_hash::FxHashMap;

use crate::config::RevealConfig;
use crate::dispatcher::AnimationDispatcher;
use crate::error::{report_animation_error, Result};
use crate::hero::hero_timeline;
use crate::magnetic::MagneticButtons;
use crate::observer::{VisibilityEvent, VisibilityKind, VisibilityObserver, WatchId};
use crate::parallax::Parallax;
use crate::refresh::{RefreshController, RefreshReason};
use crate::registry::register_all;
use crate::spec::{RepeatPolicy, TriggerSpec};
use crate::sweeper::FallbackSweeper;
use crate::transitions::PageTransitions;

/// Observable outcome of a page event
#[derive(Clone, Debug, PartialEq)]
pub enum RevealEvent {
    /// A trigger fired and its elements started revealing
    Revealed {
        selector: String,
        elements: Vec<ElementId>,
    },
    /// A reversible trigger was scrolled back above its line
    Reversed {
        selector: String,
        elements: Vec<ElementId>,
    },
    /// The fallback sweep forced a stuck element visible
    Swept { element: ElementId },
}

/// Result of advancing the clock
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub tweens: Vec<TweenEvent>,
    /// Set when a page-leave fade finished and the host should navigate
    pub navigate: Option<String>,
}

pub struct RevealController {
    config: RevealConfig,
    observer: VisibilityObserver,
    dispatcher: AnimationDispatcher,
    sweeper: FallbackSweeper,
    refresh: RefreshController,
    parallax: Parallax,
    magnetic: MagneticButtons,
    transitions: PageTransitions,
    specs: Vec<TriggerSpec>,
    watches: FxHashMap<WatchId, usize>,
    fire_counts: Vec<usize>,
    ready: bool,
}

impl RevealController {
    pub fn new(config: RevealConfig) -> Result<Self> {
        let sweeper = FallbackSweeper::new(config.sweep_duration_ms, config.debug)?;
        let refresh = RefreshController::new(config.resize_debounce_ms);
        Ok(Self {
            config,
            observer: VisibilityObserver::new(),
            dispatcher: AnimationDispatcher::new(),
            sweeper,
            refresh,
            parallax: Parallax::new(),
            magnetic: MagneticButtons::new(),
            transitions: PageTransitions::new(),
            specs: Vec::new(),
            watches: FxHashMap::default(),
            fire_counts: Vec::new(),
            ready: false,
        })
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    pub fn observer(&self) -> &VisibilityObserver {
        &self.observer
    }

    pub fn dispatcher(&self) -> &AnimationDispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut AnimationDispatcher {
        &mut self.dispatcher
    }

    pub fn specs(&self) -> &[TriggerSpec] {
        &self.specs
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Number of times the trigger at `index` has fired
    pub fn fire_count(&self, index: usize) -> usize {
        self.fire_counts.get(index).copied().unwrap_or(0)
    }

    /// Register every trigger and start the page-ready effects
    ///
    /// Elements already past their trigger line reveal in the same call.
    pub fn on_ready(&mut self, doc: &mut Document) -> Vec<RevealEvent> {
        if self.ready {
            return Vec::new();
        }
        self.ready = true;

        match hero_timeline(doc) {
            Ok(Some(timeline)) => {
                timeline.play(self.dispatcher.scheduler_mut(), doc);
            }
            Ok(None) => {}
            Err(error) => report_animation_error("hero", &error),
        }

        self.specs = register_all(&self.config.table(), doc);
        self.fire_counts = vec![0; self.specs.len()];
        let mut events = Vec::new();
        for (index, spec) in self.specs.iter().enumerate() {
            let Some(trigger) = spec.trigger_element() else {
                continue;
            };
            if spec.scroll_triggered {
                let watch = self.observer.watch(doc, trigger, spec.line, spec.policy);
                self.watches.insert(watch, index);
            } else {
                self.dispatcher.play_spec(doc, spec);
                self.fire_counts[index] += 1;
                events.push(RevealEvent::Revealed {
                    selector: spec.selector.clone(),
                    elements: spec.elements().collect(),
                });
            }
        }

        if let Err(error) = self.parallax.setup(doc, &mut self.observer) {
            report_animation_error("parallax", &error);
        }
        if let Err(error) = self.magnetic.setup(doc) {
            report_animation_error("magnetic buttons", &error);
        }
        self.transitions.fade_in(doc, &mut self.dispatcher);

        tracing::debug!(
            triggers = self.specs.len(),
            watches = self.observer.len(),
            "Reveal engine ready"
        );
        events.extend(self.on_scroll(doc));
        events
    }

    /// Observe the current scroll position
    pub fn on_scroll(&mut self, doc: &mut Document) -> Vec<RevealEvent> {
        let updates = self.observer.update(doc);
        let mut events = Vec::new();
        for update in updates {
            if let Some(event) = self.handle(doc, update) {
                events.push(event);
            }
        }
        events
    }

    fn handle(&mut self, doc: &mut Document, update: VisibilityEvent) -> Option<RevealEvent> {
        if let VisibilityKind::Progress(progress) = update.kind {
            self.parallax
                .on_progress(doc, &mut self.dispatcher, update.watch, progress);
            return None;
        }

        let index = *self.watches.get(&update.watch)?;
        let spec = self.specs.get(index)?;
        if !self.observer.is_watching(update.watch) {
            self.watches.remove(&update.watch);
        }

        match update.kind {
            VisibilityKind::Entered => {
                if self.fire_counts[index] == 0 {
                    self.dispatcher.play_spec(doc, spec);
                } else {
                    self.dispatcher.replay_spec(doc, spec);
                }
                self.fire_counts[index] += 1;
                Some(RevealEvent::Revealed {
                    selector: spec.selector.clone(),
                    elements: spec.elements().collect(),
                })
            }
            VisibilityKind::Left => {
                self.dispatcher.reverse(doc, spec);
                Some(RevealEvent::Reversed {
                    selector: spec.selector.clone(),
                    elements: spec.elements().collect(),
                })
            }
            VisibilityKind::Progress(_) => None,
        }
    }

    /// Schedule the debounced resize refresh
    pub fn on_resize<T>(&mut self, queue: &mut TimerQueue<T>, payload: T) -> TimerId {
        self.refresh.on_resize(queue, payload)
    }

    /// Recompute trigger geometry, then re-observe
    pub fn refresh(
        &mut self,
        doc: &mut Document,
        reason: RefreshReason,
        fired: Option<TimerId>,
    ) -> Vec<RevealEvent> {
        self.refresh.refresh(reason, fired, &mut self.observer, doc);
        self.on_scroll(doc)
    }

    /// Run the fallback sweep
    ///
    /// Swept elements no longer need their `once` watches.
    pub fn sweep(&mut self, doc: &mut Document) -> Vec<RevealEvent> {
        let swept = self.sweeper.sweep(doc, &mut self.dispatcher, &self.specs);
        let released: Vec<WatchId> = self
            .watches
            .iter()
            .filter(|(_, index)| {
                let spec = &self.specs[**index];
                spec.policy == RepeatPolicy::Once && spec.elements().any(|el| swept.contains(&el))
            })
            .map(|(watch, _)| *watch)
            .collect();
        for watch in released {
            self.observer.unwatch(watch);
            self.watches.remove(&watch);
        }
        swept
            .into_iter()
            .map(|element| RevealEvent::Swept { element })
            .collect()
    }

    pub fn on_pointer_move(&mut self, doc: &mut Document, element: ElementId, x: f32, y: f32) {
        self.magnetic
            .on_pointer_move(doc, &mut self.dispatcher, element, x, y);
    }

    pub fn on_pointer_leave(&mut self, doc: &mut Document, element: ElementId) {
        self.magnetic
            .on_pointer_leave(doc, &mut self.dispatcher, element);
    }

    /// Returns `true` when the click starts a page-leave fade
    pub fn on_link_click(&mut self, doc: &mut Document, link: ElementId) -> bool {
        self.ready
            && self
                .transitions
                .on_link_click(doc, &mut self.dispatcher, link)
    }

    /// Advance every running transition
    pub fn tick(&mut self, doc: &mut Document, dt_ms: f32) -> Frame {
        let tweens = self.dispatcher.tick(doc, dt_ms);
        let mut navigate = None;
        for event in &tweens {
            if let Some(href) = self.transitions.on_tween_event(event) {
                navigate = Some(href);
            }
        }
        Frame { tweens, navigate }
    }
}
