//! Site runtime
//!
//! [`Site`] owns one page: its document, the reveal controller, the chrome
//! controllers, the preference store, the email relay and a virtual clock.
//! The host forwards browser events to it and advances the clock; the site
//! answers with [`SiteEvent`]s describing what happened and what the host
//! must do.
//!
//! Lifecycle, in host order:
//!
//! 1. [`Site::on_dom_ready`] queues reveal registration after the configured
//!    ready delay.
//! 2. [`Site::on_load`] refreshes trigger geometry, queues the fallback sweep
//!    and the preloader hide.
//! 3. Scroll, resize, visibility, pointer, click and form events as they
//!    happen, interleaved with [`Site::advance`].

use folio_chrome::{
    Chrome, ChromeAction, ChromeTask, DryRunRelay, EmailRelay, Reaction, SubmitOutcome,
};
use folio_core::{Document, ElementId, KvStore, MemoryStore, PageFixture, TimerId, TimerQueue};
use folio_reveal::{RefreshReason, RevealController, RevealEvent};

use crate::config::SiteConfig;
use crate::error::Result;

/// Work queued on the site clock
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SiteTask {
    /// Register triggers and start page-ready effects
    Ready,
    /// Force stuck-hidden elements visible
    Sweep,
    /// Debounced geometry refresh after a resize burst
    ResizeRefresh,
    Chrome(ChromeTask),
}

/// Something the host should know about or act on
#[derive(Clone, Debug, PartialEq)]
pub enum SiteEvent {
    Reveal(RevealEvent),
    /// Window request from the chrome (smooth scrolling)
    Action(ChromeAction),
    /// A page-leave fade finished; load `href`
    Navigate(String),
}

pub struct SiteBuilder {
    doc: Document,
    page_path: String,
    config: SiteConfig,
    store: Option<Box<dyn KvStore>>,
    relay: Option<Box<dyn EmailRelay>>,
}

impl SiteBuilder {
    /// Path of the page, used to highlight the matching navigation link
    pub fn page_path(mut self, path: impl Into<String>) -> Self {
        self.page_path = path.into();
        self
    }

    pub fn config(mut self, config: SiteConfig) -> Self {
        self.config = config;
        self
    }

    /// Preference store; defaults to the one the configuration names
    pub fn store(mut self, store: Box<dyn KvStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Email relay; defaults to a [`DryRunRelay`]
    pub fn relay(mut self, relay: Box<dyn EmailRelay>) -> Self {
        self.relay = Some(relay);
        self
    }

    /// Bind the chrome and create the reveal controller
    pub fn build(self) -> Result<Site> {
        let mut doc = self.doc;
        let store = match self.store {
            Some(store) => store,
            None => self.config.open_store()?,
        };
        let relay = self
            .relay
            .unwrap_or_else(|| Box::new(DryRunRelay::new()));
        let chrome = Chrome::setup(&mut doc, &self.page_path, store.as_ref())?;
        let reveal = RevealController::new(self.config.reveal.clone())?;

        Ok(Site {
            doc,
            page_path: self.page_path,
            config: self.config,
            reveal,
            chrome,
            timers: TimerQueue::new(),
            clock_ms: 0.0,
            store,
            relay,
            dom_ready: false,
            loaded: false,
        })
    }
}

pub struct Site {
    doc: Document,
    page_path: String,
    config: SiteConfig,
    reveal: RevealController,
    chrome: Chrome,
    timers: TimerQueue<SiteTask>,
    /// Time the animations have been ticked to
    clock_ms: f64,
    store: Box<dyn KvStore>,
    relay: Box<dyn EmailRelay>,
    dom_ready: bool,
    loaded: bool,
}

impl Site {
    pub fn builder(doc: Document) -> SiteBuilder {
        SiteBuilder {
            doc,
            page_path: "/index.html".to_string(),
            config: SiteConfig::default(),
            store: None,
            relay: None,
        }
    }

    /// Site for a fixture page with an in-memory store and a dry-run relay
    pub fn from_fixture(fixture: &PageFixture, config: SiteConfig) -> Result<Self> {
        Self::builder(fixture.to_document())
            .page_path(fixture.path.clone())
            .config(config)
            .store(Box::new(MemoryStore::new()))
            .build()
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn page_path(&self) -> &str {
        &self.page_path
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn reveal(&self) -> &RevealController {
        &self.reveal
    }

    pub fn chrome(&self) -> &Chrome {
        &self.chrome
    }

    pub fn store(&self) -> &dyn KvStore {
        self.store.as_ref()
    }

    /// Current virtual time in milliseconds
    pub fn now(&self) -> f64 {
        self.clock_ms
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Whether anything is still animating or waiting on the clock
    pub fn is_idle(&self) -> bool {
        self.timers.is_empty() && !self.reveal.dispatcher().has_active_animations()
    }

    // =========================================================================
    // Page lifecycle
    // =========================================================================

    pub fn on_dom_ready(&mut self) -> Vec<SiteEvent> {
        if self.dom_ready {
            return Vec::new();
        }
        self.dom_ready = true;
        self.timers
            .schedule(self.config.reveal.ready_delay_ms, SiteTask::Ready);
        let reaction = self.chrome.on_scroll(&mut self.doc);
        self.apply(reaction)
    }

    pub fn on_load(&mut self) -> Vec<SiteEvent> {
        if self.loaded {
            return Vec::new();
        }
        self.loaded = true;
        let mut events = self.reveal_events(|reveal, doc| {
            reveal.refresh(doc, RefreshReason::Load, None)
        });
        self.timers
            .schedule(self.config.reveal.sweep_delay_ms, SiteTask::Sweep);
        let reaction = self.chrome.on_load();
        events.extend(self.apply(reaction));
        events
    }

    /// Scroll the window to `y` (clamped to the scrollable range)
    pub fn scroll_to(&mut self, y: f32) -> Vec<SiteEvent> {
        let max = (self.doc.scroll_height() - self.doc.viewport().height).max(0.0);
        self.doc.set_scroll(y.clamp(0.0, max));
        let mut events = self.reveal_events(|reveal, doc| reveal.on_scroll(doc));
        let reaction = self.chrome.on_scroll(&mut self.doc);
        events.extend(self.apply(reaction));
        events
    }

    /// Resize the window; trigger geometry refreshes once the burst settles
    pub fn resize(&mut self, width: f32, height: f32) {
        self.doc.resize_viewport(width, height);
        self.reveal
            .on_resize(&mut self.timers, SiteTask::ResizeRefresh);
    }

    /// The tab was hidden or shown again
    pub fn on_visibility_change(&mut self, visible: bool) -> Vec<SiteEvent> {
        if !visible {
            return Vec::new();
        }
        self.reveal_events(|reveal, doc| reveal.refresh(doc, RefreshReason::Visible, None))
    }

    // =========================================================================
    // Input
    // =========================================================================

    pub fn click(&mut self, target: ElementId) -> Result<Vec<SiteEvent>> {
        if self.reveal.on_link_click(&mut self.doc, target) {
            tracing::debug!(element = target.to_raw(), "Leaving page");
        }
        let reaction = self.chrome.on_click(
            &mut self.doc,
            self.reveal.dispatcher_mut().scheduler_mut(),
            self.store.as_mut(),
            target,
        )?;
        Ok(self.apply(reaction))
    }

    pub fn pointer_move(&mut self, target: ElementId, x: f32, y: f32) {
        self.reveal.on_pointer_move(&mut self.doc, target, x, y);
    }

    pub fn pointer_enter(&mut self, target: ElementId) {
        self.chrome.on_pointer_enter(
            &mut self.doc,
            self.reveal.dispatcher_mut().scheduler_mut(),
            target,
        );
    }

    pub fn pointer_leave(&mut self, target: ElementId) {
        self.reveal.on_pointer_leave(&mut self.doc, target);
        self.chrome.on_pointer_leave(
            &mut self.doc,
            self.reveal.dispatcher_mut().scheduler_mut(),
            target,
        );
    }

    pub fn focus(&mut self, field: ElementId) {
        self.chrome.on_focus(
            &mut self.doc,
            self.reveal.dispatcher_mut().scheduler_mut(),
            field,
        );
    }

    pub fn blur(&mut self, field: ElementId) {
        self.chrome.on_blur(
            &mut self.doc,
            self.reveal.dispatcher_mut().scheduler_mut(),
            field,
        );
    }

    /// Type into a form control, replacing its value
    pub fn input(&mut self, field: ElementId, value: impl Into<String>) {
        if let Some(el) = self.doc.get_mut(field) {
            el.value = value.into();
        }
        self.chrome.on_input(&mut self.doc, field);
    }

    pub fn set_checked(&mut self, field: ElementId, checked: bool) {
        if let Some(el) = self.doc.get_mut(field) {
            el.checked = checked;
        }
    }

    /// Submit the contact form; `None` on pages without one
    pub async fn submit(&mut self) -> Option<SubmitOutcome> {
        let (outcome, reaction) = self
            .chrome
            .submit(
                &mut self.doc,
                self.reveal.dispatcher_mut().scheduler_mut(),
                self.relay.as_mut(),
                &self.config.contact,
            )
            .await?;
        self.apply(reaction);
        Some(outcome)
    }

    // =========================================================================
    // Clock
    // =========================================================================

    /// Advance the clock by `ms`, firing due timers in order and animating
    /// in between
    pub fn advance(&mut self, ms: f64) -> Vec<SiteEvent> {
        let until = self.clock_ms + ms.max(0.0);
        let mut events = Vec::new();
        while let Some(deadline) = self.timers.next_deadline().filter(|d| *d <= until) {
            self.tick_to(deadline, &mut events);
            let Some((id, task)) = self.timers.pop_due(deadline) else {
                break;
            };
            events.extend(self.run(id, task));
        }
        self.tick_to(until, &mut events);
        events
    }

    fn tick_to(&mut self, time_ms: f64, events: &mut Vec<SiteEvent>) {
        let dt = time_ms - self.clock_ms;
        self.timers.set_now(time_ms);
        if dt <= 0.0 {
            return;
        }
        self.clock_ms = time_ms;

        let frame = self.reveal.tick(&mut self.doc, dt as f32);
        if let Some(href) = frame.navigate {
            events.push(SiteEvent::Navigate(href));
        }
        let reaction = self.chrome.on_tween_events(
            &mut self.doc,
            self.reveal.dispatcher_mut().scheduler_mut(),
            &frame.tweens,
        );
        events.extend(self.apply(reaction));
    }

    fn run(&mut self, id: TimerId, task: SiteTask) -> Vec<SiteEvent> {
        tracing::trace!(?task, now = self.clock_ms, "Timer fired");
        match task {
            SiteTask::Ready => self.reveal_events(|reveal, doc| reveal.on_ready(doc)),
            SiteTask::Sweep => self.reveal_events(|reveal, doc| reveal.sweep(doc)),
            SiteTask::ResizeRefresh => self.reveal_events(|reveal, doc| {
                reveal.refresh(doc, RefreshReason::Resize, Some(id))
            }),
            SiteTask::Chrome(task) => {
                let reaction = self.chrome.run(
                    &mut self.doc,
                    self.reveal.dispatcher_mut().scheduler_mut(),
                    task,
                );
                self.apply(reaction)
            }
        }
    }

    fn reveal_events<F>(&mut self, f: F) -> Vec<SiteEvent>
    where
        F: FnOnce(&mut RevealController, &mut Document) -> Vec<RevealEvent>,
    {
        f(&mut self.reveal, &mut self.doc)
            .into_iter()
            .map(SiteEvent::Reveal)
            .collect()
    }

    /// Queue a reaction's deferred tasks and surface its window requests
    fn apply(&mut self, reaction: Reaction) -> Vec<SiteEvent> {
        for deferred in reaction.deferred {
            self.timers
                .schedule(deferred.delay_ms, SiteTask::Chrome(deferred.task));
        }
        reaction.actions.into_iter().map(SiteEvent::Action).collect()
    }
}
