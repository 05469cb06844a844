//! Observer geometry refresh
//!
//! Layout can shift after registration: images finish loading, the window is
//! resized, a backgrounded tab comes back. Each of these recomputes the
//! observer's cached trigger lines. Resizes arrive in bursts and are
//! debounced so a burst costs a single recomputation.

use folio_core::{Debouncer, Document, TimerId, TimerQueue};

use crate::observer::VisibilityObserver;

/// Why the geometry is being recomputed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshReason {
    Resize,
    Load,
    Visible,
}

#[derive(Debug, Clone)]
pub struct RefreshController {
    resize: Debouncer,
}

impl RefreshController {
    pub fn new(resize_debounce_ms: f64) -> Self {
        Self {
            resize: Debouncer::new(resize_debounce_ms),
        }
    }

    /// Note a resize event, (re)scheduling the trailing refresh
    pub fn on_resize<T>(&mut self, queue: &mut TimerQueue<T>, payload: T) -> TimerId {
        self.resize.trigger(queue, payload)
    }

    /// Whether a debounced resize refresh is still waiting
    pub fn resize_pending(&self) -> bool {
        self.resize.is_pending()
    }

    /// Run a refresh; resize refreshes pass the timer that fired
    pub fn refresh(
        &mut self,
        reason: RefreshReason,
        fired: Option<TimerId>,
        observer: &mut VisibilityObserver,
        doc: &Document,
    ) {
        if let Some(id) = fired {
            self.resize.fired(id);
        }
        tracing::debug!(?reason, "Refreshing trigger geometry");
        observer.refresh(doc);
    }
}
