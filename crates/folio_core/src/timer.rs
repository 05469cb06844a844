//! Virtual-clock timers
//!
//! The engine never sleeps. Delayed work (the page-ready delay, the fallback
//! sweep, banner auto-hide, debounced refreshes) is queued here with a
//! payload describing what to do, and the host advances the clock.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a scheduled timer
    pub struct TimerId;
}

#[derive(Debug)]
struct Timer<T> {
    deadline: f64,
    seq: u64,
    payload: T,
}

/// Queue of pending timers ordered by deadline, then by scheduling order
#[derive(Debug)]
pub struct TimerQueue<T> {
    now_ms: f64,
    next_seq: u64,
    timers: SlotMap<TimerId, Timer<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            next_seq: 0,
            timers: SlotMap::with_key(),
        }
    }

    /// Current virtual time in milliseconds
    pub fn now(&self) -> f64 {
        self.now_ms
    }

    /// Run `payload` after `delay_ms`
    pub fn schedule(&mut self, delay_ms: f64, payload: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(Timer {
            deadline: self.now_ms + delay_ms.max(0.0),
            seq,
            payload,
        })
    }

    /// Cancel a pending timer, returning its payload if it had not fired
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        self.timers.remove(id).map(|t| t.payload)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Deadline of the earliest pending timer
    pub fn next_deadline(&self) -> Option<f64> {
        self.timers
            .values()
            .map(|t| t.deadline)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its deadline
    pub fn pop_due(&mut self, until: f64) -> Option<(TimerId, T)> {
        let (id, _) = self
            .timers
            .iter()
            .filter(|(_, t)| t.deadline <= until)
            .min_by(|(_, a), (_, b)| a.deadline.total_cmp(&b.deadline).then(a.seq.cmp(&b.seq)))?;
        let timer = self.timers.remove(id)?;
        self.now_ms = self.now_ms.max(timer.deadline);
        Some((id, timer.payload))
    }

    /// Move the clock forward without firing anything
    pub fn set_now(&mut self, now_ms: f64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}

/// Trailing-edge debouncer
///
/// Each trigger cancels the pending call and schedules a new one, so a burst
/// of triggers closer together than the wait collapses into a single call
/// `wait_ms` after the last trigger.
#[derive(Debug, Clone)]
pub struct Debouncer {
    wait_ms: f64,
    pending: Option<TimerId>,
}

impl Debouncer {
    pub fn new(wait_ms: f64) -> Self {
        Self {
            wait_ms,
            pending: None,
        }
    }

    pub fn wait_ms(&self) -> f64 {
        self.wait_ms
    }

    pub fn trigger<T>(&mut self, queue: &mut TimerQueue<T>, payload: T) -> TimerId {
        if let Some(previous) = self.pending.take() {
            queue.cancel(previous);
        }
        let id = queue.schedule(self.wait_ms, payload);
        self.pending = Some(id);
        id
    }

    /// Clear the pending handle once the queued call has fired
    pub fn fired(&mut self, id: TimerId) {
        if self.pending == Some(id) {
            self.pending = None;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timers_fire_in_deadline_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(300.0, "late");
        queue.schedule(100.0, "early");
        queue.schedule(100.0, "early-second");

        assert_eq!(queue.pop_due(50.0), None);
        assert_eq!(queue.pop_due(1000.0).map(|(_, p)| p), Some("early"));
        assert_eq!(queue.now(), 100.0);
        assert_eq!(queue.pop_due(1000.0).map(|(_, p)| p), Some("early-second"));
        assert_eq!(queue.pop_due(1000.0).map(|(_, p)| p), Some("late"));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule(10.0, 1);
        assert_eq!(queue.cancel(id), Some(1));
        assert_eq!(queue.pop_due(100.0), None);
    }

    #[test]
    fn test_debounce_collapses_burst() {
        let mut queue = TimerQueue::new();
        let mut debounce = Debouncer::new(250.0);

        debounce.trigger(&mut queue, "refresh");
        queue.set_now(100.0);
        debounce.trigger(&mut queue, "refresh");
        queue.set_now(200.0);
        let last = debounce.trigger(&mut queue, "refresh");

        assert_eq!(queue.len(), 1);
        assert_eq!(queue.next_deadline(), Some(450.0));
        let (id, _) = queue.pop_due(1000.0).unwrap();
        assert_eq!(id, last);
        debounce.fired(id);
        assert!(!debounce.is_pending());
    }
}
