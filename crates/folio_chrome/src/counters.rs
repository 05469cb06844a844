//! Animated statistic counters
//!
//! A `.stat-number` carrying `data-count` counts up from its current text
//! once half of it is on screen. Each step adds 1/200 of the target, rounded
//! up, and the next step runs 1 ms later. The final step writes the target
//! exactly.

use folio_core::{Document, ElementId};

use crate::error::Result;
use crate::task::{ChromeTask, Deferred};

/// Number of increments a count-up is split into
pub const SPEED: f64 = 200.0;
pub const STEP_MS: f64 = 1.0;
/// Fraction of the counter that must be visible before it starts
pub const THRESHOLD: f32 = 0.5;

/// Render a count the way the page shows numbers (no trailing `.0`)
pub fn format_count(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn parse_number(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }
    text.parse().unwrap_or(f64::NAN)
}

#[derive(Debug, Clone, Default)]
pub struct Counters {
    /// Counters not yet seen
    waiting: Vec<ElementId>,
}

impl Counters {
    pub fn setup(doc: &Document) -> Result<Self> {
        let waiting = doc.query_selector_all(".stat-number")?;
        Ok(Self { waiting })
    }

    pub fn waiting(&self) -> usize {
        self.waiting.len()
    }

    /// Start every counter that has become half visible
    pub fn on_scroll(&mut self, doc: &mut Document) -> Vec<Deferred> {
        let root = doc.viewport().visible_rect();
        let mut started = Vec::new();
        self.waiting.retain(|&counter| {
            let visible = doc.is_displayed(counter)
                && doc
                    .bounds(counter)
                    .is_some_and(|b| b.visible_ratio(&root) >= THRESHOLD);
            if visible {
                started.push(counter);
            }
            !visible
        });

        started
            .into_iter()
            .filter_map(|counter| {
                tracing::debug!(element = counter.to_raw(), "Counter started");
                Self::step(doc, counter)
            })
            .collect()
    }

    /// Advance `counter` one step, returning the next step while unfinished
    pub fn step(doc: &mut Document, counter: ElementId) -> Option<Deferred> {
        if !doc.contains(counter) {
            return None;
        }
        let target = doc.attr(counter, "data-count").map(parse_number)?;
        let count = parse_number(doc.text(counter));
        let increment = target / SPEED;

        if count < target {
            doc.set_text(counter, format_count((count + increment).ceil()));
            Some(Deferred::after(STEP_MS, ChromeTask::CounterStep(counter)))
        } else {
            doc.set_text(counter, format_count(target));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{ElementSpec, Rect};

    fn counter_page(count: &str, y: f32) -> (Document, ElementId) {
        let mut doc = Document::new(1280.0, 800.0);
        let body = doc.body();
        let counter = ElementSpec::new("span")
            .class("stat-number")
            .attr("data-count", count)
            .text("0")
            .bounds(Rect::new(0.0, y, 200.0, 100.0))
            .mount(&mut doc, body);
        (doc, counter)
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(150.0), "150");
        assert_eq!(format_count(2.5), "2.5");
    }

    #[test]
    fn test_starts_when_half_visible() {
        let (mut doc, counter) = counter_page("150", 1000.0);
        let mut counters = Counters::setup(&doc).unwrap();

        assert!(counters.on_scroll(&mut doc).is_empty());
        assert_eq!(doc.text(counter), "0");

        doc.set_scroll(240.0);
        assert!(counters.on_scroll(&mut doc).is_empty());

        doc.set_scroll(260.0);
        let next = counters.on_scroll(&mut doc);
        assert_eq!(next, vec![Deferred::after(1.0, ChromeTask::CounterStep(counter))]);
        assert_eq!(doc.text(counter), "1");
        assert_eq!(counters.waiting(), 0);
    }

    #[test]
    fn test_counts_to_exact_target() {
        let (mut doc, counter) = counter_page("150", 0.0);
        let mut counters = Counters::setup(&doc).unwrap();
        let mut pending = counters.on_scroll(&mut doc);

        let mut steps = 0;
        while let Some(Deferred { task: ChromeTask::CounterStep(el), .. }) = pending.pop() {
            pending.extend(Counters::step(&mut doc, el));
            steps += 1;
            assert!(steps < 1000);
        }
        assert_eq!(doc.text(counter), "150");
        assert_eq!(steps, 150);
    }
}
