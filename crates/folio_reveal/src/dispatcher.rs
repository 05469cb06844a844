//! Animation dispatcher
//!
//! Turns trigger firings into tweens. All overwrite bookkeeping lives in the
//! scheduler's per-element handle map; the dispatcher only computes states
//! and delays.

use folio_animation::{AnimationScheduler, Tween, TweenEvent, TweenId};
use folio_core::{Document, ElementId, PropertyMap};

use crate::spec::{PlayOptions, TriggerSpec};

#[derive(Default)]
pub struct AnimationDispatcher {
    scheduler: AnimationScheduler,
}

impl AnimationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut AnimationScheduler {
        &mut self.scheduler
    }

    /// Play `from` → `to` on each target; target `i` starts
    /// `extra_delay + stagger × i` later
    pub fn play(
        &mut self,
        doc: &mut Document,
        targets: &[ElementId],
        from: &PropertyMap,
        to: &PropertyMap,
        options: PlayOptions,
    ) -> Vec<TweenId> {
        targets
            .iter()
            .enumerate()
            .map(|(index, target)| {
                let tween = Tween::from_to(*target, from.clone(), to.clone())
                    .duration(options.duration_ms)
                    .delay(options.delay_for(index))
                    .ease(options.easing);
                self.scheduler.play(doc, tween)
            })
            .collect()
    }

    /// Reveal every item of a fired trigger with its own resolved states
    pub fn play_spec(&mut self, doc: &mut Document, spec: &TriggerSpec) -> Vec<TweenId> {
        spec.items
            .iter()
            .map(|item| {
                let tween = Tween::from_to(item.element, item.from.clone(), item.to.clone())
                    .duration(spec.options.duration_ms)
                    .delay(spec.options.delay_for(item.index))
                    .ease(spec.options.easing);
                self.scheduler.play(doc, tween)
            })
            .collect()
    }

    /// Re-reveal a trigger from wherever its items currently are
    pub fn replay_spec(&mut self, doc: &mut Document, spec: &TriggerSpec) -> Vec<TweenId> {
        spec.items
            .iter()
            .map(|item| {
                let tween = Tween::to(item.element, item.to.clone())
                    .duration(spec.options.duration_ms)
                    .delay(spec.options.delay_for(item.index))
                    .ease(spec.options.easing);
                self.scheduler.play(doc, tween)
            })
            .collect()
    }

    /// Tween a trigger's items back to their hidden state
    pub fn reverse(&mut self, doc: &mut Document, spec: &TriggerSpec) -> Vec<TweenId> {
        spec.items
            .iter()
            .map(|item| {
                let tween = Tween::to(item.element, item.from.clone())
                    .duration(spec.options.duration_ms)
                    .ease(spec.options.easing);
                self.scheduler.play(doc, tween)
            })
            .collect()
    }

    /// Tween one element from its current values to `to`
    pub fn to_state(
        &mut self,
        doc: &mut Document,
        element: ElementId,
        to: PropertyMap,
        options: PlayOptions,
    ) -> TweenId {
        let tween = Tween::to(element, to)
            .duration(options.duration_ms)
            .delay(options.extra_delay_ms)
            .ease(options.easing);
        self.scheduler.play(doc, tween)
    }

    pub fn tick(&mut self, doc: &mut Document, dt_ms: f32) -> Vec<TweenEvent> {
        self.scheduler.tick(doc, dt_ms)
    }

    pub fn has_active_animations(&self) -> bool {
        self.scheduler.has_active_animations()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_animation::Easing;
    use folio_core::style::props;
    use folio_core::{ElementSpec, PropValue, Property};

    fn page(n: usize) -> (Document, Vec<ElementId>) {
        let mut doc = Document::new(1280.0, 800.0);
        let body = doc.body();
        let els = (0..n)
            .map(|_| ElementSpec::new("div").class("card").mount(&mut doc, body))
            .collect();
        (doc, els)
    }

    #[test]
    fn test_stagger_ordering() {
        let (mut doc, els) = page(4);
        let mut dispatcher = AnimationDispatcher::new();
        let from = props([(Property::Opacity, 0.0)]);
        let to = props([(Property::Opacity, 1.0)]);
        let options = PlayOptions {
            duration_ms: 300.0,
            easing: Easing::Linear,
            stagger_ms: 100.0,
            extra_delay_ms: 0.0,
        };
        let ids = dispatcher.play(&mut doc, &els, &from, &to, options);

        let mut started_at = vec![None; ids.len()];
        for ms in 0..1000 {
            for event in dispatcher.tick(&mut doc, 1.0) {
                if let TweenEvent::Started { id, .. } = event {
                    let index = ids.iter().position(|i| *i == id).unwrap();
                    started_at[index] = Some(ms as f32 + 1.0);
                }
            }
        }

        for (i, started) in started_at.iter().enumerate() {
            let expected = i as f32 * 100.0;
            let observed = started.unwrap();
            assert!((observed - expected).abs() <= 1.0, "item {i}: {observed} vs {expected}");
        }
        assert!(els.iter().all(|el| doc.opacity(*el) == 1.0));
    }

    #[test]
    fn test_reverse_returns_to_hidden_state() {
        let (mut doc, els) = page(1);
        let mut dispatcher = AnimationDispatcher::new();
        let from = props([(Property::Opacity, 0.0), (Property::Y, 30.0)]);
        let to = props([(Property::Opacity, 1.0), (Property::Y, 0.0)]);
        dispatcher.play(&mut doc, &els, &from, &to, PlayOptions::default());
        dispatcher.tick(&mut doc, 1000.0);
        assert_eq!(doc.opacity(els[0]), 1.0);

        let spec = TriggerSpec {
            selector: ".card".to_string(),
            items: vec![crate::spec::TriggerItem {
                element: els[0],
                index: 0,
                from,
                to,
            }],
            line: Default::default(),
            policy: crate::spec::RepeatPolicy::Reversible,
            options: PlayOptions::default(),
            scroll_triggered: true,
        };
        dispatcher.reverse(&mut doc, &spec);
        dispatcher.tick(&mut doc, 1000.0);
        assert_eq!(doc.opacity(els[0]), 0.0);
        assert_eq!(doc.prop(els[0], Property::Y), Some(PropValue::Number(30.0)));

        dispatcher.replay_spec(&mut doc, &spec);
        dispatcher.tick(&mut doc, 1000.0);
        assert_eq!(doc.opacity(els[0]), 1.0);
    }

    #[test]
    fn test_rapid_retrigger_overwrites() {
        let (mut doc, els) = page(1);
        let mut dispatcher = AnimationDispatcher::new();
        let from = props([(Property::Opacity, 0.0)]);
        let to = props([(Property::Opacity, 1.0)]);

        let first = dispatcher.play(&mut doc, &els, &from, &to, PlayOptions::default());
        dispatcher.tick(&mut doc, 100.0);
        let second = dispatcher.play(&mut doc, &els, &from, &to, PlayOptions::default());

        let scheduler = dispatcher.scheduler();
        assert!(!scheduler.is_active(first[0]));
        assert_eq!(scheduler.current(els[0], Property::Opacity), Some(second[0]));
        assert_eq!(scheduler.active_count(), 1);
    }
}
