//! Animation scheduler
//!
//! Owns every in-flight tween and advances them on the host's clock. The
//! scheduler keeps an explicit map from `(element, property)` to the tween
//! currently driving that property: playing a new tween takes those entries
//! over, and a tween left driving nothing is cancelled. That map is the
//! overwrite mechanism; there is no other cancellation primitive.

use folio_core::{Document, ElementId, Property, PropertyMap};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, Key, SlotMap};
use smallvec::SmallVec;

use crate::tween::Tween;

new_key_type! {
    /// Handle to a played tween
    pub struct TweenId;
}

impl TweenId {
    /// Convert to raw u64 for logging
    pub fn to_raw(self) -> u64 {
        self.data().as_ffi()
    }
}

/// Lifecycle notifications produced by [`AnimationScheduler::tick`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenEvent {
    /// The delay elapsed and the tween began moving
    Started { id: TweenId, target: ElementId },
    /// The tween reached its to-state
    Completed { id: TweenId, target: ElementId },
    /// Overwritten by a newer tween, killed explicitly, or its element left
    /// the document
    Cancelled { id: TweenId, target: ElementId },
}

impl TweenEvent {
    pub fn id(&self) -> TweenId {
        match *self {
            TweenEvent::Started { id, .. }
            | TweenEvent::Completed { id, .. }
            | TweenEvent::Cancelled { id, .. } => id,
        }
    }

    pub fn target(&self) -> ElementId {
        match *self {
            TweenEvent::Started { target, .. }
            | TweenEvent::Completed { target, .. }
            | TweenEvent::Cancelled { target, .. } => target,
        }
    }
}

struct ActiveTween {
    tween: Tween,
    elapsed_ms: f32,
    /// Resolved start values, set once the delay has elapsed
    start: Option<PropertyMap>,
    /// Properties this tween still drives
    owned: SmallVec<[Property; 6]>,
}

/// Ticks tweens and arbitrates which tween drives each property
#[derive(Default)]
pub struct AnimationScheduler {
    tweens: SlotMap<TweenId, ActiveTween>,
    /// Play order, used to tick deterministically
    order: Vec<TweenId>,
    current: FxHashMap<(ElementId, Property), TweenId>,
    pending_events: Vec<TweenEvent>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a tween, overwriting whatever currently drives its properties
    ///
    /// An explicit from-state is written to the document immediately, so a
    /// delayed tween already shows its start state.
    pub fn play(&mut self, doc: &mut Document, tween: Tween) -> TweenId {
        let target = tween.target;
        if let Some(from) = &tween.from {
            for (property, value) in from {
                doc.set_prop(target, *property, *value);
            }
        }

        let owned: SmallVec<[Property; 6]> = tween.to.keys().copied().collect();
        let id = self.tweens.insert(ActiveTween {
            tween,
            elapsed_ms: 0.0,
            start: None,
            owned: owned.clone(),
        });
        self.order.push(id);

        for property in owned {
            if let Some(previous) = self.current.insert((target, property), id) {
                self.release_property(previous, property);
            }
        }

        tracing::trace!(tween = id.to_raw(), element = target.to_raw(), "Tween played");
        id
    }

    /// Drop `property` from a tween's ownership, cancelling it once it drives nothing
    fn release_property(&mut self, id: TweenId, property: Property) {
        let Some(active) = self.tweens.get_mut(id) else {
            return;
        };
        active.owned.retain(|p| *p != property);
        if active.owned.is_empty() {
            let target = active.tween.target;
            self.tweens.remove(id);
            self.pending_events.push(TweenEvent::Cancelled { id, target });
        }
    }

    /// Kill a tween where it stands
    pub fn cancel(&mut self, id: TweenId) -> bool {
        let Some(active) = self.tweens.remove(id) else {
            return false;
        };
        let target = active.tween.target;
        for property in active.owned {
            if self.current.get(&(target, property)) == Some(&id) {
                self.current.remove(&(target, property));
            }
        }
        self.pending_events.push(TweenEvent::Cancelled { id, target });
        true
    }

    /// Kill every tween driving `target`
    pub fn cancel_element(&mut self, target: ElementId) {
        let ids: Vec<TweenId> = self
            .order
            .iter()
            .copied()
            .filter(|id| self.tweens.get(*id).is_some_and(|t| t.tween.target == target))
            .collect();
        for id in ids {
            self.cancel(id);
        }
    }

    /// Tween currently driving `property` on `target`
    pub fn current(&self, target: ElementId, property: Property) -> Option<TweenId> {
        self.current.get(&(target, property)).copied()
    }

    pub fn is_active(&self, id: TweenId) -> bool {
        self.tweens.contains_key(id)
    }

    /// Whether the tween's delay has elapsed
    pub fn is_started(&self, id: TweenId) -> bool {
        self.tweens.get(id).is_some_and(|t| t.start.is_some())
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.tweens.get(id).map(|t| &t.tween)
    }

    pub fn active_count(&self) -> usize {
        self.tweens.len()
    }

    pub fn has_active_animations(&self) -> bool {
        !self.tweens.is_empty()
    }

    /// Time until every active tween completes
    pub fn remaining_ms(&self) -> f32 {
        self.tweens
            .values()
            .map(|t| (t.tween.total_ms() - t.elapsed_ms).max(0.0))
            .fold(0.0, f32::max)
    }

    /// Drain events produced outside of `tick` (overwrites and cancels)
    pub fn take_events(&mut self) -> Vec<TweenEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Advance every tween by `dt_ms`, writing sampled values into `doc`
    pub fn tick(&mut self, doc: &mut Document, dt_ms: f32) -> Vec<TweenEvent> {
        let mut events = self.take_events();
        self.order.retain(|id| self.tweens.contains_key(*id));

        let mut finished = Vec::new();
        for &id in &self.order {
            let Some(active) = self.tweens.get_mut(id) else {
                continue;
            };
            let target = active.tween.target;
            if !doc.contains(target) {
                finished.push((id, false));
                continue;
            }

            active.elapsed_ms += dt_ms;
            if active.elapsed_ms < active.tween.delay_ms {
                continue;
            }

            if active.start.is_none() {
                let start = match &active.tween.from {
                    Some(from) => from.clone(),
                    None => active
                        .tween
                        .to
                        .keys()
                        .filter_map(|p| doc.prop(target, *p).map(|v| (*p, v)))
                        .collect(),
                };
                active.start = Some(start);
                events.push(TweenEvent::Started { id, target });
            }

            let Some(start) = &active.start else {
                continue;
            };
            let Some(values) = active.tween.sample(start, active.elapsed_ms) else {
                continue;
            };
            for property in &active.owned {
                if let Some(value) = values.get(property) {
                    doc.set_prop(target, *property, *value);
                }
            }

            if active.elapsed_ms >= active.tween.total_ms() {
                finished.push((id, true));
            }
        }

        for (id, completed) in finished {
            let Some(active) = self.tweens.remove(id) else {
                continue;
            };
            let target = active.tween.target;
            for property in active.owned {
                if self.current.get(&(target, property)) == Some(&id) {
                    self.current.remove(&(target, property));
                }
            }
            if completed {
                events.push(TweenEvent::Completed { id, target });
            } else {
                tracing::debug!(element = target.to_raw(), "Tween target left the document");
                events.push(TweenEvent::Cancelled { id, target });
            }
        }
        self.order.retain(|id| self.tweens.contains_key(*id));

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use folio_core::style::props;
    use folio_core::PropValue;

    fn doc_with_box() -> (Document, ElementId) {
        let mut doc = Document::new(800.0, 600.0);
        let body = doc.body();
        let el = doc.create_element("div");
        doc.append_child(body, el);
        (doc, el)
    }

    #[test]
    fn test_from_state_applies_on_play() {
        let (mut doc, el) = doc_with_box();
        let mut scheduler = AnimationScheduler::new();
        scheduler.play(
            &mut doc,
            Tween::from_to(
                el,
                props([(Property::Opacity, 0.0), (Property::Y, 60.0)]),
                props([(Property::Opacity, 1.0), (Property::Y, 0.0)]),
            )
            .delay(300.0),
        );

        assert_eq!(doc.opacity(el), 0.0);
        assert_eq!(doc.prop(el, Property::Y), Some(PropValue::Number(60.0)));
    }

    #[test]
    fn test_tween_runs_to_exact_end_state() {
        let (mut doc, el) = doc_with_box();
        let mut scheduler = AnimationScheduler::new();
        let id = scheduler.play(
            &mut doc,
            Tween::from_to(
                el,
                props([(Property::Opacity, 0.0), (Property::Rotation, 5.0)]),
                props([(Property::Opacity, 1.0), (Property::Rotation, 0.0)]),
            )
            .duration(800.0)
            .ease(Easing::Power2Out),
        );

        let events = scheduler.tick(&mut doc, 16.0);
        assert_eq!(events, vec![TweenEvent::Started { id, target: el }]);
        let opacity = doc.opacity(el);
        assert!(opacity > 0.0 && opacity < 1.0);

        let mut completed = false;
        for _ in 0..60 {
            completed |= scheduler
                .tick(&mut doc, 16.0)
                .contains(&TweenEvent::Completed { id, target: el });
        }
        assert!(completed);
        assert_eq!(doc.opacity(el), 1.0);
        assert_eq!(doc.prop(el, Property::Rotation), Some(PropValue::Number(0.0)));
        assert!(!scheduler.has_active_animations());
        assert_eq!(scheduler.current(el, Property::Opacity), None);
    }

    #[test]
    fn test_new_tween_overwrites_same_properties() {
        let (mut doc, el) = doc_with_box();
        let mut scheduler = AnimationScheduler::new();
        let first = scheduler.play(
            &mut doc,
            Tween::to(el, props([(Property::X, 100.0)])).duration(1000.0),
        );
        scheduler.tick(&mut doc, 100.0);
        let second = scheduler.play(
            &mut doc,
            Tween::to(el, props([(Property::X, 0.0)])).duration(200.0),
        );

        let events = scheduler.tick(&mut doc, 16.0);
        assert!(events.contains(&TweenEvent::Cancelled { id: first, target: el }));
        assert!(!scheduler.is_active(first));
        assert_eq!(scheduler.current(el, Property::X), Some(second));

        scheduler.tick(&mut doc, 500.0);
        assert_eq!(doc.prop(el, Property::X), Some(PropValue::Number(0.0)));
    }

    #[test]
    fn test_disjoint_properties_coexist() {
        let (mut doc, el) = doc_with_box();
        let mut scheduler = AnimationScheduler::new();
        let fade = scheduler.play(
            &mut doc,
            Tween::from_to(
                el,
                props([(Property::Opacity, 0.0), (Property::Scale, 0.0)]),
                props([(Property::Opacity, 1.0), (Property::Scale, 1.0)]),
            )
            .duration(800.0),
        );
        let drift = scheduler.play(
            &mut doc,
            Tween::to(el, props([(Property::Y, 50.0)])).duration(1000.0),
        );

        assert!(scheduler.take_events().is_empty());
        assert!(scheduler.is_active(fade));
        assert!(scheduler.is_active(drift));

        scheduler.tick(&mut doc, 2000.0);
        assert_eq!(doc.prop(el, Property::Scale), Some(PropValue::Number(1.0)));
        assert_eq!(doc.prop(el, Property::Y), Some(PropValue::Number(50.0)));
    }

    #[test]
    fn test_partial_overwrite_keeps_remaining_properties() {
        let (mut doc, el) = doc_with_box();
        let mut scheduler = AnimationScheduler::new();
        let both = scheduler.play(
            &mut doc,
            Tween::to(el, props([(Property::X, 10.0), (Property::Y, 10.0)])).duration(100.0),
        );
        scheduler.play(
            &mut doc,
            Tween::to(el, props([(Property::X, -10.0)])).duration(100.0),
        );

        assert!(scheduler.is_active(both));
        scheduler.tick(&mut doc, 200.0);
        assert_eq!(doc.prop(el, Property::X), Some(PropValue::Number(-10.0)));
        assert_eq!(doc.prop(el, Property::Y), Some(PropValue::Number(10.0)));
    }

    #[test]
    fn test_removed_element_cancels_tween() {
        let (mut doc, el) = doc_with_box();
        let mut scheduler = AnimationScheduler::new();
        let id = scheduler.play(
            &mut doc,
            Tween::to(el, props([(Property::Opacity, 0.0)])).duration(300.0),
        );
        doc.remove(el);

        let events = scheduler.tick(&mut doc, 16.0);
        assert_eq!(events, vec![TweenEvent::Cancelled { id, target: el }]);
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn test_cancel_element() {
        let (mut doc, el) = doc_with_box();
        let mut scheduler = AnimationScheduler::new();
        scheduler.play(&mut doc, Tween::to(el, props([(Property::X, 5.0)])));
        scheduler.play(&mut doc, Tween::to(el, props([(Property::Y, 5.0)])));

        scheduler.cancel_element(el);
        assert_eq!(scheduler.take_events().len(), 2);
        assert!(!scheduler.has_active_animations());
        assert_eq!(scheduler.current(el, Property::Y), None);
    }
}
