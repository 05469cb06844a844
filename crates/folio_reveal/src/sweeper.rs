//! Fallback sweep
//!
//! One delayed pass after load that finds animatable elements still showing
//! their hidden state and reveals them the same way a late trigger would.
//!
//! Registered triggers are checked against their own from-state, so a skill
//! bar parked at `width: 0%` counts as hidden just like a transparent card.
//! Elements outside every trigger (the hero entrance) fall back to the
//! opacity check over [`SWEEP_SELECTORS`].

use folio_animation::Easing;
use folio_core::style::props;
use folio_core::{Document, ElementId, Property, PropertyMap, Selector};
use rustc_hash::FxHashSet;

use crate::dispatcher::AnimationDispatcher;
use crate::error::Result;
use crate::spec::{PlayOptions, TriggerItem, TriggerSpec};
use crate::table::SWEEP_SELECTORS;

pub struct FallbackSweeper {
    selector: Selector,
    duration_ms: f32,
    debug: bool,
}

fn shows_state(doc: &Document, element: ElementId, state: &PropertyMap) -> bool {
    state
        .iter()
        .all(|(property, value)| doc.prop(element, *property) == Some(*value))
}

fn is_animating(dispatcher: &AnimationDispatcher, element: ElementId, properties: &PropertyMap) -> bool {
    properties
        .keys()
        .any(|property| dispatcher.scheduler().current(element, *property).is_some())
}

fn is_stuck(doc: &Document, dispatcher: &AnimationDispatcher, item: &TriggerItem) -> bool {
    item.from != item.to
        && !is_animating(dispatcher, item.element, &item.to)
        && shows_state(doc, item.element, &item.from)
}

impl FallbackSweeper {
    pub fn new(duration_ms: f32, debug: bool) -> Result<Self> {
        Self::with_selectors(SWEEP_SELECTORS, duration_ms, debug)
    }

    pub fn with_selectors(selectors: &[&str], duration_ms: f32, debug: bool) -> Result<Self> {
        Ok(Self {
            selector: Selector::parse(&selectors.join(", "))?,
            duration_ms,
            debug,
        })
    }

    fn options(&self) -> PlayOptions {
        PlayOptions {
            duration_ms: self.duration_ms,
            easing: Easing::Power2Out,
            ..Default::default()
        }
    }

    fn report(&self, doc: &Document, element: ElementId) {
        if self.debug {
            tracing::warn!(
                element = element.to_raw(),
                tag = doc.get(element).map(|e| e.tag.as_str()).unwrap_or(""),
                "Element still hidden after load, forcing reveal"
            );
        }
    }

    /// Reveal every element still stuck in its hidden state
    ///
    /// Trigger items are stuck when they show their from-state and nothing
    /// drives them; other matched elements when their opacity is exactly
    /// zero and no tween drives it. Returns the corrected elements.
    pub fn sweep(
        &self,
        doc: &mut Document,
        dispatcher: &mut AnimationDispatcher,
        specs: &[TriggerSpec],
    ) -> Vec<ElementId> {
        let options = self.options();
        let mut seen = FxHashSet::default();
        let mut swept = Vec::new();

        for item in specs.iter().flat_map(|spec| spec.items.iter()) {
            if !seen.insert(item.element) {
                continue;
            }
            if is_stuck(doc, dispatcher, item) {
                self.report(doc, item.element);
                dispatcher.to_state(doc, item.element, item.to.clone(), options);
                swept.push(item.element);
            }
        }

        let visible = props([
            (Property::Opacity, 1.0),
            (Property::X, 0.0),
            (Property::Y, 0.0),
            (Property::Scale, 1.0),
            (Property::Rotation, 0.0),
        ]);
        for element in doc.query_all(&self.selector) {
            if seen.contains(&element)
                || doc.opacity(element) != 0.0
                || dispatcher.scheduler().current(element, Property::Opacity).is_some()
            {
                continue;
            }
            self.report(doc, element);
            dispatcher.to_state(doc, element, visible.clone(), options);
            swept.push(element);
        }

        tracing::debug!(corrected = swept.len(), "Fallback sweep finished");
        swept
    }
}
