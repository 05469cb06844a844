//! Hero parallax
//!
//! Gradient orbs and floating cards drift while the hero scrolls out of view.
//! Orbs follow the scroll position directly; cards chase it with a short
//! catch-up tween so their motion trails the scroll.

use folio_animation::{Easing, Interpolate};
use folio_core::style::props;
use folio_core::{Document, ElementId, Property, PropertyMap};
use rustc_hash::FxHashMap;

use crate::dispatcher::AnimationDispatcher;
use crate::error::Result;
use crate::observer::{VisibilityObserver, WatchId};
use crate::spec::{PlayOptions, TriggerLine};

/// Catch-up time of smoothed layers
pub const SMOOTHING_MS: f32 = 1000.0;

#[derive(Clone, Debug)]
struct Layer {
    element: ElementId,
    base: PropertyMap,
    end: PropertyMap,
    smoothing_ms: Option<f32>,
}

impl Layer {
    fn at(&self, progress: f32) -> PropertyMap {
        self.end
            .iter()
            .map(|(property, end)| {
                let base = self.base.get(property).copied().unwrap_or(property.identity());
                (*property, base.lerp(end, progress))
            })
            .collect()
    }
}

/// Scroll-linked decoration of the hero section
#[derive(Debug, Default)]
pub struct Parallax {
    layers: FxHashMap<WatchId, Layer>,
}

impl Parallax {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register orbs and cards against the hero's scroll range
    pub fn setup(&mut self, doc: &Document, observer: &mut VisibilityObserver) -> Result<()> {
        let Some(hero) = doc.query_selector(".hero")? else {
            return Ok(());
        };
        let start = TriggerLine::parse("top top")?;
        let end = TriggerLine::parse("bottom top")?;

        let orbs = doc.query_selector_all(".gradient-orb")?;
        let cards = doc.query_selector_all(".floating-card")?;

        for (index, orb) in orbs.iter().enumerate() {
            let y = if index % 2 == 0 { 200.0 } else { -200.0 };
            self.add_layer(doc, observer, hero, start, end, *orb, y, 360.0, None);
        }
        for (index, card) in cards.iter().enumerate() {
            let y = (index + 1) as f32 * 50.0;
            let rotation = if index % 2 == 0 { 5.0 } else { -5.0 };
            self.add_layer(doc, observer, hero, start, end, *card, y, rotation, Some(SMOOTHING_MS));
        }

        tracing::debug!(orbs = orbs.len(), cards = cards.len(), "Parallax layers registered");
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn add_layer(
        &mut self,
        doc: &Document,
        observer: &mut VisibilityObserver,
        hero: ElementId,
        start: TriggerLine,
        end: TriggerLine,
        element: ElementId,
        y: f32,
        rotation: f32,
        smoothing_ms: Option<f32>,
    ) {
        let end_state = props([(Property::Y, y), (Property::Rotation, rotation)]);
        let base = end_state
            .keys()
            .map(|p| (*p, doc.prop(element, *p).unwrap_or(p.identity())))
            .collect();
        let watch = observer.watch_scrub(doc, hero, start, end);
        self.layers.insert(
            watch,
            Layer {
                element,
                base,
                end: end_state,
                smoothing_ms,
            },
        );
    }

    pub fn is_layer(&self, watch: WatchId) -> bool {
        self.layers.contains_key(&watch)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Apply scrub progress for one layer
    pub fn on_progress(
        &self,
        doc: &mut Document,
        dispatcher: &mut AnimationDispatcher,
        watch: WatchId,
        progress: f32,
    ) {
        let Some(layer) = self.layers.get(&watch) else {
            return;
        };
        let state = layer.at(progress);
        match layer.smoothing_ms {
            None => {
                for (property, value) in &state {
                    doc.set_prop(layer.element, *property, *value);
                }
            }
            Some(ms) => {
                let options = PlayOptions {
                    duration_ms: ms,
                    easing: Easing::Power3Out,
                    ..Default::default()
                };
                dispatcher.to_state(doc, layer.element, state, options);
            }
        }
    }
}
