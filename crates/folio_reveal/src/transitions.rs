//! Page transitions
//!
//! The body fades in on page-ready. Following an internal link fades it out
//! first and only then asks the host to navigate.

use folio_animation::{Easing, TweenEvent, TweenId};
use folio_core::style::props;
use folio_core::{Document, ElementId, Property};
use rustc_hash::FxHashMap;

use crate::dispatcher::AnimationDispatcher;
use crate::spec::PlayOptions;

pub const FADE_IN_MS: f32 = 500.0;
pub const FADE_OUT_MS: f32 = 300.0;

/// Whether clicking a link with this `href`/`target` leaves through a fade
pub fn is_internal_link(href: Option<&str>, target: Option<&str>) -> bool {
    if target == Some("_blank") {
        return false;
    }
    let Some(href) = href.map(str::trim).filter(|h| !h.is_empty()) else {
        return false;
    };
    !["#", "http", "mailto", "tel"]
        .iter()
        .any(|prefix| href.starts_with(prefix))
}

#[derive(Debug, Default)]
pub struct PageTransitions {
    /// Fade-out tweens waiting to complete, with their destination
    pending: FxHashMap<TweenId, String>,
}

impl PageTransitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fade_in(&self, doc: &mut Document, dispatcher: &mut AnimationDispatcher) -> Vec<TweenId> {
        let body = doc.body();
        dispatcher.play(
            doc,
            &[body],
            &props([(Property::Opacity, 0.0)]),
            &props([(Property::Opacity, 1.0)]),
            PlayOptions {
                duration_ms: FADE_IN_MS,
                easing: Easing::Power2InOut,
                ..Default::default()
            },
        )
    }

    /// Handle a click on `link`; returns `true` when the click was taken over
    pub fn on_link_click(
        &mut self,
        doc: &mut Document,
        dispatcher: &mut AnimationDispatcher,
        link: ElementId,
    ) -> bool {
        let is_anchor = doc.get(link).is_some_and(|el| el.tag == "a");
        let href = doc.attr(link, "href").map(str::to_string);
        if !is_anchor || !is_internal_link(href.as_deref(), doc.attr(link, "target")) {
            return false;
        }
        let Some(href) = href else {
            return false;
        };

        let body = doc.body();
        let id = dispatcher.to_state(
            doc,
            body,
            props([(Property::Opacity, 0.0)]),
            PlayOptions {
                duration_ms: FADE_OUT_MS,
                easing: Easing::Power2InOut,
                ..Default::default()
            },
        );
        tracing::debug!(%href, "Leaving page");
        self.pending.insert(id, href);
        true
    }

    /// Destination to navigate to once its fade-out has completed
    pub fn on_tween_event(&mut self, event: &TweenEvent) -> Option<String> {
        match event {
            TweenEvent::Completed { id, .. } => self.pending.remove(id),
            TweenEvent::Cancelled { id, .. } => {
                self.pending.remove(id);
                None
            }
            TweenEvent::Started { .. } => None,
        }
    }
}
