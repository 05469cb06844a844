//! Magnetic buttons
//!
//! Buttons lean towards the pointer while it moves over them and spring back
//! when it leaves. Every move overwrites the previous lean.

use folio_animation::{Easing, TweenId};
use folio_core::style::props;
use folio_core::{Document, ElementId, Property};

use crate::dispatcher::AnimationDispatcher;
use crate::error::Result;
use crate::spec::PlayOptions;

/// Fraction of the pointer offset the button follows
pub const PULL: f32 = 0.3;

#[derive(Debug, Default)]
pub struct MagneticButtons {
    buttons: Vec<ElementId>,
}

impl MagneticButtons {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn setup(&mut self, doc: &Document) -> Result<()> {
        self.buttons = doc.query_selector_all(".btn")?;
        tracing::debug!(buttons = self.buttons.len(), "Magnetic buttons attached");
        Ok(())
    }

    pub fn is_magnetic(&self, element: ElementId) -> bool {
        self.buttons.contains(&element)
    }

    /// Pointer moved over `button`; `client_x`/`client_y` are viewport
    /// coordinates
    pub fn on_pointer_move(
        &self,
        doc: &mut Document,
        dispatcher: &mut AnimationDispatcher,
        button: ElementId,
        client_x: f32,
        client_y: f32,
    ) -> Option<TweenId> {
        if !self.is_magnetic(button) {
            return None;
        }
        let bounds = doc.bounds(button)?;
        let (center_x, center_y) = bounds.center();
        let dx = client_x - center_x;
        let dy = client_y - (center_y - doc.viewport().scroll_y);

        let options = PlayOptions {
            duration_ms: 300.0,
            easing: Easing::Power2Out,
            ..Default::default()
        };
        Some(dispatcher.to_state(
            doc,
            button,
            props([(Property::X, dx * PULL), (Property::Y, dy * PULL)]),
            options,
        ))
    }

    pub fn on_pointer_leave(
        &self,
        doc: &mut Document,
        dispatcher: &mut AnimationDispatcher,
        button: ElementId,
    ) -> Option<TweenId> {
        if !self.is_magnetic(button) {
            return None;
        }
        let options = PlayOptions {
            duration_ms: 500.0,
            easing: Easing::ElasticOut {
                amplitude: 1.0,
                period: 0.5,
            },
            ..Default::default()
        };
        Some(dispatcher.to_state(
            doc,
            button,
            props([(Property::X, 0.0), (Property::Y, 0.0)]),
            options,
        ))
    }
}
