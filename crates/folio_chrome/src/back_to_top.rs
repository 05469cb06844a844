//! Back-to-top button

use folio_core::{Document, ElementId};

use crate::task::ChromeAction;

/// Scroll offset past which the button shows
pub const VISIBLE_THRESHOLD: f32 = 500.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct BackToTop {
    button: Option<ElementId>,
}

impl BackToTop {
    pub fn setup(doc: &Document) -> Self {
        Self {
            button: doc.by_id("backToTop"),
        }
    }

    pub fn is_button(&self, element: ElementId) -> bool {
        self.button == Some(element)
    }

    pub fn on_scroll(&self, doc: &mut Document) {
        let Some(button) = self.button else {
            return;
        };
        if doc.viewport().scroll_y > VISIBLE_THRESHOLD {
            doc.add_class(button, "visible");
        } else {
            doc.remove_class(button, "visible");
        }
    }

    pub fn on_click(&self) -> Option<ChromeAction> {
        self.button.map(|_| ChromeAction::ScrollTo { y: 0.0 })
    }
}
