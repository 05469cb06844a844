//! Page preloader overlay

use folio_core::{Document, ElementId};

use crate::task::{ChromeTask, Deferred};

/// Time the overlay stays up after the load event
pub const HIDE_DELAY_MS: f64 = 1000.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct Preloader {
    overlay: Option<ElementId>,
}

impl Preloader {
    pub fn setup(doc: &Document) -> Self {
        Self {
            overlay: doc.by_id("preloader"),
        }
    }

    pub fn on_load(&self) -> Option<Deferred> {
        self.overlay
            .map(|_| Deferred::after(HIDE_DELAY_MS, ChromeTask::HidePreloader))
    }

    pub fn hide(&self, doc: &mut Document) {
        let Some(overlay) = self.overlay else {
            return;
        };
        doc.add_class(overlay, "hidden");
        let body = doc.body();
        doc.set_style(body, "overflow", "visible");
        tracing::debug!("Preloader hidden");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::ElementSpec;

    #[test]
    fn test_hides_after_load() {
        let mut doc = Document::new(1280.0, 800.0);
        let body = doc.body();
        doc.set_style(body, "overflow", "hidden");
        let overlay = ElementSpec::new("div").id("preloader").mount(&mut doc, body);
        let preloader = Preloader::setup(&doc);

        assert_eq!(
            preloader.on_load(),
            Some(Deferred::after(1000.0, ChromeTask::HidePreloader))
        );
        preloader.hide(&mut doc);
        assert!(doc.has_class(overlay, "hidden"));
        assert_eq!(doc.style(body, "overflow"), Some("visible"));
    }
}
