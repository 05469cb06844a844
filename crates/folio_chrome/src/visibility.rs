//! CSS-driven entrance classes
//!
//! Elements carrying one of the entrance classes get `visible` the first
//! time a tenth of them enters the viewport (its bottom 50 px excluded). The
//! stylesheet does the animating.

use folio_core::{Document, ElementId};

use crate::error::Result;

pub const ENTRANCE_SELECTOR: &str =
    ".fade-in-up, .fade-in-down, .fade-in-left, .fade-in-right, .scale-in, .slide-fade";
pub const THRESHOLD: f32 = 0.1;
pub const BOTTOM_MARGIN: f32 = 50.0;

#[derive(Debug, Clone, Default)]
pub struct VisibilityClasses {
    elements: Vec<ElementId>,
}

impl VisibilityClasses {
    pub fn setup(doc: &Document) -> Result<Self> {
        Ok(Self {
            elements: doc.query_selector_all(ENTRANCE_SELECTOR)?,
        })
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Mark newly visible elements; returns the ones marked by this call
    pub fn on_scroll(&self, doc: &mut Document) -> Vec<ElementId> {
        let root = doc.viewport().inset_bottom(BOTTOM_MARGIN);
        let entered: Vec<ElementId> = self
            .elements
            .iter()
            .copied()
            .filter(|&el| !doc.has_class(el, "visible") && doc.is_displayed(el))
            .filter(|&el| {
                doc.bounds(el)
                    .is_some_and(|b| b.visible_ratio(&root) >= THRESHOLD)
            })
            .collect();
        for &el in &entered {
            doc.add_class(el, "visible");
        }
        entered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{ElementSpec, Rect};

    #[test]
    fn test_visible_is_sticky() {
        let mut doc = Document::new(1280.0, 800.0);
        let body = doc.body();
        let block = ElementSpec::new("div")
            .class("fade-in-up")
            .bounds(Rect::new(0.0, 760.0, 400.0, 100.0))
            .mount(&mut doc, body);
        let classes = VisibilityClasses::setup(&doc).unwrap();
        assert_eq!(classes.len(), 1);

        // inside the window but below the margin
        assert!(classes.on_scroll(&mut doc).is_empty());

        doc.set_scroll(50.0);
        assert_eq!(classes.on_scroll(&mut doc), vec![block]);
        assert!(doc.has_class(block, "visible"));

        doc.set_scroll(0.0);
        assert!(classes.on_scroll(&mut doc).is_empty());
        assert!(doc.has_class(block, "visible"));
    }
}
