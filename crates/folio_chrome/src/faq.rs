//! FAQ accordion
//!
//! At most one item is open. Opening sets the answer's `max-height` to its
//! full content height; every other answer collapses to `0`.

use folio_animation::{AnimationScheduler, Easing, Tween};
use folio_core::style::props;
use folio_core::{Document, ElementId, Property};

use crate::error::Result;

pub const ICON_TURN_MS: f32 = 300.0;

#[derive(Debug, Clone, Copy)]
struct FaqItem {
    item: ElementId,
    question: ElementId,
    answer: Option<ElementId>,
    icon: Option<ElementId>,
}

#[derive(Debug, Clone, Default)]
pub struct FaqAccordion {
    items: Vec<FaqItem>,
}

impl FaqAccordion {
    pub fn setup(doc: &Document) -> Result<Self> {
        let mut items = Vec::new();
        for item in doc.query_selector_all(".faq-item")? {
            let Some(question) = doc.query_within(item, ".faq-question")? else {
                continue;
            };
            items.push(FaqItem {
                item,
                question,
                answer: doc.query_within(item, ".faq-answer")?,
                icon: doc.query_within(question, "i")?,
            });
        }
        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_question(&self, element: ElementId) -> bool {
        self.items.iter().any(|i| i.question == element)
    }

    /// Toggle the item owning `question`; returns whether it is now open
    pub fn on_question_click(
        &self,
        doc: &mut Document,
        scheduler: &mut AnimationScheduler,
        question: ElementId,
    ) -> bool {
        let Some(clicked) = self.items.iter().find(|i| i.question == question) else {
            return false;
        };
        let was_open = doc.has_class(clicked.item, "active");

        for faq in &self.items {
            doc.remove_class(faq.item, "active");
            if let Some(answer) = faq.answer {
                doc.set_style(answer, "max-height", "0");
            }
        }

        let rotation = if was_open {
            0.0
        } else {
            doc.add_class(clicked.item, "active");
            if let Some(answer) = clicked.answer {
                let height = doc.get(answer).map(|el| el.scroll_height).unwrap_or(0.0);
                doc.set_style(answer, "max-height", format!("{}px", height));
            }
            180.0
        };
        if let Some(icon) = clicked.icon {
            scheduler.play(
                doc,
                Tween::to(icon, props([(Property::Rotation, rotation)]))
                    .duration(ICON_TURN_MS)
                    .ease(Easing::Power2Out),
            );
        }
        !was_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{ElementSpec, PropValue};

    fn faq_page() -> (Document, Vec<ElementId>) {
        let mut doc = Document::new(1280.0, 800.0);
        let body = doc.body();
        let items = (0..3)
            .map(|i| {
                ElementSpec::new("div")
                    .class("faq-item")
                    .child(
                        ElementSpec::new("button")
                            .class("faq-question")
                            .child(ElementSpec::new("i").class("fas")),
                    )
                    .child(
                        ElementSpec::new("div")
                            .class("faq-answer")
                            .scroll_height(120.0 + i as f32 * 10.0),
                    )
                    .mount(&mut doc, body)
            })
            .collect();
        (doc, items)
    }

    fn question(doc: &Document, item: ElementId) -> ElementId {
        doc.query_within(item, ".faq-question").unwrap().unwrap()
    }

    fn answer(doc: &Document, item: ElementId) -> ElementId {
        doc.query_within(item, ".faq-answer").unwrap().unwrap()
    }

    #[test]
    fn test_one_item_open_at_a_time() {
        let (mut doc, items) = faq_page();
        let faq = FaqAccordion::setup(&doc).unwrap();
        let mut scheduler = AnimationScheduler::new();
        assert_eq!(faq.len(), 3);

        let q0 = question(&doc, items[0]);
        assert!(faq.on_question_click(&mut doc, &mut scheduler, q0));
        assert!(doc.has_class(items[0], "active"));
        assert_eq!(doc.style(answer(&doc, items[0]), "max-height"), Some("120px"));

        let q2 = question(&doc, items[2]);
        assert!(faq.on_question_click(&mut doc, &mut scheduler, q2));
        assert!(!doc.has_class(items[0], "active"));
        assert_eq!(doc.style(answer(&doc, items[0]), "max-height"), Some("0"));
        assert_eq!(doc.style(answer(&doc, items[2]), "max-height"), Some("140px"));

        let open = items.iter().filter(|i| doc.has_class(**i, "active")).count();
        assert_eq!(open, 1);
    }

    #[test]
    fn test_second_click_closes_and_turns_icon_back() {
        let (mut doc, items) = faq_page();
        let faq = FaqAccordion::setup(&doc).unwrap();
        let mut scheduler = AnimationScheduler::new();
        let q = question(&doc, items[1]);
        let icon = doc.query_within(q, "i").unwrap().unwrap();

        faq.on_question_click(&mut doc, &mut scheduler, q);
        scheduler.tick(&mut doc, 300.0);
        assert_eq!(doc.prop(icon, Property::Rotation), Some(PropValue::Number(180.0)));

        assert!(!faq.on_question_click(&mut doc, &mut scheduler, q));
        assert!(!doc.has_class(items[1], "active"));
        scheduler.tick(&mut doc, 300.0);
        assert_eq!(doc.prop(icon, Property::Rotation), Some(PropValue::Number(0.0)));
    }
}
