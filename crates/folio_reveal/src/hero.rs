//! Hero entrance sequence
//!
//! The home page's hero fades its parts in as one timeline. Absent parts are
//! skipped and the remaining entries keep their relative placement.

use folio_animation::{Easing, Position, Timeline, TimelineEntry};
use folio_core::style::props;
use folio_core::{Document, ElementId, Property};

use crate::error::Result;

pub const HERO_DELAY_MS: f32 = 300.0;

fn first(doc: &Document, selector: &str) -> Result<Vec<ElementId>> {
    Ok(doc.query_selector(selector)?.into_iter().collect())
}

fn all(doc: &Document, selector: &str) -> Result<Vec<ElementId>> {
    Ok(doc.query_selector_all(selector)?)
}

fn rise(targets: Vec<ElementId>, y: f32, duration_ms: f32) -> TimelineEntry {
    TimelineEntry::from_state(targets, props([(Property::Opacity, 0.0), (Property::Y, y)]))
        .duration(duration_ms)
}

/// Build the hero timeline, or `None` on pages without a `.hero`
pub fn hero_timeline(doc: &Document) -> Result<Option<Timeline>> {
    if doc.query_selector(".hero")?.is_none() {
        return Ok(None);
    }

    let floating_cards = TimelineEntry::from_state(
        all(doc, ".floating-card")?,
        props([(Property::Opacity, 0.0), (Property::Scale, 0.0)]),
    )
    .duration(800.0)
    .stagger(200.0)
    .ease(Easing::BackOut(1.7));

    let timeline = Timeline::new()
        .delay(HERO_DELAY_MS)
        .default_easing(Easing::Power3Out)
        .add(rise(first(doc, ".hero-greeting")?, 30.0, 800.0), Position::Sequential)
        .add(rise(first(doc, ".hero-title")?, 50.0, 1000.0), Position::Relative(-400.0))
        .add(rise(first(doc, ".hero-subtitle")?, 30.0, 800.0), Position::Relative(-600.0))
        .add(rise(first(doc, ".hero-description")?, 30.0, 800.0), Position::Relative(-400.0))
        .add(
            rise(all(doc, ".hero-buttons .btn")?, 20.0, 600.0).stagger(200.0),
            Position::Relative(-400.0),
        )
        .add(
            rise(all(doc, ".hero .social-links a")?, 20.0, 400.0).stagger(100.0),
            Position::Relative(-400.0),
        )
        .add(floating_cards, Position::Relative(-1000.0))
        .add(rise(first(doc, ".scroll-indicator")?, 20.0, 600.0), Position::Relative(-500.0));

    tracing::debug!(
        entries = timeline.len(),
        duration_ms = timeline.duration_ms(),
        "Hero timeline built"
    );
    Ok(Some(timeline))
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_animation::AnimationScheduler;
    use folio_core::ElementSpec;

    fn hero_page() -> Document {
        let mut doc = Document::new(1280.0, 800.0);
        let body = doc.body();
        ElementSpec::new("section")
            .class("hero")
            .child(ElementSpec::new("p").class("hero-greeting"))
            .child(ElementSpec::new("h1").class("hero-title"))
            .child(ElementSpec::new("p").class("hero-subtitle"))
            .child(
                ElementSpec::new("div")
                    .class("hero-buttons")
                    .child(ElementSpec::new("a").class("btn"))
                    .child(ElementSpec::new("a").class("btn")),
            )
            .child(ElementSpec::new("div").class("floating-card"))
            .mount(&mut doc, body);
        doc
    }

    #[test]
    fn test_no_hero_no_timeline() {
        let doc = Document::new(1280.0, 800.0);
        assert!(hero_timeline(&doc).unwrap().is_none());
    }

    #[test]
    fn test_entries_and_positions() {
        let doc = hero_page();
        let timeline = hero_timeline(&doc).unwrap().unwrap();

        // greeting, title, subtitle, buttons, floating cards
        let starts: Vec<f32> = timeline.entries().map(|(s, _)| s).collect();
        assert_eq!(starts, vec![0.0, 400.0, 800.0, 1200.0, 1000.0]);
    }

    #[test]
    fn test_hero_plays_to_visible() {
        let mut doc = hero_page();
        let timeline = hero_timeline(&doc).unwrap().unwrap();
        let mut scheduler = AnimationScheduler::new();
        timeline.play(&mut scheduler, &mut doc);

        let title = doc.query_selector(".hero-title").unwrap().unwrap();
        let card = doc.query_selector(".floating-card").unwrap().unwrap();
        assert_eq!(doc.opacity(title), 0.0);
        assert_eq!(doc.opacity(card), 0.0);

        scheduler.tick(&mut doc, HERO_DELAY_MS + timeline.duration_ms());
        assert_eq!(doc.opacity(title), 1.0);
        assert_eq!(doc.opacity(card), 1.0);
        assert!(!scheduler.has_active_animations());
    }
}
