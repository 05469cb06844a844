//! Project grid: category filter, incremental "load more" and card hover

use folio_animation::{AnimationScheduler, Easing, Tween};
use folio_core::style::props;
use folio_core::{Document, ElementId, Property};
use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::task::{ChromeAction, ChromeTask, CompletionTasks, Deferred};

pub const INITIAL_VISIBLE: usize = 9;
pub const LOAD_STEP: usize = 3;
pub const FILTER_STAGGER_MS: f64 = 50.0;
pub const LOAD_STAGGER_MS: f64 = 100.0;
pub const HOVER_SCALE: f32 = 1.1;

#[derive(Debug, Clone, Default)]
pub struct ProjectGrid {
    filter_buttons: Vec<ElementId>,
    cards: Vec<ElementId>,
    load_more: Option<ElementId>,
    /// Card → its `.project-image img`
    images: FxHashMap<ElementId, ElementId>,
}

impl ProjectGrid {
    /// Collect the grid; with a load-more button only the first
    /// [`INITIAL_VISIBLE`] cards stay displayed
    pub fn setup(doc: &mut Document) -> Result<Self> {
        let filter_buttons = doc.query_selector_all(".filter-btn")?;
        let cards = doc.query_selector_all(".project-card")?;
        let mut images = FxHashMap::default();
        for &card in &cards {
            if let Some(image) = doc.query_within(card, ".project-image img")? {
                images.insert(card, image);
            }
        }

        let load_more = doc.by_id("loadMore");
        if let Some(button) = load_more {
            for &card in cards.iter().skip(INITIAL_VISIBLE) {
                doc.set_style(card, "display", "none");
            }
            if cards.len() <= INITIAL_VISIBLE {
                doc.set_style(button, "display", "none");
            }
        }

        tracing::debug!(
            cards = cards.len(),
            filters = filter_buttons.len(),
            "Project grid ready"
        );
        Ok(Self {
            filter_buttons,
            cards,
            load_more,
            images,
        })
    }

    pub fn cards(&self) -> &[ElementId] {
        &self.cards
    }

    pub fn is_filter_button(&self, element: ElementId) -> bool {
        self.filter_buttons.contains(&element)
    }

    pub fn is_load_more(&self, element: ElementId) -> bool {
        self.load_more == Some(element)
    }

    pub fn is_card(&self, element: ElementId) -> bool {
        self.cards.contains(&element)
    }

    /// Apply the filter carried by `button`
    ///
    /// Matching cards come back staggered through the returned tasks; the
    /// rest fade out now and collapse when their fade completes.
    pub fn on_filter_click(
        &self,
        doc: &mut Document,
        scheduler: &mut AnimationScheduler,
        completions: &mut CompletionTasks,
        button: ElementId,
    ) -> Vec<Deferred> {
        if !self.is_filter_button(button) || self.cards.is_empty() {
            return Vec::new();
        }
        for &other in &self.filter_buttons {
            doc.remove_class(other, "active");
        }
        doc.add_class(button, "active");

        let filter = doc.attr(button, "data-filter").unwrap_or_default().to_string();
        tracing::debug!(%filter, "Filtering projects");

        let mut deferred = Vec::new();
        for (index, &card) in self.cards.iter().enumerate() {
            let categories = doc.attr(card, "data-category").unwrap_or_default();
            if filter == "all" || categories.contains(filter.as_str()) {
                deferred.push(Deferred::after(
                    index as f64 * FILTER_STAGGER_MS,
                    ChromeTask::ShowFilteredCard(card),
                ));
            } else {
                let fade = scheduler.play(
                    doc,
                    Tween::to(card, props([(Property::Opacity, 0.0), (Property::Y, -20.0)]))
                        .duration(300.0)
                        .ease(Easing::Power2In),
                );
                completions.on_complete(fade, ChromeTask::CollapseCard(card));
            }
        }
        deferred
    }

    pub fn show_filtered_card(
        &self,
        doc: &mut Document,
        scheduler: &mut AnimationScheduler,
        card: ElementId,
    ) {
        doc.set_style(card, "display", "block");
        doc.remove_class(card, "hide");
        scheduler.play(
            doc,
            Tween::from_to(
                card,
                props([
                    (Property::Opacity, 0.0),
                    (Property::Y, 30.0),
                    (Property::Scale, 0.9),
                ]),
                props([
                    (Property::Opacity, 1.0),
                    (Property::Y, 0.0),
                    (Property::Scale, 1.0),
                ]),
            )
            .duration(500.0)
            .ease(Easing::Power2Out),
        );
    }

    pub fn collapse_card(&self, doc: &mut Document, card: ElementId) {
        doc.set_style(card, "display", "none");
        doc.add_class(card, "hide");
    }

    /// Uncover the next [`LOAD_STEP`] cards; the button retires once none remain
    pub fn on_load_more_click(
        &self,
        doc: &mut Document,
        scheduler: &mut AnimationScheduler,
        completions: &mut CompletionTasks,
    ) -> Vec<Deferred> {
        let Some(button) = self.load_more else {
            return Vec::new();
        };
        let hidden: Vec<ElementId> = self
            .cards
            .iter()
            .copied()
            .filter(|&card| {
                doc.style(card, "display") == Some("none") && !doc.has_class(card, "hide")
            })
            .collect();

        let deferred = hidden
            .iter()
            .take(LOAD_STEP)
            .enumerate()
            .map(|(index, &card)| {
                Deferred::after(index as f64 * LOAD_STAGGER_MS, ChromeTask::ShowMoreCard(card))
            })
            .collect();

        if hidden.len() <= LOAD_STEP {
            let fade = scheduler.play(
                doc,
                Tween::to(button, props([(Property::Opacity, 0.0), (Property::Y, 20.0)]))
                    .duration(300.0)
                    .ease(Easing::Power1Out),
            );
            completions.on_complete(fade, ChromeTask::Undisplay(button));
        }
        deferred
    }

    pub fn show_more_card(
        &self,
        doc: &mut Document,
        scheduler: &mut AnimationScheduler,
        card: ElementId,
    ) -> ChromeAction {
        doc.set_style(card, "display", "block");
        scheduler.play(
            doc,
            Tween::from_to(
                card,
                props([
                    (Property::Opacity, 0.0),
                    (Property::Y, 50.0),
                    (Property::Scale, 0.8),
                ]),
                props([
                    (Property::Opacity, 1.0),
                    (Property::Y, 0.0),
                    (Property::Scale, 1.0),
                ]),
            )
            .duration(600.0)
            .ease(Easing::BackOut(1.2)),
        );
        ChromeAction::ScrollIntoView { element: card }
    }

    pub fn on_card_enter(&self, doc: &mut Document, scheduler: &mut AnimationScheduler, card: ElementId) {
        self.zoom_image(doc, scheduler, card, HOVER_SCALE);
    }

    pub fn on_card_leave(&self, doc: &mut Document, scheduler: &mut AnimationScheduler, card: ElementId) {
        self.zoom_image(doc, scheduler, card, 1.0);
    }

    fn zoom_image(
        &self,
        doc: &mut Document,
        scheduler: &mut AnimationScheduler,
        card: ElementId,
        scale: f32,
    ) {
        let Some(&image) = self.images.get(&card) else {
            return;
        };
        scheduler.play(
            doc,
            Tween::to(image, props([(Property::Scale, scale)]))
                .duration(600.0)
                .ease(Easing::Power2Out),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{ElementSpec, PropValue};

    fn grid_page(count: usize, with_load_more: bool) -> Document {
        let mut doc = Document::new(1280.0, 800.0);
        let body = doc.body();
        for filter in ["all", "web", "mobile"] {
            ElementSpec::new("button")
                .class("filter-btn")
                .attr("data-filter", filter)
                .mount(&mut doc, body);
        }
        for i in 0..count {
            let category = if i % 2 == 0 { "web design" } else { "mobile" };
            ElementSpec::new("div")
                .class("project-card")
                .attr("data-category", category)
                .child(
                    ElementSpec::new("div")
                        .class("project-image")
                        .child(ElementSpec::new("img")),
                )
                .mount(&mut doc, body);
        }
        if with_load_more {
            ElementSpec::new("button").id("loadMore").mount(&mut doc, body);
        }
        doc
    }

    fn run(
        grid: &ProjectGrid,
        doc: &mut Document,
        scheduler: &mut AnimationScheduler,
        completions: &mut CompletionTasks,
        deferred: Vec<Deferred>,
        ms: f32,
    ) {
        for task in deferred {
            match task.task {
                ChromeTask::ShowFilteredCard(card) => grid.show_filtered_card(doc, scheduler, card),
                ChromeTask::ShowMoreCard(card) => {
                    grid.show_more_card(doc, scheduler, card);
                }
                _ => {}
            }
        }
        for event in scheduler.tick(doc, ms) {
            match completions.resolve(&event) {
                Some(ChromeTask::CollapseCard(card)) => grid.collapse_card(doc, card),
                Some(ChromeTask::Undisplay(el)) => doc.set_style(el, "display", "none"),
                _ => {}
            }
        }
    }

    #[test]
    fn test_filter_hides_and_shows() {
        let mut doc = grid_page(4, false);
        let grid = ProjectGrid::setup(&mut doc).unwrap();
        let mut scheduler = AnimationScheduler::new();
        let mut completions = CompletionTasks::new();
        let buttons = doc.query_selector_all(".filter-btn").unwrap();
        let cards = grid.cards().to_vec();

        let shown = grid.on_filter_click(&mut doc, &mut scheduler, &mut completions, buttons[1]);
        assert!(doc.has_class(buttons[1], "active"));
        assert_eq!(
            shown,
            vec![
                Deferred::after(0.0, ChromeTask::ShowFilteredCard(cards[0])),
                Deferred::after(100.0, ChromeTask::ShowFilteredCard(cards[2])),
            ]
        );
        run(&grid, &mut doc, &mut scheduler, &mut completions, shown, 600.0);
        assert!(doc.has_class(cards[1], "hide"));
        assert!(!doc.is_displayed(cards[3]));
        assert_eq!(doc.opacity(cards[0]), 1.0);

        let all = grid.on_filter_click(&mut doc, &mut scheduler, &mut completions, buttons[0]);
        assert!(!doc.has_class(buttons[1], "active"));
        assert_eq!(all.len(), 4);
        run(&grid, &mut doc, &mut scheduler, &mut completions, all, 600.0);
        assert!(cards.iter().all(|c| doc.is_displayed(*c) && !doc.has_class(*c, "hide")));
        assert!(cards.iter().all(|c| doc.opacity(*c) == 1.0));
    }

    #[test]
    fn test_overwritten_fade_does_not_collapse() {
        let mut doc = grid_page(2, false);
        let grid = ProjectGrid::setup(&mut doc).unwrap();
        let mut scheduler = AnimationScheduler::new();
        let mut completions = CompletionTasks::new();
        let buttons = doc.query_selector_all(".filter-btn").unwrap();
        let mobile_card = grid.cards()[1];

        grid.on_filter_click(&mut doc, &mut scheduler, &mut completions, buttons[1]);
        let all = grid.on_filter_click(&mut doc, &mut scheduler, &mut completions, buttons[0]);
        run(&grid, &mut doc, &mut scheduler, &mut completions, all, 600.0);
        assert!(doc.is_displayed(mobile_card));
        assert!(!doc.has_class(mobile_card, "hide"));
    }

    #[test]
    fn test_load_more() {
        let mut doc = grid_page(14, true);
        let grid = ProjectGrid::setup(&mut doc).unwrap();
        let mut scheduler = AnimationScheduler::new();
        let mut completions = CompletionTasks::new();
        let button = doc.by_id("loadMore").unwrap();
        let cards = grid.cards().to_vec();

        let displayed = |doc: &Document| cards.iter().filter(|c| doc.is_displayed(**c)).count();
        assert_eq!(displayed(&doc), 9);

        let batch = grid.on_load_more_click(&mut doc, &mut scheduler, &mut completions);
        assert_eq!(
            batch,
            vec![
                Deferred::after(0.0, ChromeTask::ShowMoreCard(cards[9])),
                Deferred::after(100.0, ChromeTask::ShowMoreCard(cards[10])),
                Deferred::after(200.0, ChromeTask::ShowMoreCard(cards[11])),
            ]
        );
        run(&grid, &mut doc, &mut scheduler, &mut completions, batch, 700.0);
        assert_eq!(displayed(&doc), 12);
        assert!(doc.is_displayed(button));

        let batch = grid.on_load_more_click(&mut doc, &mut scheduler, &mut completions);
        assert_eq!(batch.len(), 2);
        run(&grid, &mut doc, &mut scheduler, &mut completions, batch, 700.0);
        assert_eq!(displayed(&doc), 14);
        assert!(!doc.is_displayed(button));
        assert_eq!(doc.opacity(button), 0.0);
    }

    #[test]
    fn test_small_grid_hides_load_more() {
        let mut doc = grid_page(9, true);
        ProjectGrid::setup(&mut doc).unwrap();
        let button = doc.by_id("loadMore").unwrap();
        assert!(!doc.is_displayed(button));
    }

    #[test]
    fn test_hover_zoom() {
        let mut doc = grid_page(1, false);
        let grid = ProjectGrid::setup(&mut doc).unwrap();
        let mut scheduler = AnimationScheduler::new();
        let card = grid.cards()[0];
        let image = doc.query_selector(".project-image img").unwrap().unwrap();

        grid.on_card_enter(&mut doc, &mut scheduler, card);
        scheduler.tick(&mut doc, 600.0);
        assert_eq!(doc.prop(image, Property::Scale), Some(PropValue::Number(1.1)));

        grid.on_card_leave(&mut doc, &mut scheduler, card);
        scheduler.tick(&mut doc, 600.0);
        assert_eq!(doc.prop(image, Property::Scale), Some(PropValue::Number(1.0)));
    }
}
