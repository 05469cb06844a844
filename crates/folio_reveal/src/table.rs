//! The site's reveal categories
//!
//! Every category the markup may contain, enumerable without a document.
//! A category with no matches on a page simply contributes nothing.

use folio_animation::Easing;
use folio_core::style::props;
use folio_core::Property::{Opacity, Rotation, Scale, Width, X, Y};
use folio_core::{PropValue, PropertyMap};

use crate::spec::{TriggerLine, TriggerTemplate};

/// Elements the fallback sweep inspects after load
pub const SWEEP_SELECTORS: &[&str] = &[
    ".hero-greeting",
    ".hero-title",
    ".hero-subtitle",
    ".hero-description",
    ".hero-buttons .btn",
    ".social-links a",
    ".floating-card",
    ".service-card",
    ".project-card",
    ".testimonial-card",
    ".stat-item",
    ".blog-card",
    ".timeline-block",
    ".fact-card",
    ".faq-item",
];

fn width_reveal() -> TriggerTemplate {
    let mut from = PropertyMap::new();
    from.insert(Width, PropValue::Percent(0.0));
    let mut to = PropertyMap::new();
    to.insert(Width, PropValue::Percent(0.0));
    TriggerTemplate {
        selector: ".skill-progress".to_string(),
        from,
        to,
        ..Default::default()
    }
}

/// The default selector table
pub fn selector_table() -> Vec<TriggerTemplate> {
    vec![
        TriggerTemplate::reveal(".service-card", props([(Opacity, 0.0), (Y, 60.0), (Rotation, 5.0)]))
            .line(TriggerLine::top(85.0))
            .stagger(150.0),
        TriggerTemplate::reveal(".project-card", props([(Opacity, 0.0), (Scale, 0.8)]))
            .stagger(100.0)
            .ease(Easing::BackOut(1.2)),
        TriggerTemplate::reveal(".testimonial-card", props([(Opacity, 0.0), (X, -50.0)]))
            .stagger(150.0)
            .mirror_odd(),
        TriggerTemplate::reveal(".stat-item", props([(Opacity, 0.0), (Scale, 0.5)]))
            .duration(600.0)
            .stagger(100.0)
            .ease(Easing::BackOut(2.0)),
        TriggerTemplate::reveal(".blog-card", props([(Opacity, 0.0), (Y, 50.0)])).stagger(100.0),
        width_reveal()
            .capture(Width)
            .duration(1500.0)
            .stagger(100.0),
        TriggerTemplate::reveal(".timeline-block", props([(Opacity, 0.0), (X, -50.0)]))
            .stagger(150.0),
        TriggerTemplate::reveal(
            ".fact-card",
            props([(Opacity, 0.0), (Scale, 0.8), (Rotation, -10.0)]),
        )
        .duration(600.0)
        .stagger(100.0)
        .ease(Easing::BackOut(1.5)),
        TriggerTemplate::reveal(".faq-item", props([(Opacity, 0.0), (Y, 30.0)]))
            .duration(600.0)
            .stagger(100.0),
        TriggerTemplate::reveal(".section-header", props([(Opacity, 0.0), (Y, 40.0)])),
        TriggerTemplate::reveal(".page-header-content", props([(Opacity, 0.0), (Y, 50.0)]))
            .duration(1000.0)
            .extra_delay(200.0)
            .on_ready()
            .first_only(),
        TriggerTemplate::reveal(".contact-form-wrapper", props([(Opacity, 0.0), (X, 50.0)]))
            .first_only(),
        TriggerTemplate::reveal(".contact-info", props([(Opacity, 0.0), (X, -50.0)])).first_only(),
        TriggerTemplate::reveal(".about-image", props([(Opacity, 0.0), (X, -50.0)])).first_only(),
        TriggerTemplate::reveal(".about-content", props([(Opacity, 0.0), (X, 50.0)])).first_only(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::RepeatPolicy;
    use folio_core::Selector;

    #[test]
    fn test_table_is_enumerable() {
        let table = selector_table();
        assert_eq!(table.len(), 15);
        assert!(table.iter().all(|t| t.policy == RepeatPolicy::Once));
        for template in &table {
            assert!(Selector::parse(&template.selector).is_ok(), "{}", template.selector);
            assert_eq!(
                template.from.keys().collect::<Vec<_>>(),
                template.to.keys().collect::<Vec<_>>(),
                "{}",
                template.selector
            );
        }
    }

    #[test]
    fn test_service_cards_use_85_percent_line() {
        let table = selector_table();
        let service = table.iter().find(|t| t.selector == ".service-card").unwrap();
        assert_eq!(service.line, TriggerLine::top(85.0));
        assert_eq!(service.duration_ms, 800.0);
        assert_eq!(service.stagger_ms, 150.0);
    }

    #[test]
    fn test_sweep_selectors_parse() {
        assert!(Selector::parse(&SWEEP_SELECTORS.join(", ")).is_ok());
    }
}
