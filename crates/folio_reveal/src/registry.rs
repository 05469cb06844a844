//! Trigger registration
//!
//! Scans a document for every template in the selector table, resolves
//! per-element states and hides the matches so the first paint shows them in
//! their from-state.

use folio_core::{Document, ElementId, PropValue, Property, PropertyMap, Selector};

use crate::error::{report_animation_error, Result, RevealError};
use crate::spec::{Scope, TriggerItem, TriggerSpec, TriggerTemplate};

/// Declared value of a captured property, read before the element is hidden
fn captured_value(doc: &Document, element: ElementId, property: Property) -> PropValue {
    match doc.style(element, property.as_str()).and_then(PropValue::parse) {
        Some(value) => value,
        None if property == Property::Width => PropValue::Percent(0.0),
        None => doc
            .prop(element, property)
            .unwrap_or_else(|| property.identity()),
    }
}

fn resolve_item(
    doc: &Document,
    template: &TriggerTemplate,
    element: ElementId,
    index: usize,
) -> TriggerItem {
    let mut from = template.from.clone();
    if template.mirror_odd && index % 2 == 1 {
        if let Some(x) = from.get_mut(&Property::X) {
            *x = PropValue::Number(-x.as_f32());
        }
    }

    let mut to = template.to.clone();
    for property in &template.capture {
        to.insert(*property, captured_value(doc, element, *property));
    }

    TriggerItem {
        element,
        index,
        from,
        to,
    }
}

fn apply_state(doc: &mut Document, element: ElementId, state: &PropertyMap) {
    for (property, value) in state {
        doc.set_prop(element, *property, *value);
    }
}

/// Register one template, returning its triggers (empty when nothing matches)
pub fn register(template: &TriggerTemplate, doc: &mut Document) -> Result<Vec<TriggerSpec>> {
    if template.from.is_empty() && template.to.is_empty() {
        return Err(RevealError::Template {
            selector: template.selector.clone(),
            message: "no properties to animate".to_string(),
        });
    }
    let selector = Selector::parse(&template.selector)?;
    let mut matches = doc.query_all(&selector);
    if template.first_only {
        matches.truncate(1);
    }
    if matches.is_empty() {
        tracing::debug!(selector = %template.selector, "No matches, category skipped");
        return Ok(Vec::new());
    }

    let items: Vec<TriggerItem> = matches
        .iter()
        .enumerate()
        .map(|(index, element)| resolve_item(doc, template, *element, index))
        .collect();
    for item in &items {
        apply_state(doc, item.element, &item.from);
    }

    let spec = |items: Vec<TriggerItem>| TriggerSpec {
        selector: template.selector.clone(),
        items,
        line: template.line,
        policy: template.policy,
        options: template.options(),
        scroll_triggered: template.scroll_triggered,
    };
    let specs = match template.scope {
        Scope::PerItem => items.into_iter().map(|item| spec(vec![item])).collect(),
        Scope::Group => vec![spec(items)],
    };

    tracing::debug!(
        selector = %template.selector,
        elements = matches.len(),
        "Registered reveal category"
    );
    Ok(specs)
}

/// Register every template in `table`
///
/// A template that fails to register is reported and skipped; the rest of the
/// page still reveals.
pub fn register_all(table: &[TriggerTemplate], doc: &mut Document) -> Vec<TriggerSpec> {
    let mut specs = Vec::new();
    for template in table {
        match register(template, doc) {
            Ok(mut registered) => specs.append(&mut registered),
            Err(error) => report_animation_error(&template.selector, &error),
        }
    }
    specs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::selector_table;
    use folio_core::style::props;
    use folio_core::ElementSpec;

    fn cards(n: usize, class: &str) -> Document {
        let mut doc = Document::new(1280.0, 800.0);
        let body = doc.body();
        for i in 0..n {
            ElementSpec::new("div")
                .class(class)
                .bounds(folio_core::Rect::new(0.0, 1000.0 + i as f32 * 400.0, 400.0, 300.0))
                .mount(&mut doc, body);
        }
        doc
    }

    #[test]
    fn test_missing_categories_are_skipped() {
        let mut doc = Document::new(1280.0, 800.0);
        assert!(register_all(&selector_table(), &mut doc).is_empty());
    }

    #[test]
    fn test_from_state_is_applied_at_registration() {
        let mut doc = cards(3, "service-card");
        let specs = register_all(&selector_table(), &mut doc);

        assert_eq!(specs.len(), 3);
        for (i, spec) in specs.iter().enumerate() {
            let el = spec.trigger_element().unwrap();
            assert_eq!(spec.items[0].index, i);
            assert_eq!(doc.opacity(el), 0.0);
            assert_eq!(doc.prop(el, Property::Y), Some(PropValue::Number(60.0)));
            assert_eq!(doc.prop(el, Property::Rotation), Some(PropValue::Number(5.0)));
        }
    }

    #[test]
    fn test_width_is_captured_before_hiding() {
        let mut doc = Document::new(1280.0, 800.0);
        let body = doc.body();
        let bar = ElementSpec::new("div")
            .class("skill-progress")
            .style("width", "72%")
            .mount(&mut doc, body);
        let bare = ElementSpec::new("div").class("skill-progress").mount(&mut doc, body);

        let specs = register_all(&selector_table(), &mut doc);
        assert_eq!(doc.style(bar, "width"), Some("0%"));
        assert_eq!(specs[0].items[0].to[&Property::Width], PropValue::Percent(72.0));
        assert_eq!(specs[1].items[0].element, bare);
        assert_eq!(specs[1].items[0].to[&Property::Width], PropValue::Percent(0.0));
    }

    #[test]
    fn test_odd_testimonials_are_mirrored() {
        let mut doc = cards(2, "testimonial-card");
        let specs = register_all(&selector_table(), &mut doc);
        assert_eq!(specs[0].items[0].from[&Property::X], PropValue::Number(-50.0));
        assert_eq!(specs[1].items[0].from[&Property::X], PropValue::Number(50.0));
    }

    #[test]
    fn test_group_scope_yields_one_trigger() {
        let mut doc = cards(4, "badge");
        let template = TriggerTemplate::reveal(".badge", props([(Property::Opacity, 0.0)]))
            .scope(Scope::Group)
            .stagger(100.0);
        let specs = register(&template, &mut doc).unwrap();

        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].items.len(), 4);
        assert_eq!(specs[0].options.delay_for(3), 300.0);
    }

    #[test]
    fn test_first_only() {
        let mut doc = cards(2, "about-image");
        let specs = register_all(&selector_table(), &mut doc);
        assert_eq!(specs.len(), 1);
    }

    #[test]
    fn test_bad_selector_is_reported_not_fatal() {
        let mut doc = cards(1, "service-card");
        let mut table = vec![TriggerTemplate::reveal(".[broken", props([(Property::Opacity, 0.0)]))];
        table.extend(selector_table());

        assert!(register(&table[0], &mut doc).is_err());
        assert_eq!(register_all(&table, &mut doc).len(), 1);
    }
}
