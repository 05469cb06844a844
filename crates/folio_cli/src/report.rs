//! Terminal output for the simulate and table commands

use anyhow::Result;
use folio_app::{Site, SiteEvent};
use folio_chrome::ChromeAction;
use folio_core::{Document, Selector};
use folio_reveal::{RevealEvent, TriggerTemplate, SWEEP_SELECTORS};

// ANSI color codes
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const GRAY: &str = "\x1b[90m";
    pub const BOLD: &str = "\x1b[1m";
    pub const CYAN: &str = "\x1b[36m";
}

/// Site events stamped with the virtual time they surfaced at
#[derive(Debug, Default)]
pub struct Timeline {
    entries: Vec<(f64, SiteEvent)>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, now_ms: f64, events: Vec<SiteEvent>) {
        self.entries
            .extend(events.into_iter().map(|event| (now_ms, event)));
    }

    pub fn print(&self) {
        println!("{}{}Timeline{}", colors::BOLD, colors::CYAN, colors::RESET);
        println!("========");
        if self.entries.is_empty() {
            println!("{}(nothing happened){}", colors::GRAY, colors::RESET);
        }
        for (time, event) in &self.entries {
            println!("{}{:>8.0}ms{}  {}", colors::GRAY, time, colors::RESET, describe(event));
        }
        println!();
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

fn describe(event: &SiteEvent) -> String {
    match event {
        SiteEvent::Reveal(RevealEvent::Revealed { selector, elements }) => format!(
            "{}revealed{} {} ({} element{})",
            colors::GREEN,
            colors::RESET,
            selector,
            elements.len(),
            plural(elements.len())
        ),
        SiteEvent::Reveal(RevealEvent::Reversed { selector, elements }) => format!(
            "{}reversed{} {} ({} element{})",
            colors::YELLOW,
            colors::RESET,
            selector,
            elements.len(),
            plural(elements.len())
        ),
        SiteEvent::Reveal(RevealEvent::Swept { element }) => format!(
            "{}swept{} element {}",
            colors::YELLOW,
            colors::RESET,
            element.to_raw()
        ),
        SiteEvent::Action(ChromeAction::ScrollTo { y }) => format!("scroll to {}", y),
        SiteEvent::Action(ChromeAction::ScrollIntoView { element }) => {
            format!("scroll element {} into view", element.to_raw())
        }
        SiteEvent::Navigate(href) => format!("navigate to {}", href),
    }
}

/// Per-template visibility at the end of a run
pub fn print_visibility(site: &Site) {
    let doc = site.document();
    println!("{}{}Visibility{}", colors::BOLD, colors::CYAN, colors::RESET);
    println!("==========");
    for template in site.config().reveal.table() {
        let Ok(elements) = doc.query_selector_all(&template.selector) else {
            continue;
        };
        if elements.is_empty() {
            continue;
        }
        let visible = elements
            .iter()
            .filter(|el| doc.opacity(**el) > 0.0)
            .count();
        let color = if visible == elements.len() {
            colors::GREEN
        } else {
            colors::YELLOW
        };
        println!(
            "    {}{}/{}{} {}",
            color,
            visible,
            elements.len(),
            colors::RESET,
            template.selector
        );
    }
    println!();
}

/// Number of sweepable elements that ended the run fully transparent
pub fn still_hidden(site: &Site) -> Result<usize> {
    let selector = Selector::parse(&SWEEP_SELECTORS.join(", "))?;
    let doc = site.document();
    Ok(doc
        .query_all(&selector)
        .into_iter()
        .filter(|el| doc.opacity(*el) == 0.0)
        .count())
}

pub fn print_table(templates: &[TriggerTemplate], doc: Option<&Document>) -> Result<()> {
    println!(
        "{}{}Selector table{} ({} templates)",
        colors::BOLD,
        colors::CYAN,
        colors::RESET,
        templates.len()
    );
    println!("==============");
    for template in templates {
        let matches = match doc {
            Some(doc) => {
                let count = doc.query_selector_all(&template.selector)?.len();
                let suffix = if count == 1 { "" } else { "es" };
                format!("  {}[{} match{}]{}", colors::GRAY, count, suffix, colors::RESET)
            }
            None => String::new(),
        };
        println!("{}{}{}{}", colors::BOLD, template.selector, colors::RESET, matches);
        let options = template.options();
        println!(
            "    line: {}  policy: {:?}  scope: {:?}",
            template.line, template.policy, template.scope
        );
        println!(
            "    {}ms {}  stagger {}ms  delay {}ms{}",
            options.duration_ms,
            options.easing,
            options.stagger_ms,
            options.extra_delay_ms,
            if template.scroll_triggered {
                ""
            } else {
                "  (on ready)"
            }
        );
    }
    Ok(())
}
