//! Navigation chrome
//!
//! The sticky navbar, the mobile hamburger menu and in-page anchor links.

use folio_core::{Document, ElementId};

use crate::error::Result;
use crate::task::ChromeAction;

/// Scroll offset past which the navbar switches to its compact style
pub const SCROLLED_THRESHOLD: f32 = 100.0;

/// The page a path points at: its last segment, `index.html` for a directory
pub fn current_page(path: &str) -> &str {
    path.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or("index.html")
}

#[derive(Debug, Clone, Default)]
pub struct Navbar {
    navbar: Option<ElementId>,
    links: Vec<ElementId>,
}

impl Navbar {
    /// Bind to `#navbar` and mark the link pointing at `page_path` active
    pub fn setup(doc: &mut Document, page_path: &str) -> Result<Self> {
        let navbar = doc.by_id("navbar");
        let links = doc.query_selector_all(".nav-link")?;
        let page = current_page(page_path);
        for &link in &links {
            if doc.attr(link, "href") == Some(page) {
                doc.add_class(link, "active");
            }
        }
        Ok(Self { navbar, links })
    }

    pub fn is_nav_link(&self, element: ElementId) -> bool {
        self.links.contains(&element)
    }

    pub fn on_scroll(&self, doc: &mut Document) {
        let Some(navbar) = self.navbar else {
            return;
        };
        if doc.viewport().scroll_y > SCROLLED_THRESHOLD {
            doc.add_class(navbar, "scrolled");
        } else {
            doc.remove_class(navbar, "scrolled");
        }
    }
}

/// Hamburger-driven menu for narrow viewports
#[derive(Debug, Clone, Default)]
pub struct MobileMenu {
    hamburger: Option<ElementId>,
    menu: Option<ElementId>,
}

impl MobileMenu {
    pub fn setup(doc: &Document) -> Self {
        Self {
            hamburger: doc.by_id("hamburger"),
            menu: doc.by_id("navMenu"),
        }
    }

    pub fn is_hamburger(&self, element: ElementId) -> bool {
        self.hamburger == Some(element)
    }

    pub fn is_open(&self, doc: &Document) -> bool {
        self.menu.is_some_and(|menu| doc.has_class(menu, "active"))
    }

    /// Returns whether the menu is now open
    pub fn toggle(&self, doc: &mut Document) -> bool {
        let Some(hamburger) = self.hamburger else {
            return false;
        };
        doc.toggle_class(hamburger, "active");
        if let Some(menu) = self.menu {
            doc.toggle_class(menu, "active");
        }
        let open = self.is_open(doc);
        let body = doc.body();
        doc.set_style(body, "overflow", if open { "hidden" } else { "visible" });
        open
    }

    /// Close after a navigation link was followed
    pub fn close(&self, doc: &mut Document) {
        let Some(hamburger) = self.hamburger else {
            return;
        };
        doc.remove_class(hamburger, "active");
        if let Some(menu) = self.menu {
            doc.remove_class(menu, "active");
        }
        let body = doc.body();
        doc.set_style(body, "overflow", "visible");
    }
}

/// Scroll request for a click on an in-page anchor
///
/// Bare `#` links and anchors whose target does not exist do nothing.
pub fn anchor_target(doc: &Document, link: ElementId) -> Option<ChromeAction> {
    let href = doc.attr(link, "href")?;
    if !href.starts_with('#') || href == "#" {
        return None;
    }
    match doc.query_selector(href) {
        Ok(Some(element)) => Some(ChromeAction::ScrollIntoView { element }),
        Ok(None) => None,
        Err(error) => {
            tracing::debug!(%href, %error, "Anchor is not a valid selector");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::ElementSpec;

    fn nav_page() -> (Document, ElementId, Vec<ElementId>) {
        let mut doc = Document::new(1280.0, 800.0);
        let body = doc.body();
        let navbar = ElementSpec::new("nav").id("navbar").mount(&mut doc, body);
        let links = ["index.html", "projects.html", "contact.html"]
            .iter()
            .map(|href| {
                ElementSpec::new("a")
                    .class("nav-link")
                    .attr("href", *href)
                    .mount(&mut doc, navbar)
            })
            .collect();
        (doc, navbar, links)
    }

    #[test]
    fn test_current_page() {
        assert_eq!(current_page("/site/projects.html"), "projects.html");
        assert_eq!(current_page("/"), "index.html");
        assert_eq!(current_page(""), "index.html");
    }

    #[test]
    fn test_active_link() {
        let (mut doc, _, links) = nav_page();
        Navbar::setup(&mut doc, "/projects.html").unwrap();
        assert!(!doc.has_class(links[0], "active"));
        assert!(doc.has_class(links[1], "active"));

        let (mut doc, _, links) = nav_page();
        Navbar::setup(&mut doc, "/").unwrap();
        assert!(doc.has_class(links[0], "active"));
    }

    #[test]
    fn test_scrolled_threshold() {
        let (mut doc, navbar, _) = nav_page();
        let nav = Navbar::setup(&mut doc, "/").unwrap();

        doc.set_scroll(100.0);
        nav.on_scroll(&mut doc);
        assert!(!doc.has_class(navbar, "scrolled"));

        doc.set_scroll(101.0);
        nav.on_scroll(&mut doc);
        assert!(doc.has_class(navbar, "scrolled"));

        doc.set_scroll(0.0);
        nav.on_scroll(&mut doc);
        assert!(!doc.has_class(navbar, "scrolled"));
    }

    #[test]
    fn test_menu_locks_body_scroll() {
        let mut doc = Document::new(400.0, 800.0);
        let body = doc.body();
        let hamburger = ElementSpec::new("div").id("hamburger").mount(&mut doc, body);
        let menu = ElementSpec::new("ul").id("navMenu").mount(&mut doc, body);
        let mobile = MobileMenu::setup(&doc);

        assert!(mobile.toggle(&mut doc));
        assert!(doc.has_class(hamburger, "active"));
        assert!(doc.has_class(menu, "active"));
        assert_eq!(doc.style(body, "overflow"), Some("hidden"));

        mobile.close(&mut doc);
        assert!(!mobile.is_open(&doc));
        assert!(!doc.has_class(hamburger, "active"));
        assert_eq!(doc.style(body, "overflow"), Some("visible"));
    }

    #[test]
    fn test_anchor_targets() {
        let mut doc = Document::new(1280.0, 800.0);
        let body = doc.body();
        let about = ElementSpec::new("section").id("about").mount(&mut doc, body);
        let to_about = ElementSpec::new("a").attr("href", "#about").mount(&mut doc, body);
        let bare = ElementSpec::new("a").attr("href", "#").mount(&mut doc, body);
        let missing = ElementSpec::new("a").attr("href", "#nowhere").mount(&mut doc, body);

        assert_eq!(
            anchor_target(&doc, to_about),
            Some(ChromeAction::ScrollIntoView { element: about })
        );
        assert_eq!(anchor_target(&doc, bare), None);
        assert_eq!(anchor_target(&doc, missing), None);
    }
}
