//! Light/dark colour theme
//!
//! The chosen theme lives in the root element's `data-theme` attribute and
//! persists in the key-value store under [`THEME_KEY`].

use std::fmt;
use std::str::FromStr;

use folio_core::{Document, ElementId, KvStore};
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const THEME_KEY: &str = "theme";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Icon class shown on the toggle while this theme is active
    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Light => "fa-moon",
            Theme::Dark => "fa-sun",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme `{}`", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThemeSwitcher {
    toggle: Option<ElementId>,
    icon: Option<ElementId>,
}

impl ThemeSwitcher {
    /// Apply the stored theme (light when nothing valid is stored)
    pub fn setup(doc: &mut Document, store: &dyn KvStore) -> Result<Self> {
        let toggle = doc.by_id("themeToggle");
        let icon = match toggle {
            Some(toggle) => doc.query_within(toggle, "i")?,
            None => None,
        };
        let switcher = Self { toggle, icon };

        let theme = store
            .get(THEME_KEY)
            .and_then(|stored| stored.parse().ok())
            .unwrap_or_default();
        switcher.apply(doc, theme);
        Ok(switcher)
    }

    pub fn is_toggle(&self, element: ElementId) -> bool {
        self.toggle == Some(element)
    }

    /// Theme currently applied to the document
    pub fn current(&self, doc: &Document) -> Theme {
        doc.attr(doc.root(), "data-theme")
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Flip the theme and persist the choice
    pub fn toggle(&self, doc: &mut Document, store: &mut dyn KvStore) -> Result<Theme> {
        let theme = self.current(doc).toggled();
        self.apply(doc, theme);
        store.set(THEME_KEY, theme.as_str())?;
        tracing::debug!(%theme, "Theme toggled");
        Ok(theme)
    }

    fn apply(&self, doc: &mut Document, theme: Theme) {
        let root = doc.root();
        doc.set_attr(root, "data-theme", theme.as_str());
        if let Some(icon) = self.icon {
            doc.remove_class(icon, theme.toggled().icon());
            doc.add_class(icon, theme.icon());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{ElementSpec, MemoryStore};

    fn themed_page() -> (Document, ElementId) {
        let mut doc = Document::new(1280.0, 800.0);
        let body = doc.body();
        let toggle = ElementSpec::new("button")
            .id("themeToggle")
            .child(ElementSpec::new("i").class("fas").class("fa-moon"))
            .mount(&mut doc, body);
        let icon = doc.query_within(toggle, "i").unwrap().unwrap();
        (doc, icon)
    }

    #[test]
    fn test_defaults_to_light() {
        let (mut doc, icon) = themed_page();
        let store = MemoryStore::new();
        let switcher = ThemeSwitcher::setup(&mut doc, &store).unwrap();

        assert_eq!(switcher.current(&doc), Theme::Light);
        assert_eq!(doc.attr(doc.root(), "data-theme"), Some("light"));
        assert!(doc.has_class(icon, "fa-moon"));
    }

    #[test]
    fn test_toggle_persists() {
        let (mut doc, icon) = themed_page();
        let mut store = MemoryStore::new();
        let switcher = ThemeSwitcher::setup(&mut doc, &store).unwrap();

        assert_eq!(switcher.toggle(&mut doc, &mut store).unwrap(), Theme::Dark);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
        assert!(doc.has_class(icon, "fa-sun"));
        assert!(!doc.has_class(icon, "fa-moon"));

        let (mut next_page, next_icon) = themed_page();
        let switcher = ThemeSwitcher::setup(&mut next_page, &store).unwrap();
        assert_eq!(switcher.current(&next_page), Theme::Dark);
        assert!(next_page.has_class(next_icon, "fa-sun"));

        assert_eq!(switcher.toggle(&mut next_page, &mut store).unwrap(), Theme::Light);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("light"));
    }
}
