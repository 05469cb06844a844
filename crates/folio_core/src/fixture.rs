//! Page fixtures
//!
//! A serializable description of a page's markup and layout. Fixtures are how
//! tests and the CLI build documents without a browser.
//!
//! ```json
//! {
//!   "viewport": { "width": 1280, "height": 800 },
//!   "elements": [
//!     { "tag": "section", "classes": ["services"], "bounds": [0, 900, 1280, 600],
//!       "children": [
//!         { "tag": "div", "classes": ["service-card"], "bounds": [0, 1000, 400, 300] }
//!       ] }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dom::{Document, ElementId};
use crate::error::Result;
use crate::geometry::{Rect, Viewport};

/// Description of one element and its subtree
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ElementSpec {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    /// `[x, y, width, height]` in document coordinates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<[f32; 4]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_height: Option<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementSpec>,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn style(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(name.into(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn bounds(mut self, rect: Rect) -> Self {
        self.bounds = Some([rect.x, rect.y, rect.width, rect.height]);
        self
    }

    pub fn scroll_height(mut self, height: f32) -> Self {
        self.scroll_height = Some(height);
        self
    }

    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }

    /// Instantiate this subtree under `parent`, returning the new element
    pub fn mount(&self, doc: &mut Document, parent: ElementId) -> ElementId {
        let id = doc.create_element(self.tag.as_str());
        if let Some(el) = doc.get_mut(id) {
            el.id = self.id.clone();
            el.classes = self.classes.iter().cloned().collect();
            el.attrs = self
                .attrs
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            el.style = self
                .style
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            el.text = self.text.clone();
            el.value = self.value.clone();
            if let Some([x, y, w, h]) = self.bounds {
                el.bounds = Rect::new(x, y, w, h);
            }
            el.scroll_height = self.scroll_height.unwrap_or(el.bounds.height);
        }
        doc.append_child(parent, id);
        for child in &self.children {
            child.mount(doc, id);
        }
        id
    }
}

/// A whole page: viewport plus the body's children
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PageFixture {
    #[serde(default)]
    pub viewport: Viewport,
    /// Path of the page, used for active navigation links
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub elements: Vec<ElementSpec>,
}

fn default_path() -> String {
    "/index.html".to_string()
}

impl PageFixture {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Build a fresh document from this fixture
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new(self.viewport.width, self.viewport.height);
        doc.set_scroll(self.viewport.scroll_y);
        let body = doc.body();
        for spec in &self.elements {
            spec.mount(&mut doc, body);
        }
        tracing::debug!(
            elements = self.elements.len(),
            path = %self.path,
            "Built document from fixture"
        );
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_from_json() {
        let fixture = PageFixture::from_json(
            r#"{
                "viewport": { "width": 1024, "height": 768, "scroll_y": 40 },
                "elements": [
                    { "tag": "div", "classes": ["skill-progress"],
                      "style": { "width": "72%" }, "bounds": [0, 900, 400, 8] }
                ]
            }"#,
        )
        .unwrap();

        let doc = fixture.to_document();
        assert_eq!(doc.viewport().height, 768.0);
        assert_eq!(doc.viewport().scroll_y, 40.0);
        let bar = doc.query_selector(".skill-progress").unwrap().unwrap();
        assert_eq!(doc.style(bar, "width"), Some("72%"));
        assert_eq!(doc.bounds(bar).unwrap().top(), 900.0);
        assert_eq!(fixture.path, "/index.html");
    }

    #[test]
    fn test_malformed_fixture_is_an_error() {
        assert!(PageFixture::from_json("{ \"elements\": 3 }").is_err());
    }
}
