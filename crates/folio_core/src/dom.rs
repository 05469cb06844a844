//! Headless document model
//!
//! An arena of elements addressed by [`ElementId`]. The document owns the
//! `html` root and the `body`, plus the viewport the page is shown in.
//! Every controller in the engine reads and mutates state through this type.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, Key, SlotMap};
use smallvec::SmallVec;

use crate::error::Result;
use crate::geometry::{Rect, Viewport};
use crate::selector::Selector;
use crate::style::{PropValue, Property, Visual};

new_key_type! {
    /// Handle to an element in a [`Document`]
    pub struct ElementId;
}

impl ElementId {
    /// Convert to a raw u64 representation
    pub fn to_raw(self) -> u64 {
        self.data().as_ffi()
    }
}

/// A single element
#[derive(Clone, Debug, Default)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: SmallVec<[String; 4]>,
    pub attrs: FxHashMap<String, String>,
    /// Inline style declarations (`width`, `display`, `overflow`, ...)
    pub style: FxHashMap<String, String>,
    pub text: String,
    /// Current value for form fields
    pub value: String,
    pub checked: bool,
    pub disabled: bool,
    /// Layout box in document coordinates
    pub bounds: Rect,
    /// Full content height (for collapsible panels)
    pub scroll_height: f32,
    pub visual: Visual,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        if name == "id" {
            return self.id.as_deref();
        }
        if name == "class" {
            return None;
        }
        self.attrs.get(name).map(String::as_str)
    }

    pub fn style(&self, name: &str) -> Option<&str> {
        self.style.get(name).map(String::as_str)
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

/// The page
#[derive(Debug)]
pub struct Document {
    elements: SlotMap<ElementId, Element>,
    root: ElementId,
    body: ElementId,
    viewport: Viewport,
}

impl Document {
    /// Create an empty page (`html > body`) shown in a viewport of the given size
    pub fn new(width: f32, height: f32) -> Self {
        let mut elements = SlotMap::with_key();
        let root = elements.insert(Element::new("html"));
        let mut body_el = Element::new("body");
        body_el.parent = Some(root);
        let body = elements.insert(body_el);
        elements[root].children.push(body);

        Self {
            elements,
            root,
            body,
            viewport: Viewport::new(width, height),
        }
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_scroll(&mut self, scroll_y: f32) {
        self.viewport.scroll_y = scroll_y.max(0.0);
    }

    pub fn resize_viewport(&mut self, width: f32, height: f32) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    /// Total page height (bottom of the lowest element)
    pub fn scroll_height(&self) -> f32 {
        self.elements
            .values()
            .map(|el| el.bounds.bottom())
            .fold(0.0, f32::max)
    }

    // =========================================================================
    // Tree
    // =========================================================================

    /// Create a detached element
    pub fn create_element(&mut self, tag: impl Into<String>) -> ElementId {
        self.elements.insert(Element::new(tag))
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if !self.elements.contains_key(parent) || !self.elements.contains_key(child) {
            return;
        }
        self.detach(child);
        self.elements[child].parent = Some(parent);
        self.elements[parent].children.push(child);
    }

    fn detach(&mut self, id: ElementId) {
        if let Some(parent) = self.elements.get_mut(id).and_then(|el| el.parent.take()) {
            if let Some(p) = self.elements.get_mut(parent) {
                p.children.retain(|c| *c != id);
            }
        }
    }

    /// Remove an element and its subtree from the document
    pub fn remove(&mut self, id: ElementId) {
        if id == self.root || id == self.body {
            return;
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(el) = self.elements.remove(next) {
                stack.extend(el.children);
            }
        }
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements.get(id).and_then(|el| el.parent)
    }

    pub fn is_descendant_of(&self, id: ElementId, ancestor: ElementId) -> bool {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    /// Pre-order traversal of `scope`'s descendants (DOM order, `scope` excluded)
    pub fn descendants(&self, scope: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = match self.elements.get(scope) {
            Some(el) => el.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(el) = self.elements.get(id) {
                stack.extend(el.children.iter().rev().copied());
            }
        }
        out
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// All elements matching `selector`, in DOM order
    pub fn query_all(&self, selector: &Selector) -> Vec<ElementId> {
        self.query_all_within(self.root, selector)
    }

    /// Descendants of `scope` matching `selector`, in DOM order
    pub fn query_all_within(&self, scope: ElementId, selector: &Selector) -> Vec<ElementId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| selector.matches(self, *id))
            .collect()
    }

    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<ElementId>> {
        let selector = Selector::parse(selector)?;
        Ok(self.query_all(&selector))
    }

    pub fn query_selector(&self, selector: &str) -> Result<Option<ElementId>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    /// First descendant of `scope` matching `selector`
    pub fn query_within(&self, scope: ElementId, selector: &str) -> Result<Option<ElementId>> {
        let selector = Selector::parse(selector)?;
        Ok(self.query_all_within(scope, &selector).into_iter().next())
    }

    /// Look up by `id` attribute
    pub fn by_id(&self, id: &str) -> Option<ElementId> {
        self.descendants(self.root)
            .into_iter()
            .find(|el| self.elements[*el].id.as_deref() == Some(id))
    }

    // =========================================================================
    // Mutation helpers
    // =========================================================================

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.elements.get(id).is_some_and(|el| el.has_class(class))
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(el) = self.elements.get_mut(id) {
            if !el.has_class(class) {
                el.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(el) = self.elements.get_mut(id) {
            el.classes.retain(|c| c != class);
        }
    }

    /// Toggle a class, returning whether it is now present
    pub fn toggle_class(&mut self, id: ElementId, class: &str) -> bool {
        if self.has_class(id, class) {
            self.remove_class(id, class);
            false
        } else {
            self.add_class(id, class);
            true
        }
    }

    pub fn attr(&self, id: ElementId, name: &str) -> Option<&str> {
        self.elements.get(id).and_then(|el| el.attr(name))
    }

    pub fn set_attr(&mut self, id: ElementId, name: &str, value: impl Into<String>) {
        if let Some(el) = self.elements.get_mut(id) {
            if name == "id" {
                el.id = Some(value.into());
            } else {
                el.attrs.insert(name.to_string(), value.into());
            }
        }
    }

    pub fn style(&self, id: ElementId, name: &str) -> Option<&str> {
        self.elements.get(id).and_then(|el| el.style(name))
    }

    /// Set an inline style declaration; an empty value removes it
    pub fn set_style(&mut self, id: ElementId, name: &str, value: impl Into<String>) {
        if let Some(el) = self.elements.get_mut(id) {
            let value = value.into();
            if value.is_empty() {
                el.style.remove(name);
            } else {
                el.style.insert(name.to_string(), value);
            }
        }
    }

    pub fn text(&self, id: ElementId) -> &str {
        self.elements.get(id).map(|el| el.text.as_str()).unwrap_or("")
    }

    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        if let Some(el) = self.elements.get_mut(id) {
            el.text = text.into();
        }
    }

    pub fn bounds(&self, id: ElementId) -> Option<Rect> {
        self.elements.get(id).map(|el| el.bounds)
    }

    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) {
        if let Some(el) = self.elements.get_mut(id) {
            el.bounds = bounds;
        }
    }

    /// Whether the element is laid out (`display: none` on it or an ancestor hides it)
    pub fn is_displayed(&self, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(el_id) = current {
            match self.elements.get(el_id) {
                Some(el) if el.style("display") == Some("none") => return false,
                Some(el) => current = el.parent,
                None => return false,
            }
        }
        true
    }

    // =========================================================================
    // Animatable properties
    // =========================================================================

    /// Current value of an animatable property
    ///
    /// Width reads the inline `width` declaration; an undeclared width reads
    /// as `100%`.
    pub fn prop(&self, id: ElementId, property: Property) -> Option<PropValue> {
        let el = self.elements.get(id)?;
        match property {
            Property::Width => Some(
                el.style("width")
                    .and_then(PropValue::parse)
                    .unwrap_or(property.identity()),
            ),
            other => el.visual.get(other).map(PropValue::Number),
        }
    }

    pub fn set_prop(&mut self, id: ElementId, property: Property, value: PropValue) {
        let Some(el) = self.elements.get_mut(id) else {
            return;
        };
        match property {
            Property::Width => {
                el.style.insert("width".to_string(), value.to_string());
            }
            other => el.visual.set(other, value.as_f32()),
        }
    }

    /// Opacity as the renderer would compute it
    pub fn opacity(&self, id: ElementId) -> f32 {
        self.elements
            .get(id)
            .map(|el| el.visual.opacity)
            .unwrap_or(0.0)
    }
}

impl Default for Document {
    fn default() -> Self {
        let vp = Viewport::default();
        Self::new(vp.width, vp.height)
    }
}
