//! Trigger declarations
//!
//! [`TriggerTemplate`] is one row of the declarative selector table: it names
//! a category of elements and how they reveal. Registration turns each
//! template into concrete [`TriggerSpec`]s bound to the matched elements.

use std::fmt;
use std::str::FromStr;

use folio_animation::Easing;
use folio_core::{ElementId, Property, PropertyMap, Rect};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{multispace0, multispace1},
    combinator::{all_consuming, map, opt, value},
    number::complete::float,
    sequence::{delimited, pair, separated_pair},
    IResult,
};
use serde::{Deserialize, Serialize};

use crate::error::RevealError;

// ============================================================================
// Trigger line
// ============================================================================

/// Which edge of the element is measured
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Center,
    Bottom,
}

impl Edge {
    fn of(&self, bounds: Rect) -> f32 {
        match self {
            Edge::Top => bounds.top(),
            Edge::Center => bounds.center().1,
            Edge::Bottom => bounds.bottom(),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Edge::Top => "top",
            Edge::Center => "center",
            Edge::Bottom => "bottom",
        }
    }
}

/// Where the line sits in the viewport, measured from its top
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Offset {
    /// Fraction of the viewport height (`90%` is `0.9`)
    Fraction(f32),
    /// Absolute pixels
    Pixels(f32),
}

impl Offset {
    fn resolve(&self, viewport_height: f32) -> f32 {
        match *self {
            Offset::Fraction(f) => f * viewport_height,
            Offset::Pixels(px) => px,
        }
    }
}

/// A viewport-relative activation line such as `top 90%`: the trigger fires
/// when the element's top edge reaches 90 % of the way down the viewport
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TriggerLine {
    pub edge: Edge,
    pub viewport: Offset,
}

impl TriggerLine {
    pub const fn new(edge: Edge, viewport: Offset) -> Self {
        Self { edge, viewport }
    }

    /// `top <percent>%`
    pub const fn top(percent: f32) -> Self {
        Self::new(Edge::Top, Offset::Fraction(percent / 100.0))
    }

    pub fn parse(input: &str) -> Result<Self, RevealError> {
        all_consuming(delimited(multispace0, trigger_line, multispace0))(input)
            .map(|(_, line)| line)
            .map_err(|_| RevealError::TriggerLine(input.to_string()))
    }

    /// Scroll offset at which the line is reached for an element at `bounds`
    pub fn start_scroll(&self, bounds: Rect, viewport_height: f32) -> f32 {
        self.edge.of(bounds) - self.viewport.resolve(viewport_height)
    }
}

impl Default for TriggerLine {
    fn default() -> Self {
        Self::top(90.0)
    }
}

fn edge(input: &str) -> IResult<&str, Edge> {
    alt((
        value(Edge::Top, tag("top")),
        value(Edge::Center, tag("center")),
        value(Edge::Bottom, tag("bottom")),
    ))(input)
}

fn offset(input: &str) -> IResult<&str, Offset> {
    alt((
        value(Offset::Fraction(0.0), tag("top")),
        value(Offset::Fraction(0.5), tag("center")),
        value(Offset::Fraction(1.0), tag("bottom")),
        map(pair(float, opt(alt((tag("%"), tag("px"))))), |(n, unit)| {
            match unit {
                Some("%") => Offset::Fraction(n / 100.0),
                _ => Offset::Pixels(n),
            }
        }),
    ))(input)
}

fn trigger_line(input: &str) -> IResult<&str, TriggerLine> {
    map(separated_pair(edge, multispace1, offset), |(edge, viewport)| {
        TriggerLine { edge, viewport }
    })(input)
}

impl FromStr for TriggerLine {
    type Err = RevealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TriggerLine {
    type Error = RevealError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TriggerLine> for String {
    fn from(line: TriggerLine) -> Self {
        line.to_string()
    }
}

impl fmt::Display for TriggerLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.viewport {
            Offset::Fraction(fr) => write!(f, "{} {}%", self.edge.as_str(), fr * 100.0),
            Offset::Pixels(px) => write!(f, "{} {}px", self.edge.as_str(), px),
        }
    }
}

// ============================================================================
// Policies
// ============================================================================

/// Whether a trigger may fire more than once
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatPolicy {
    /// Play forward on the first crossing, then stop watching
    #[default]
    Once,
    /// Play forward on every downward crossing, back on every upward one
    Reversible,
}

/// How a template's matches are grouped into triggers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Every element is watched on its own, delayed by `index × stagger`
    #[default]
    PerItem,
    /// One watch on the first element; the whole group plays together
    Group,
}

/// Timing of a dispatched transition
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayOptions {
    pub duration_ms: f32,
    pub easing: Easing,
    pub stagger_ms: f32,
    pub extra_delay_ms: f32,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            duration_ms: 800.0,
            easing: Easing::Power3Out,
            stagger_ms: 0.0,
            extra_delay_ms: 0.0,
        }
    }
}

impl PlayOptions {
    /// Start delay of the item at `index`
    pub fn delay_for(&self, index: usize) -> f32 {
        self.extra_delay_ms + self.stagger_ms * index as f32
    }
}

// ============================================================================
// Templates
// ============================================================================

/// One category of revealable elements
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerTemplate {
    pub selector: String,
    pub from: PropertyMap,
    pub to: PropertyMap,
    pub line: TriggerLine,
    pub policy: RepeatPolicy,
    pub stagger_ms: f32,
    pub extra_delay_ms: f32,
    pub duration_ms: f32,
    pub easing: Easing,
    pub scope: Scope,
    /// Negate the from-state's `x` for odd indices (alternating slide-ins)
    pub mirror_odd: bool,
    /// Properties whose to-value is the element's declared inline style
    pub capture: Vec<Property>,
    /// `false` plays on page-ready instead of waiting for the trigger line
    pub scroll_triggered: bool,
    /// Only the first match takes part
    pub first_only: bool,
}

impl Default for TriggerTemplate {
    fn default() -> Self {
        Self {
            selector: String::new(),
            from: PropertyMap::new(),
            to: PropertyMap::new(),
            line: TriggerLine::default(),
            policy: RepeatPolicy::Once,
            stagger_ms: 0.0,
            extra_delay_ms: 0.0,
            duration_ms: 800.0,
            easing: Easing::Power3Out,
            scope: Scope::PerItem,
            mirror_odd: false,
            capture: Vec::new(),
            scroll_triggered: true,
            first_only: false,
        }
    }
}

impl TriggerTemplate {
    /// A template revealing `selector` from `from` to the identity of the
    /// same properties
    pub fn reveal(selector: impl Into<String>, from: PropertyMap) -> Self {
        let to = from.keys().map(|p| (*p, p.identity())).collect();
        Self {
            selector: selector.into(),
            from,
            to,
            ..Default::default()
        }
    }

    pub fn line(mut self, line: TriggerLine) -> Self {
        self.line = line;
        self
    }

    pub fn policy(mut self, policy: RepeatPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn stagger(mut self, ms: f32) -> Self {
        self.stagger_ms = ms;
        self
    }

    pub fn extra_delay(mut self, ms: f32) -> Self {
        self.extra_delay_ms = ms;
        self
    }

    pub fn duration(mut self, ms: f32) -> Self {
        self.duration_ms = ms;
        self
    }

    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn mirror_odd(mut self) -> Self {
        self.mirror_odd = true;
        self
    }

    pub fn capture(mut self, property: Property) -> Self {
        self.capture.push(property);
        self
    }

    pub fn on_ready(mut self) -> Self {
        self.scroll_triggered = false;
        self
    }

    pub fn first_only(mut self) -> Self {
        self.first_only = true;
        self
    }

    pub fn options(&self) -> PlayOptions {
        PlayOptions {
            duration_ms: self.duration_ms,
            easing: self.easing,
            stagger_ms: self.stagger_ms,
            extra_delay_ms: self.extra_delay_ms,
        }
    }
}

// ============================================================================
// Registered triggers
// ============================================================================

/// One element of a trigger, with its own resolved states
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerItem {
    pub element: ElementId,
    /// Position of the element among all matches of its template
    pub index: usize,
    pub from: PropertyMap,
    pub to: PropertyMap,
}

/// A template bound to concrete elements
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerSpec {
    pub selector: String,
    pub items: Vec<TriggerItem>,
    pub line: TriggerLine,
    pub policy: RepeatPolicy,
    pub options: PlayOptions,
    pub scroll_triggered: bool,
}

impl TriggerSpec {
    /// Element whose geometry decides when the trigger fires
    pub fn trigger_element(&self) -> Option<ElementId> {
        self.items.first().map(|item| item.element)
    }

    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.items.iter().map(|item| item.element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::style::props;
    use folio_core::PropValue;

    #[test]
    fn test_parse_trigger_lines() {
        assert_eq!(TriggerLine::parse("top 90%").unwrap(), TriggerLine::top(90.0));
        assert_eq!(
            TriggerLine::parse("bottom top").unwrap(),
            TriggerLine::new(Edge::Bottom, Offset::Fraction(0.0))
        );
        assert_eq!(
            TriggerLine::parse(" center 120px ").unwrap(),
            TriggerLine::new(Edge::Center, Offset::Pixels(120.0))
        );
        assert!(TriggerLine::parse("middle 50%").is_err());
        assert!(TriggerLine::parse("top").is_err());
    }

    #[test]
    fn test_start_scroll() {
        let bounds = Rect::new(0.0, 1500.0, 400.0, 300.0);
        assert_eq!(TriggerLine::top(85.0).start_scroll(bounds, 800.0), 820.0);
        assert_eq!(
            TriggerLine::parse("bottom top").unwrap().start_scroll(bounds, 800.0),
            1800.0
        );
    }

    #[test]
    fn test_display_parses_back() {
        let line = TriggerLine::top(85.0);
        assert_eq!(line.to_string().parse::<TriggerLine>().unwrap(), line);
    }

    #[test]
    fn test_reveal_template_targets_identity() {
        let template = TriggerTemplate::reveal(
            ".fact-card",
            props([(Property::Opacity, 0.0), (Property::Scale, 0.8), (Property::Rotation, -10.0)]),
        );
        assert_eq!(template.to[&Property::Opacity], PropValue::Number(1.0));
        assert_eq!(template.to[&Property::Scale], PropValue::Number(1.0));
        assert_eq!(template.to[&Property::Rotation], PropValue::Number(0.0));
        assert_eq!(template.policy, RepeatPolicy::Once);
    }

    #[test]
    fn test_template_from_json() {
        let template: TriggerTemplate = serde_json::from_str(
            r#"{
                "selector": ".award-card",
                "from": { "opacity": 0, "y": 40 },
                "to": { "opacity": 1, "y": 0 },
                "line": "top 80%",
                "policy": "reversible",
                "easing": "back.out(1.2)",
                "scope": "group",
                "stagger_ms": 120
            }"#,
        )
        .unwrap();

        assert_eq!(template.line, TriggerLine::top(80.0));
        assert_eq!(template.policy, RepeatPolicy::Reversible);
        assert_eq!(template.scope, Scope::Group);
        assert_eq!(template.easing, Easing::BackOut(1.2));
        assert_eq!(template.options().delay_for(2), 240.0);
        assert!(template.scroll_triggered);
    }
}
