//! CSS selector subset
//!
//! Supports what the site scripts actually query:
//!
//! - Type selectors: `a`, `button`
//! - ID selectors: `#navbar`
//! - Class selectors: `.service-card`, `.btn.primary`
//! - Attribute selectors: `[data-filter]`, `[name="email"]`, `[href^="#"]`
//! - Descendant combinator: `.hero .social-links a`
//! - Selector lists: `.hero-title, .hero-subtitle`
//!
//! Matching is right-to-left: the last compound must match the element,
//! earlier compounds must match ancestors in order.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0, multispace1, none_of},
    combinator::{all_consuming, map, opt, recognize},
    multi::{many0, many1, separated_list1},
    sequence::{delimited, pair, preceded},
    IResult,
};

use crate::dom::{Document, ElementId};
use crate::error::{FolioError, Result};

/// Attribute matching operator
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttrOp {
    /// `[name]`
    Exists,
    /// `[name="value"]`
    Equals(String),
    /// `[name^="value"]`
    Prefix(String),
}

/// A single attribute condition
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttrMatcher {
    pub name: String,
    pub op: AttrOp,
}

/// A compound selector such as `a.btn[href^="#"]`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<AttrMatcher>,
}

/// Compounds joined by descendant combinators
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComplexSelector {
    pub compounds: Vec<Compound>,
}

/// A parsed, comma-separated selector list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<ComplexSelector>,
}

enum Part {
    Id(String),
    Class(String),
    Attr(AttrMatcher),
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)
}

fn quoted(input: &str) -> IResult<&str, String> {
    alt((
        map(
            delimited(char('"'), recognize(many0(none_of("\""))), char('"')),
            str::to_string,
        ),
        map(
            delimited(char('\''), recognize(many0(none_of("'"))), char('\'')),
            str::to_string,
        ),
        map(identifier, str::to_string),
    ))(input)
}

fn attribute(input: &str) -> IResult<&str, AttrMatcher> {
    let (input, _) = char('[')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, name) = identifier(input)?;
    let (input, _) = multispace0(input)?;
    let (input, op) = opt(pair(alt((tag("^="), tag("="))), preceded(multispace0, quoted)))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char(']')(input)?;

    let op = match op {
        None => AttrOp::Exists,
        Some(("^=", value)) => AttrOp::Prefix(value),
        Some((_, value)) => AttrOp::Equals(value),
    };

    Ok((
        input,
        AttrMatcher {
            name: name.to_string(),
            op,
        },
    ))
}

fn part(input: &str) -> IResult<&str, Part> {
    alt((
        map(preceded(char('#'), identifier), |id| Part::Id(id.to_string())),
        map(preceded(char('.'), identifier), |c| Part::Class(c.to_string())),
        map(attribute, Part::Attr),
    ))(input)
}

fn compound(input: &str) -> IResult<&str, Compound> {
    let (input, tag_name) = opt(alt((identifier, tag("*"))))(input)?;
    let (input, parts) = if tag_name.is_some() {
        many0(part)(input)?
    } else {
        many1(part)(input)?
    };

    let mut compound = Compound {
        tag: tag_name
            .filter(|t| *t != "*")
            .map(|t| t.to_ascii_lowercase()),
        ..Default::default()
    };
    for p in parts {
        match p {
            Part::Id(id) => compound.id = Some(id),
            Part::Class(c) => compound.classes.push(c),
            Part::Attr(a) => compound.attrs.push(a),
        }
    }
    Ok((input, compound))
}

fn complex(input: &str) -> IResult<&str, ComplexSelector> {
    map(separated_list1(multispace1, compound), |compounds| {
        ComplexSelector { compounds }
    })(input)
}

fn selector_list(input: &str) -> IResult<&str, Vec<ComplexSelector>> {
    separated_list1(
        delimited(multispace0, char(','), multispace0),
        complex,
    )(input)
}

impl Selector {
    /// Parse a selector list
    pub fn parse(source: &str) -> Result<Self> {
        let trimmed = source.trim();
        let parsed = all_consuming(selector_list)(trimmed);
        match parsed {
            Ok((_, alternatives)) => Ok(Self {
                source: trimmed.to_string(),
                alternatives,
            }),
            Err(err) => Err(FolioError::Selector {
                selector: source.to_string(),
                message: err.to_string(),
            }),
        }
    }

    /// The selector text as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn alternatives(&self) -> &[ComplexSelector] {
        &self.alternatives
    }

    /// Whether `element` matches any alternative of this selector
    pub fn matches(&self, doc: &Document, element: ElementId) -> bool {
        self.alternatives
            .iter()
            .any(|complex| complex.matches(doc, element))
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

impl ComplexSelector {
    fn matches(&self, doc: &Document, element: ElementId) -> bool {
        let Some((last, rest)) = self.compounds.split_last() else {
            return false;
        };
        if !last.matches(doc, element) {
            return false;
        }

        // Greedy ancestor walk is exact for descendant-only combinators
        let mut remaining = rest.iter().rev().peekable();
        let mut current = doc.parent(element);
        while let Some(wanted) = remaining.peek() {
            let Some(ancestor) = current else {
                return false;
            };
            if wanted.matches(doc, ancestor) {
                remaining.next();
            }
            current = doc.parent(ancestor);
        }
        true
    }
}

impl Compound {
    fn matches(&self, doc: &Document, element: ElementId) -> bool {
        let Some(el) = doc.get(element) else {
            return false;
        };
        if let Some(ref tag) = self.tag {
            if !el.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(ref id) = self.id {
            if el.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| el.has_class(c)) {
            return false;
        }
        self.attrs.iter().all(|a| {
            let Some(value) = el.attr(&a.name) else {
                return false;
            };
            match &a.op {
                AttrOp::Exists => true,
                AttrOp::Equals(expected) => value == expected,
                AttrOp::Prefix(prefix) => value.starts_with(prefix.as_str()),
            }
        })
    }
}
