//! Animatable visual properties
//!
//! Every reveal, hover and parallax effect manipulates the same small
//! vocabulary: opacity, x/y translation, scale, rotation and (for progress
//! bars) width. Translations are device-independent pixels, rotation is in
//! degrees, scale and opacity are unitless, width is a percentage.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::FolioError;

/// A visual property that transitions can drive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Property {
    Opacity,
    X,
    Y,
    Scale,
    Rotation,
    Width,
}

impl Property {
    pub const ALL: [Property; 6] = [
        Property::Opacity,
        Property::X,
        Property::Y,
        Property::Scale,
        Property::Rotation,
        Property::Width,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Property::Opacity => "opacity",
            Property::X => "x",
            Property::Y => "y",
            Property::Scale => "scale",
            Property::Rotation => "rotation",
            Property::Width => "width",
        }
    }

    /// Natural resting value of the property
    pub fn identity(&self) -> PropValue {
        match self {
            Property::Opacity | Property::Scale => PropValue::Number(1.0),
            Property::X | Property::Y | Property::Rotation => PropValue::Number(0.0),
            Property::Width => PropValue::Percent(100.0),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Property {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "opacity" => Ok(Property::Opacity),
            "x" => Ok(Property::X),
            "y" => Ok(Property::Y),
            "scale" => Ok(Property::Scale),
            "rotation" | "rotate" => Ok(Property::Rotation),
            "width" => Ok(Property::Width),
            other => Err(FolioError::UnknownProperty(other.to_string())),
        }
    }
}

/// Value of an animatable property
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawValue", into = "RawValue")]
pub enum PropValue {
    /// Pixels, degrees or a unitless factor, depending on the property
    Number(f32),
    /// Percentage, e.g. `72%`
    Percent(f32),
}

impl PropValue {
    /// The numeric magnitude regardless of unit
    pub fn as_f32(&self) -> f32 {
        match self {
            PropValue::Number(v) | PropValue::Percent(v) => *v,
        }
    }

    /// Parse a declared value such as `72%`, `0.5` or `60px`
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Some(pct) = input.strip_suffix('%') {
            return pct.trim().parse::<f32>().ok().map(PropValue::Percent);
        }
        let number = input.strip_suffix("px").unwrap_or(input);
        number.trim().parse::<f32>().ok().map(PropValue::Number)
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Number(v) => write!(f, "{}", v),
            PropValue::Percent(v) => write!(f, "{}%", v),
        }
    }
}

impl From<f32> for PropValue {
    fn from(v: f32) -> Self {
        PropValue::Number(v)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f32),
    Text(String),
}

impl TryFrom<RawValue> for PropValue {
    type Error = String;

    fn try_from(raw: RawValue) -> Result<Self, Self::Error> {
        match raw {
            RawValue::Number(v) => Ok(PropValue::Number(v)),
            RawValue::Text(s) => PropValue::parse(&s).ok_or_else(|| format!("invalid value `{}`", s)),
        }
    }
}

impl From<PropValue> for RawValue {
    fn from(value: PropValue) -> Self {
        match value {
            PropValue::Number(v) => RawValue::Number(v),
            PropValue::Percent(_) => RawValue::Text(value.to_string()),
        }
    }
}

/// Ordered property → value mapping (a from-state or a to-state)
pub type PropertyMap = IndexMap<Property, PropValue>;

/// Build a numeric property map from pairs
pub fn props<I>(pairs: I) -> PropertyMap
where
    I: IntoIterator<Item = (Property, f32)>,
{
    pairs
        .into_iter()
        .map(|(p, v)| (p, PropValue::Number(v)))
        .collect()
}

/// Animated transform/opacity state of an element
///
/// Width is not stored here: it lives in the element's inline style so a
/// declared `width: 72%` can be read back before it is animated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Visual {
    pub opacity: f32,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub rotation: f32,
}

impl Default for Visual {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

impl Visual {
    pub fn get(&self, property: Property) -> Option<f32> {
        match property {
            Property::Opacity => Some(self.opacity),
            Property::X => Some(self.x),
            Property::Y => Some(self.y),
            Property::Scale => Some(self.scale),
            Property::Rotation => Some(self.rotation),
            Property::Width => None,
        }
    }

    pub fn set(&mut self, property: Property, value: f32) {
        match property {
            Property::Opacity => self.opacity = value,
            Property::X => self.x = value,
            Property::Y => self.y = value,
            Property::Scale => self.scale = value,
            Property::Rotation => self.rotation = value,
            Property::Width => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_values() {
        assert_eq!(PropValue::parse("72%"), Some(PropValue::Percent(72.0)));
        assert_eq!(PropValue::parse(" 60px "), Some(PropValue::Number(60.0)));
        assert_eq!(PropValue::parse("0.5"), Some(PropValue::Number(0.5)));
        assert_eq!(PropValue::parse("wide"), None);
    }

    #[test]
    fn test_property_names() {
        assert_eq!("rotate".parse::<Property>().unwrap(), Property::Rotation);
        assert!("skew".parse::<Property>().is_err());
        assert_eq!(Property::Scale.identity(), PropValue::Number(1.0));
    }

    #[test]
    fn test_property_map_from_json() {
        let map: PropertyMap = serde_json::from_str(r#"{"opacity": 0, "width": "0%"}"#).unwrap();
        assert_eq!(map[&Property::Opacity], PropValue::Number(0.0));
        assert_eq!(map[&Property::Width], PropValue::Percent(0.0));
    }
}
