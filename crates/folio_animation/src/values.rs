//! Animatable value types
//!
//! Linear interpolation for the values a tween can drive.

use folio_core::PropValue;

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t (0.0 to 1.0)
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if two values are approximately equal (for settling detection)
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

// ============================================================================
// f32 Implementation
// ============================================================================

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

// ============================================================================
// PropValue Implementation
// ============================================================================

/// The unit of the result follows the target; a number tweened towards a
/// percentage becomes a percentage.
impl Interpolate for PropValue {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        let value = self.as_f32().lerp(&other.as_f32(), t);
        match other {
            PropValue::Number(_) => PropValue::Number(value),
            PropValue::Percent(_) => PropValue::Percent(value),
        }
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
            && self.as_f32().approx_eq(&other.as_f32(), epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f32_lerp() {
        assert_eq!(0.0f32.lerp(&60.0, 0.5), 30.0);
        assert_eq!(60.0f32.lerp(&0.0, 1.0), 0.0);
    }

    #[test]
    fn test_percent_lerp_keeps_unit() {
        let from = PropValue::Percent(0.0);
        let to = PropValue::Percent(72.0);
        assert_eq!(from.lerp(&to, 0.5), PropValue::Percent(36.0));
        assert!(from.lerp(&to, 1.0).approx_eq(&to, 1e-4));
        assert!(!PropValue::Number(72.0).approx_eq(&to, 1e-4));
    }
}
