//! Easing presets
//!
//! Names follow the conventions the site's markup and configuration use:
//! `power1` is quadratic, `power2` cubic, `power3` quartic.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An easing curve mapping linear progress in `[0, 1]` to eased progress
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    /// `none` / `linear`
    Linear,
    Power1Out,
    Power2In,
    #[default]
    Power2Out,
    Power2InOut,
    Power3Out,
    /// `back.out(overshoot)`
    BackOut(f32),
    /// `elastic.out(amplitude, period)`
    ElasticOut { amplitude: f32, period: f32 },
}

/// Unknown easing name
#[derive(Error, Debug, Clone, PartialEq)]
#[error("unknown easing `{0}`")]
pub struct EasingParseError(pub String);

impl Easing {
    /// Apply the curve to `t` (clamped to `[0, 1]`)
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match *self {
            Easing::Linear => t,
            Easing::Power1Out => 1.0 - (1.0 - t).powi(2),
            Easing::Power2In => t.powi(3),
            Easing::Power2Out => 1.0 - (1.0 - t).powi(3),
            Easing::Power2InOut => {
                if t < 0.5 {
                    4.0 * t.powi(3)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::Power3Out => 1.0 - (1.0 - t).powi(4),
            Easing::BackOut(overshoot) => {
                let u = t - 1.0;
                1.0 + (overshoot + 1.0) * u.powi(3) + overshoot * u.powi(2)
            }
            Easing::ElasticOut { amplitude, period } => {
                let amplitude = amplitude.max(1.0);
                let p = period / (2.0 * PI);
                let shift = p * (1.0 / amplitude).asin();
                amplitude * 2f32.powf(-10.0 * t) * ((t - shift) / p).sin() + 1.0
            }
        }
    }
}

fn parse_args(args: &str) -> Vec<f32> {
    args.split(',')
        .filter_map(|a| a.trim().parse::<f32>().ok())
        .collect()
}

impl FromStr for Easing {
    type Err = EasingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, args) = match s.find('(') {
            Some(open) if s.ends_with(')') => (&s[..open], parse_args(&s[open + 1..s.len() - 1])),
            _ => (s, Vec::new()),
        };

        match name {
            "none" | "linear" => Ok(Easing::Linear),
            "power1.out" => Ok(Easing::Power1Out),
            "power2.in" => Ok(Easing::Power2In),
            "power2.out" => Ok(Easing::Power2Out),
            "power2.inOut" => Ok(Easing::Power2InOut),
            "power3.out" => Ok(Easing::Power3Out),
            "back.out" => Ok(Easing::BackOut(args.first().copied().unwrap_or(1.7))),
            "elastic.out" => Ok(Easing::ElasticOut {
                amplitude: args.first().copied().unwrap_or(1.0),
                period: args.get(1).copied().unwrap_or(0.3),
            }),
            _ => Err(EasingParseError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Easing {
    type Error = EasingParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.to_string()
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => write!(f, "none"),
            Easing::Power1Out => write!(f, "power1.out"),
            Easing::Power2In => write!(f, "power2.in"),
            Easing::Power2Out => write!(f, "power2.out"),
            Easing::Power2InOut => write!(f, "power2.inOut"),
            Easing::Power3Out => write!(f, "power3.out"),
            Easing::BackOut(s) => write!(f, "back.out({})", s),
            Easing::ElasticOut { amplitude, period } => {
                write!(f, "elastic.out({}, {})", amplitude, period)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 8] = [
        Easing::Linear,
        Easing::Power1Out,
        Easing::Power2In,
        Easing::Power2Out,
        Easing::Power2InOut,
        Easing::Power3Out,
        Easing::BackOut(1.7),
        Easing::ElasticOut {
            amplitude: 1.0,
            period: 0.5,
        },
    ];

    #[test]
    fn test_endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing}");
            assert_eq!(easing.apply(-3.0), 0.0, "{easing}");
            assert_eq!(easing.apply(7.0), 1.0, "{easing}");
        }
    }

    #[test]
    fn test_back_out_overshoots() {
        let peak = (1..100)
            .map(|i| Easing::BackOut(1.7).apply(i as f32 / 100.0))
            .fold(0.0f32, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_out_curves_lead_linear() {
        assert!(Easing::Power3Out.apply(0.5) > 0.5);
        assert!(Easing::Power2In.apply(0.5) < 0.5);
        assert!((Easing::Power2InOut.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("power3.out".parse::<Easing>().unwrap(), Easing::Power3Out);
        assert_eq!("none".parse::<Easing>().unwrap(), Easing::Linear);
        assert_eq!(
            "back.out(1.2)".parse::<Easing>().unwrap(),
            Easing::BackOut(1.2)
        );
        assert_eq!(
            "elastic.out(1, 0.5)".parse::<Easing>().unwrap(),
            Easing::ElasticOut {
                amplitude: 1.0,
                period: 0.5
            }
        );
        assert!("bounce.out".parse::<Easing>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for easing in ALL {
            assert_eq!(easing.to_string().parse::<Easing>().unwrap(), easing);
        }
    }

    #[test]
    fn test_serde_uses_preset_names() {
        let json = serde_json::to_string(&Easing::BackOut(1.2)).unwrap();
        assert_eq!(json, "\"back.out(1.2)\"");

        let easing: Easing = serde_json::from_str("\"power2.inOut\"").unwrap();
        assert_eq!(easing, Easing::Power2InOut);
        assert!(serde_json::from_str::<Easing>("\"bounce.out\"").is_err());
    }
}
