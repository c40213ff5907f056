use crate::foundation::error::{ScrollpinError, ScrollpinResult};
use std::str::FromStr;

/// Easing functions used to map normalized segment progress.
///
/// GSAP-style names are accepted when parsing: `powerN` maps to the polynomial of degree
/// `N + 1`, and a bare `powerN` means the `out` flavor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Ease {
    /// Linear interpolation (`none`, `linear`).
    Linear,
    /// Quadratic ease-in (`power1.in`).
    InQuad,
    /// Quadratic ease-out (`power1.out`).
    #[default]
    OutQuad,
    /// Quadratic ease-in/out (`power1.inOut`).
    InOutQuad,
    /// Cubic ease-in (`power2.in`).
    InCubic,
    /// Cubic ease-out (`power2.out`).
    OutCubic,
    /// Cubic ease-in/out (`power2.inOut`).
    InOutCubic,
    /// Quartic ease-in (`power3.in`).
    InQuart,
    /// Quartic ease-out (`power3.out`).
    OutQuart,
    /// Quartic ease-in/out (`power3.inOut`).
    InOutQuart,
    /// CSS `cubic-bezier(x1, y1, x2, y2)`.
    CubicBezier {
        /// First control point x, in `[0, 1]`.
        x1: f64,
        /// First control point y.
        y1: f64,
        /// Second control point x, in `[0, 1]`.
        x2: f64,
        /// Second control point y.
        y2: f64,
    },
}

impl Ease {
    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::InQuart => t.powi(4),
            Self::OutQuart => 1.0 - (1.0 - t).powi(4),
            Self::InOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(4) / 2.0)
                }
            }
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier_ease(t, x1, y1, x2, y2),
        }
    }

    /// Canonical name, as accepted by [`Ease::from_str`].
    pub fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::Linear => "none",
            Self::InQuad => "power1.in",
            Self::OutQuad => "power1.out",
            Self::InOutQuad => "power1.inOut",
            Self::InCubic => "power2.in",
            Self::OutCubic => "power2.out",
            Self::InOutCubic => "power2.inOut",
            Self::InQuart => "power3.in",
            Self::OutQuart => "power3.out",
            Self::InOutQuart => "power3.inOut",
            Self::CubicBezier { .. } => return None,
        })
    }

    fn validate(self) -> ScrollpinResult<Self> {
        if let Self::CubicBezier { x1, y1, x2, y2 } = self {
            if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
                return Err(ScrollpinError::invalid_value(
                    "cubic_bezier control points must be finite",
                ));
            }
            if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
                return Err(ScrollpinError::invalid_value(
                    "cubic_bezier x control points must be within [0, 1]",
                ));
            }
        }
        Ok(self)
    }
}

impl FromStr for Ease {
    type Err = ScrollpinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (family, flavor) = match s.split_once('.') {
            Some((f, v)) => (f, v),
            None => (s, "out"),
        };
        let degree = match family {
            "none" | "linear" => return Ok(Self::Linear),
            "ease" => return Ok(Self::css(0.25, 0.1, 0.25, 1.0)),
            "ease-in" => return Ok(Self::css(0.42, 0.0, 1.0, 1.0)),
            "ease-out" => return Ok(Self::css(0.0, 0.0, 0.58, 1.0)),
            "ease-in-out" => return Ok(Self::css(0.42, 0.0, 0.58, 1.0)),
            "power1" | "quad" => 2,
            "power2" | "cubic" => 3,
            "power3" | "quart" => 4,
            _ => return Err(ScrollpinError::validation(format!("unknown ease '{s}'"))),
        };
        let ease = match (degree, flavor) {
            (2, "in") => Self::InQuad,
            (2, "out") => Self::OutQuad,
            (2, "inOut") => Self::InOutQuad,
            (3, "in") => Self::InCubic,
            (3, "out") => Self::OutCubic,
            (3, "inOut") => Self::InOutCubic,
            (4, "in") => Self::InQuart,
            (4, "out") => Self::OutQuart,
            (4, "inOut") => Self::InOutQuart,
            _ => return Err(ScrollpinError::validation(format!("unknown ease '{s}'"))),
        };
        Ok(ease)
    }
}

impl Ease {
    fn css(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::CubicBezier { x1, y1, x2, y2 }
    }
}

impl serde::Serialize for Ease {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        match (self.name(), *self) {
            (Some(name), _) => serializer.serialize_str(name),
            (None, Self::CubicBezier { x1, y1, x2, y2 }) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("cubic_bezier", &[x1, y1, x2, y2])?;
                map.end()
            }
            (None, _) => Err(serde::ser::Error::custom("unnamed ease")),
        }
    }
}

impl<'de> serde::Deserialize<'de> for Ease {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Name(String),
            Bezier { cubic_bezier: [f64; 4] },
        }

        let ease = match Repr::deserialize(deserializer)? {
            Repr::Name(name) => name.parse().map_err(serde::de::Error::custom)?,
            Repr::Bezier {
                cubic_bezier: [x1, y1, x2, y2],
            } => Self::css(x1, y1, x2, y2),
        };
        ease.validate().map_err(serde::de::Error::custom)
    }
}

fn cubic_bezier_ease(x: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    // Given x in [0,1], solve u such that bx(u)=x, then return by(u).
    fn sample_curve(a1: f64, a2: f64, t: f64) -> f64 {
        let omt = 1.0 - t;
        3.0 * omt * omt * t * a1 + 3.0 * omt * t * t * a2 + t * t * t
    }
    fn sample_curve_derivative(a1: f64, a2: f64, t: f64) -> f64 {
        let omt = 1.0 - t;
        3.0 * omt * omt * a1 + 6.0 * omt * t * (a2 - a1) + 3.0 * t * t * (1.0 - a2)
    }

    // Newton-Raphson with bisection fallback, fixed iteration counts.
    let mut t = x;
    for _ in 0..8 {
        let x_t = sample_curve(x1, x2, t) - x;
        let d = sample_curve_derivative(x1, x2, t);
        if d.abs() < 1e-7 {
            break;
        }
        t = (t - x_t / d).clamp(0.0, 1.0);
    }

    let mut lo = 0.0;
    let mut hi = 1.0;
    for _ in 0..8 {
        let x_t = sample_curve(x1, x2, t);
        if x_t < x {
            lo = t;
        } else {
            hi = t;
        }
        t = 0.5 * (lo + hi);
    }

    sample_curve(y1, y2, t)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
