use crate::foundation::error::{ScrollpinError, ScrollpinResult};
use std::fmt;
use std::str::FromStr;

/// Width-only media query.
///
/// Bounds are inclusive, as in CSS: `(max-width: 767px)` matches a 767px viewport.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MediaQuery {
    /// Matches every width (`all`).
    Any,
    /// `width >= min`.
    MinWidth(f64),
    /// `width <= max`.
    MaxWidth(f64),
    /// `min <= width <= max`.
    Between {
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
}

impl MediaQuery {
    /// Evaluate against a viewport width.
    pub fn matches(self, width: f64) -> bool {
        match self {
            Self::Any => true,
            Self::MinWidth(min) => width >= min,
            Self::MaxWidth(max) => width <= max,
            Self::Between { min, max } => width >= min && width <= max,
        }
    }

    /// Parse `(min-width: 768px)`, `(max-width: 767px)`, their `and` conjunction, or `all`.
    pub fn parse(s: &str) -> ScrollpinResult<Self> {
        let s = s.trim();
        if s.is_empty() || s == "all" || s == "screen" {
            return Ok(Self::Any);
        }

        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;
        for clause in s.split(" and ") {
            let clause = clause.trim();
            if clause == "screen" || clause == "all" {
                continue;
            }
            let inner = clause
                .strip_prefix('(')
                .and_then(|c| c.strip_suffix(')'))
                .ok_or_else(|| bad(s, "clauses must be parenthesized"))?;
            let (feature, value) = inner
                .split_once(':')
                .ok_or_else(|| bad(s, "expected 'feature: value'"))?;
            let value = parse_px(value.trim()).ok_or_else(|| bad(s, "expected a px length"))?;
            match feature.trim() {
                "min-width" => min = Some(min.map_or(value, |m: f64| m.max(value))),
                "max-width" => max = Some(max.map_or(value, |m: f64| m.min(value))),
                other => return Err(bad(s, &format!("unsupported feature '{other}'"))),
            }
        }

        match (min, max) {
            (None, None) => Ok(Self::Any),
            (Some(min), None) => Ok(Self::MinWidth(min)),
            (None, Some(max)) => Ok(Self::MaxWidth(max)),
            (Some(min), Some(max)) if min <= max => Ok(Self::Between { min, max }),
            (Some(_), Some(_)) => Err(bad(s, "min-width exceeds max-width")),
        }
    }
}

fn parse_px(v: &str) -> Option<f64> {
    let n: f64 = v.strip_suffix("px").unwrap_or(v).trim().parse().ok()?;
    n.is_finite().then_some(n)
}

fn bad(query: &str, why: &str) -> ScrollpinError {
    ScrollpinError::validation(format!("media query '{query}': {why}"))
}

impl FromStr for MediaQuery {
    type Err = ScrollpinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MediaQuery {
    type Error = ScrollpinError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<MediaQuery> for String {
    fn from(q: MediaQuery) -> Self {
        q.to_string()
    }
}

impl fmt::Display for MediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Any => f.write_str("all"),
            Self::MinWidth(min) => write!(f, "(min-width: {min}px)"),
            Self::MaxWidth(max) => write!(f, "(max-width: {max}px)"),
            Self::Between { min, max } => {
                write!(f, "(min-width: {min}px) and (max-width: {max}px)")
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/breakpoint/media.rs"]
mod tests;
