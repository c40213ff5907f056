//! Engine configuration.
//!
//! Hosts usually embed this in their own settings file; [`EngineConfig::from_json`] accepts
//! the standalone JSON form:
//!
//! ```json
//! {
//!   "breakpoints": [
//!     { "name": "desktop", "query": "(min-width: 768px)" },
//!     { "name": "mobile", "query": "(max-width: 767px)" }
//!   ],
//!   "reduced_motion": "animate",
//!   "smooth_scroll": { "lerp": 0.1 }
//! }
//! ```

use crate::breakpoint::media::MediaQuery;
use crate::foundation::error::{ScrollpinError, ScrollpinResult};
use crate::scroll::source::{NativeScroll, ScrollBackend, SmoothScroll};
use std::collections::BTreeSet;
use std::rc::Rc;

/// Named viewport class.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BreakpointDef {
    /// Class name handed to timeline factories.
    pub name: String,
    /// Width predicate.
    pub query: MediaQuery,
}

/// Policy for users who asked for reduced motion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReducedMotion {
    /// Scrub and pin normally.
    #[default]
    Animate,
    /// Never pin; show every section in its final state.
    JumpToEnd,
}

/// Smooth-scroll backend tuning.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmoothScrollConfig {
    /// Fraction of the remaining distance covered per tick, in `(0, 1]`.
    pub lerp: f64,
}

impl Default for SmoothScrollConfig {
    fn default() -> Self {
        Self { lerp: 0.1 }
    }
}

/// Top-level engine configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Ordered viewport classes; first match wins.
    pub breakpoints: Vec<BreakpointDef>,
    /// Reduced-motion policy.
    pub reduced_motion: ReducedMotion,
    /// Present when the host wraps the page in a smooth scroller.
    pub smooth_scroll: Option<SmoothScrollConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            breakpoints: vec![
                BreakpointDef {
                    name: "desktop".to_owned(),
                    query: MediaQuery::MinWidth(768.0),
                },
                BreakpointDef {
                    name: "mobile".to_owned(),
                    query: MediaQuery::MaxWidth(767.0),
                },
            ],
            reduced_motion: ReducedMotion::Animate,
            smooth_scroll: None,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(s: &str) -> ScrollpinResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| ScrollpinError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check name uniqueness and numeric ranges.
    pub fn validate(&self) -> ScrollpinResult<()> {
        let mut seen = BTreeSet::new();
        for bp in &self.breakpoints {
            if bp.name.trim().is_empty() {
                return Err(ScrollpinError::validation("breakpoint name must be non-empty"));
            }
            if !seen.insert(bp.name.as_str()) {
                return Err(ScrollpinError::validation(format!(
                    "duplicate breakpoint '{}'",
                    bp.name
                )));
            }
        }
        if let Some(smooth) = &self.smooth_scroll
            && !(smooth.lerp > 0.0 && smooth.lerp <= 1.0)
        {
            return Err(ScrollpinError::invalid_value(format!(
                "smooth_scroll.lerp must be in (0, 1], got {}",
                smooth.lerp
            )));
        }
        Ok(())
    }

    /// Backend for a page with `max_scroll` reachable pixels: [`SmoothScroll`] when
    /// `smooth_scroll` is set, [`NativeScroll`] otherwise.
    pub fn scroll_backend(&self, max_scroll: f64) -> Rc<dyn ScrollBackend> {
        match self.smooth_scroll {
            Some(cfg) => Rc::new(SmoothScroll::new(max_scroll, cfg)),
            None => Rc::new(NativeScroll::new(max_scroll)),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
