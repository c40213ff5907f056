//! Serde boundary for timelines.
//!
//! ```json
//! {
//!   "start": "top top",
//!   "end": "+=4500",
//!   "segments": [
//!     { "target": "phone",
//!       "from": { "x": "-30vw", "y": "30vh", "scale": 0.7, "rotation": -15 },
//!       "to":   { "x": 0, "y": 0, "scale": 1, "rotation": 0 },
//!       "ease": "power1.inOut", "position": 0 },
//!     { "target": "phone", "to": { "scale": 1.5 }, "ease": "power2.inOut", "position": ">+0.2" }
//!   ]
//! }
//! ```

use crate::animation::ease::Ease;
use crate::animation::props::{PropertyValues, StyleChannel};
use crate::foundation::core::Rect;
use crate::foundation::error::{ScrollpinError, ScrollpinResult, ensure_finite};
use crate::lifecycle::engine::{BuildContext, TimelineFactory};
use crate::surface::stage::TargetId;
use crate::timeline::segment::{DEFAULT_DURATION, Placement, Segment, Timeline, TriggerStart};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Length in a definition: a plain number (pixels / unitless) or a string with a
/// `px`, `vw` or `vh` suffix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LengthDef {
    /// Pixels or unitless value.
    Number(f64),
    /// `"12px"`, `"-30vw"`, `"30vh"`, `"0.5"`.
    Text(String),
}

impl LengthDef {
    /// Resolve to a number against the viewport box.
    pub fn resolve(&self, viewport: Rect) -> ScrollpinResult<f64> {
        let v = match self {
            Self::Number(v) => *v,
            Self::Text(s) => {
                let s = s.trim();
                let bad = || ScrollpinError::validation(format!("bad length '{s}'"));
                let (num, scale) = if let Some(n) = s.strip_suffix("vw") {
                    (n, viewport.width() / 100.0)
                } else if let Some(n) = s.strip_suffix("vh") {
                    (n, viewport.height() / 100.0)
                } else if let Some(n) = s.strip_suffix("px") {
                    (n, 1.0)
                } else {
                    (s, 1.0)
                };
                let n: f64 = num.trim().parse().map_err(|_| bad())?;
                n * scale
            }
        };
        ensure_finite("length", v)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum PositionDef {
    Time(f64),
    Text(String),
}

/// One segment of a [`TimelineDef`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SegmentDef {
    /// Surface key.
    pub target: TargetId,
    /// Start values (`fromTo`); omit for a `to` segment.
    #[serde(default)]
    pub from: Option<BTreeMap<StyleChannel, LengthDef>>,
    /// End values.
    pub to: BTreeMap<StyleChannel, LengthDef>,
    /// Ease name or `{"cubic_bezier": [..]}`; defaults to `power1.out`.
    #[serde(default)]
    pub ease: Option<Ease>,
    /// Duration in timeline units; defaults to [`DEFAULT_DURATION`].
    #[serde(default)]
    pub duration: Option<f64>,
    /// Position: number, `"<+Δ"` or `">+Δ"`. Omitted means `0` for the first segment and
    /// `">"` afterwards.
    #[serde(default)]
    position: Option<PositionDef>,
}

impl SegmentDef {
    fn placement(&self, first: bool) -> ScrollpinResult<Placement> {
        match &self.position {
            None if first => Ok(Placement::Absolute(0.0)),
            None => Ok(Placement::AfterPreviousEnd(0.0)),
            Some(PositionDef::Time(t)) => Ok(Placement::Absolute(*t)),
            Some(PositionDef::Text(s)) => s.parse(),
        }
    }

    fn resolve(&self, first: bool, viewport: Rect) -> ScrollpinResult<Segment> {
        let values = |map: &BTreeMap<StyleChannel, LengthDef>| -> ScrollpinResult<PropertyValues> {
            map.iter()
                .map(|(c, v)| Ok((*c, v.resolve(viewport)?)))
                .collect()
        };
        Ok(Segment {
            target: self.target.clone(),
            from: self.from.as_ref().map(values).transpose()?,
            to: values(&self.to)?,
            ease: self.ease.unwrap_or_default(),
            duration: self.duration.unwrap_or(DEFAULT_DURATION),
            placement: self.placement(first)?,
        })
    }
}

fn default_true() -> bool {
    true
}

/// Declarative timeline, resolved against the viewport when built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimelineDef {
    /// `"<element anchor> <viewport anchor>"`; defaults to `"top top"`.
    #[serde(default)]
    pub start: Option<String>,
    /// Scroll distance: `"+=4500"` or a number of pixels.
    pub end: LengthDef,
    /// Pin the container during the span.
    #[serde(default = "default_true")]
    pub pin: bool,
    /// Element to pin instead of the trigger.
    #[serde(default)]
    pub pin_target: Option<TargetId>,
    /// Segments in order.
    pub segments: Vec<SegmentDef>,
}

impl TimelineDef {
    /// Parse a JSON document.
    pub fn from_json(s: &str) -> ScrollpinResult<Self> {
        serde_json::from_str(s).map_err(|e| ScrollpinError::serde(e.to_string()))
    }

    /// Resolve lengths against `viewport` and build the timeline.
    pub fn build(&self, viewport: Rect) -> ScrollpinResult<Timeline> {
        let distance = match &self.end {
            LengthDef::Text(s) => match s.trim().strip_prefix("+=") {
                Some(rest) => LengthDef::Text(rest.to_owned()).resolve(viewport)?,
                None => self.end.resolve(viewport)?,
            },
            LengthDef::Number(_) => self.end.resolve(viewport)?,
        };

        let mut builder = Timeline::builder(distance).pinned(self.pin);
        if let Some(start) = &self.start {
            builder = builder.start(start.parse::<TriggerStart>()?);
        }
        if let Some(target) = &self.pin_target {
            builder = builder.pin_target(target.clone());
        }
        for (i, seg) in self.segments.iter().enumerate() {
            builder = builder.push(seg.resolve(i == 0, viewport)?)?;
        }
        builder.build()
    }
}

impl TimelineFactory for TimelineDef {
    fn build(&self, ctx: &BuildContext<'_>) -> ScrollpinResult<Option<Timeline>> {
        TimelineDef::build(self, ctx.viewport).map(Some)
    }
}

/// Per-viewport-class timeline definitions.
///
/// Classes without an entry (or no active class) mount nothing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponsiveDef {
    /// Class name → timeline.
    pub variants: BTreeMap<String, TimelineDef>,
}

impl ResponsiveDef {
    /// Parse a JSON document.
    pub fn from_json(s: &str) -> ScrollpinResult<Self> {
        serde_json::from_str(s).map_err(|e| ScrollpinError::serde(e.to_string()))
    }
}

impl TimelineFactory for ResponsiveDef {
    fn build(&self, ctx: &BuildContext<'_>) -> ScrollpinResult<Option<Timeline>> {
        let Some(def) = ctx.variant.and_then(|v| self.variants.get(v)) else {
            return Ok(None);
        };
        def.build(ctx.viewport).map(Some)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/def.rs"]
mod tests;
