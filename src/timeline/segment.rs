use crate::animation::ease::Ease;
use crate::animation::props::PropertyValues;
use crate::foundation::core::Rect;
use crate::foundation::error::{ScrollpinError, ScrollpinResult, ensure_finite};
use crate::surface::stage::TargetId;
use std::fmt;
use std::str::FromStr;

/// Segment duration used when none is given, in timeline units.
pub const DEFAULT_DURATION: f64 = 0.5;

/// Where a segment starts on the timeline.
///
/// Relative placements resolve against the immediately preceding segment only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    /// Fixed start time (`0`, `1.5`).
    Absolute(f64),
    /// Previous segment's start plus delta (`<`, `<+0.5`).
    AfterPreviousStart(f64),
    /// Previous segment's end plus delta (`>`, `>+0.2`, `>-0.1`).
    AfterPreviousEnd(f64),
}

impl Placement {
    /// Return `true` when the placement needs a predecessor.
    pub fn is_relative(self) -> bool {
        !matches!(self, Self::Absolute(_))
    }

    fn offset(self) -> f64 {
        match self {
            Self::Absolute(v) | Self::AfterPreviousStart(v) | Self::AfterPreviousEnd(v) => v,
        }
    }
}

impl FromStr for Placement {
    type Err = ScrollpinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let delta = |rest: &str| -> ScrollpinResult<f64> {
            let rest = rest.trim();
            if rest.is_empty() {
                return Ok(0.0);
            }
            let v: f64 = rest
                .strip_prefix('+')
                .unwrap_or(rest)
                .parse()
                .map_err(|_| ScrollpinError::validation(format!("bad placement '{s}'")))?;
            ensure_finite("placement offset", v)
        };

        if let Some(rest) = s.strip_prefix('<') {
            return Ok(Self::AfterPreviousStart(delta(rest)?));
        }
        if let Some(rest) = s.strip_prefix('>') {
            return Ok(Self::AfterPreviousEnd(delta(rest)?));
        }
        let v: f64 = s
            .parse()
            .map_err(|_| ScrollpinError::validation(format!("bad placement '{s}'")))?;
        Ok(Self::Absolute(ensure_finite("placement", v)?))
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Absolute(v) => write!(f, "{v}"),
            Self::AfterPreviousStart(d) => write!(f, "<{d:+}"),
            Self::AfterPreviousEnd(d) => write!(f, ">{d:+}"),
        }
    }
}

/// One property animation: `target` goes `from → to` over `duration`.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    /// Surface to animate.
    pub target: TargetId,
    /// Start values; channels left out start from the value the channel holds at that point
    /// of the timeline.
    pub from: Option<PropertyValues>,
    /// End values.
    pub to: PropertyValues,
    /// Easing of local progress.
    pub ease: Ease,
    /// Length in timeline units.
    pub duration: f64,
    /// Start time.
    pub placement: Placement,
}

impl Segment {
    /// `to` segment with the default ease and duration, placed after the previous segment.
    pub fn to(target: impl Into<TargetId>, to: PropertyValues) -> Self {
        Self {
            target: target.into(),
            from: None,
            to,
            ease: Ease::default(),
            duration: DEFAULT_DURATION,
            placement: Placement::AfterPreviousEnd(0.0),
        }
    }

    /// `fromTo` segment.
    pub fn from_to(target: impl Into<TargetId>, from: PropertyValues, to: PropertyValues) -> Self {
        Self {
            from: Some(from),
            ..Self::to(target, to)
        }
    }

    /// Set the ease.
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Set the duration.
    pub fn duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Set the placement.
    pub fn at(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    fn validate(&self) -> ScrollpinResult<()> {
        ensure_finite("segment duration", self.duration)?;
        if self.duration < 0.0 {
            return Err(ScrollpinError::invalid_value(format!(
                "segment duration must be >= 0, got {}",
                self.duration
            )));
        }
        ensure_finite("placement offset", self.placement.offset())?;
        if let Placement::Absolute(t) = self.placement
            && t < 0.0
        {
            return Err(ScrollpinError::invalid_value(format!(
                "absolute placement must be >= 0, got {t}"
            )));
        }
        if let Some(from) = &self.from {
            from.validate()?;
        }
        self.to.validate()
    }
}

/// Segment with its start resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedSegment {
    /// Segment as declared.
    pub segment: Segment,
    /// Resolved start, finite and `>= 0`.
    pub start: f64,
}

impl ResolvedSegment {
    /// `start + duration`.
    pub fn end(&self) -> f64 {
        self.start + self.segment.duration
    }
}

/// Reference point on an element or on the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    /// Top edge.
    Top,
    /// Vertical center.
    Center,
    /// Bottom edge.
    Bottom,
    /// Percentage of the height from the top.
    Percent(f64),
    /// Pixels from the top.
    Pixels(f64),
}

impl Anchor {
    /// Distance from the top edge for an extent of `height`.
    pub fn resolve(self, height: f64) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Center => height * 0.5,
            Self::Bottom => height,
            Self::Percent(p) => height * p / 100.0,
            Self::Pixels(px) => px,
        }
    }
}

impl FromStr for Anchor {
    type Err = ScrollpinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ScrollpinError::validation(format!("bad anchor '{s}'"));
        let anchor = match s.trim() {
            "top" => Self::Top,
            "center" => Self::Center,
            "bottom" => Self::Bottom,
            t => {
                if let Some(p) = t.strip_suffix('%') {
                    Self::Percent(p.trim().parse().map_err(|_| bad())?)
                } else {
                    let px = t.strip_suffix("px").unwrap_or(t);
                    Self::Pixels(px.trim().parse().map_err(|_| bad())?)
                }
            }
        };
        match anchor {
            Self::Percent(v) | Self::Pixels(v) if !v.is_finite() => Err(bad()),
            a => Ok(a),
        }
    }
}

/// When the pin span begins: `trigger` anchor of the trigger element meets `viewport` anchor.
///
/// `"top top"` starts when the trigger's top edge reaches the viewport's top edge;
/// `"top 85%"` when it reaches 85% down the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerStart {
    /// Point on the trigger element.
    pub trigger: Anchor,
    /// Point on the viewport.
    pub viewport: Anchor,
}

impl TriggerStart {
    /// `"top top"`.
    pub const TOP_TOP: Self = Self {
        trigger: Anchor::Top,
        viewport: Anchor::Top,
    };

    /// Scroll offset at which the span starts, never negative.
    pub fn pin_start(self, trigger_box: Rect, viewport: Rect) -> f64 {
        let at = trigger_box.y0 + self.trigger.resolve(trigger_box.height())
            - self.viewport.resolve(viewport.height());
        at.max(0.0)
    }
}

impl Default for TriggerStart {
    fn default() -> Self {
        Self::TOP_TOP
    }
}

impl FromStr for TriggerStart {
    type Err = ScrollpinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(trigger), Some(viewport), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ScrollpinError::validation(format!(
                "trigger start '{s}' must be '<element anchor> <viewport anchor>'"
            )));
        };
        Ok(Self {
            trigger: trigger.parse()?,
            viewport: viewport.parse()?,
        })
    }
}

/// Immutable, fully resolved timeline for one viewport class.
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    segments: Vec<ResolvedSegment>,
    pin_target: Option<TargetId>,
    scroll_distance: f64,
    pinned: bool,
    start: TriggerStart,
    duration: f64,
}

impl Timeline {
    /// Start building a timeline spanning `scroll_distance` pixels.
    pub fn builder(scroll_distance: f64) -> TimelineBuilder {
        TimelineBuilder::new(scroll_distance)
    }

    /// Segments in declaration order.
    pub fn segments(&self) -> &[ResolvedSegment] {
        &self.segments
    }

    /// Element to pin; `None` pins the trigger.
    pub fn pin_target(&self) -> Option<&TargetId> {
        self.pin_target.as_ref()
    }

    /// Scroll pixels the sequence spans.
    pub fn scroll_distance(&self) -> f64 {
        self.scroll_distance
    }

    /// Whether the container is pinned during the span.
    pub fn pinned(&self) -> bool {
        self.pinned
    }

    /// Start of the span relative to the trigger.
    pub fn start(&self) -> TriggerStart {
        self.start
    }

    /// Latest segment end, in timeline units.
    pub fn duration(&self) -> f64 {
        self.duration
    }
}

/// Chaining builder for [`Timeline`]. Segments are validated as they are added.
#[derive(Clone, Debug)]
pub struct TimelineBuilder {
    segments: Vec<Segment>,
    pin_target: Option<TargetId>,
    scroll_distance: f64,
    pinned: bool,
    start: TriggerStart,
}

impl TimelineBuilder {
    /// Builder spanning `scroll_distance` pixels, pinned, starting `"top top"`.
    pub fn new(scroll_distance: f64) -> Self {
        Self {
            segments: Vec::new(),
            pin_target: None,
            scroll_distance,
            pinned: true,
            start: TriggerStart::TOP_TOP,
        }
    }

    /// Pin a different element than the trigger.
    pub fn pin_target(mut self, target: impl Into<TargetId>) -> Self {
        self.pin_target = Some(target.into());
        self
    }

    /// Enable or disable pinning (scrub-only when `false`).
    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }

    /// Set where the span starts.
    pub fn start(mut self, start: TriggerStart) -> Self {
        self.start = start;
        self
    }

    /// Append a segment with the default duration.
    pub fn add_segment(
        self,
        target: impl Into<TargetId>,
        from: Option<PropertyValues>,
        to: PropertyValues,
        ease: Ease,
        placement: Placement,
    ) -> ScrollpinResult<Self> {
        self.push(Segment {
            target: target.into(),
            from,
            to,
            ease,
            duration: DEFAULT_DURATION,
            placement,
        })
    }

    /// Append a fully specified segment.
    pub fn push(mut self, segment: Segment) -> ScrollpinResult<Self> {
        if segment.placement.is_relative() && self.segments.is_empty() {
            return Err(ScrollpinError::invalid_placement(format!(
                "segment for '{}' is placed relative to a previous segment, but it is the first",
                segment.target
            )));
        }
        segment.validate()?;
        self.segments.push(segment);
        Ok(self)
    }

    /// Resolve placements and freeze the timeline.
    pub fn build(self) -> ScrollpinResult<Timeline> {
        ensure_finite("scroll distance", self.scroll_distance)?;
        if self.scroll_distance < 0.0 {
            return Err(ScrollpinError::invalid_value(format!(
                "scroll distance must be >= 0, got {}",
                self.scroll_distance
            )));
        }

        let mut resolved: Vec<ResolvedSegment> = Vec::with_capacity(self.segments.len());
        for segment in self.segments {
            let start = match (segment.placement, resolved.last()) {
                (Placement::Absolute(t), _) => t,
                (Placement::AfterPreviousStart(d), Some(prev)) => prev.start + d,
                (Placement::AfterPreviousEnd(d), Some(prev)) => prev.end() + d,
                (_, None) => {
                    return Err(ScrollpinError::invalid_placement(
                        "relative placement on the first segment",
                    ));
                }
            };
            let start = ensure_finite("resolved segment start", start)?.max(0.0);
            ensure_finite("resolved segment end", start + segment.duration)?;
            resolved.push(ResolvedSegment { segment, start });
        }

        let duration = resolved.iter().map(ResolvedSegment::end).fold(0.0, f64::max);
        Ok(Timeline {
            segments: resolved,
            pin_target: self.pin_target,
            scroll_distance: self.scroll_distance,
            pinned: self.pinned,
            start: self.start,
            duration,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/segment.rs"]
mod tests;
