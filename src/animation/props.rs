use crate::foundation::error::{ScrollpinError, ScrollpinResult, ensure_finite};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Linear interpolation between two values of the same kind.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` by `t` (not clamped).
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

/// Numeric style channel of a renderable surface.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum StyleChannel {
    /// Horizontal offset in pixels.
    #[serde(alias = "x")]
    TranslateX,
    /// Vertical offset in pixels.
    #[serde(alias = "y")]
    TranslateY,
    /// Uniform scale factor.
    Scale,
    /// Rotation in degrees.
    Rotation,
    /// Opacity in `[0, 1]`.
    Opacity,
}

impl StyleChannel {
    /// Every channel, in canonical order.
    pub const ALL: [Self; 5] = [
        Self::TranslateX,
        Self::TranslateY,
        Self::Scale,
        Self::Rotation,
        Self::Opacity,
    ];

    /// Value a surface presents when the channel has never been written.
    pub fn identity(self) -> f64 {
        match self {
            Self::Scale | Self::Opacity => 1.0,
            Self::TranslateX | Self::TranslateY | Self::Rotation => 0.0,
        }
    }

    /// Style key of this channel.
    pub fn name(self) -> &'static str {
        match self {
            Self::TranslateX => "translateX",
            Self::TranslateY => "translateY",
            Self::Scale => "scale",
            Self::Rotation => "rotation",
            Self::Opacity => "opacity",
        }
    }
}

impl fmt::Display for StyleChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StyleChannel {
    type Err = ScrollpinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "translateX" | "x" => Ok(Self::TranslateX),
            "translateY" | "y" => Ok(Self::TranslateY),
            "scale" => Ok(Self::Scale),
            "rotation" | "rotate" => Ok(Self::Rotation),
            "opacity" => Ok(Self::Opacity),
            _ => Err(ScrollpinError::validation(format!(
                "unknown style channel '{s}'"
            ))),
        }
    }
}

/// Channel → value map for one end of a segment.
///
/// Values are not validated on insertion; [`PropertyValues::validate`] runs when the map is
/// handed to a timeline builder.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PropertyValues(BTreeMap<StyleChannel, f64>);

impl PropertyValues {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, channel: StyleChannel, value: f64) -> Self {
        self.0.insert(channel, value);
        self
    }

    /// Insert or replace a channel value.
    pub fn set(&mut self, channel: StyleChannel, value: f64) {
        self.0.insert(channel, value);
    }

    /// Value of `channel`, if present.
    pub fn get(&self, channel: StyleChannel) -> Option<f64> {
        self.0.get(&channel).copied()
    }

    /// Iterate channels in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (StyleChannel, f64)> + '_ {
        self.0.iter().map(|(c, v)| (*c, *v))
    }

    /// Channels present in this map.
    pub fn channels(&self) -> impl Iterator<Item = StyleChannel> + '_ {
        self.0.keys().copied()
    }

    /// Number of channels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` when no channel is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reject non-finite values.
    pub fn validate(&self) -> ScrollpinResult<()> {
        for (channel, v) in self.iter() {
            ensure_finite(channel.name(), v)?;
        }
        Ok(())
    }
}

impl FromIterator<(StyleChannel, f64)> for PropertyValues {
    fn from_iter<I: IntoIterator<Item = (StyleChannel, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/props.rs"]
mod tests;
