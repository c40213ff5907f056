pub use kurbo::Rect;

/// Document scroll position in pixels.
///
/// Always finite and `>= 0`; backends reporting negative (overscroll) or non-finite readings
/// collapse to zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct ScrollOffset(f64);

impl ScrollOffset {
    /// The top of the document.
    pub const ZERO: Self = Self(0.0);

    /// Normalize a raw backend reading.
    pub fn new(raw: f64) -> Self {
        if raw.is_finite() && raw > 0.0 {
            Self(raw)
        } else {
            Self::ZERO
        }
    }

    /// Offset in pixels.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl From<f64> for ScrollOffset {
    fn from(raw: f64) -> Self {
        Self::new(raw)
    }
}

/// Normalized timeline progress in `[0, 1]`.
///
/// Derived per scroll event and never stored by the engine beyond the last applied snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Progress(f64);

impl Progress {
    /// Start of the timeline.
    pub const ZERO: Self = Self(0.0);
    /// End of the timeline.
    pub const ONE: Self = Self(1.0);

    /// Clamp `v` into `[0, 1]`. NaN maps to zero.
    pub fn new(v: f64) -> Self {
        if v.is_nan() {
            return Self::ZERO;
        }
        Self(v.clamp(0.0, 1.0))
    }

    /// `clamp((offset - start) / distance, 0, 1)`.
    ///
    /// A zero `distance` degenerates into a step at `start`.
    pub fn from_scroll(offset: ScrollOffset, start: f64, distance: f64) -> Self {
        let s = offset.get();
        if distance <= 0.0 {
            return if s >= start { Self::ONE } else { Self::ZERO };
        }
        Self::new((s - start) / distance)
    }

    /// Progress as a plain ratio.
    pub fn get(self) -> f64 {
        self.0
    }
}

/// Viewport-relative bounding box `{top: 0, left: 0, width, height}`.
pub fn viewport_rect(width: f64, height: f64) -> Rect {
    Rect::new(0.0, 0.0, width.max(0.0), height.max(0.0))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
