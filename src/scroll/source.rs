use crate::config::SmoothScrollConfig;
use std::cell::Cell;

/// How a pinned container must be held in place for a given scroller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PinType {
    /// The page scrolls natively; the container is fixed to the viewport.
    #[default]
    Fixed,
    /// The scroller moves content with a transform; the container is counter-translated.
    Transform,
}

/// Underlying scroll implementation.
///
/// Methods take `&self` so hosts and the engine can share one backend; implementations use
/// interior mutability.
pub trait ScrollBackend {
    /// Raw scroll offset in pixels.
    fn read(&self) -> f64;

    /// Jump to `offset`. Must be idempotent under rapid repeated calls.
    fn seek(&self, offset: f64);

    /// Largest reachable offset.
    fn max_scroll(&self) -> f64 {
        f64::INFINITY
    }

    /// `false` when the scroll container is missing.
    fn is_available(&self) -> bool {
        true
    }

    /// Pinning strategy this scroller requires.
    fn pin_type(&self) -> PinType {
        PinType::Fixed
    }

    /// Recompute limits after a layout change.
    fn update(&self) {}
}

/// Native document scrolling.
#[derive(Debug)]
pub struct NativeScroll {
    offset: Cell<f64>,
    max: Cell<f64>,
}

impl NativeScroll {
    /// Scroller with `max_scroll` reachable pixels, starting at the top.
    pub fn new(max_scroll: f64) -> Self {
        Self {
            offset: Cell::new(0.0),
            max: Cell::new(max_scroll.max(0.0)),
        }
    }

    /// Host-side: change the document height.
    pub fn set_max_scroll(&self, max_scroll: f64) {
        self.max.set(max_scroll.max(0.0));
        self.offset.set(self.offset.get().min(self.max.get()));
    }
}

impl ScrollBackend for NativeScroll {
    fn read(&self) -> f64 {
        self.offset.get()
    }

    fn seek(&self, offset: f64) {
        if offset.is_finite() {
            self.offset.set(offset.clamp(0.0, self.max.get()));
        }
    }

    fn max_scroll(&self) -> f64 {
        self.max.get()
    }
}

/// Smooth-scroll wrapper: content eases toward a target offset over successive ticks.
///
/// `seek` jumps immediately (duration 0), `scroll_to` animates.
#[derive(Debug)]
pub struct SmoothScroll {
    current: Cell<f64>,
    target: Cell<f64>,
    max: Cell<f64>,
    lerp: f64,
}

impl SmoothScroll {
    /// Snap distance below which an animated scroll settles on its target.
    pub const SETTLE_EPSILON: f64 = 0.5;

    /// Scroller with `max_scroll` reachable pixels, easing by `cfg.lerp` per tick.
    pub fn new(max_scroll: f64, cfg: SmoothScrollConfig) -> Self {
        Self {
            current: Cell::new(0.0),
            target: Cell::new(0.0),
            max: Cell::new(max_scroll.max(0.0)),
            lerp: cfg.lerp.clamp(f64::EPSILON, 1.0),
        }
    }

    /// Animate toward `offset`; progress happens in [`SmoothScroll::tick`].
    pub fn scroll_to(&self, offset: f64) {
        if offset.is_finite() {
            self.target.set(offset.clamp(0.0, self.max.get()));
        }
    }

    /// Advance one frame. Returns `true` while the position is still moving.
    pub fn tick(&self) -> bool {
        let (cur, target) = (self.current.get(), self.target.get());
        let delta = target - cur;
        if delta.abs() <= Self::SETTLE_EPSILON {
            self.current.set(target);
            return delta != 0.0;
        }
        self.current.set(cur + delta * self.lerp);
        true
    }

    /// Offset the content is easing toward.
    pub fn target(&self) -> f64 {
        self.target.get()
    }

    /// Host-side: change the content height.
    pub fn set_max_scroll(&self, max_scroll: f64) {
        let max = max_scroll.max(0.0);
        self.max.set(max);
        self.target.set(self.target.get().min(max));
        self.current.set(self.current.get().min(max));
    }
}

impl ScrollBackend for SmoothScroll {
    fn read(&self) -> f64 {
        self.current.get()
    }

    fn seek(&self, offset: f64) {
        if offset.is_finite() {
            let v = offset.clamp(0.0, self.max.get());
            self.current.set(v);
            self.target.set(v);
        }
    }

    fn max_scroll(&self) -> f64 {
        self.max.get()
    }

    fn pin_type(&self) -> PinType {
        PinType::Transform
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/source.rs"]
mod tests;
