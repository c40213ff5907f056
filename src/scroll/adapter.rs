use crate::events::listeners::{Listeners, Subscription};
use crate::foundation::core::{Rect, ScrollOffset, viewport_rect};
use crate::scroll::source::{PinType, ScrollBackend};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Uniform get/set of scroll offset and viewport box over any [`ScrollBackend`].
///
/// Built without a backend, or with one reporting unavailable, the adapter is disabled:
/// reads return zero, seeks do nothing and no scroll events are delivered. Sections mounted on
/// a disabled adapter stay static instead of failing.
pub struct ScrollAdapter {
    backend: Option<Rc<dyn ScrollBackend>>,
    viewport: Cell<(f64, f64)>,
    scroll_events: Listeners<ScrollOffset>,
    refresh_events: Listeners<()>,
}

impl ScrollAdapter {
    /// Adapter over `backend` with a `width` x `height` viewport.
    pub fn new(backend: Option<Rc<dyn ScrollBackend>>, width: f64, height: f64) -> Self {
        let backend = match backend {
            Some(b) if b.is_available() => Some(b),
            Some(_) => {
                tracing::warn!("scroll source reports unavailable; scroll-driven sections stay static");
                None
            }
            None => {
                tracing::warn!("scroll source not found; scroll-driven sections stay static");
                None
            }
        };
        Self {
            backend,
            viewport: Cell::new((width.max(0.0), height.max(0.0))),
            scroll_events: Listeners::new(),
            refresh_events: Listeners::new(),
        }
    }

    /// Disabled adapter.
    pub fn disabled(width: f64, height: f64) -> Self {
        Self::new(None, width, height)
    }

    /// Wrap into an `Rc` for sharing with an [`Engine`](crate::Engine).
    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    /// `false` when operating as the disabled fallback.
    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// Current scroll offset.
    pub fn read(&self) -> ScrollOffset {
        self.backend
            .as_ref()
            .map_or(ScrollOffset::ZERO, |b| ScrollOffset::new(b.read()))
    }

    /// Jump to `offset`, clamped to the reachable range.
    pub fn seek(&self, offset: f64) {
        let Some(b) = &self.backend else {
            return;
        };
        if !offset.is_finite() {
            return;
        }
        b.seek(offset.max(0.0).min(b.max_scroll()));
    }

    /// Viewport box `{top: 0, left: 0, width, height}`.
    pub fn bounding_box(&self) -> Rect {
        let (w, h) = self.viewport.get();
        viewport_rect(w, h)
    }

    /// Host-side: viewport resized.
    pub fn set_viewport(&self, width: f64, height: f64) {
        self.viewport.set((width.max(0.0), height.max(0.0)));
    }

    /// Pinning strategy of the active backend.
    pub fn pin_type(&self) -> PinType {
        self.backend
            .as_ref()
            .map_or(PinType::Fixed, |b| b.pin_type())
    }

    /// Register for scroll events. Each event carries one offset snapshot.
    pub fn on_scroll(&self, callback: impl FnMut(&ScrollOffset) + 'static) -> Subscription {
        self.scroll_events.subscribe(callback)
    }

    /// Register for refresh events (layout recomputed).
    pub fn on_refresh(&self, callback: impl FnMut(&()) + 'static) -> Subscription {
        self.refresh_events.subscribe(callback)
    }

    /// Host-side: the scroll position changed. Reads the offset once and dispatches it.
    pub fn notify_scroll(&self) {
        if self.backend.is_none() {
            return;
        }
        let offset = self.read();
        self.scroll_events.emit(&offset);
    }

    /// Recompute backend limits, notify refresh listeners, then re-dispatch the current offset.
    pub fn refresh(&self) {
        let Some(b) = &self.backend else {
            return;
        };
        b.update();
        self.refresh_events.emit(&());
        self.notify_scroll();
    }
}

impl fmt::Debug for ScrollAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollAdapter")
            .field("available", &self.is_available())
            .field("offset", &self.read())
            .field("viewport", &self.viewport.get())
            .field("scroll_listeners", &self.scroll_events.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/adapter.rs"]
mod tests;
