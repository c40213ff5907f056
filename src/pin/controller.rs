use crate::foundation::core::{Progress, ScrollOffset};
use crate::scroll::source::PinType;
use crate::surface::stage::{Stage, TargetId};
use crate::surface::style::PinLayout;
use crate::timeline::segment::Timeline;
use std::rc::{Rc, Weak};

/// Where the scroll offset sits relative to the pin span.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PinState {
    /// Before the span; the container is in normal flow.
    #[default]
    Unpinned,
    /// Inside the span; the container holds still while the timeline scrubs.
    Pinned,
    /// Past the span; the container scrolls away offset by the pin spacing.
    Released,
}

/// Result of one [`PinController::update`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinUpdate {
    /// State for the offset just processed.
    pub state: PinState,
    /// Timeline progress for that offset.
    pub progress: Progress,
    /// `true` when `state` differs from the previous update.
    pub changed: bool,
}

/// Converts scroll offsets into progress and pin state for one timeline.
///
/// Holds the timeline weakly; once the owning section drops it, updates return `None`.
#[derive(Debug)]
pub struct PinController {
    timeline: Weak<Timeline>,
    target: TargetId,
    start: f64,
    distance: f64,
    pinned: bool,
    fixed_top: f64,
    pin_type: PinType,
    state: PinState,
}

impl PinController {
    /// Controller for `timeline` pinning `target`.
    ///
    /// `start` is the scroll offset where the span begins and `fixed_top` the viewport-relative
    /// top edge the container keeps while fixed.
    pub fn new(
        timeline: &Rc<Timeline>,
        target: TargetId,
        start: f64,
        fixed_top: f64,
        pin_type: PinType,
    ) -> Self {
        Self {
            timeline: Rc::downgrade(timeline),
            target,
            start: start.max(0.0),
            distance: timeline.scroll_distance(),
            pinned: timeline.pinned(),
            fixed_top,
            pin_type,
            state: PinState::Unpinned,
        }
    }

    /// Scroll offset where the span begins.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Scroll offset where the span ends.
    pub fn end(&self) -> f64 {
        self.start + self.distance
    }

    /// Length of the span in pixels.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Element the layout override is written to.
    pub fn target(&self) -> &TargetId {
        &self.target
    }

    /// State after the last update.
    pub fn state(&self) -> PinState {
        self.state
    }

    /// Progress for `offset`.
    pub fn progress_at(&self, offset: ScrollOffset) -> Progress {
        Progress::from_scroll(offset, self.start, self.distance)
    }

    /// State for `offset`. A zero-length span releases at its start.
    pub fn state_at(&self, offset: ScrollOffset) -> PinState {
        let s = offset.get();
        if s < self.start {
            PinState::Unpinned
        } else if s >= self.end() {
            PinState::Released
        } else {
            PinState::Pinned
        }
    }

    fn layout_for(&self, state: PinState, offset: ScrollOffset) -> PinLayout {
        match (state, self.pin_type) {
            (PinState::Unpinned, _) => PinLayout::Flow,
            (PinState::Pinned, PinType::Fixed) => PinLayout::Fixed {
                top: self.fixed_top,
            },
            (PinState::Pinned, PinType::Transform) => PinLayout::Transform {
                y: offset.get() - self.start,
            },
            (PinState::Released, _) => PinLayout::Released { y: self.distance },
        }
    }

    /// Process one scroll offset: compute progress and state, and write the pin layout when
    /// the timeline pins.
    pub fn update(&mut self, offset: ScrollOffset, stage: &mut Stage) -> Option<PinUpdate> {
        self.timeline.upgrade()?;
        let state = self.state_at(offset);
        let progress = self.progress_at(offset);

        if self.pinned {
            let layout = self.layout_for(state, offset);
            if let Some(surface) = stage.get_mut(&self.target) {
                surface.set_pin(layout);
            }
        }

        let changed = state != self.state;
        if changed {
            tracing::debug!(
                target = %self.target,
                from = ?self.state,
                to = ?state,
                offset = offset.get(),
                "pin state changed"
            );
            self.state = state;
        }
        Some(PinUpdate {
            state,
            progress,
            changed,
        })
    }

    /// Put the container back into normal flow.
    pub fn release(&mut self, stage: &mut Stage) {
        if self.pinned
            && let Some(surface) = stage.get_mut(&self.target)
        {
            surface.set_pin(PinLayout::Flow);
        }
        self.state = PinState::Unpinned;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pin/controller.rs"]
mod tests;
