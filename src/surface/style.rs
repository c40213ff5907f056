use crate::animation::props::StyleChannel;
use crate::foundation::core::Rect;
use std::collections::BTreeMap;

/// Layout override applied to a pinned container.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PinLayout {
    /// Normal document flow.
    #[default]
    Flow,
    /// Fixed to the viewport with its top edge at `top` (viewport pixels).
    Fixed {
        /// Viewport-relative top edge.
        top: f64,
    },
    /// Counter-translated by `y` so a transformed scroller does not move it.
    Transform {
        /// Compensating vertical offset in pixels.
        y: f64,
    },
    /// Back in flow after the pin span, pushed down by the pin spacing.
    Released {
        /// Spacing in pixels (the scroll distance consumed while pinned).
        y: f64,
    },
}

/// Anything the engine can animate.
///
/// Channels hold plain numbers; how they map onto a real visual (CSS transform, scene node,
/// terminal cell) is up to the host.
pub trait Surface {
    /// Current value of `channel`, or `None` when it was never written.
    fn channel(&self, channel: StyleChannel) -> Option<f64>;

    /// Write `channel`.
    fn set_channel(&mut self, channel: StyleChannel, value: f64);

    /// Remove any value written to `channel`.
    fn clear_channel(&mut self, channel: StyleChannel);

    /// Untransformed document-relative box, used to resolve trigger positions.
    fn layout_box(&self) -> Rect {
        Rect::ZERO
    }

    /// Apply a pin layout override. Surfaces that cannot be pinned ignore it.
    fn set_pin(&mut self, _layout: PinLayout) {}

    /// Pin layout currently applied.
    fn pin_layout(&self) -> PinLayout {
        PinLayout::Flow
    }
}

/// In-memory surface: a style map plus a layout box.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleSurface {
    layout: Rect,
    channels: BTreeMap<StyleChannel, f64>,
    pin: PinLayout,
}

impl StyleSurface {
    /// Surface occupying `layout` in document coordinates.
    pub fn new(layout: Rect) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// Builder-style initial style.
    pub fn with_channel(mut self, channel: StyleChannel, value: f64) -> Self {
        self.channels.insert(channel, value);
        self
    }

    /// Effective value: the written value or the channel identity.
    pub fn value(&self, channel: StyleChannel) -> f64 {
        self.channel(channel).unwrap_or_else(|| channel.identity())
    }

    /// Return `true` when no channel has been written.
    pub fn is_pristine(&self) -> bool {
        self.channels.is_empty()
    }

    /// Move the layout box (e.g. after a host re-layout).
    pub fn set_layout_box(&mut self, layout: Rect) {
        self.layout = layout;
    }
}

impl Surface for StyleSurface {
    fn channel(&self, channel: StyleChannel) -> Option<f64> {
        self.channels.get(&channel).copied()
    }

    fn set_channel(&mut self, channel: StyleChannel, value: f64) {
        self.channels.insert(channel, value);
    }

    fn clear_channel(&mut self, channel: StyleChannel) {
        self.channels.remove(&channel);
    }

    fn layout_box(&self) -> Rect {
        self.layout
    }

    fn set_pin(&mut self, layout: PinLayout) {
        self.pin = layout;
    }

    fn pin_layout(&self) -> PinLayout {
        self.pin
    }
}
