//! Pinning: maps a scroll offset onto a pin state and a layout override for the container.

/// Unpinned → Pinned → Released state machine.
pub(crate) mod controller;
