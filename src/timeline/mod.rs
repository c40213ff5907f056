//! Timelines: segment model, placement resolution, serde definitions and the sequencer that
//! applies a progress snapshot to the stage.

/// JSON timeline definitions.
pub(crate) mod def;
/// Segments, placements, trigger anchors and the immutable [`Timeline`](segment::Timeline).
pub(crate) mod segment;
/// Progress → style application.
pub(crate) mod sequencer;
