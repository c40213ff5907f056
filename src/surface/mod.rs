/// Keyed registry of surfaces shared by sections.
pub(crate) mod stage;
/// Renderable surface contract and the in-memory implementation.
pub(crate) mod style;
