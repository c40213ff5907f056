//! Scroll source boundary.
//!
//! Backends own the actual scroll position; the adapter is the single entry point the engine
//! reads from and the event hub hosts dispatch scroll/refresh notifications through.

/// Uniform adapter over a possibly absent backend.
pub(crate) mod adapter;
/// Backend contract plus native and smooth implementations.
pub(crate) mod source;
