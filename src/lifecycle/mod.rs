//! Section lifecycle: mount, responsive rebuild, detach.

/// [`Engine`](engine::Engine) and the per-section state it owns.
pub(crate) mod engine;
