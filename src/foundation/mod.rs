/// Scalar scroll/progress primitives and geometry re-exports.
pub(crate) mod core;
/// Error taxonomy shared by every module.
pub(crate) mod error;
