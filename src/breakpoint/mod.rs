/// Named viewport classes with change notification.
pub(crate) mod evaluator;
/// Width media queries (`(min-width: 768px)`).
pub(crate) mod media;
