/// Single-threaded callback registry with cancellable subscriptions.
pub(crate) mod listeners;
