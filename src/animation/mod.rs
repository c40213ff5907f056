/// Easing curves mapping local segment progress.
pub(crate) mod ease;
/// Style channels, property maps and interpolation.
pub(crate) mod props;
