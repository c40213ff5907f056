/// Convenience result type used across Scrollpin.
pub type ScrollpinResult<T> = Result<T, ScrollpinError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Only build-time failures surface here. An unavailable scroll source and overlapping
/// breakpoints are recovered locally and reported through `tracing` instead.
#[derive(thiserror::Error, Debug)]
pub enum ScrollpinError {
    /// A segment placement references a predecessor that does not exist.
    #[error("invalid placement: {0}")]
    InvalidPlacement(String),

    /// A numeric value (property, duration, offset, distance) is non-finite or out of range.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Structurally invalid input, such as an unknown target or malformed definition.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing definitions.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from a host-provided collaborator.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrollpinError {
    /// Build a [`ScrollpinError::InvalidPlacement`] value.
    pub fn invalid_placement(msg: impl Into<String>) -> Self {
        Self::InvalidPlacement(msg.into())
    }

    /// Build a [`ScrollpinError::InvalidValue`] value.
    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Self::InvalidValue(msg.into())
    }

    /// Build a [`ScrollpinError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScrollpinError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

/// Reject NaN and infinities, naming the offending field in the error.
pub(crate) fn ensure_finite(what: &str, v: f64) -> ScrollpinResult<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ScrollpinError::invalid_value(format!(
            "{what} must be finite, got {v}"
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
