/// Convenience result type used across vnframe.
pub type VnframeResult<T> = Result<T, VnframeError>;

/// Top-level error taxonomy used by engine APIs.
///
/// None of these are fatal to an editor process: a failed pass leaves the previous frame and the
/// rest of the session usable.
#[derive(thiserror::Error, Debug)]
pub enum VnframeError {
    /// Invalid user-provided or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// An image, font, or catalog could not be loaded or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Errors raised while rasterizing a scene plan.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VnframeError {
    /// Build a [`VnframeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`VnframeError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`VnframeError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`VnframeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
