/// Convenience result type used across the crate.
pub type AnaglyphResult<T> = Result<T, AnaglyphError>;

/// Top-level error taxonomy used by the player, compositor and media backends.
#[derive(thiserror::Error, Debug)]
pub enum AnaglyphError {
    /// Invalid user-provided data (presets, options, buffer shapes).
    #[error("validation error: {0}")]
    Validation(String),

    /// The media stream has no metadata or no decodable frame yet.
    #[error("stream not ready: {0}")]
    NotReady(String),

    /// The host media stack refused to start playback.
    #[error("playback rejected: {0}")]
    PlaybackRejected(String),

    /// Errors while probing or decoding media.
    #[error("decode error: {0}")]
    Decode(String),

    /// Errors when serializing or deserializing options.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AnaglyphError {
    /// Build an [`AnaglyphError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`AnaglyphError::NotReady`] value.
    pub fn not_ready(msg: impl Into<String>) -> Self {
        Self::NotReady(msg.into())
    }

    /// Build an [`AnaglyphError::PlaybackRejected`] value.
    pub fn playback_rejected(msg: impl Into<String>) -> Self {
        Self::PlaybackRejected(msg.into())
    }

    /// Build an [`AnaglyphError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build an [`AnaglyphError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Transient conditions are retried on the next refresh instead of being reported.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NotReady(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
