//! Error types for video playback

use thiserror::Error;

/// Playback errors
///
/// Transport controls never surface these: invalid manual input is clamped or
/// ignored. Errors are reserved for construction-time APIs and host calls.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Every candidate source failed (or none were given)
    #[error("All video sources failed")]
    SourcesExhausted,

    /// The media element rejected a command
    #[error("Media element error: {0}")]
    MediaElement(String),

    /// The session has been unmounted
    #[error("Playback session is no longer mounted")]
    Unmounted,

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Source catalog could not be parsed
    #[error("Catalog error: {0}")]
    Catalog(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for PlaybackError {
    fn from(err: config::ConfigError) -> Self {
        PlaybackError::Config(err.to_string())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
