//! Core types for video playback

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Playback state of a session
///
/// `Buffering` is never stored as the session's own state. A stall is an
/// overlay flag on top of Playing/Paused, and `Buffering` is only reported
/// by [`crate::PlaybackSession::display_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Nothing loaded yet
    Idle,

    /// Source assigned, waiting for metadata
    Loading,

    /// Currently playing
    Playing,

    /// Ready or paused mid-video
    Paused,

    /// Stream stalled (display only)
    Buffering,

    /// Reached the end of the video
    Ended,

    /// Every source failed
    Failed,
}

impl PlaybackState {
    /// Lowercase name, as used by hosts and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Loading => "loading",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
            PlaybackState::Buffering => "buffering",
            PlaybackState::Ended => "ended",
            PlaybackState::Failed => "failed",
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-session identifier, attached to every log line a session emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle for an asynchronous play request
///
/// Handed to [`crate::MediaElement::play`] and echoed back by the host in
/// [`crate::MediaEvent::PlaySettled`]. Tickets are unique per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayTicket(pub u64);

/// Who asked for playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayOrigin {
    /// Visibility-driven autoplay attempt
    Autoplay,

    /// User pressed play
    Manual,

    /// Playback carried over to a fallback source
    Resume,
}

/// Input contract for a player instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOptions {
    /// Candidate media URIs, tried in order
    pub sources: Vec<String>,

    /// Display title (also shown on the error panel)
    pub title: String,

    /// Poster image URI
    #[serde(default)]
    pub poster: Option<String>,

    /// Start playing muted when scrolled into view
    #[serde(default)]
    pub autoplay: bool,
}

impl SessionOptions {
    pub fn new(title: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            sources,
            title: title.into(),
            poster: None,
            autoplay: false,
        }
    }

    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    pub fn with_poster(mut self, poster: impl Into<String>) -> Self {
        self.poster = Some(poster.into());
        self
    }

    /// Take the autoplay flag from configuration
    pub fn from_config(
        title: impl Into<String>,
        sources: Vec<String>,
        config: &crate::PlayerConfig,
    ) -> Self {
        Self::new(title, sources).with_autoplay(config.autoplay)
    }
}
