//! Media element abstraction
//!
//! The controller never decodes or fetches anything itself. It drives a host
//! media primitive (an HTML `<video>` element, a native player widget, a test
//! double) through this trait, and the host reports back with [`MediaEvent`]s.

use crate::error::Result;
use crate::types::PlayTicket;
use serde::{Deserialize, Serialize};

/// How the host handled a play request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayDispatch {
    /// Playback started synchronously, nothing to wait for
    Started,

    /// Playback is pending; the host will send [`MediaEvent::PlaySettled`]
    /// carrying the same ticket
    Pending,
}

/// Host media primitive driven by a playback session
///
/// Each session exclusively owns its element.
pub trait MediaElement {
    /// Replace the current source and reset the element
    ///
    /// Returning an error counts as a source failure.
    fn load(&mut self, uri: &str) -> Result<()>;

    /// Request playback
    ///
    /// # Returns
    /// * `Ok(PlayDispatch::Started)` - playing now
    /// * `Ok(PlayDispatch::Pending)` - resolution arrives later as `PlaySettled`
    /// * `Err(_)` - rejected synchronously
    fn play(&mut self, ticket: PlayTicket) -> Result<PlayDispatch>;

    /// Pause playback
    ///
    /// Never called while a play request is pending.
    fn pause(&mut self);

    /// Move the playhead (seconds)
    fn set_current_time(&mut self, seconds: f64);

    /// Set output volume in [0, 1]
    fn set_volume(&mut self, volume: f64);

    /// Set mute state
    fn set_muted(&mut self, muted: bool);
}

/// Notifications from the host media primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MediaEvent {
    /// Metadata is ready and the duration is known
    MetadataLoaded { duration: f64 },

    /// Playhead advanced
    TimeUpdate {
        #[serde(rename = "currentTime")]
        current_time: f64,
    },

    /// Element started playing
    Started,

    /// Element paused
    Paused,

    /// Element reached the end
    Ended,

    /// Stream stalled waiting for data
    Stalled,

    /// Playback resumed after a stall
    Resumed,

    /// Current source failed to load or decode
    Failed { message: String },

    /// A pending play request resolved (`error: None`) or rejected
    PlaySettled {
        ticket: PlayTicket,
        #[serde(default)]
        error: Option<String>,
    },
}

impl MediaEvent {
    /// Successful resolution of a pending play
    pub fn play_resolved(ticket: PlayTicket) -> Self {
        MediaEvent::PlaySettled {
            ticket,
            error: None,
        }
    }

    /// Rejection of a pending play
    pub fn play_rejected(ticket: PlayTicket, reason: impl Into<String>) -> Self {
        MediaEvent::PlaySettled {
            ticket,
            error: Some(reason.into()),
        }
    }
}

/// Recording media element for unit tests
///
/// Sources whose URI contains `"bad"` fail to load. Play requests stay pending
/// unless `sync_play` is set.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingElement {
    pub calls: Vec<String>,
    pub sync_play: bool,
    pub last_ticket: Option<PlayTicket>,
}

#[cfg(test)]
impl MediaElement for RecordingElement {
    fn load(&mut self, uri: &str) -> Result<()> {
        self.calls.push(format!("load {uri}"));
        if uri.contains("bad") {
            return Err(crate::error::PlaybackError::MediaElement(format!(
                "cannot load {uri}"
            )));
        }
        Ok(())
    }

    fn play(&mut self, ticket: PlayTicket) -> Result<PlayDispatch> {
        self.calls.push("play".to_string());
        self.last_ticket = Some(ticket);
        if self.sync_play {
            Ok(PlayDispatch::Started)
        } else {
            Ok(PlayDispatch::Pending)
        }
    }

    fn pause(&mut self) {
        self.calls.push("pause".to_string());
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.calls.push(format!("seek {seconds}"));
    }

    fn set_volume(&mut self, volume: f64) {
        self.calls.push(format!("volume {volume}"));
    }

    fn set_muted(&mut self, muted: bool) {
        self.calls.push(format!("muted {muted}"));
    }
}
