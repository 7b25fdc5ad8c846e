//! Player Events
//!
//! Event-based communication for UI synchronization. A session queues events
//! as it changes state; the host drains them after each call and re-renders.

use crate::types::{PlayOrigin, PlaybackState};
use serde::{Deserialize, Serialize};

/// Events emitted by a playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlayerEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// A source was handed to the media element
    SourceLoading {
        /// Position in the candidate list
        index: usize,
        uri: String,
    },

    /// The current source failed; the session moves on if it can
    SourceFailed { index: usize, uri: String },

    /// Every candidate failed; the error panel replaces the player
    SourcesExhausted,

    /// Duration became known
    DurationChanged { duration: f64 },

    /// Playhead moved (from the element or a seek/skip)
    PositionUpdate {
        #[serde(rename = "currentTime")]
        current_time: f64,
        /// Unknown until metadata loads
        duration: Option<f64>,
    },

    /// A play request was dispatched
    PlayRequested { origin: PlayOrigin },

    /// The single autoplay attempt started
    AutoplayAttempted,

    /// The host refused autoplay; the player sits paused with a play button
    AutoplayRejected,

    /// Stall overlay turned on or off
    BufferingChanged { buffering: bool },

    /// Volume or mute changed
    VolumeChanged { volume: f64, muted: bool },

    /// Control overlay shown or hidden
    ControlsVisibilityChanged { visible: bool },
}

/// Queue of events waiting to be drained by the host
#[derive(Debug, Default, Clone)]
pub struct EventQueue {
    pending: Vec<PlayerEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: PlayerEvent) {
        self.pending.push(event);
    }

    /// Take every queued event, oldest first
    pub fn drain(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Drop everything (session unmounted)
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
