//! Visibility-driven autoplay
//!
//! Tracks whether the player is in view and latches the single autoplay
//! attempt a session is allowed.

use serde::{Deserialize, Serialize};

/// Default fraction of the player that must be visible
pub const DEFAULT_VISIBILITY_THRESHOLD: f64 = 0.5;

/// Autoplay attempt lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AutoplayPhase {
    /// No attempt made yet
    NotAttempted,

    /// Play requested, waiting for the host
    Attempting,

    /// Host started playback
    Succeeded,

    /// Host refused playback (environment policy)
    Rejected,

    /// The source failed mid-attempt and the player was out of view by the
    /// time a replacement was ready; the host never answered
    Abandoned,
}

/// What a visibility change asks the session to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityChange {
    /// Crossed into view
    Entered,

    /// Crossed out of view
    Left,

    /// Stayed on the same side of the threshold
    Unchanged,
}

/// Per-session autoplay latch and visibility tracker
#[derive(Debug, Clone)]
pub struct AutoplayController {
    enabled: bool,
    threshold: f64,
    visible: bool,
    phase: AutoplayPhase,
}

impl AutoplayController {
    pub fn new(enabled: bool, threshold: f64) -> Self {
        let threshold = if threshold.is_nan() || threshold <= 0.0 {
            DEFAULT_VISIBILITY_THRESHOLD
        } else {
            threshold.min(1.0)
        };

        Self {
            enabled,
            threshold,
            visible: false,
            phase: AutoplayPhase::NotAttempted,
        }
    }

    /// Feed a new intersection ratio
    ///
    /// Only threshold crossings matter; the ratio itself is not kept.
    pub fn observe(&mut self, ratio: f64) -> VisibilityChange {
        let now_visible = !ratio.is_nan() && ratio >= self.threshold;
        let change = match (self.visible, now_visible) {
            (false, true) => VisibilityChange::Entered,
            (true, false) => VisibilityChange::Left,
            _ => VisibilityChange::Unchanged,
        };
        self.visible = now_visible;
        change
    }

    /// Whether an autoplay attempt may start now
    pub fn should_attempt(&self, user_interacted: bool) -> bool {
        self.enabled
            && self.visible
            && !user_interacted
            && self.phase == AutoplayPhase::NotAttempted
    }

    /// Latch the attempt
    pub fn begin(&mut self) {
        self.phase = AutoplayPhase::Attempting;
    }

    /// Record the host's answer
    pub fn finish(&mut self, succeeded: bool) {
        if self.phase == AutoplayPhase::Attempting {
            self.phase = if succeeded {
                AutoplayPhase::Succeeded
            } else {
                AutoplayPhase::Rejected
            };
        }
    }

    /// Drop an attempt the host never answered
    pub fn abandon(&mut self) {
        if self.phase == AutoplayPhase::Attempting {
            self.phase = AutoplayPhase::Abandoned;
        }
    }

    pub fn phase(&self) -> AutoplayPhase {
        self.phase
    }

    pub fn attempted(&self) -> bool {
        self.phase != AutoplayPhase::NotAttempted
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}
