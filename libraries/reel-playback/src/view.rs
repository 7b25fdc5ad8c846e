//! Render model
//!
//! What the player surface should show for the current session state. Hosts
//! map this onto their widgets; no layout lives here.

use crate::types::PlaybackState;
use serde::{Deserialize, Serialize};

/// Which transport button to offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayAffordance {
    Play,
    Pause,
}

/// Live player surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub title: String,
    pub poster: String,
    /// Source currently loaded in the element
    pub source: Option<String>,
    /// State to display (`Buffering` while stalled)
    pub state: PlaybackState,
    pub affordance: PlayAffordance,
    /// Progress in percent, 0 while the duration is unknown
    pub progress_percent: f64,
    /// `M:SS / M:SS`
    pub time_label: String,
    pub buffering: bool,
    pub controls_visible: bool,
    pub muted: bool,
    pub volume: f64,
}

/// Top-level surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PlayerSurface {
    /// Normal player
    Player(PlayerView),

    /// Static, non-interactive error panel shown once every source failed
    ErrorPanel { title: String, message: String },
}

impl PlayerSurface {
    pub fn is_error_panel(&self) -> bool {
        matches!(self, PlayerSurface::ErrorPanel { .. })
    }
}

/// Format seconds as `M:SS`
///
/// Minutes are not wrapped into hours. Negative and non-finite input renders
/// as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Progress percentage, 0 when the duration is unknown
pub fn progress_percent(current_time: f64, duration: Option<f64>) -> f64 {
    match duration {
        Some(duration) if duration > 0.0 => (current_time / duration * 100.0).clamp(0.0, 100.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(9.7), "0:09");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(600.0), "10:00");
        assert_eq!(format_time(3725.0), "62:05");
    }

    #[test]
    fn formats_invalid_time_as_zero() {
        assert_eq!(format_time(-3.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
    }

    #[test]
    fn progress_handles_unknown_duration() {
        assert_eq!(progress_percent(5.0, None), 0.0);
        assert_eq!(progress_percent(5.0, Some(0.0)), 0.0);
        assert_eq!(progress_percent(5.0, Some(20.0)), 25.0);
        assert_eq!(progress_percent(30.0, Some(20.0)), 100.0);
    }
}
