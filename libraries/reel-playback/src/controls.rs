//! Control overlay visibility
//!
//! Controls reveal on any activity and hide after a period of inactivity, but
//! only while the video is playing.

use std::time::Duration;

/// Default inactivity period before controls hide
pub const DEFAULT_HIDE_AFTER: Duration = Duration::from_millis(3000);

/// Overlay visibility with an inactivity deadline
#[derive(Debug, Clone)]
pub struct ControlsOverlay {
    visible: bool,
    hide_after: Duration,
    last_activity: Duration,
}

impl ControlsOverlay {
    /// Controls start visible
    pub fn new(hide_after: Duration) -> Self {
        Self {
            visible: true,
            hide_after,
            last_activity: Duration::ZERO,
        }
    }

    /// Reveal controls and restart the inactivity timer
    ///
    /// Returns true if visibility changed.
    pub fn reveal(&mut self, now: Duration) -> bool {
        self.last_activity = now;
        let changed = !self.visible;
        self.visible = true;
        changed
    }

    /// Apply the inactivity timeout
    ///
    /// Returns true if the controls were hidden by this call.
    pub fn tick(&mut self, now: Duration, playing: bool) -> bool {
        if !self.visible || !playing {
            return false;
        }

        if now.saturating_sub(self.last_activity) >= self.hide_after {
            self.visible = false;
            return true;
        }

        false
    }

    /// Force controls visible without restarting the timer
    ///
    /// Used when playback leaves Playing: controls stay up while paused.
    pub fn pin(&mut self) -> bool {
        let changed = !self.visible;
        self.visible = true;
        changed
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl Default for ControlsOverlay {
    fn default() -> Self {
        Self::new(DEFAULT_HIDE_AFTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hides_after_inactivity_while_playing() {
        let mut overlay = ControlsOverlay::default();
        overlay.reveal(Duration::from_secs(1));

        assert!(!overlay.tick(Duration::from_millis(3999), true));
        assert!(overlay.is_visible());

        assert!(overlay.tick(Duration::from_secs(4), true));
        assert!(!overlay.is_visible());
    }

    #[test]
    fn stays_visible_while_paused() {
        let mut overlay = ControlsOverlay::default();
        overlay.reveal(Duration::ZERO);
        assert!(!overlay.tick(Duration::from_secs(60), false));
        assert!(overlay.is_visible());
    }

    #[test]
    fn activity_restarts_timer() {
        let mut overlay = ControlsOverlay::default();
        overlay.reveal(Duration::ZERO);
        overlay.reveal(Duration::from_secs(2));

        assert!(!overlay.tick(Duration::from_secs(4), true));
        assert!(overlay.tick(Duration::from_secs(5), true));

        assert!(overlay.reveal(Duration::from_secs(6)));
        assert!(!overlay.tick(Duration::from_millis(8999), true));
        assert!(overlay.tick(Duration::from_secs(9), true));
    }
}
