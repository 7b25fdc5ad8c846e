//! Volume and mute state
//!
//! Volume is a linear level in [0, 1], exactly what the media element takes.
//! Muting never touches the level, so unmuting restores what was there.

/// Volume used when unmuting from a silent level
pub const DEFAULT_UNMUTE_VOLUME: f64 = 0.5;

/// Volume controller for one player
#[derive(Debug, Clone)]
pub struct Volume {
    /// Volume level (0.0-1.0)
    level: f64,

    /// Mute state (preserves volume level)
    muted: bool,

    /// Level restored when unmuting at 0
    unmute_level: f64,
}

impl Volume {
    /// Create new volume controller
    ///
    /// # Arguments
    /// * `level` - Initial volume (clamped to 0.0-1.0)
    pub fn new(level: f64) -> Self {
        Self {
            level: clamp_unit(level),
            muted: false,
            unmute_level: DEFAULT_UNMUTE_VOLUME,
        }
    }

    /// Override the level restored when unmuting a silent player
    pub fn with_unmute_level(mut self, level: f64) -> Self {
        self.unmute_level = clamp_unit(level);
        self
    }

    /// Set volume level
    ///
    /// A level of 0 forces mute; any audible level while muted unmutes.
    pub fn set_level(&mut self, level: f64) {
        self.level = clamp_unit(level);
        if self.level == 0.0 {
            self.muted = true;
        } else if self.muted {
            self.muted = false;
        }
    }

    /// Get current volume level (0.0-1.0)
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Mute audio (preserves volume level)
    pub fn mute(&mut self) {
        self.muted = true;
    }

    /// Unmute audio
    ///
    /// If the level is 0, restores the default audible level instead of
    /// leaving the player silent.
    pub fn unmute(&mut self) {
        self.muted = false;
        if self.level == 0.0 {
            self.level = self.unmute_level;
        }
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        if self.muted {
            self.unmute();
        } else {
            self.mute();
        }
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Clamp into [0, 1], mapping NaN to 0
fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_volume() {
        let vol = Volume::default();
        assert_eq!(vol.level(), 1.0);
        assert!(!vol.is_muted());
    }

    #[test]
    fn set_level_clamps() {
        let mut vol = Volume::new(0.5);
        vol.set_level(1.5);
        assert_eq!(vol.level(), 1.0);

        vol.set_level(-0.2);
        assert_eq!(vol.level(), 0.0);

        vol.set_level(f64::NAN);
        assert_eq!(vol.level(), 0.0);
    }

    #[test]
    fn zero_level_forces_mute() {
        let mut vol = Volume::new(0.8);
        vol.set_level(0.0);
        assert!(vol.is_muted());
        assert_eq!(vol.level(), 0.0);
    }

    #[test]
    fn audible_level_unmutes() {
        let mut vol = Volume::new(0.8);
        vol.mute();
        vol.set_level(0.3);
        assert!(!vol.is_muted());
        assert_eq!(vol.level(), 0.3);
    }

    #[test]
    fn mute_preserves_level() {
        let mut vol = Volume::new(0.7);
        vol.mute();
        assert!(vol.is_muted());
        assert_eq!(vol.level(), 0.7);

        vol.unmute();
        assert!(!vol.is_muted());
        assert_eq!(vol.level(), 0.7);
    }

    #[test]
    fn unmute_from_silence_restores_default() {
        let mut vol = Volume::new(0.9);
        vol.set_level(0.0);
        vol.toggle_mute();
        assert!(!vol.is_muted());
        assert_eq!(vol.level(), DEFAULT_UNMUTE_VOLUME);
    }

    #[test]
    fn custom_unmute_level() {
        let mut vol = Volume::new(0.0).with_unmute_level(0.25);
        vol.mute();
        vol.unmute();
        assert_eq!(vol.level(), 0.25);
    }
}
