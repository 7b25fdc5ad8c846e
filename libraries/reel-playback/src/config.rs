//! Player configuration
//!
//! Every field has a default. A config file and
//! `REEL_`-prefixed environment variables can override any field.

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Autoplay when scrolled into view (default: false)
    pub autoplay: bool,

    /// Visible fraction that counts as "in view" (default: 0.5)
    pub visibility_threshold: f64,

    /// Inactivity before controls hide while playing (default: 3000 ms)
    pub controls_hide_after_ms: u64,

    /// Skip button step in seconds (default: 10)
    pub skip_seconds: f64,

    /// Volume restored when unmuting at 0 (default: 0.5)
    pub unmute_volume: f64,

    /// Initial volume (default: 1.0)
    pub initial_volume: f64,

    /// Poster shown when the caller gives none
    pub placeholder_poster: String,

    /// Message on the error panel
    pub error_message: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            autoplay: false,
            visibility_threshold: crate::autoplay::DEFAULT_VISIBILITY_THRESHOLD,
            controls_hide_after_ms: 3000,
            skip_seconds: 10.0,
            unmute_volume: crate::volume::DEFAULT_UNMUTE_VOLUME,
            initial_volume: 1.0,
            placeholder_poster: "/placeholder.svg?height=720&width=1280".to_string(),
            error_message: "Video could not be loaded".to_string(),
        }
    }
}

impl PlayerConfig {
    /// Load configuration from an optional file and the environment
    ///
    /// The file format follows its extension (toml, json, yaml, ...).
    /// Environment variables use the `REEL_` prefix, e.g. `REEL_SKIP_SECONDS=5`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(PlaybackError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            settings = settings.add_source(config::File::from(path));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("REEL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: PlayerConfig = settings.build()?.try_deserialize()?;
        config.validate()?;

        tracing::debug!(
            autoplay = config.autoplay,
            threshold = config.visibility_threshold,
            "Loaded player configuration"
        );

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.visibility_threshold > 0.0 && self.visibility_threshold <= 1.0) {
            return Err(PlaybackError::Config(format!(
                "visibility_threshold must be in (0, 1], got {}",
                self.visibility_threshold
            )));
        }

        if !(self.skip_seconds.is_finite() && self.skip_seconds >= 0.0) {
            return Err(PlaybackError::Config(format!(
                "skip_seconds must be a non-negative number, got {}",
                self.skip_seconds
            )));
        }

        for (name, value) in [
            ("unmute_volume", self.unmute_volume),
            ("initial_volume", self.initial_volume),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PlaybackError::Config(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }

        Ok(())
    }

    pub fn controls_hide_after(&self) -> Duration {
        Duration::from_millis(self.controls_hide_after_ms)
    }
}
