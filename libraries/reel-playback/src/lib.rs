//! Reel - Video Playback Controller
//!
//! Platform-agnostic, resilient video playback for the Reel site.
//!
//! This crate provides:
//! - Multi-source fallback (a failed source is never retried)
//! - Visibility-driven autoplay (muted, attempted at most once per session)
//! - In-flight play guard (no overlapping play/pause requests)
//! - Manual transport: play/pause, seek, skip, volume, mute
//! - Buffering overlay and a terminal error panel
//! - Auto-hiding control overlay
//! - Declarative title → source catalog
//!
//! # Architecture
//!
//! `reel-playback` never decodes or fetches media. The host provides a
//! [`MediaElement`] (an HTML `<video>`, a native widget, a test double) and
//! forwards its notifications as [`MediaEvent`]s. The session answers with
//! [`PlayerEvent`]s and a [`PlayerSurface`] render model.
//!
//! # Example: Fallback and autoplay
//!
//! ```rust
//! use reel_playback::{
//!     ManualClock, MediaElement, MediaEvent, PlayDispatch, PlayTicket, PlaybackSession,
//!     PlaybackState, PlayerConfig, Result, SessionOptions,
//! };
//!
//! // Implement MediaElement for your platform
//! #[derive(Default)]
//! struct Element {
//!     ticket: Option<PlayTicket>,
//! }
//!
//! impl MediaElement for Element {
//!     fn load(&mut self, _uri: &str) -> Result<()> {
//!         Ok(())
//!     }
//!     fn play(&mut self, ticket: PlayTicket) -> Result<PlayDispatch> {
//!         self.ticket = Some(ticket);
//!         Ok(PlayDispatch::Pending)
//!     }
//!     fn pause(&mut self) {}
//!     fn set_current_time(&mut self, _seconds: f64) {}
//!     fn set_volume(&mut self, _volume: f64) {}
//!     fn set_muted(&mut self, _muted: bool) {}
//! }
//!
//! let options = SessionOptions::new(
//!     "Trailer",
//!     vec!["/assets/videos/trailer-1.mp4".into(), "/assets/videos/sample-video.mp4".into()],
//! )
//! .with_autoplay(true);
//!
//! let mut session =
//!     PlaybackSession::mount_with(options, PlayerConfig::default(), Element::default(), ManualClock::new());
//!
//! // First source is broken: the session moves on by itself
//! session.handle_media_event(MediaEvent::Failed { message: "404".into() });
//! assert_eq!(session.current_source_index(), 1);
//!
//! // Scrolled into view: one muted autoplay attempt
//! session.handle_media_event(MediaEvent::MetadataLoaded { duration: 90.0 });
//! session.on_visibility_changed(0.75);
//! assert!(session.is_muted());
//!
//! let ticket = session.element().ticket.unwrap();
//! session.handle_media_event(MediaEvent::play_resolved(ticket));
//! assert_eq!(session.state(), PlaybackState::Playing);
//!
//! for event in session.drain_events() {
//!     println!("{event:?}");
//! }
//! ```

pub mod autoplay;
pub mod catalog;
mod clock;
pub mod config;
pub mod controls;
mod error;
pub mod events;
mod media;
mod session;
pub mod sources;
pub mod types;
pub mod view;
mod volume;

pub mod wasm;

// Public exports
pub use autoplay::AutoplayPhase;
pub use catalog::SourceCatalog;
#[cfg(not(target_arch = "wasm32"))]
pub use clock::SystemClock;
pub use clock::{Clock, ManualClock};
pub use config::PlayerConfig;
pub use error::{PlaybackError, Result};
pub use events::PlayerEvent;
pub use media::{MediaElement, MediaEvent, PlayDispatch};
pub use session::PlaybackSession;
pub use sources::SourceKind;
pub use types::{PlayOrigin, PlayTicket, PlaybackState, SessionId, SessionOptions};
pub use view::{format_time, PlayAffordance, PlayerSurface, PlayerView};
pub use volume::{Volume, DEFAULT_UNMUTE_VOLUME};
