//! Playback session - core state machine
//!
//! One session per mounted player. Coordinates source fallback, the autoplay
//! latch, the in-flight play guard, transport controls and the control
//! overlay, and queues [`PlayerEvent`]s for the host.

use crate::{
    autoplay::{AutoplayController, AutoplayPhase, VisibilityChange},
    clock::Clock,
    config::PlayerConfig,
    controls::ControlsOverlay,
    error::{PlaybackError, Result},
    events::{EventQueue, PlayerEvent},
    media::{MediaElement, MediaEvent, PlayDispatch},
    sources::{Advance, SourceKind, SourceList},
    types::{PlayOrigin, PlayTicket, PlaybackState, SessionId, SessionOptions},
    view::{format_time, progress_percent, PlayAffordance, PlayerSurface, PlayerView},
    volume::Volume,
};
use tracing::{debug, error, info, warn};

/// A play request the host has not answered yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingPlay {
    ticket: PlayTicket,
    origin: PlayOrigin,
}

/// Resilient video playback controller
///
/// Wraps a [`MediaElement`] and owns it for the lifetime of the session.
/// Every method is a no-op once the session is unmounted.
pub struct PlaybackSession<E: MediaElement, C: Clock> {
    id: SessionId,
    title: String,
    poster: Option<String>,
    config: PlayerConfig,

    // Collaborators
    element: E,
    clock: C,

    // Playback state
    sources: SourceList,
    state: PlaybackState,
    current_time: f64,
    duration: Option<f64>,
    buffering: bool,
    volume: Volume,

    // Interaction / autoplay
    user_interacted: bool,
    autoplay: AutoplayController,

    // In-flight play guard
    pending_play: Option<PendingPlay>,
    next_ticket: u64,
    // Out-of-view while a play was pending: pause once it resolves
    pause_when_settled: bool,
    // Playback to carry over to the next source once it is ready
    resume_on_ready: Option<PlayOrigin>,

    controls: ControlsOverlay,
    mounted: bool,

    // Event queue for UI synchronization
    events: EventQueue,
}

#[cfg(not(target_arch = "wasm32"))]
impl<E: MediaElement> PlaybackSession<E, crate::clock::SystemClock> {
    /// Mount a session with default configuration and the system clock
    pub fn mount(options: SessionOptions, element: E) -> Self {
        Self::mount_with(
            options,
            PlayerConfig::default(),
            element,
            crate::clock::SystemClock::new(),
        )
    }
}

impl<E: MediaElement, C: Clock> PlaybackSession<E, C> {
    /// Mount a session
    ///
    /// Loads the first usable source immediately. An empty source list (after
    /// filtering blanks and duplicates) fails the session without touching
    /// the element's source.
    pub fn mount_with(
        options: SessionOptions,
        config: PlayerConfig,
        mut element: E,
        clock: C,
    ) -> Self {
        let volume = Volume::new(config.initial_volume).with_unmute_level(config.unmute_volume);
        element.set_volume(volume.level());
        element.set_muted(volume.is_muted());

        let mut controls = ControlsOverlay::new(config.controls_hide_after());
        controls.reveal(clock.now());

        let mut session = Self {
            id: SessionId::new(),
            sources: SourceList::new(options.sources),
            title: options.title,
            poster: options.poster,
            autoplay: AutoplayController::new(options.autoplay, config.visibility_threshold),
            config,
            element,
            clock,
            state: PlaybackState::Idle,
            current_time: 0.0,
            duration: None,
            buffering: false,
            volume,
            user_interacted: false,
            pending_play: None,
            next_ticket: 0,
            pause_when_settled: false,
            resume_on_ready: None,
            controls,
            mounted: true,
            events: EventQueue::new(),
        };

        info!(
            session = %session.id,
            title = %session.title,
            sources = session.sources.len(),
            autoplay = session.autoplay.is_enabled(),
            "Mounted video player"
        );

        if session.sources.is_empty() {
            session.fail("no playable sources");
        } else {
            session.load_current_source();
        }

        session
    }

    /// Unmount the session
    ///
    /// Pending play requests are abandoned: their settlement is ignored, as is
    /// every later call.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.pending_play = None;
        self.pause_when_settled = false;
        self.resume_on_ready = None;
        self.events.clear();
        info!(session = %self.id, "Unmounted video player");
    }

    // ===== Host callbacks =====

    /// Feed a notification from the media element
    pub fn handle_media_event(&mut self, event: MediaEvent) {
        if !self.mounted {
            debug!(session = %self.id, ?event, "Ignoring media event after unmount");
            return;
        }
        if self.state == PlaybackState::Failed {
            return;
        }

        match event {
            MediaEvent::MetadataLoaded { duration } => self.on_metadata(duration),
            MediaEvent::TimeUpdate { current_time } => {
                if current_time.is_finite() {
                    self.current_time = current_time.max(0.0);
                    self.emit_position();
                }
            }
            MediaEvent::Started => {
                debug!(session = %self.id, "Video playing");
                if self.pending_play.is_none() {
                    self.set_state(PlaybackState::Playing);
                }
            }
            MediaEvent::Paused => {
                debug!(session = %self.id, "Video paused");
                if self.state == PlaybackState::Playing && self.pending_play.is_none() {
                    self.set_state(PlaybackState::Paused);
                }
            }
            MediaEvent::Ended => {
                debug!(session = %self.id, "Video ended");
                self.set_buffering(false);
                self.set_state(PlaybackState::Ended);
            }
            MediaEvent::Stalled => {
                debug!(session = %self.id, "Video buffering");
                self.set_buffering(true);
            }
            MediaEvent::Resumed => {
                debug!(session = %self.id, "Video playing after buffer");
                self.set_buffering(false);
            }
            MediaEvent::Failed { message } => self.advance_source_with(&message),
            MediaEvent::PlaySettled { ticket, error } => self.on_play_settled(ticket, error),
        }
    }

    /// Feed a new intersection ratio from the visibility detector
    ///
    /// Entering view triggers the session's single autoplay attempt (if
    /// enabled and the user has not taken over). Leaving view pauses
    /// automatic playback; a pause during an in-flight play is deferred until
    /// the play resolves.
    pub fn on_visibility_changed(&mut self, ratio: f64) {
        if !self.mounted || self.state == PlaybackState::Failed {
            return;
        }

        match self.autoplay.observe(ratio) {
            VisibilityChange::Entered => {
                self.pause_when_settled = false;
                if self.autoplay.should_attempt(self.user_interacted)
                    && self.pending_play.is_none()
                    && self.state != PlaybackState::Playing
                {
                    self.attempt_autoplay();
                }
            }
            VisibilityChange::Left => {
                if self.user_interacted {
                    return;
                }
                if self.pending_play.is_some() {
                    debug!(session = %self.id, "Out of view during pending play, deferring pause");
                    self.pause_when_settled = true;
                } else if self.state == PlaybackState::Playing {
                    debug!(session = %self.id, "Video out of view, pausing");
                    self.pause_now();
                }
            }
            VisibilityChange::Unchanged => {}
        }
    }

    /// Apply the control overlay's inactivity timeout
    ///
    /// Hosts call this from their frame or timer loop.
    pub fn tick(&mut self) {
        if !self.mounted {
            return;
        }
        let playing = self.state == PlaybackState::Playing && !self.buffering;
        if self.controls.tick(self.clock.now(), playing) {
            self.events
                .push(PlayerEvent::ControlsVisibilityChanged { visible: false });
        }
    }

    /// Pointer moved over the player: show controls without counting as a
    /// manual action
    pub fn pointer_activity(&mut self) {
        if !self.mounted {
            return;
        }
        self.reveal_controls();
    }

    // ===== Manual transport =====

    /// Play/pause toggle
    ///
    /// No-op while a play request is in flight or once the session failed.
    pub fn toggle_play(&mut self) {
        if !self.mounted || self.state == PlaybackState::Failed {
            return;
        }
        if self.pending_play.is_some() {
            debug!(session = %self.id, "Play operation in progress, ignoring toggle");
            return;
        }

        self.mark_interaction();

        if self.state == PlaybackState::Playing {
            self.pause_now();
        } else {
            self.request_play(PlayOrigin::Manual);
        }
    }

    /// Seek to a fraction of the duration
    ///
    /// The fraction is clamped into [0, 1]. No-op while the duration is
    /// unknown.
    pub fn seek(&mut self, fraction: f64) {
        if !self.can_control() {
            return;
        }
        let Some(duration) = self.duration else {
            debug!(session = %self.id, "Seek ignored, duration unknown");
            return;
        };
        if fraction.is_nan() {
            debug!(session = %self.id, "Seek ignored, invalid fraction");
            return;
        }

        self.mark_interaction();
        self.move_playhead(fraction.clamp(0.0, 1.0) * duration);
    }

    /// Skip relative to the playhead, clamped to [0, duration]
    ///
    /// No-op while the duration is unknown.
    pub fn skip(&mut self, delta_seconds: f64) {
        if !self.can_control() {
            return;
        }
        let Some(duration) = self.duration else {
            debug!(session = %self.id, "Skip ignored, duration unknown");
            return;
        };
        if delta_seconds.is_nan() {
            return;
        }

        self.mark_interaction();
        self.move_playhead((self.current_time + delta_seconds).clamp(0.0, duration));
    }

    /// Skip forward by the configured step
    pub fn skip_forward(&mut self) {
        self.skip(self.config.skip_seconds);
    }

    /// Skip backward by the configured step
    pub fn skip_backward(&mut self) {
        self.skip(-self.config.skip_seconds);
    }

    /// Set volume (clamped to 0.0-1.0)
    ///
    /// 0 forces mute; an audible level unmutes.
    pub fn set_volume(&mut self, volume: f64) {
        if !self.can_control() {
            return;
        }
        self.mark_interaction();
        self.volume.set_level(volume);
        self.push_volume();
    }

    /// Toggle mute
    ///
    /// Unmuting a silent player restores the configured audible level.
    pub fn toggle_mute(&mut self) {
        if !self.can_control() {
            return;
        }
        self.mark_interaction();
        self.volume.toggle_mute();
        self.push_volume();
    }

    /// Treat the current source as failed and move to the next one
    ///
    /// Fails the session when no candidates remain.
    pub fn advance_source(&mut self) {
        if !self.mounted || self.state == PlaybackState::Failed {
            return;
        }
        self.advance_source_with("source rejected by host");
    }

    // ===== State queries =====

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Stored playback state (never `Buffering`)
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// State to display: `Buffering` while stalled, otherwise [`Self::state`]
    pub fn display_state(&self) -> PlaybackState {
        if self.buffering && self.state != PlaybackState::Failed {
            PlaybackState::Buffering
        } else {
            self.state
        }
    }

    pub fn current_source_index(&self) -> usize {
        self.sources.current_index()
    }

    /// Source loaded in the element, `None` once failed
    pub fn current_source(&self) -> Option<&str> {
        self.sources.current()
    }

    /// Candidate sources after filtering
    pub fn sources(&self) -> &[String] {
        self.sources.as_slice()
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Duration, unknown until metadata loads
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn volume(&self) -> f64 {
        self.volume.level()
    }

    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    pub fn is_buffering(&self) -> bool {
        self.buffering
    }

    pub fn user_interacted(&self) -> bool {
        self.user_interacted
    }

    pub fn autoplay_attempted(&self) -> bool {
        self.autoplay.attempted()
    }

    pub fn autoplay_phase(&self) -> AutoplayPhase {
        self.autoplay.phase()
    }

    pub fn is_visible(&self) -> bool {
        self.autoplay.is_visible()
    }

    /// Whether a play request is awaiting the host
    pub fn is_play_in_flight(&self) -> bool {
        self.pending_play.is_some()
    }

    pub fn controls_visible(&self) -> bool {
        self.controls.is_visible()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// `Ok` while the session can still play
    pub fn check(&self) -> Result<()> {
        if !self.mounted {
            return Err(PlaybackError::Unmounted);
        }
        if self.sources.is_exhausted() {
            return Err(PlaybackError::SourcesExhausted);
        }
        Ok(())
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// The driven media element
    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut E {
        &mut self.element
    }

    /// What the player surface should show
    pub fn surface(&self) -> PlayerSurface {
        if self.state == PlaybackState::Failed {
            return PlayerSurface::ErrorPanel {
                title: self.title.clone(),
                message: self.config.error_message.clone(),
            };
        }

        let duration = self.duration.unwrap_or(0.0);
        PlayerSurface::Player(PlayerView {
            title: self.title.clone(),
            poster: self
                .poster
                .clone()
                .unwrap_or_else(|| self.config.placeholder_poster.clone()),
            source: self.sources.current().map(str::to_string),
            state: self.display_state(),
            affordance: if self.state == PlaybackState::Playing {
                PlayAffordance::Pause
            } else {
                PlayAffordance::Play
            },
            progress_percent: progress_percent(self.current_time, self.duration),
            time_label: format!(
                "{} / {}",
                format_time(self.current_time),
                format_time(duration)
            ),
            buffering: self.buffering,
            controls_visible: self.controls.is_visible(),
            muted: self.volume.is_muted(),
            volume: self.volume.level(),
        })
    }

    // ===== Events =====

    /// Drain all pending events
    ///
    /// Returns all events emitted since the last drain. Hosts call this after
    /// every interaction to synchronize the UI.
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        self.events.drain()
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    // ===== Internal: sources =====

    /// Load the current candidate, walking past sources that fail to load
    fn load_current_source(&mut self) {
        loop {
            let Some(uri) = self.sources.current().map(str::to_string) else {
                self.fail("all sources exhausted");
                return;
            };
            let index = self.sources.current_index();

            self.reset_playhead();
            self.set_state(PlaybackState::Loading);
            debug!(
                session = %self.id,
                index,
                kind = ?SourceKind::classify(&uri),
                "Loading video source {}",
                uri
            );
            self.events.push(PlayerEvent::SourceLoading {
                index,
                uri: uri.clone(),
            });

            match self.element.load(&uri) {
                Ok(()) => return,
                Err(e) => {
                    warn!(session = %self.id, index, "Video error with source {}: {}", uri, e);
                    self.events.push(PlayerEvent::SourceFailed { index, uri });
                    match self.sources.advance() {
                        Advance::Next { .. } => {
                            info!(session = %self.id, "Trying next video source");
                        }
                        Advance::Exhausted => {
                            self.fail(&e.to_string());
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Current source failed: remember wanted playback, then move on
    fn advance_source_with(&mut self, reason: &str) {
        let index = self.sources.current_index();
        let uri = self.sources.current().unwrap_or_default().to_string();
        warn!(session = %self.id, index, "Video error with source {}: {}", uri, reason);
        self.events.push(PlayerEvent::SourceFailed { index, uri });

        // Carry playback intent over to the replacement source
        let interrupted = self.pending_play.take().map(|p| p.origin);
        let resume = match interrupted {
            Some(PlayOrigin::Autoplay) => Some(PlayOrigin::Autoplay),
            Some(_) => Some(PlayOrigin::Resume),
            None if self.state == PlaybackState::Playing => Some(PlayOrigin::Resume),
            None => self.resume_on_ready,
        };
        self.pause_when_settled = false;

        match self.sources.advance() {
            Advance::Next { .. } => {
                info!(session = %self.id, "Trying next video source");
                self.resume_on_ready = resume;
                self.load_current_source();
            }
            Advance::Exhausted => self.fail(reason),
        }
    }

    /// Every candidate failed: terminal
    fn fail(&mut self, reason: &str) {
        error!(session = %self.id, title = %self.title, "All video sources failed: {}", reason);
        self.pending_play = None;
        self.pause_when_settled = false;
        self.resume_on_ready = None;
        self.buffering = false;
        self.autoplay.abandon();
        self.events.push(PlayerEvent::SourcesExhausted);
        self.set_state(PlaybackState::Failed);
    }

    fn on_metadata(&mut self, duration: f64) {
        if duration.is_finite() && duration > 0.0 {
            self.duration = Some(duration);
            debug!(session = %self.id, duration, "Video metadata loaded");
            self.events.push(PlayerEvent::DurationChanged { duration });
        }

        if self.state == PlaybackState::Loading && self.pending_play.is_none() {
            self.set_state(PlaybackState::Paused);
        }

        if let Some(origin) = self.resume_on_ready.take() {
            // Autoplay carried over only while still in view
            if origin != PlayOrigin::Autoplay || self.autoplay.is_visible() {
                self.request_play(origin);
            } else {
                debug!(session = %self.id, "Out of view on new source, dropping autoplay");
                self.autoplay.abandon();
            }
        }
    }

    // ===== Internal: play/pause =====

    fn attempt_autoplay(&mut self) {
        info!(session = %self.id, "Attempting autoplay");
        self.autoplay.begin();
        self.events.push(PlayerEvent::AutoplayAttempted);

        // Unmuted autoplay is broadly disallowed
        self.volume.mute();
        self.push_volume();

        self.request_play(PlayOrigin::Autoplay);
    }

    /// Issue a play request unless one is already in flight
    fn request_play(&mut self, origin: PlayOrigin) {
        if self.pending_play.is_some() || self.state == PlaybackState::Failed {
            return;
        }

        let ticket = PlayTicket(self.next_ticket);
        self.next_ticket += 1;
        self.events.push(PlayerEvent::PlayRequested { origin });

        match self.element.play(ticket) {
            Ok(PlayDispatch::Started) => self.play_succeeded(origin),
            Ok(PlayDispatch::Pending) => {
                self.pending_play = Some(PendingPlay { ticket, origin });
            }
            Err(e) => self.play_failed(origin, &e.to_string()),
        }
    }

    fn on_play_settled(&mut self, ticket: PlayTicket, error: Option<String>) {
        let Some(pending) = self.pending_play else {
            debug!(session = %self.id, ?ticket, "Ignoring settlement with no play in flight");
            return;
        };
        if pending.ticket != ticket {
            debug!(session = %self.id, ?ticket, "Ignoring stale play settlement");
            return;
        }
        self.pending_play = None;

        match error {
            None => {
                self.play_succeeded(pending.origin);
                if std::mem::take(&mut self.pause_when_settled)
                    && !self.autoplay.is_visible()
                    && !self.user_interacted
                {
                    debug!(session = %self.id, "Applying deferred pause");
                    self.pause_now();
                }
            }
            Some(reason) => {
                self.pause_when_settled = false;
                self.play_failed(pending.origin, &reason);
            }
        }
    }

    fn play_succeeded(&mut self, origin: PlayOrigin) {
        if origin == PlayOrigin::Autoplay {
            info!(session = %self.id, "Autoplay successful");
            self.autoplay.finish(true);
        } else {
            debug!(session = %self.id, ?origin, "Play successful");
        }
        self.set_state(PlaybackState::Playing);
    }

    fn play_failed(&mut self, origin: PlayOrigin, reason: &str) {
        match origin {
            PlayOrigin::Autoplay => {
                // Environment policy, not a broken source
                info!(session = %self.id, "Autoplay prevented: {}", reason);
                self.autoplay.finish(false);
                self.events.push(PlayerEvent::AutoplayRejected);
                self.set_state(PlaybackState::Paused);
            }
            PlayOrigin::Manual => {
                // A refused user-initiated play means the source is broken
                warn!(session = %self.id, "Play prevented: {}", reason);
                self.set_state(PlaybackState::Paused);
                self.resume_on_ready = Some(PlayOrigin::Resume);
                self.advance_source_with(reason);
            }
            PlayOrigin::Resume => {
                // Not user-initiated, so the host may refuse it on policy
                info!(session = %self.id, "Resume prevented: {}", reason);
                self.set_state(PlaybackState::Paused);
            }
        }
    }

    /// Pause immediately; callers guarantee no play is in flight
    fn pause_now(&mut self) {
        debug_assert!(self.pending_play.is_none());
        self.element.pause();
        self.set_state(PlaybackState::Paused);
    }

    // ===== Internal: helpers =====

    fn can_control(&self) -> bool {
        self.mounted && self.state != PlaybackState::Failed
    }

    fn mark_interaction(&mut self) {
        if !self.user_interacted {
            debug!(session = %self.id, "User took control of playback");
        }
        self.user_interacted = true;
        // The user owns playback now; an earlier scroll-away no longer counts
        self.pause_when_settled = false;
        self.reveal_controls();
    }

    fn reveal_controls(&mut self) {
        if self.controls.reveal(self.clock.now()) {
            self.events
                .push(PlayerEvent::ControlsVisibilityChanged { visible: true });
        }
    }

    fn move_playhead(&mut self, seconds: f64) {
        self.element.set_current_time(seconds);
        self.current_time = seconds;
        self.emit_position();
    }

    fn reset_playhead(&mut self) {
        self.current_time = 0.0;
        self.duration = None;
        self.set_buffering(false);
    }

    fn push_volume(&mut self) {
        self.element.set_volume(self.volume.level());
        self.element.set_muted(self.volume.is_muted());
        self.events.push(PlayerEvent::VolumeChanged {
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
        });
    }

    fn set_buffering(&mut self, buffering: bool) {
        if self.buffering != buffering {
            self.buffering = buffering;
            self.events.push(PlayerEvent::BufferingChanged { buffering });
            if buffering && self.controls.pin() {
                self.events
                    .push(PlayerEvent::ControlsVisibilityChanged { visible: true });
            }
        }
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state == state {
            return;
        }
        self.state = state;
        self.events.push(PlayerEvent::StateChanged { state });

        // Entering Playing restarts the hide timer; anything else keeps
        // controls up
        let changed = if state == PlaybackState::Playing {
            self.controls.reveal(self.clock.now())
        } else {
            self.controls.pin()
        };
        if changed {
            self.events
                .push(PlayerEvent::ControlsVisibilityChanged { visible: true });
        }
    }

    fn emit_position(&mut self) {
        self.events.push(PlayerEvent::PositionUpdate {
            current_time: self.current_time,
            duration: self.duration,
        });
    }
}
