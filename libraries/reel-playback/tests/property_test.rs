//! Property-based tests for the playback session
//!
//! Uses proptest to verify invariants across random interaction sequences.

use proptest::prelude::*;
use reel_playback::{
    format_time, ManualClock, MediaElement, MediaEvent, PlayDispatch, PlayTicket, PlaybackSession,
    PlaybackState, PlayerConfig, PlayerSurface, SessionOptions,
};
use std::time::Duration;

// ===== Helpers =====

/// Element that loads everything and leaves plays pending
#[derive(Default)]
struct PendingElement {
    last_ticket: Option<PlayTicket>,
    plays: usize,
}

impl MediaElement for PendingElement {
    fn load(&mut self, _uri: &str) -> reel_playback::Result<()> {
        Ok(())
    }

    fn play(&mut self, ticket: PlayTicket) -> reel_playback::Result<PlayDispatch> {
        self.last_ticket = Some(ticket);
        self.plays += 1;
        Ok(PlayDispatch::Pending)
    }

    fn pause(&mut self) {}
    fn set_current_time(&mut self, _seconds: f64) {}
    fn set_volume(&mut self, _volume: f64) {}
    fn set_muted(&mut self, _muted: bool) {}
}

#[derive(Debug, Clone)]
enum Action {
    Visibility(f64),
    Toggle,
    Seek(f64),
    Skip(f64),
    Volume(f64),
    Mute,
    Metadata(f64),
    Time(f64),
    SettleOk,
    SettleErr,
    SourceFailed,
    Stalled,
    Resumed,
    Ended,
    Wait(u64),
}

fn arbitrary_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0.0f64..=1.0).prop_map(Action::Visibility),
        Just(Action::Toggle),
        (-0.5f64..1.5).prop_map(Action::Seek),
        (-30.0f64..30.0).prop_map(Action::Skip),
        (-0.5f64..1.5).prop_map(Action::Volume),
        Just(Action::Mute),
        (1.0f64..600.0).prop_map(Action::Metadata),
        (0.0f64..600.0).prop_map(Action::Time),
        Just(Action::SettleOk),
        Just(Action::SettleErr),
        Just(Action::SourceFailed),
        Just(Action::Stalled),
        Just(Action::Resumed),
        Just(Action::Ended),
        (0u64..5000).prop_map(Action::Wait),
    ]
}

fn apply(session: &mut PlaybackSession<PendingElement, ManualClock>, clock: &ManualClock, action: Action) {
    match action {
        Action::Visibility(ratio) => session.on_visibility_changed(ratio),
        Action::Toggle => session.toggle_play(),
        Action::Seek(fraction) => session.seek(fraction),
        Action::Skip(delta) => session.skip(delta),
        Action::Volume(volume) => session.set_volume(volume),
        Action::Mute => session.toggle_mute(),
        Action::Metadata(duration) => {
            session.handle_media_event(MediaEvent::MetadataLoaded { duration })
        }
        Action::Time(current_time) => {
            session.handle_media_event(MediaEvent::TimeUpdate { current_time })
        }
        Action::SettleOk | Action::SettleErr => {
            if let Some(ticket) = session.element().last_ticket {
                let event = if matches!(action, Action::SettleOk) {
                    MediaEvent::play_resolved(ticket)
                } else {
                    MediaEvent::play_rejected(ticket, "NotAllowedError")
                };
                session.handle_media_event(event);
            }
        }
        Action::SourceFailed => session.handle_media_event(MediaEvent::Failed {
            message: "network".into(),
        }),
        Action::Stalled => session.handle_media_event(MediaEvent::Stalled),
        Action::Resumed => session.handle_media_event(MediaEvent::Resumed),
        Action::Ended => session.handle_media_event(MediaEvent::Ended),
        Action::Wait(ms) => {
            clock.advance(Duration::from_millis(ms));
            session.tick();
        }
    }
}

// ===== Property Tests =====

proptest! {
    /// Property: the source index never moves backwards and stays in range
    #[test]
    fn source_index_is_monotonic(
        source_count in 1usize..6,
        autoplay in any::<bool>(),
        actions in prop::collection::vec(arbitrary_action(), 1..80)
    ) {
        let sources: Vec<String> = (0..source_count).map(|i| format!("/videos/{i}.mp4")).collect();
        let clock = ManualClock::new();
        let mut session = PlaybackSession::mount_with(
            SessionOptions::new("Prop", sources).with_autoplay(autoplay),
            PlayerConfig::default(),
            PendingElement::default(),
            clock.clone(),
        );

        let mut last_index = session.current_source_index();
        for action in actions {
            apply(&mut session, &clock, action);

            let index = session.current_source_index();
            prop_assert!(index >= last_index, "index went from {} to {}", last_index, index);
            prop_assert!(index < source_count);
            last_index = index;

            // Failed is terminal and renders only the error panel
            if session.state() == PlaybackState::Failed {
                prop_assert!(session.surface().is_error_panel());
                prop_assert!(!session.is_play_in_flight());
            }
        }
    }

    /// Property: autoplay is attempted at most once however visibility changes
    #[test]
    fn autoplay_at_most_once(
        ratios in prop::collection::vec(0.0f64..=1.0, 1..60),
        settle in prop::collection::vec(any::<bool>(), 60)
    ) {
        let clock = ManualClock::new();
        let mut session = PlaybackSession::mount_with(
            SessionOptions::new("Prop", vec!["/videos/a.mp4".into()]).with_autoplay(true),
            PlayerConfig::default(),
            PendingElement::default(),
            clock.clone(),
        );
        session.handle_media_event(MediaEvent::MetadataLoaded { duration: 30.0 });

        for (ratio, resolve) in ratios.into_iter().zip(settle) {
            session.on_visibility_changed(ratio);
            if resolve {
                apply(&mut session, &clock, Action::SettleOk);
            }
        }

        prop_assert!(session.element().plays <= 1);
    }

    /// Property: seeking lands exactly on clamp(fraction) * duration
    #[test]
    fn seek_lands_on_fraction_of_duration(
        duration in 1.0f64..10_000.0,
        fraction in -1.0f64..2.0
    ) {
        let clock = ManualClock::new();
        let mut session = PlaybackSession::mount_with(
            SessionOptions::new("Prop", vec!["/videos/a.mp4".into()]),
            PlayerConfig::default(),
            PendingElement::default(),
            clock,
        );
        session.handle_media_event(MediaEvent::MetadataLoaded { duration });

        session.seek(fraction);
        prop_assert_eq!(session.current_time(), fraction.clamp(0.0, 1.0) * duration);
    }

    /// Property: the playhead stays within [0, duration] under skips
    #[test]
    fn skip_stays_in_bounds(
        duration in 1.0f64..1000.0,
        deltas in prop::collection::vec(-100.0f64..100.0, 1..40)
    ) {
        let clock = ManualClock::new();
        let mut session = PlaybackSession::mount_with(
            SessionOptions::new("Prop", vec!["/videos/a.mp4".into()]),
            PlayerConfig::default(),
            PendingElement::default(),
            clock,
        );
        session.handle_media_event(MediaEvent::MetadataLoaded { duration });

        for delta in deltas {
            session.skip(delta);
            let t = session.current_time();
            prop_assert!((0.0..=duration).contains(&t), "playhead {} outside 0..={}", t, duration);
        }
    }

    /// Property: the view's percentage stays within 0..=100
    #[test]
    fn progress_percent_is_bounded(
        duration in 0.5f64..1000.0,
        current in -10.0f64..2000.0
    ) {
        let clock = ManualClock::new();
        let mut session = PlaybackSession::mount_with(
            SessionOptions::new("Prop", vec!["/videos/a.mp4".into()]),
            PlayerConfig::default(),
            PendingElement::default(),
            clock,
        );
        session.handle_media_event(MediaEvent::MetadataLoaded { duration });
        session.handle_media_event(MediaEvent::TimeUpdate { current_time: current });

        match session.surface() {
            PlayerSurface::Player(view) => {
                prop_assert!((0.0..=100.0).contains(&view.progress_percent));
            }
            PlayerSurface::ErrorPanel { .. } => prop_assert!(false, "unexpected error panel"),
        }
    }

    /// Property: format_time always renders M:SS with two-digit seconds
    #[test]
    fn format_time_shape(seconds in -100.0f64..100_000.0) {
        let label = format_time(seconds);
        let (minutes, secs) = label.split_once(':').expect("missing colon");
        prop_assert!(minutes.parse::<u64>().is_ok());
        prop_assert_eq!(secs.len(), 2);
        prop_assert!(secs.parse::<u64>().unwrap() < 60);
    }
}
