//! Scripted playback scenarios
//!
//! A scenario names the candidate sources, which of them are broken, how the
//! environment answers play requests, and a list of steps to replay against
//! a session. The scripted element answers the way a browser would: broken
//! sources fail after loading, working sources report metadata, and play
//! promises settle on the next pump unless settlement is manual.

use anyhow::Context;
use reel_playback::{
    ManualClock, MediaElement, MediaEvent, PlayDispatch, PlayTicket, PlaybackSession,
    PlayerConfig, PlayerEvent, PlayerSurface, SessionOptions, SourceCatalog,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Duration reported for working sources without an explicit one
const DEFAULT_DURATION: f64 = 60.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub title: String,

    #[serde(default)]
    pub sources: Vec<String>,

    #[serde(default)]
    pub poster: Option<String>,

    /// Falls back to the configured default
    #[serde(default)]
    pub autoplay: Option<bool>,

    /// Sources that fail once loaded
    #[serde(default)]
    pub broken: HashSet<String>,

    /// Duration reported by working sources
    #[serde(default)]
    pub duration: Option<f64>,

    /// Reject the first N play requests with NotAllowedError
    #[serde(default)]
    pub reject_plays: usize,

    /// Keep play requests pending until a `settle` step
    #[serde(default)]
    pub manual_settle: bool,

    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Step {
    Visibility { ratio: f64 },
    TogglePlay,
    Seek { fraction: f64 },
    Skip { seconds: f64 },
    SkipForward,
    SkipBackward,
    SetVolume { volume: f64 },
    ToggleMute,
    Pointer,
    AdvanceSource,
    /// Move the clock forward and run the controls timer
    Wait { ms: u64 },
    /// Settle pending play requests (manual settlement only)
    Settle,
    /// Inject a raw media event
    Media { event: MediaEvent },
    Unmount,
}

impl Scenario {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid scenario")
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Candidate sources: the scenario's own, then the catalog's for the title
    pub fn candidates(&self, catalog: Option<&SourceCatalog>) -> Vec<String> {
        let mut sources = self.sources.clone();
        if let Some(catalog) = catalog {
            sources.extend(catalog.resolve(&self.title, None));
        }
        sources
    }
}

/// Element that plays back a scripted environment
#[derive(Debug)]
pub struct ScriptedElement {
    broken: HashSet<String>,
    duration: f64,
    reject_plays: usize,
    manual_settle: bool,
    outbox: VecDeque<MediaEvent>,
    held: Vec<PlayTicket>,
}

impl ScriptedElement {
    pub fn new(scenario: &Scenario) -> Self {
        Self {
            broken: scenario.broken.clone(),
            duration: scenario.duration.unwrap_or(DEFAULT_DURATION),
            reject_plays: scenario.reject_plays,
            manual_settle: scenario.manual_settle,
            outbox: VecDeque::new(),
            held: Vec::new(),
        }
    }

    /// Release held play requests into the outbox
    fn release(&mut self) {
        for ticket in std::mem::take(&mut self.held) {
            self.settle(ticket);
        }
    }

    fn settle(&mut self, ticket: PlayTicket) {
        let event = if self.reject_plays > 0 {
            self.reject_plays -= 1;
            MediaEvent::play_rejected(ticket, "NotAllowedError")
        } else {
            MediaEvent::play_resolved(ticket)
        };
        self.outbox.push_back(event);
    }

    fn next_event(&mut self) -> Option<MediaEvent> {
        self.outbox.pop_front()
    }
}

impl MediaElement for ScriptedElement {
    fn load(&mut self, uri: &str) -> reel_playback::Result<()> {
        // A new source drops anything the old one still had queued
        self.outbox.clear();
        self.held.clear();

        if self.broken.contains(uri) {
            self.outbox.push_back(MediaEvent::Failed {
                message: format!("MEDIA_ERR_SRC_NOT_SUPPORTED: {uri}"),
            });
        } else {
            self.outbox.push_back(MediaEvent::MetadataLoaded {
                duration: self.duration,
            });
        }
        Ok(())
    }

    fn play(&mut self, ticket: PlayTicket) -> reel_playback::Result<PlayDispatch> {
        if self.manual_settle {
            self.held.push(ticket);
        } else {
            self.settle(ticket);
        }
        Ok(PlayDispatch::Pending)
    }

    fn pause(&mut self) {}

    fn set_current_time(&mut self, _seconds: f64) {}

    fn set_volume(&mut self, _volume: f64) {}

    fn set_muted(&mut self, _muted: bool) {}
}

/// One line of simulator output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "record", rename_all = "camelCase")]
pub enum Record {
    /// Events drained after a step (`step` is `None` for the mount)
    Event {
        step: Option<usize>,
        event: PlayerEvent,
    },
    /// Final render model
    Surface(PlayerSurface),
}

/// Replay a scenario and collect every event plus the final surface
pub fn run(
    scenario: &Scenario,
    config: PlayerConfig,
    catalog: Option<&SourceCatalog>,
) -> Vec<Record> {
    let clock = ManualClock::new();
    let mut options = SessionOptions::from_config(
        scenario.title.clone(),
        scenario.candidates(catalog),
        &config,
    );
    if let Some(autoplay) = scenario.autoplay {
        options = options.with_autoplay(autoplay);
    }
    if let Some(poster) = &scenario.poster {
        options = options.with_poster(poster.clone());
    }

    let mut session = PlaybackSession::mount_with(
        options,
        config,
        ScriptedElement::new(scenario),
        clock.clone(),
    );
    info!(session = %session.id(), steps = scenario.steps.len(), "Running scenario");

    let mut records = Vec::new();
    pump(&mut session);
    collect(&mut session, None, &mut records);

    for (index, step) in scenario.steps.iter().enumerate() {
        debug!(step = index, ?step, "Applying step");
        apply(&mut session, &clock, step);
        pump(&mut session);
        collect(&mut session, Some(index), &mut records);
    }

    match session.check() {
        Ok(()) => info!(state = %session.display_state(), "Scenario finished"),
        Err(e) => warn!("Scenario finished without playback: {}", e),
    }

    records.push(Record::Surface(session.surface()));
    records
}

type SimSession = PlaybackSession<ScriptedElement, ManualClock>;

fn apply(session: &mut SimSession, clock: &ManualClock, step: &Step) {
    match step {
        Step::Visibility { ratio } => session.on_visibility_changed(*ratio),
        Step::TogglePlay => session.toggle_play(),
        Step::Seek { fraction } => session.seek(*fraction),
        Step::Skip { seconds } => session.skip(*seconds),
        Step::SkipForward => session.skip_forward(),
        Step::SkipBackward => session.skip_backward(),
        Step::SetVolume { volume } => session.set_volume(*volume),
        Step::ToggleMute => session.toggle_mute(),
        Step::Pointer => session.pointer_activity(),
        Step::AdvanceSource => session.advance_source(),
        Step::Wait { ms } => {
            clock.advance(Duration::from_millis(*ms));
            session.tick();
        }
        Step::Settle => session.element_mut().release(),
        Step::Media { event } => session.handle_media_event(event.clone()),
        Step::Unmount => session.unmount(),
    }
}

/// Deliver queued element notifications until the element goes quiet
fn pump(session: &mut SimSession) {
    while let Some(event) = session.element_mut().next_event() {
        session.handle_media_event(event);
    }
}

fn collect(session: &mut SimSession, step: Option<usize>, records: &mut Vec<Record>) {
    records.extend(
        session
            .drain_events()
            .into_iter()
            .map(|event| Record::Event { step, event }),
    );
}
