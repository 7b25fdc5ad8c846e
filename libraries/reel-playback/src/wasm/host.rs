//! JavaScript media host adapter
//!
//! The host is any JS object with these methods, usually a thin shim over a
//! `<video>` element:
//!
//! ```js
//! const host = {
//!   load(uri) { video.src = uri; video.load(); },
//!   play(ticket) {
//!     const p = video.play();
//!     if (!p) return false;
//!     p.then(() => player.handleMediaEvent({ type: "playSettled", ticket }),
//!            (e) => player.handleMediaEvent({ type: "playSettled", ticket, error: String(e) }));
//!     return true; // pending
//!   },
//!   pause() { video.pause(); },
//!   setCurrentTime(t) { video.currentTime = t; },
//!   setVolume(v) { video.volume = v; },
//!   setMuted(m) { video.muted = m; },
//! };
//! ```

use crate::{Clock, MediaElement, PlayDispatch, PlayTicket, PlaybackError, Result};
use js_sys::{Function, Reflect};
use std::time::Duration;
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};

/// [`MediaElement`] backed by a JS host object
pub struct JsMediaElement {
    host: JsValue,
}

impl JsMediaElement {
    pub fn new(host: JsValue) -> Self {
        Self { host }
    }

    fn call(&self, method: &str, arg: &JsValue) -> std::result::Result<JsValue, JsValue> {
        let function: Function = Reflect::get(&self.host, &JsValue::from_str(method))?
            .dyn_into()
            .map_err(|_| JsValue::from_str(&format!("media host has no {method}()")))?;
        function.call1(&self.host, arg)
    }

    /// Fire-and-forget call; failures are logged
    fn notify(&self, method: &str, arg: &JsValue) {
        if let Err(e) = self.call(method, arg) {
            warn!("Media host {}() failed: {}", method, describe(&e));
        }
    }
}

impl MediaElement for JsMediaElement {
    fn load(&mut self, uri: &str) -> Result<()> {
        self.call("load", &JsValue::from_str(uri))
            .map(|_| ())
            .map_err(js_error)
    }

    fn play(&mut self, ticket: PlayTicket) -> Result<PlayDispatch> {
        // JS numbers are f64; tickets stay far below 2^53
        let pending = self
            .call("play", &JsValue::from_f64(ticket.0 as f64))
            .map_err(js_error)?;

        if pending.is_truthy() {
            Ok(PlayDispatch::Pending)
        } else {
            Ok(PlayDispatch::Started)
        }
    }

    fn pause(&mut self) {
        self.notify("pause", &JsValue::UNDEFINED);
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.notify("setCurrentTime", &JsValue::from_f64(seconds));
    }

    fn set_volume(&mut self, volume: f64) {
        self.notify("setVolume", &JsValue::from_f64(volume));
    }

    fn set_muted(&mut self, muted: bool) {
        self.notify("setMuted", &JsValue::from_bool(muted));
    }
}

/// Clock backed by `Date.now()`
pub struct JsClock {
    origin_ms: f64,
}

impl JsClock {
    pub fn new() -> Self {
        Self {
            origin_ms: js_sys::Date::now(),
        }
    }
}

impl Default for JsClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for JsClock {
    fn now(&self) -> Duration {
        let elapsed_ms = (js_sys::Date::now() - self.origin_ms).max(0.0);
        Duration::from_secs_f64(elapsed_ms / 1000.0)
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn js_error(value: JsValue) -> PlaybackError {
    PlaybackError::MediaElement(describe(&value))
}
