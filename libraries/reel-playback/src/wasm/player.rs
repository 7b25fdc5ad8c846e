//! WASM-compatible PlaybackSession wrapper

use super::host::{JsClock, JsMediaElement};
use crate::{MediaEvent, PlaybackError, PlaybackSession, PlayerConfig, SessionOptions};
use js_sys::Function;
use wasm_bindgen::prelude::*;

/// WASM-compatible video player
///
/// Wraps a [`PlaybackSession`] driving a JS media host. Every call that can
/// change state flushes queued events to the `onEvent` callback, if one is
/// registered; otherwise hosts poll with `drainEvents()`.
#[wasm_bindgen]
pub struct WasmVideoPlayer {
    inner: PlaybackSession<JsMediaElement, JsClock>,
    on_event: Option<Function>,
}

#[wasm_bindgen]
impl WasmVideoPlayer {
    /// Mount a player
    ///
    /// `options` is `{ title, sources, poster?, autoplay? }`, `host` the media
    /// host object, `config` an optional partial player configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(
        options: JsValue,
        host: JsValue,
        config: JsValue,
    ) -> Result<WasmVideoPlayer, JsValue> {
        // Enable panic hooks for better error messages in console
        console_error_panic_hook::set_once();

        let options: SessionOptions = serde_wasm_bindgen::from_value(options)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse options: {}", e)))?;

        let config = if config.is_undefined() || config.is_null() {
            PlayerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Failed to parse config: {}", e)))?
        };
        config.validate().map_err(to_js_error)?;

        Ok(Self {
            inner: PlaybackSession::mount_with(
                options,
                config,
                JsMediaElement::new(host),
                JsClock::new(),
            ),
            on_event: None,
        })
    }

    // ===== Host callbacks =====

    /// Forward a media element notification, e.g. `{ type: "timeUpdate", currentTime: 3.2 }`
    #[wasm_bindgen(js_name = handleMediaEvent)]
    pub fn handle_media_event(&mut self, event: JsValue) -> Result<(), JsValue> {
        let event: MediaEvent = serde_wasm_bindgen::from_value(event)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse media event: {}", e)))?;
        self.inner.handle_media_event(event);
        self.flush();
        Ok(())
    }

    /// Forward an IntersectionObserver ratio
    #[wasm_bindgen(js_name = onVisibilityChanged)]
    pub fn on_visibility_changed(&mut self, ratio: f64) {
        self.inner.on_visibility_changed(ratio);
        self.flush();
    }

    /// Drive the controls auto-hide timer
    pub fn tick(&mut self) {
        self.inner.tick();
        self.flush();
    }

    #[wasm_bindgen(js_name = pointerActivity)]
    pub fn pointer_activity(&mut self) {
        self.inner.pointer_activity();
        self.flush();
    }

    // ===== Playback Control =====

    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&mut self) {
        self.inner.toggle_play();
        self.flush();
    }

    /// Seek to a fraction (0.0 - 1.0) of the duration
    pub fn seek(&mut self, fraction: f64) {
        self.inner.seek(fraction);
        self.flush();
    }

    /// Skip by a signed number of seconds
    pub fn skip(&mut self, delta_seconds: f64) {
        self.inner.skip(delta_seconds);
        self.flush();
    }

    #[wasm_bindgen(js_name = skipForward)]
    pub fn skip_forward(&mut self) {
        self.inner.skip_forward();
        self.flush();
    }

    #[wasm_bindgen(js_name = skipBackward)]
    pub fn skip_backward(&mut self) {
        self.inner.skip_backward();
        self.flush();
    }

    // ===== Volume Control =====

    /// Set volume (0.0 - 1.0)
    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&mut self, volume: f64) {
        self.inner.set_volume(volume);
        self.flush();
    }

    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&mut self) {
        self.inner.toggle_mute();
        self.flush();
    }

    #[wasm_bindgen(js_name = isMuted)]
    pub fn is_muted(&self) -> bool {
        self.inner.is_muted()
    }

    #[wasm_bindgen(js_name = getVolume)]
    pub fn get_volume(&self) -> f64 {
        self.inner.volume()
    }

    // ===== State Queries =====

    /// Display state as a string ("idle", "loading", "playing", ...)
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        self.inner.display_state().as_str().to_string()
    }

    #[wasm_bindgen(js_name = getPosition)]
    pub fn get_position(&self) -> f64 {
        self.inner.current_time()
    }

    #[wasm_bindgen(js_name = getDuration)]
    pub fn get_duration(&self) -> Option<f64> {
        self.inner.duration()
    }

    #[wasm_bindgen(js_name = currentSourceIndex)]
    pub fn current_source_index(&self) -> usize {
        self.inner.current_source_index()
    }

    /// Throws once every source failed or after unmount
    pub fn check(&self) -> Result<(), JsValue> {
        self.inner.check().map_err(to_js_error)
    }

    /// Render model: `{ kind: "player", ... }` or `{ kind: "errorPanel", ... }`
    pub fn surface(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.inner.surface()).unwrap_or(JsValue::NULL)
    }

    /// Events queued since the last drain
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> JsValue {
        let events = self.inner.drain_events();
        serde_wasm_bindgen::to_value(&events).unwrap_or(JsValue::NULL)
    }

    /// Tear down; later calls are ignored
    pub fn unmount(&mut self) {
        self.inner.unmount();
    }

    // ===== Event Callbacks =====

    /// Receive each player event as it happens
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&mut self, callback: Function) {
        self.on_event = Some(callback);
        self.flush();
    }

    fn flush(&mut self) {
        let Some(cb) = &self.on_event else {
            return;
        };
        for event in self.inner.drain_events() {
            if let Ok(js_event) = serde_wasm_bindgen::to_value(&event) {
                cb.call1(&JsValue::NULL, &js_event).ok();
            }
        }
    }
}

fn to_js_error(error: PlaybackError) -> JsValue {
    JsValue::from_str(&error.to_string())
}
