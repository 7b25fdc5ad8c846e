//! WASM bindings for reel-playback
//!
//! This module lets a browser page drive a playback session with a real
//! `<video>` element. The page supplies a small host object that forwards
//! commands to the element, and feeds element events back in.

#[cfg(feature = "wasm")]
pub mod host;

#[cfg(feature = "wasm")]
pub mod player;

#[cfg(feature = "wasm")]
pub use host::{JsClock, JsMediaElement};

#[cfg(feature = "wasm")]
pub use player::WasmVideoPlayer;
