//! Quran search drawer and audio play/pause control
//!
//! The search drawer debounces typed queries, keeps one request per settled
//! query and drops responses that arrive for superseded queries. The audio
//! side is a small playback machine behind the [`audio::AudioService`]
//! interface, driven by the play/pause button.

pub mod app;
pub mod audio;
pub mod backend;
pub mod chapters;
pub mod commands;
pub mod config;
pub mod error;
pub mod history;
pub mod search;
pub mod store;
pub mod telemetry;
pub mod ui;
