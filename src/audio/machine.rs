//! Audio playback state machine
//!
//! States are addressed by dotted paths (`playing.playing`) and carry tags
//! (`loading`), which is all the play/pause control gets to see.

use std::collections::BTreeSet;

use crate::backend::types::AudioData;

pub const LOADING_TAG: &str = "loading";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayingState {
    Playing,
    Buffering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    Idle,
    Loading,
    Playing(PlayingState),
    Paused,
}

impl PlayerState {
    pub fn path(&self) -> &'static str {
        match self {
            PlayerState::Idle => "idle",
            PlayerState::Loading => "loading",
            PlayerState::Playing(PlayingState::Playing) => "playing.playing",
            PlayerState::Playing(PlayingState::Buffering) => "playing.buffering",
            PlayerState::Paused => "paused",
        }
    }

    /// True when `path` names this state or one of its ancestors
    pub fn matches(&self, path: &str) -> bool {
        let own = self.path();
        match own.strip_prefix(path) {
            Some(rest) => rest.is_empty() || rest.starts_with('.'),
            None => false,
        }
    }

    pub fn tags(&self) -> BTreeSet<&'static str> {
        match self {
            PlayerState::Loading | PlayerState::Playing(PlayingState::Buffering) => {
                BTreeSet::from([LOADING_TAG])
            }
            _ => BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    RequestPlay,
    RequestPause,
    /// Load a chapter and start playing it once loaded
    PlayAudio { chapter: u16, reciter: u32 },
    /// Audio fetched for `reciter`; stale unless it answers the pending load
    AudioLoaded { reciter: u32, data: AudioData },
    LoadFailed { chapter: u16, reciter: u32 },
    Buffering,
    Buffered,
    Ended,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioMachine {
    state: PlayerState,
    /// Chapter and reciter of the load in progress
    pending: Option<(u16, u32)>,
}

impl AudioMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Apply an event; returns false when the current state ignores it
    pub fn transition(&mut self, event: AudioEvent) -> bool {
        use PlayerState::*;

        let next = match (self.state, event) {
            (_, AudioEvent::PlayAudio { chapter, reciter }) => {
                self.pending = Some((chapter, reciter));
                Loading
            }
            (Loading, AudioEvent::AudioLoaded { reciter, data }) => {
                if self.pending != Some((data.chapter_id, reciter)) {
                    tracing::debug!(chapter = data.chapter_id, reciter, "ignoring audio for a superseded load");
                    return false;
                }
                self.pending = None;
                Playing(PlayingState::Playing)
            }
            (Loading, AudioEvent::LoadFailed { chapter, reciter }) => {
                if self.pending != Some((chapter, reciter)) {
                    return false;
                }
                self.pending = None;
                Idle
            }
            (Playing(_), AudioEvent::RequestPause) => Paused,
            (Playing(PlayingState::Playing), AudioEvent::Buffering) => Playing(PlayingState::Buffering),
            (Playing(PlayingState::Buffering), AudioEvent::Buffered) => Playing(PlayingState::Playing),
            (Playing(_), AudioEvent::Ended) => Paused,
            (Paused, AudioEvent::RequestPlay) => Playing(PlayingState::Playing),
            (state, event) => {
                tracing::debug!(state = state.path(), ?event, "audio event ignored");
                return false;
            }
        };

        tracing::debug!(from = self.state.path(), to = next.path(), "audio transition");
        self.state = next;
        true
    }
}
