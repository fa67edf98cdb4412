//! Audio playback: state machine, player service and the play/pause control

use std::collections::BTreeSet;

pub mod button;
pub mod machine;
pub mod player;

pub use button::{ButtonView, PlayPauseButton};
pub use player::AudioPlayer;

/// Commands the play/pause control may send to the audio subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCommand {
    RequestPlay,
    RequestPause,
    LoadAndPlay { chapter: u16, reciter: u32 },
}

/// Narrow view of the audio subsystem: query tags and states, send commands
pub trait AudioService {
    fn current_tags(&self) -> BTreeSet<&'static str>;

    fn has_tag(&self, tag: &str) -> bool {
        self.current_tags().contains(tag)
    }

    /// Whether the current state is `path` or nested under it
    fn matches(&self, path: &str) -> bool;

    fn send(&self, command: AudioCommand);
}
