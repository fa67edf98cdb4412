//! Audio player service
//!
//! Owns the playback machine and loads chapter audio through an
//! [`AudioSource`]. The machine only tracks playback state; loaded audio
//! is kept in the store's audio player settings.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::watch;

use super::machine::{AudioEvent, AudioMachine};
use super::{AudioCommand, AudioService};
use crate::backend::AudioSource;
use crate::store::AppStore;

pub struct AudioPlayer<S: AudioSource> {
    source: Arc<S>,
    machine: Arc<watch::Sender<AudioMachine>>,
    store: AppStore,
}

impl<S: AudioSource> Clone for AudioPlayer<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            machine: Arc::clone(&self.machine),
            store: self.store.clone(),
        }
    }
}

impl<S: AudioSource> AudioPlayer<S> {
    pub fn new(source: Arc<S>, store: AppStore) -> Self {
        let (machine, _) = watch::channel(AudioMachine::new());
        Self {
            source,
            machine: Arc::new(machine),
            store,
        }
    }

    pub fn machine(&self) -> AudioMachine {
        self.machine.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AudioMachine> {
        self.machine.subscribe()
    }

    /// Feed an event to the machine; returns whether it changed state
    pub fn dispatch(&self, event: AudioEvent) -> bool {
        let loaded = match &event {
            AudioEvent::AudioLoaded { data, .. } => Some(data.clone()),
            _ => None,
        };

        let changed = self.machine.send_if_modified(|machine| machine.transition(event));
        if changed {
            if let Some(data) = loaded {
                tracing::info!(chapter = data.chapter_id, url = %data.audio_url, "audio loaded");
                self.store.update_audio_player(|player| player.audio_data = Some(data));
            }
        }
        changed
    }

    fn load(&self, chapter: u16, reciter: u32) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(chapter, "no async runtime to load audio on");
            self.dispatch(AudioEvent::LoadFailed { chapter, reciter });
            return;
        };

        let player = self.clone();
        runtime.spawn(async move {
            match player.source.chapter_audio(reciter, chapter).await {
                Ok(data) => {
                    player.dispatch(AudioEvent::AudioLoaded { reciter, data });
                }
                Err(e) => {
                    tracing::warn!(chapter, reciter, "failed to load audio: {}", e);
                    player.dispatch(AudioEvent::LoadFailed { chapter, reciter });
                }
            }
        });
    }
}

impl<S: AudioSource> AudioService for AudioPlayer<S> {
    fn current_tags(&self) -> BTreeSet<&'static str> {
        self.machine.borrow().state().tags()
    }

    fn matches(&self, path: &str) -> bool {
        self.machine.borrow().state().matches(path)
    }

    fn send(&self, command: AudioCommand) {
        match command {
            AudioCommand::RequestPlay => {
                let rate = self.store.audio_player().playback_rate;
                tracing::info!(playback_rate = rate, "play requested");
                self.dispatch(AudioEvent::RequestPlay);
            }
            AudioCommand::RequestPause => {
                self.dispatch(AudioEvent::RequestPause);
            }
            AudioCommand::LoadAndPlay { chapter, reciter } => {
                if self.dispatch(AudioEvent::PlayAudio { chapter, reciter }) {
                    self.load(chapter, reciter);
                }
            }
        }
    }
}
