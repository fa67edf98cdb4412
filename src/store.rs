//! Application store
//!
//! Shared state handed explicitly to the search drawer and the play/pause
//! button. Each slice is a `watch` channel so consumers can both read the
//! current value and await changes.

use std::sync::Arc;

use tokio::sync::watch;

use crate::backend::types::AudioData;
use crate::history::SearchHistory;

/// Audio player slice
#[derive(Debug, Clone, PartialEq)]
pub struct AudioPlayerSettings {
    pub playback_rate: f32,
    pub reciter_id: u32,
    pub repeat_active: bool,
    pub audio_data: Option<AudioData>,
}

impl Default for AudioPlayerSettings {
    fn default() -> Self {
        Self {
            playback_rate: 1.0,
            reciter_id: 7,
            repeat_active: false,
            audio_data: None,
        }
    }
}

#[derive(Debug)]
struct StoreInner {
    selected_translations: watch::Sender<Vec<u32>>,
    search_drawer_open: watch::Sender<bool>,
    audio_player: watch::Sender<AudioPlayerSettings>,
    history: SearchHistory,
}

#[derive(Debug, Clone)]
pub struct AppStore {
    inner: Arc<StoreInner>,
}

impl AppStore {
    pub fn new(translations: Vec<u32>, audio_player: AudioPlayerSettings, history: SearchHistory) -> Self {
        let (selected_translations, _) = watch::channel(translations);
        let (search_drawer_open, _) = watch::channel(false);
        let (audio_player, _) = watch::channel(audio_player);
        Self {
            inner: Arc::new(StoreInner {
                selected_translations,
                search_drawer_open,
                audio_player,
                history,
            }),
        }
    }

    pub fn selected_translations(&self) -> Vec<u32> {
        self.inner.selected_translations.borrow().clone()
    }

    /// Replace the selected translations; returns false when the set is unchanged
    pub fn set_selected_translations(&self, ids: Vec<u32>) -> bool {
        self.inner.selected_translations.send_if_modified(|current| {
            if *current == ids {
                return false;
            }
            *current = ids;
            true
        })
    }

    pub fn subscribe_translations(&self) -> watch::Receiver<Vec<u32>> {
        self.inner.selected_translations.subscribe()
    }

    pub fn is_search_drawer_open(&self) -> bool {
        *self.inner.search_drawer_open.borrow()
    }

    pub fn set_search_drawer_open(&self, open: bool) {
        self.inner.search_drawer_open.send_if_modified(|current| {
            let changed = *current != open;
            *current = open;
            changed
        });
    }

    pub fn subscribe_drawer_open(&self) -> watch::Receiver<bool> {
        self.inner.search_drawer_open.subscribe()
    }

    pub fn audio_player(&self) -> AudioPlayerSettings {
        self.inner.audio_player.borrow().clone()
    }

    pub fn update_audio_player(&self, update: impl FnOnce(&mut AudioPlayerSettings)) {
        self.inner.audio_player.send_modify(update);
    }

    pub fn exit_repeat_mode(&self) {
        self.update_audio_player(|player| player.repeat_active = false);
    }

    pub fn history(&self) -> &SearchHistory {
        &self.inner.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> AppStore {
        AppStore::new(vec![131], AudioPlayerSettings::default(), SearchHistory::with_limit(10))
    }

    #[test]
    fn test_identical_translations_do_not_notify() {
        let store = store();
        let mut rx = store.subscribe_translations();
        rx.borrow_and_update();

        assert!(!store.set_selected_translations(vec![131]));
        assert!(!rx.has_changed().unwrap());

        assert!(store.set_selected_translations(vec![131, 20]));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), vec![131, 20]);
    }

    #[test]
    fn test_drawer_flag() {
        let store = store();
        assert!(!store.is_search_drawer_open());
        store.set_search_drawer_open(true);
        assert!(store.is_search_drawer_open());
    }

    #[test]
    fn test_exit_repeat_mode() {
        let store = store();
        store.update_audio_player(|player| player.repeat_active = true);
        store.exit_repeat_mode();
        assert!(!store.audio_player().repeat_active);
    }
}
