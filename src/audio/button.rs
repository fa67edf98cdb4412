//! Play/pause control
//!
//! Picks its presentation from the audio service's tags and state paths and
//! turns clicks into audio commands. Playing a chapter other than the one
//! being read asks the user first.

use std::sync::Arc;

use super::machine::LOADING_TAG;
use super::{AudioCommand, AudioService};
use crate::chapters;
use crate::store::AppStore;
use crate::telemetry::{self, TelemetrySink};

const PLAY_BUTTON: &str = "audio_player_play";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonView {
    /// Disabled spinner
    Loading,
    Pause,
    Play,
    Hidden,
}

impl ButtonView {
    /// Translation key of the tooltip
    pub fn tooltip_key(&self) -> Option<&'static str> {
        match self {
            ButtonView::Loading => Some("loading"),
            ButtonView::Pause => Some("audio.player.pause"),
            ButtonView::Play => Some("audio.player.play"),
            ButtonView::Hidden => None,
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, ButtonView::Loading | ButtonView::Hidden)
    }
}

/// Shown when the loaded audio belongs to a chapter the reader is not on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MismatchPrompt {
    pub current_audio_chapter: Option<&'static str>,
    pub current_reading_chapter: Option<&'static str>,
}

pub struct PlayPauseButton {
    store: AppStore,
    telemetry: Arc<dyn TelemetrySink>,
    reading_chapters: Vec<u16>,
    mismatch_visible: bool,
}

impl PlayPauseButton {
    pub fn new(store: AppStore, telemetry: Arc<dyn TelemetrySink>) -> Self {
        Self {
            store,
            telemetry,
            reading_chapters: Vec::new(),
            mismatch_visible: false,
        }
    }

    /// Chapters on the current page; empty outside the reader (e.g. home page)
    pub fn set_reading_chapters(&mut self, chapters: Vec<u16>) {
        self.reading_chapters = chapters;
    }

    pub fn reading_chapters(&self) -> &[u16] {
        &self.reading_chapters
    }

    pub fn view(&self, audio: &dyn AudioService) -> ButtonView {
        if audio.has_tag(LOADING_TAG) {
            ButtonView::Loading
        } else if audio.matches("playing.playing") {
            ButtonView::Pause
        } else if audio.matches("paused") {
            ButtonView::Play
        } else {
            ButtonView::Hidden
        }
    }

    pub fn click(&mut self, audio: &dyn AudioService) {
        match self.view(audio) {
            ButtonView::Pause => audio.send(AudioCommand::RequestPause),
            ButtonView::Play => self.on_click_play(audio),
            ButtonView::Loading | ButtonView::Hidden => {}
        }
    }

    /// Play right away when the audio chapter is on the page, otherwise ask
    fn on_click_play(&mut self, audio: &dyn AudioService) {
        telemetry::log_button_click(self.telemetry.as_ref(), PLAY_BUTTON);

        let audio_chapter = self.audio_chapter();
        let on_page = audio_chapter.is_some_and(|chapter| self.reading_chapters.contains(&chapter));
        if on_page || self.reading_chapters.is_empty() {
            audio.send(AudioCommand::RequestPlay);
        } else {
            tracing::debug!(?audio_chapter, reading = ?self.reading_chapters, "audio chapter mismatch");
            self.mismatch_visible = true;
        }
    }

    pub fn mismatch_prompt(&self) -> Option<MismatchPrompt> {
        if !self.mismatch_visible {
            return None;
        }
        Some(MismatchPrompt {
            current_audio_chapter: self.audio_chapter().and_then(chapters::transliterated_name),
            current_reading_chapter: self
                .reading_chapters
                .first()
                .copied()
                .and_then(chapters::transliterated_name),
        })
    }

    /// Keep playing the loaded chapter
    pub fn continue_playing(&mut self, audio: &dyn AudioService) {
        audio.send(AudioCommand::RequestPlay);
        self.mismatch_visible = false;
    }

    /// Drop the loaded chapter and play the first chapter on the page
    pub fn start_over(&mut self, audio: &dyn AudioService) {
        self.store.exit_repeat_mode();
        if let Some(&chapter) = self.reading_chapters.first() {
            let reciter = self.store.audio_player().reciter_id;
            audio.send(AudioCommand::LoadAndPlay { chapter, reciter });
        }
        self.mismatch_visible = false;
    }

    pub fn dismiss_mismatch(&mut self) {
        self.mismatch_visible = false;
    }

    fn audio_chapter(&self) -> Option<u16> {
        self.store.audio_player().audio_data.map(|data| data.chapter_id)
    }
}
