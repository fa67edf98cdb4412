//! Interactive drawer session
//!
//! Reads input lines from stdin and renders the search drawer and the
//! play/pause control whenever their state changes.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::audio::{AudioCommand, AudioPlayer, AudioService, ButtonView, PlayPauseButton};
use crate::backend::AudioSource;
use crate::commands::Command;
use crate::search::DrawerHandle;
use crate::store::AppStore;
use crate::telemetry::TelemetrySink;
use crate::ui;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Line(String),
    SearchChanged,
    AudioChanged,
    InputClosed,
}

/// Outcome of a single update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Render(String),
    Quiet,
    Quit,
}

pub struct App<S: AudioSource> {
    drawer: DrawerHandle,
    audio: AudioPlayer<S>,
    button: PlayPauseButton,
    store: AppStore,
    history_path: Option<PathBuf>,
}

impl<S: AudioSource> App<S> {
    pub fn new(
        drawer: DrawerHandle,
        audio: AudioPlayer<S>,
        store: AppStore,
        telemetry: Arc<dyn TelemetrySink>,
        history_path: Option<PathBuf>,
    ) -> Self {
        Self {
            drawer,
            audio,
            button: PlayPauseButton::new(store.clone(), telemetry),
            store,
            history_path,
        }
    }

    pub fn update(&mut self, message: Message) -> Step {
        match message {
            Message::Line(line) => self.handle_command(Command::parse(&line)),
            Message::SearchChanged => Step::Render(ui::search_bar::view(&self.drawer.snapshot())),
            Message::AudioChanged => self.render_player(),
            Message::InputClosed => Step::Quit,
        }
    }

    fn handle_command(&mut self, command: Command) -> Step {
        match command {
            Command::Input { text } => {
                self.drawer.set_query(text);
                Step::Quiet
            }
            Command::Keyword { keyword } => {
                self.drawer.select_keyword(keyword);
                Step::Quiet
            }
            Command::Clear => {
                self.drawer.clear();
                Step::Quiet
            }
            Command::Translations { ids } => {
                let label = format!("Translations: {:?}", ids);
                if self.store.set_selected_translations(ids) {
                    Step::Render(label)
                } else {
                    Step::Render(format!("{} (unchanged)", label))
                }
            }
            Command::Open => {
                self.store.set_search_drawer_open(true);
                Step::Quiet
            }
            Command::Close => {
                self.store.set_search_drawer_open(false);
                Step::Quiet
            }
            Command::Reading { chapters } => {
                self.button.set_reading_chapters(chapters);
                Step::Render(format!("Reading chapters: {:?}", self.button.reading_chapters()))
            }
            Command::Listen { chapter } => {
                let reciter = self.store.audio_player().reciter_id;
                self.audio.send(AudioCommand::LoadAndPlay { chapter, reciter });
                Step::Quiet
            }
            Command::Play => self.click_if(ButtonView::Play, "Nothing to play"),
            Command::Pause => self.click_if(ButtonView::Pause, "Nothing is playing"),
            Command::Continue => {
                self.button.continue_playing(&self.audio);
                self.render_player()
            }
            Command::StartOver => {
                self.button.start_over(&self.audio);
                self.render_player()
            }
            Command::History => {
                let entries = self.store.history().entries();
                if entries.is_empty() {
                    return Step::Render("No search history".to_string());
                }
                let lines: Vec<String> = entries
                    .iter()
                    .map(|entry| format!("  {} ({})", entry.query, entry.source.as_str()))
                    .collect();
                Step::Render(lines.join("\n"))
            }
            Command::Help => Step::Render(Command::help_text().to_string()),
            Command::Quit => Step::Quit,
            Command::Invalid { message } => Step::Render(message),
        }
    }

    fn click_if(&mut self, expected: ButtonView, otherwise: &str) -> Step {
        if self.button.view(&self.audio) != expected {
            return Step::Render(otherwise.to_string());
        }
        self.button.click(&self.audio);
        self.render_player()
    }

    fn render_player(&self) -> Step {
        let mut lines = Vec::new();
        if let Some(button) = ui::play_pause::view(self.button.view(&self.audio)) {
            lines.push(button);
        }
        if let Some(prompt) = self.button.mismatch_prompt() {
            lines.push(ui::play_pause::mismatch(&prompt));
        }
        if lines.is_empty() {
            Step::Quiet
        } else {
            Step::Render(lines.join("\n"))
        }
    }

    fn save_history(&self) {
        let Some(path) = &self.history_path else {
            return;
        };
        if let Err(e) = self.store.history().save(path) {
            tracing::warn!("Could not save search history to {:?}: {}", path, e);
        }
    }

    /// Run until stdin closes or the user quits
    pub async fn run(mut self) -> std::io::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut search = self.drawer.subscribe();
        let mut audio = self.audio.subscribe();

        self.store.set_search_drawer_open(true);
        println!("Quran search drawer. Type to search, /help for commands.");

        loop {
            let message = tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) => Message::Line(line),
                    None => Message::InputClosed,
                },
                Ok(()) = search.changed() => Message::SearchChanged,
                Ok(()) = audio.changed() => Message::AudioChanged,
            };

            match self.update(message) {
                Step::Render(text) => println!("{}", text),
                Step::Quiet => {}
                Step::Quit => break,
            }
        }

        self.store.set_search_drawer_open(false);
        self.save_history();
        Ok(())
    }
}
