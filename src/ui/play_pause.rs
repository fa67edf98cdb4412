//! Play/pause control view

use crate::audio::button::MismatchPrompt;
use crate::audio::ButtonView;

pub fn view(button: ButtonView) -> Option<String> {
    let label = match button {
        ButtonView::Loading => "[ ⟳ ] Loading... (disabled)",
        ButtonView::Pause => "[ ❚❚ ] Pause",
        ButtonView::Play => "[ ▶ ] Play",
        ButtonView::Hidden => return None,
    };
    Some(label.to_string())
}

pub fn mismatch(prompt: &MismatchPrompt) -> String {
    format!(
        "The audio is playing {} but you are reading {}.\n/continue to keep listening, /startover to play {}",
        prompt.current_audio_chapter.unwrap_or("another chapter"),
        prompt.current_reading_chapter.unwrap_or("a different chapter"),
        prompt.current_reading_chapter.unwrap_or("the current chapter"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_button_renders_nothing() {
        assert_eq!(view(ButtonView::Hidden), None);
        assert_eq!(view(ButtonView::Play).as_deref(), Some("[ ▶ ] Play"));
    }

    #[test]
    fn test_mismatch_names_both_chapters() {
        let text = mismatch(&MismatchPrompt {
            current_audio_chapter: Some("Al-Kahf"),
            current_reading_chapter: Some("Ya-Sin"),
        });
        assert!(text.contains("playing Al-Kahf"));
        assert!(text.contains("reading Ya-Sin"));
    }
}
