//! Input line parsing for the interactive drawer
//!
//! Plain lines are the new value of the search input; lines starting with
//! `/` are commands such as /clear, /play, /translations.

/// Parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// New search input value (empty clears the drawer)
    Input { text: String },
    /// Pick a suggested keyword: /keyword <word>
    Keyword { keyword: String },
    /// Clear the input: /clear
    Clear,
    /// Select translations: /translations 131,20
    Translations { ids: Vec<u32> },
    /// Open or close the drawer: /open, /close
    Open,
    Close,
    /// Chapters currently being read: /reading 18 19
    Reading { chapters: Vec<u16> },
    /// Load and play a whole chapter: /listen 18
    Listen { chapter: u16 },
    /// Play/pause button click: /play, /pause
    Play,
    Pause,
    /// Mismatch prompt answers: /continue, /startover
    Continue,
    StartOver,
    /// Show search history: /history
    History,
    /// Show help: /help
    Help,
    /// Leave: /quit
    Quit,
    /// Anything unparseable, with a message for the user
    Invalid { message: String },
}

impl Command {
    /// Parse one line of user input
    pub fn parse(input: &str) -> Self {
        let input = input.trim_end_matches(['\r', '\n']);

        if !input.starts_with('/') {
            return Command::Input { text: input.to_string() };
        }

        let parts: Vec<&str> = input.splitn(2, ' ').collect();
        let cmd = parts[0].to_lowercase();
        let args = parts.get(1).map(|s| s.trim()).unwrap_or("");

        match cmd.as_str() {
            "/keyword" | "/k" => {
                if args.is_empty() {
                    Command::Invalid {
                        message: "Usage: /keyword <word>".to_string(),
                    }
                } else {
                    Command::Keyword { keyword: args.to_string() }
                }
            }
            "/clear" | "/cl" => Command::Clear,
            "/translations" | "/t" => match parse_list::<u32>(args) {
                Some(ids) => Command::Translations { ids },
                None => Command::Invalid {
                    message: "Usage: /translations <id>[,<id>...]".to_string(),
                },
            },
            "/open" => Command::Open,
            "/close" => Command::Close,
            "/reading" | "/r" => match parse_list::<u16>(args) {
                Some(chapters) if chapters.iter().all(|&c| crate::chapters::is_valid_chapter(c)) => {
                    Command::Reading { chapters }
                }
                _ => Command::Invalid {
                    message: "Usage: /reading <chapter>[ <chapter>...] (1-114)".to_string(),
                },
            },
            "/listen" | "/l" => match args.parse::<u16>() {
                Ok(chapter) if crate::chapters::is_valid_chapter(chapter) => Command::Listen { chapter },
                _ => Command::Invalid {
                    message: "Usage: /listen <chapter> (1-114)".to_string(),
                },
            },
            "/play" => Command::Play,
            "/pause" => Command::Pause,
            "/continue" => Command::Continue,
            "/startover" => Command::StartOver,
            "/history" | "/hist" => Command::History,
            "/help" | "/h" | "/?" => Command::Help,
            "/quit" | "/q" | "/exit" => Command::Quit,
            _ => Command::Invalid {
                message: format!("Unknown command: {}. Type /help for available commands.", cmd),
            },
        }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r#"Type to search; every line replaces the search input.
An empty line clears it.

/keyword <word>        - Pick a suggested keyword
/clear                 - Clear the input and results
/translations <ids>    - Select translations, e.g. /translations 131,20
/open, /close          - Open or close the drawer
/reading <chapters>    - Chapters on the current page, e.g. /reading 18
/listen <chapter>      - Load and play a chapter
/play, /pause          - Click the play/pause button
/continue, /startover  - Answer the chapter mismatch prompt
/history               - Show search history
/help                  - Show this help
/quit                  - Leave"#
    }
}

/// Empty input yields an empty list; any bad item rejects the whole list
fn parse_list<T: std::str::FromStr>(args: &str) -> Option<Vec<T>> {
    args.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|item| !item.is_empty())
        .map(|item| item.parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_keeps_spaces() {
        match Command::parse("al kahf ") {
            Command::Input { text } => assert_eq!(text, "al kahf "),
            _ => panic!("Expected Input"),
        }
    }

    #[test]
    fn test_parse_empty_line() {
        assert_eq!(Command::parse(""), Command::Input { text: String::new() });
    }

    #[test]
    fn test_parse_clear() {
        match Command::parse("/clear") {
            Command::Clear => {}
            _ => panic!("Expected Clear command"),
        }
    }

    #[test]
    fn test_parse_translations() {
        assert_eq!(
            Command::parse("/translations 131, 20"),
            Command::Translations { ids: vec![131, 20] }
        );
        assert!(matches!(Command::parse("/t abc"), Command::Invalid { .. }));
    }

    #[test]
    fn test_parse_reading_range() {
        assert_eq!(
            Command::parse("/reading 18 19"),
            Command::Reading { chapters: vec![18, 19] }
        );
        assert!(matches!(Command::parse("/reading 115"), Command::Invalid { .. }));
    }

    #[test]
    fn test_parse_listen() {
        assert_eq!(Command::parse("/listen 36"), Command::Listen { chapter: 36 });
        assert!(matches!(Command::parse("/listen 0"), Command::Invalid { .. }));
    }

    #[test]
    fn test_parse_keyword_requires_argument() {
        assert!(matches!(Command::parse("/keyword"), Command::Invalid { .. }));
        assert_eq!(
            Command::parse("/k mercy"),
            Command::Keyword { keyword: "mercy".to_string() }
        );
    }

    #[test]
    fn test_unknown_command() {
        match Command::parse("/bogus") {
            Command::Invalid { message } => assert!(message.contains("/bogus")),
            _ => panic!("Expected Invalid"),
        }
    }
}
