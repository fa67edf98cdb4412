//! Search drawer view

use crate::backend::types::SearchResponse;
use crate::search::{SearchRequestState, SearchSnapshot};

const MAX_VERSES: usize = 8;

/// Header line: the input with a spinner while a request is outstanding
pub fn header(snapshot: &SearchSnapshot) -> String {
    let spinner = if snapshot.state.is_loading() { " ⟳" } else { "" };
    if snapshot.query.is_empty() {
        format!("🔍 Search...{}", spinner)
    } else {
        format!("🔍 {}{}", snapshot.query, spinner)
    }
}

/// Body below the header; nothing while the drawer is closed
pub fn body(snapshot: &SearchSnapshot) -> Option<String> {
    if !snapshot.is_open {
        return None;
    }

    let body = match &snapshot.state {
        SearchRequestState::Idle => String::new(),
        SearchRequestState::Loading => "Searching...".to_string(),
        SearchRequestState::Error => "Something went wrong. Change the query to try again.".to_string(),
        SearchRequestState::Success(result) => results(&snapshot.query, result),
    };
    Some(body)
}

pub fn view(snapshot: &SearchSnapshot) -> String {
    match body(snapshot) {
        Some(body) if !body.is_empty() => format!("{}\n{}", header(snapshot), body),
        _ => header(snapshot),
    }
}

fn results(query: &str, result: &SearchResponse) -> String {
    if result.is_empty() {
        return format!("No results for \"{}\". Try a full search instead.", query);
    }

    let mut lines = Vec::new();
    for item in &result.result.navigation {
        lines.push(format!("  » {} ({})", item.name, item.result_type));
    }
    for verse in result.result.verses.iter().take(MAX_VERSES) {
        lines.push(format!("  ◆ {}  {}", verse.verse_key, highlight(&verse.text)));
        for translation in &verse.translations {
            lines.push(format!("      {}", highlight(&translation.text)));
        }
    }
    let hidden = result.result.verses.len().saturating_sub(MAX_VERSES);
    if hidden > 0 {
        lines.push(format!("  … {} more", hidden));
    }
    lines.join("\n")
}

/// Replace `<em>` markup with brackets
fn highlight(text: &str) -> String {
    text.replace("<em>", "[").replace("</em>", "]")
}
