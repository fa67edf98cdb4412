//! Shared types for backend communication

use serde::{Deserialize, Serialize};

/// Search mode understood by the search API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Quick,
    Advanced,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Quick => "quick",
            SearchMode::Advanced => "advanced",
        }
    }
}

/// Service a search response originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchService {
    Kalimat,
    Tarteel,
}

/// Surface that produced a search query, recorded alongside history entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchQuerySource {
    SearchDrawer,
    SearchPage,
    VoiceSearch,
}

impl SearchQuerySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchQuerySource::SearchDrawer => "search_drawer",
            SearchQuerySource::SearchPage => "search_page",
            SearchQuerySource::VoiceSearch => "voice_search",
        }
    }
}

/// Parameters of a single search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub mode: SearchMode,
    pub get_text: bool,
    pub highlight: bool,
    pub translation_ids: Vec<u32>,
}

impl SearchRequest {
    /// Quick-mode request asking for verse text with highlighted matches
    pub fn quick(query: impl Into<String>, translation_ids: Vec<u32>) -> Self {
        Self {
            query: query.into(),
            mode: SearchMode::Quick,
            get_text: true,
            highlight: true,
            translation_ids,
        }
    }

    /// Query-string pairs sent to the search endpoint
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("mode", self.mode.as_str().to_string()),
            ("query", self.query.clone()),
            ("get_text", u8::from(self.get_text).to_string()),
            ("highlight", u8::from(self.highlight).to_string()),
        ];
        if !self.translation_ids.is_empty() {
            let ids: Vec<String> = self.translation_ids.iter().map(u32::to_string).collect();
            params.push(("translation_ids", ids.join(",")));
        }
        params
    }
}

/// Search response from the search API, tagged with its service once received
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub result: SearchResultBody,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_deserializing)]
    pub service: Option<SearchService>,
}

impl SearchResponse {
    pub fn with_service(mut self, service: SearchService) -> Self {
        self.service = Some(service);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.result.navigation.is_empty() && self.result.verses.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResultBody {
    #[serde(default)]
    pub navigation: Vec<NavigationItem>,
    #[serde(default)]
    pub verses: Vec<VerseHit>,
}

/// Jump target such as a surah, juz or page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationItem {
    pub result_type: String,
    pub key: serde_json::Value,
    pub name: String,
}

/// Verse matching the query; `text` carries `<em>` highlight markup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerseHit {
    pub verse_key: String,
    #[serde(default)]
    pub verse_id: Option<u32>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub translations: Vec<TranslationHit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationHit {
    pub resource_id: u32,
    #[serde(default)]
    pub name: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub next_page: Option<u32>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_records: u32,
}

/// Audio file of a whole chapter for one reciter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioData {
    pub chapter_id: u16,
    pub audio_url: String,
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AudioFilesResponse {
    #[serde(default)]
    pub audio_files: Vec<AudioData>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_request_params() {
        let request = SearchRequest::quick("mercy", vec![131, 20]);
        let params = request.params();
        assert_eq!(
            params,
            vec![
                ("mode", "quick".to_string()),
                ("query", "mercy".to_string()),
                ("get_text", "1".to_string()),
                ("highlight", "1".to_string()),
                ("translation_ids", "131,20".to_string()),
            ]
        );
    }

    #[test]
    fn test_params_omit_empty_translations() {
        let request = SearchRequest::quick("mercy", Vec::new());
        assert!(request.params().iter().all(|(key, _)| *key != "translation_ids"));
    }

    #[test]
    fn test_response_ignores_incoming_service() {
        let json = r#"{
            "result": {
                "navigation": [{"result_type": "surah", "key": 1, "name": "Al-Fatihah"}],
                "verses": [{"verse_key": "1:1", "verse_id": 1, "text": "<em>bismi</em>"}]
            },
            "service": "tarteel"
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.service, None);
        assert_eq!(response.result.verses[0].verse_key, "1:1");
        assert!(!response.is_empty());
    }

    #[test]
    fn test_query_source_serializes_snake_case() {
        let json = serde_json::to_string(&SearchQuerySource::SearchDrawer).unwrap();
        assert_eq!(json, "\"search_drawer\"");
    }
}
