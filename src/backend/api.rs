//! HTTP client for the Quran search and audio APIs

use std::future::Future;
use std::time::Duration;

use reqwest::Client;

use super::types::{AudioData, AudioFilesResponse, SearchRequest, SearchResponse};
use super::{AudioSource, SearchApi};
use crate::error::{AudioError, SearchError};

/// Client for the remote search and audio endpoints
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    search_url: String,
    api_url: String,
}

impl BackendClient {
    pub fn new(search_url: &str, api_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            search_url: search_url.trim_end_matches('/').to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Run a search against `{search_url}/v1/search`
    pub async fn get_search_results(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        let url = format!("{}/v1/search", self.search_url);
        tracing::debug!(query = %request.query, mode = request.mode.as_str(), "GET {}", url);

        let response = self.client.get(&url).query(&request.params()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetch the chapter audio file for a reciter
    pub async fn get_chapter_audio(&self, reciter: u32, chapter: u16) -> Result<AudioData, AudioError> {
        let url = format!("{}/audio/reciters/{}/audio_files", self.api_url, reciter);
        tracing::debug!(reciter, chapter, "GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("chapter", chapter.to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AudioError::Status(status));
        }

        let body = response.bytes().await?;
        let files: AudioFilesResponse = serde_json::from_slice(&body)?;
        files
            .audio_files
            .into_iter()
            .find(|file| file.chapter_id == chapter)
            .ok_or(AudioError::NotFound { reciter, chapter })
    }
}

impl SearchApi for BackendClient {
    fn search(&self, request: SearchRequest) -> impl Future<Output = Result<SearchResponse, SearchError>> + Send {
        async move { self.get_search_results(&request).await }
    }
}

impl AudioSource for BackendClient {
    fn chapter_audio(&self, reciter: u32, chapter: u16) -> impl Future<Output = Result<AudioData, AudioError>> + Send {
        async move { self.get_chapter_audio(reciter, chapter).await }
    }
}
