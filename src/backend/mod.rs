//! Remote collaborators: the search API and the chapter audio API

use std::future::Future;

pub mod api;
pub mod types;

use crate::error::{AudioError, SearchError};
use types::{AudioData, SearchRequest, SearchResponse};

/// Remote search, consumed as a black-box request/response function
pub trait SearchApi: Send + Sync + 'static {
    fn search(&self, request: SearchRequest) -> impl Future<Output = Result<SearchResponse, SearchError>> + Send;
}

/// Source of chapter audio metadata for the audio player
pub trait AudioSource: Send + Sync + 'static {
    fn chapter_audio(&self, reciter: u32, chapter: u16) -> impl Future<Output = Result<AudioData, AudioError>> + Send;
}
