//! Debounced search coordinator
//!
//! Turns per-keystroke query text into at most one search request per settled
//! value. Every issued request carries a sequence number; only a completion
//! carrying the latest number may change the request state.

use std::sync::Arc;
use std::time::Duration;

use super::debounce::Debouncer;
use super::state::{SearchRequestState, SearchSnapshot};
use crate::backend::types::{SearchQuerySource, SearchRequest, SearchResponse, SearchService};
use crate::error::SearchError;
use crate::history::HistorySink;
use crate::telemetry::{self, TelemetrySink};

/// Button name reported when the input is cleared
const CLEAR_INPUT_BUTTON: &str = "search_drawer_clear_input";

/// A request the caller must run and report back through [`SearchCoordinator::complete`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSearch {
    pub seq: u64,
    pub request: SearchRequest,
}

pub struct SearchCoordinator {
    query: String,
    state: SearchRequestState,
    debouncer: Debouncer<String>,
    /// Sequence number of the latest issued request
    seq: u64,
    /// Settled query behind the latest request
    searched: Option<String>,
    translations: Vec<u32>,
    history: Arc<dyn HistorySink>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl SearchCoordinator {
    pub fn new(
        debounce: Duration,
        translations: Vec<u32>,
        history: Arc<dyn HistorySink>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        Self {
            query: String::new(),
            state: SearchRequestState::Idle,
            debouncer: Debouncer::new(debounce),
            seq: 0,
            searched: None,
            translations,
            history,
            telemetry,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> &SearchRequestState {
        &self.state
    }

    pub fn snapshot(&self, is_open: bool) -> SearchSnapshot {
        SearchSnapshot {
            query: self.query.clone(),
            state: self.state.clone(),
            is_open,
        }
    }

    /// Replace the query; an empty query resets instead of scheduling a search
    pub fn set_query(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            self.reset();
            return;
        }
        self.query.clone_from(&text);
        self.debouncer.schedule(text);
    }

    /// A suggested keyword was picked; it goes through the same debounce
    pub fn select_keyword(&mut self, keyword: impl Into<String>) {
        self.set_query(keyword);
    }

    /// Clear query, result and error; anything still in flight becomes stale
    pub fn reset(&mut self) {
        telemetry::log_button_click(self.telemetry.as_ref(), CLEAR_INPUT_BUTTON);
        self.query.clear();
        self.debouncer.cancel();
        self.searched = None;
        self.seq += 1;
        self.state = SearchRequestState::Idle;
    }

    /// Resolves with the next settled query
    pub async fn next_settled(&mut self) -> String {
        self.debouncer.settled().await
    }

    pub fn on_settled(&mut self, value: String) -> Option<PendingSearch> {
        if value.is_empty() || value != self.query {
            return None;
        }
        if self.searched.as_deref() == Some(value.as_str()) {
            tracing::debug!(query = %value, "settled query unchanged, not searching again");
            return None;
        }
        Some(self.issue(value))
    }

    /// New translation selection; re-runs the settled query when the set changed
    pub fn set_translations(&mut self, ids: Vec<u32>) -> Option<PendingSearch> {
        if ids == self.translations {
            return None;
        }
        self.translations = ids;
        let query = self.searched.clone()?;
        tracing::debug!(query = %query, "translations changed, searching again");
        Some(self.issue(query))
    }

    /// Apply a finished request; returns false when it was superseded
    pub fn complete(&mut self, seq: u64, outcome: Result<SearchResponse, SearchError>) -> bool {
        if seq != self.seq {
            tracing::debug!(seq, latest = self.seq, "discarding stale search response");
            return false;
        }

        self.state = match outcome {
            Ok(response) => {
                SearchRequestState::Success(Arc::new(response.with_service(SearchService::Kalimat)))
            }
            Err(e) => {
                tracing::warn!(seq, "search failed: {}", e);
                SearchRequestState::Error
            }
        };
        true
    }

    fn issue(&mut self, query: String) -> PendingSearch {
        let source = SearchQuerySource::SearchDrawer;
        self.history.record(&query, source);
        telemetry::log_text_search_query(self.telemetry.as_ref(), &query, source);

        self.seq += 1;
        self.state = SearchRequestState::Loading;
        self.searched = Some(query.clone());

        PendingSearch {
            seq: self.seq,
            request: SearchRequest::quick(query, self.translations.clone()),
        }
    }
}
