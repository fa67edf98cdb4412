use std::sync::Arc;

use crate::backend::types::SearchResponse;

/// Request state of the search drawer; exactly one holds at a time
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchRequestState {
    #[default]
    Idle,
    Loading,
    Success(Arc<SearchResponse>),
    Error,
}

impl SearchRequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SearchRequestState::Loading)
    }

    pub fn has_error(&self) -> bool {
        matches!(self, SearchRequestState::Error)
    }

    pub fn result(&self) -> Option<&SearchResponse> {
        match self {
            SearchRequestState::Success(result) => Some(result),
            _ => None,
        }
    }
}

/// What the drawer view renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSnapshot {
    pub query: String,
    pub state: SearchRequestState,
    pub is_open: bool,
}
