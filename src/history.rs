//! Search history
//!
//! Most-recent-first list of unique queries, shared by every search surface.
//! Persisted as JSON between runs.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::types::SearchQuerySource;
use crate::error::HistoryError;

/// Write-only consumer of settled search queries
pub trait HistorySink: Send + Sync {
    fn record(&self, query: &str, source: SearchQuerySource);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub query: String,
    pub source: SearchQuerySource,
}

#[derive(Debug)]
struct HistoryInner {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

/// Cheaply cloneable handle to a shared history list
#[derive(Debug, Clone)]
pub struct SearchHistory {
    inner: Arc<Mutex<HistoryInner>>,
}

impl SearchHistory {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HistoryInner {
                entries: VecDeque::new(),
                limit,
            })),
        }
    }

    /// Default location: `<data dir>/quran-drawer/history.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join(crate::config::APP_DIR).join("history.json"))
    }

    /// Load a persisted history; a missing file yields an empty history
    pub fn load(path: &Path, limit: usize) -> Result<Self, HistoryError> {
        let history = Self::with_limit(limit);
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(history),
            Err(e) => return Err(e.into()),
        };

        let entries: Vec<HistoryEntry> = serde_json::from_str(&raw)?;
        {
            let mut inner = history.lock();
            inner.entries = entries.into_iter().take(limit).collect();
        }
        tracing::debug!("Loaded {} history entries from {:?}", history.len(), path);
        Ok(history)
    }

    pub fn save(&self, path: &Path) -> Result<(), HistoryError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let entries = self.entries();
        fs::write(path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }

    /// Move `query` to the front, dropping any older duplicate and trimming to the limit
    pub fn push(&self, query: &str, source: SearchQuerySource) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        let mut inner = self.lock();
        inner.entries.retain(|entry| entry.query != query);
        inner.entries.push_front(HistoryEntry {
            id: Uuid::new_v4(),
            query: query.to_string(),
            source,
        });
        let limit = inner.limit;
        inner.entries.truncate(limit);
    }

    pub fn remove(&self, id: Uuid) -> bool {
        let mut inner = self.lock();
        let before = inner.entries.len();
        inner.entries.retain(|entry| entry.id != id);
        inner.entries.len() != before
    }

    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.lock().entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HistoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HistorySink for SearchHistory {
    fn record(&self, query: &str, source: SearchQuerySource) {
        self.push(query, source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queries(history: &SearchHistory) -> Vec<String> {
        history.entries().into_iter().map(|e| e.query).collect()
    }

    #[test]
    fn test_most_recent_first_and_unique() {
        let history = SearchHistory::with_limit(10);
        history.push("rahman", SearchQuerySource::SearchDrawer);
        history.push("kahf", SearchQuerySource::SearchDrawer);
        history.push("rahman", SearchQuerySource::SearchPage);

        assert_eq!(queries(&history), vec!["rahman", "kahf"]);
        assert_eq!(history.entries()[0].source, SearchQuerySource::SearchPage);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let history = SearchHistory::with_limit(2);
        history.push("a", SearchQuerySource::SearchDrawer);
        history.push("b", SearchQuerySource::SearchDrawer);
        history.push("c", SearchQuerySource::SearchDrawer);
        assert_eq!(queries(&history), vec!["c", "b"]);
    }

    #[test]
    fn test_blank_queries_are_ignored() {
        let history = SearchHistory::with_limit(5);
        history.push("   ", SearchQuerySource::SearchDrawer);
        assert!(history.is_empty());
    }

    #[test]
    fn test_remove_by_id() {
        let history = SearchHistory::with_limit(5);
        history.push("yasin", SearchQuerySource::SearchDrawer);
        let id = history.entries()[0].id;
        assert!(history.remove(id));
        assert!(!history.remove(id));
        assert!(history.is_empty());
    }

    #[test]
    fn test_clones_share_entries() {
        let history = SearchHistory::with_limit(5);
        let other = history.clone();
        other.record("mulk", SearchQuerySource::SearchDrawer);
        assert_eq!(queries(&history), vec!["mulk"]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.json");

        let history = SearchHistory::with_limit(5);
        history.push("maryam", SearchQuerySource::SearchDrawer);
        history.push("taha", SearchQuerySource::SearchDrawer);
        history.save(&path).unwrap();

        let loaded = SearchHistory::load(&path, 1).unwrap();
        assert_eq!(queries(&loaded), vec!["taha"]);
    }

    #[test]
    fn test_ids_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let history = SearchHistory::with_limit(5);
        history.push("yusuf", SearchQuerySource::SearchDrawer);
        let id = history.entries()[0].id;
        history.save(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains(&id.to_string()));

        let loaded = SearchHistory::load(&path, 5).unwrap();
        assert_eq!(loaded.entries()[0].id, id);
        assert!(loaded.remove(id));
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = SearchHistory::load(&dir.path().join("absent.json"), 5).unwrap();
        assert!(loaded.is_empty());
    }
}
