//! Customer list state: fetched entries, loading/error flags and search query
//!
//! Each refresh is tagged with a sequence number when it starts. A finished
//! fetch is applied only if it carries the latest tag, so the store always
//! reflects the most recently initiated refresh no matter the order in which
//! responses arrive.

use super::entry::Entry;
use crate::services::FetchRunner;
use chrono::{DateTime, Local};

/// Message shown for any failed fetch
pub const FETCH_FAILED_MESSAGE: &str = "Failed to load customers";

/// Handle for one initiated fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub tag: u64,
}

/// Result of a finished fetch, as the store sees it
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The request succeeded; non-array bodies arrive here as an empty list
    Loaded(Vec<Entry>),
    /// Transport, status or decode failure
    Failed,
}

/// Which of the mutually exclusive body states to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState<'a> {
    Loading,
    Error(&'a str),
    Empty,
    List,
}

#[derive(Debug, Default)]
pub struct EntryStore {
    entries: Vec<Entry>,
    loading: bool,
    error_message: Option<String>,
    query: String,
    latest_tag: u64,
    activated: bool,
    last_loaded_at: Option<DateTime<Local>>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn last_loaded_at(&self) -> Option<DateTime<Local>> {
        self.last_loaded_at
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn showing(&self) -> usize {
        self.filtered().len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Fetching
    // ─────────────────────────────────────────────────────────────────────────

    /// Run the first refresh; later calls do nothing
    pub fn activate(&mut self, runner: &mut FetchRunner) {
        if self.activated {
            return;
        }
        self.activated = true;
        self.refresh(runner);
    }

    /// Start a new fetch in the background
    ///
    /// Fetches already in flight are left running; their results will be
    /// discarded when they arrive.
    pub fn refresh(&mut self, runner: &mut FetchRunner) {
        let ticket = self.begin_refresh();
        runner.spawn(ticket);
    }

    /// Mark the store as loading and hand out the next sequence tag
    pub fn begin_refresh(&mut self) -> FetchTicket {
        self.latest_tag += 1;
        self.loading = true;
        self.error_message = None;
        tracing::debug!(tag = self.latest_tag, "refresh started");
        FetchTicket {
            tag: self.latest_tag,
        }
    }

    /// Apply a finished fetch, returning false if it was superseded
    pub fn apply(&mut self, tag: u64, outcome: FetchOutcome) -> bool {
        if tag != self.latest_tag {
            tracing::debug!(tag, latest = self.latest_tag, "discarding stale fetch result");
            return false;
        }

        match outcome {
            FetchOutcome::Loaded(entries) => {
                tracing::info!(tag, count = entries.len(), "customers loaded");
                self.entries = entries;
                self.last_loaded_at = Some(Local::now());
            }
            FetchOutcome::Failed => {
                self.entries.clear();
                self.error_message = Some(FETCH_FAILED_MESSAGE.to_string());
            }
        }

        self.loading = false;
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
    }

    pub fn push_query_char(&mut self, c: char) {
        let mut text = self.query.clone();
        text.push(c);
        self.set_query(text);
    }

    pub fn pop_query_char(&mut self) {
        let mut text = self.query.clone();
        text.pop();
        self.set_query(text);
    }

    pub fn clear_query(&mut self) {
        self.set_query(String::new());
    }

    /// Entries whose name or mobile contains the trimmed, lower-cased query
    pub fn filtered(&self) -> Vec<&Entry> {
        let needle = self.query.trim().to_lowercase();
        if needle.is_empty() {
            return self.entries.iter().collect();
        }
        self.entries.iter().filter(|e| e.matches(&needle)).collect()
    }

    /// Loading beats error, error beats empty, empty beats list
    pub fn display_state(&self) -> DisplayState<'_> {
        if self.loading {
            DisplayState::Loading
        } else if let Some(message) = self.error_message.as_deref() {
            DisplayState::Error(message)
        } else if self.filtered().is_empty() {
            DisplayState::Empty
        } else {
            DisplayState::List
        }
    }
}
