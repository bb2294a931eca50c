//! In-memory activity log for fetch outcomes.
//!
//! A bounded ring buffer of recent per-feed results, surfaced in the admin
//! UI. The log is injected wherever it is needed; capacity is explicit and
//! the whole buffer can be reset.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

/// Default number of retained entries.
pub const DEFAULT_ACTIVITY_CAPACITY: usize = 1000;

/// Outcome kind of an activity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    /// Feed fetched and reconciled.
    Success,
    /// Feed fetch failed.
    Error,
}

impl ActivityKind {
    /// String form used in the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Success => "success",
            ActivityKind::Error => "error",
        }
    }
}

/// One recorded fetch outcome.
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    /// When the outcome was recorded.
    pub timestamp: DateTime<Utc>,
    /// Success or error.
    pub kind: ActivityKind,
    /// URL of the feed concerned.
    pub feed_url: String,
    /// Human-readable outcome message.
    pub message: String,
}

/// Bounded, shared log of recent fetch outcomes.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    inner: Arc<Mutex<VecDeque<ActivityEntry>>>,
    capacity: usize,
}

impl ActivityLog {
    /// Create a log with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ACTIVITY_CAPACITY)
    }

    /// Create a log retaining at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity.min(64)))),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<ActivityEntry>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Record a successful fetch.
    pub fn success(&self, feed_url: &str, message: impl Into<String>) {
        self.push(ActivityKind::Success, feed_url, message.into());
    }

    /// Record a failed fetch.
    pub fn error(&self, feed_url: &str, message: impl Into<String>) {
        self.push(ActivityKind::Error, feed_url, message.into());
    }

    fn push(&self, kind: ActivityKind, feed_url: &str, message: String) {
        let entry = ActivityEntry {
            timestamp: Utc::now(),
            kind,
            feed_url: feed_url.to_string(),
            message,
        };

        let mut entries = self.lock();
        entries.push_back(entry);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    /// Copy of all entries, oldest first.
    pub fn snapshot(&self) -> Vec<ActivityEntry> {
        self.lock().iter().cloned().collect()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}
