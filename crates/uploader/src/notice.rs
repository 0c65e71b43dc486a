//! User-facing notifications raised by the pipeline.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

/// Default notice display duration in milliseconds.
const DEFAULT_DURATION_MS: u64 = 4000;

/// Error notice display duration in milliseconds.
const ERROR_DURATION_MS: u64 = 6000;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Warning,
    Info,
}

impl NoticeLevel {
    fn duration_ms(self) -> u64 {
        match self {
            Self::Error => ERROR_DURATION_MS,
            _ => DEFAULT_DURATION_MS,
        }
    }
}

/// A transient message for the user.
#[derive(Debug, Clone)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
    pub duration_ms: u64,
}

/// Receives notices from the pipeline.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// In-memory notice queue with monotonic ids.
///
/// Dismissal timing belongs to the presentation layer.
#[derive(Debug, Clone, Default)]
pub struct NoticeQueue {
    notices: Vec<Notice>,
    next_id: u64,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a notice and returns its id.
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.notices.push(Notice {
            id,
            level,
            message: message.into(),
            duration_ms: level.duration_ms(),
        });
        id
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Error, message)
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Info, message)
    }

    /// Removes a notice by id. Returns `true` if it was present.
    pub fn remove(&mut self, id: u64) -> bool {
        let len_before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != len_before
    }

    pub fn get(&self, id: u64) -> Option<&Notice> {
        self.notices.iter().find(|n| n.id == id)
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// Takes every queued notice, oldest first.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

impl Notifier for Mutex<NoticeQueue> {
    fn notify(&self, level: NoticeLevel, message: &str) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(level, message);
    }
}

/// User-facing strings. `{limit}` in `files_number_limit` is replaced by
/// the ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub upload_failed: String,
    pub files_number_limit: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            upload_failed: "Upload failed".into(),
            files_number_limit: "Batch upload limit {limit}.".into(),
        }
    }
}

impl Messages {
    pub fn files_number_limit(&self, limit: usize) -> String {
        self.files_number_limit.replace("{limit}", &limit.to_string())
    }
}
