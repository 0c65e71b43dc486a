//! Picker over files that already live in the synced catalog.
//!
//! Confirming a selection yields server descriptors that go straight into
//! the registry as completed items, with no transfer.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use intake_protocol::{RemoteFile, detect_mime_type, file_extension};
use uuid::Uuid;

/// Timestamp layout used by the catalog listing.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One file listed by the synced catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub size: u64,
    pub created_by: String,
    pub created_at: NaiveDateTime,
}

impl CatalogEntry {
    /// Builds an entry, parsing `created_at` as `YYYY-MM-DD HH:MM:SS`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        size: u64,
        created_by: impl Into<String>,
        created_at: &str,
    ) -> Result<Self, chrono::ParseError> {
        Ok(Self {
            id: id.into(),
            name: name.into(),
            size,
            created_by: created_by.into(),
            created_at: NaiveDateTime::parse_from_str(created_at, CREATED_AT_FORMAT)?,
        })
    }

    fn to_remote_file(&self) -> RemoteFile {
        RemoteFile {
            id: Uuid::new_v4().to_string(),
            name: self.name.clone(),
            size: self.size,
            extension: file_extension(&self.name).to_string(),
            mime_type: detect_mime_type(&self.name).to_string(),
            created_by: Some(self.created_by.clone()),
            created_at: Some(self.created_at.and_utc().timestamp()),
        }
    }
}

/// Checkbox state over a catalog listing.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    entries: Vec<CatalogEntry>,
    selected: HashSet<String>,
}

impl Selection {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self {
            entries,
            selected: HashSet::new(),
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Flips one entry. Unknown ids are ignored.
    pub fn toggle(&mut self, id: &str) {
        if !self.entries.iter().any(|e| e.id == id) {
            return;
        }
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    /// Selects every entry, or clears the selection when all are already
    /// selected.
    pub fn select_all(&mut self) {
        if self.is_all_selected() {
            self.selected.clear();
        } else {
            self.selected = self.entries.iter().map(|e| e.id.clone()).collect();
        }
    }

    /// False for an empty listing.
    pub fn is_all_selected(&self) -> bool {
        !self.entries.is_empty() && self.selected.len() == self.entries.len()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn confirm_disabled(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected entries in listing order.
    pub fn selected_entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries
            .iter()
            .filter(|e| self.selected.contains(&e.id))
    }

    /// Descriptors for the selected entries, each with a fresh id.
    pub fn to_remote_files(&self) -> Vec<RemoteFile> {
        self.selected_entries()
            .map(CatalogEntry::to_remote_file)
            .collect()
    }
}
