//! Data types for the upload pipeline.

use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use intake_protocol::RemoteFile;

/// A local file accepted for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub last_modified: Option<SystemTime>,
    /// Path relative to the dropped directory, `/`-separated. `None` for
    /// files picked or dropped on their own.
    pub relative_path: Option<String>,
}

impl FileHandle {
    /// Builds a handle for a top-level file.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        Ok(Self::from_metadata(path, &metadata, None))
    }

    pub(crate) fn from_metadata(
        path: &Path,
        metadata: &Metadata,
        relative_path: Option<String>,
    ) -> Self {
        Self {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_path_buf(),
            size: metadata.len(),
            last_modified: metadata.modified().ok(),
            relative_path,
        }
    }

    /// Relative path when known, otherwise the bare file name.
    pub fn display_path(&self) -> &str {
        self.relative_path.as_deref().unwrap_or(&self.name)
    }
}

/// The payload an item currently points at.
#[derive(Debug, Clone, PartialEq)]
pub enum FileRef {
    /// Not yet accepted by the server.
    Local(FileHandle),
    /// Server's canonical descriptor after a successful upload.
    Remote(RemoteFile),
}

impl FileRef {
    pub fn name(&self) -> &str {
        match self {
            Self::Local(handle) => &handle.name,
            Self::Remote(remote) => &remote.name,
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            Self::Local(handle) => handle.size,
            Self::Remote(remote) => remote.size,
        }
    }
}

/// Upload progress of one item.
///
/// Moves forward only: `Queued → InFlight → Complete`, or into `Failed`
/// from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Queued,
    /// Percent sent, `0..=99`.
    InFlight(u8),
    Complete,
    Failed,
}

impl Progress {
    /// Builds an in-flight value, keeping `100` for the server's answer.
    pub fn in_flight(percent: u64) -> Self {
        Self::InFlight(percent.min(99) as u8)
    }

    /// Integer encoding used by callers: `-1` queued, `0..=99` in flight,
    /// `100` complete, `-2` failed.
    pub fn as_percent(&self) -> i32 {
        match self {
            Self::Queued => -1,
            Self::InFlight(p) => i32::from(*p),
            Self::Complete => 100,
            Self::Failed => -2,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_advance_to(&self, next: Progress) -> bool {
        match (self, next) {
            (Self::Complete | Self::Failed, _) => false,
            (Self::Queued, Self::Queued) => false,
            (Self::Queued, _) => true,
            (Self::InFlight(current), Self::InFlight(next)) => next >= *current,
            (Self::InFlight(_), Self::Complete | Self::Failed) => true,
            (Self::InFlight(_), Self::Queued) => false,
        }
    }
}

/// One user-requested upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadItem {
    pub id: String,
    pub file: FileRef,
    pub progress: Progress,
}

impl UploadItem {
    /// A freshly accepted item that has not started.
    pub fn queued(id: String, handle: FileHandle) -> Self {
        Self {
            id,
            file: FileRef::Local(handle),
            progress: Progress::Queued,
        }
    }

    /// An item that already exists on the server.
    pub fn completed(id: String, remote: RemoteFile) -> Self {
        Self {
            id,
            file: FileRef::Remote(remote),
            progress: Progress::Complete,
        }
    }

    /// Server descriptor, present only once the item is complete.
    pub fn remote(&self) -> Option<&RemoteFile> {
        match (&self.file, self.progress) {
            (FileRef::Remote(remote), Progress::Complete) => Some(remote),
            _ => None,
        }
    }

    pub fn is_uploaded(&self) -> bool {
        self.remote().is_some()
    }
}

/// Generates session-unique item ids of the form `file{seq}-{unix_millis}`.
#[derive(Debug, Default)]
pub struct IdGenerator {
    seq: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> String {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        format!("file{seq}-{millis}")
    }
}
