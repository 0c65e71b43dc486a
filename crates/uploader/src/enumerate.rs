//! Flattening of dropped files and directories.
//!
//! Each directory is drained completely before any of its children are
//! visited, so relative paths come out depth-first in name order.
//! Unreadable entries and symlink cycles are skipped, never fatal.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use tracing::{debug, warn};

use crate::types::FileHandle;

/// One element of a drop or picker payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropItem {
    File(PathBuf),
    Directory(PathBuf),
    /// Neither a file nor a directory entry; contributes nothing.
    Unreadable,
}

impl DropItem {
    /// Classifies a path by looking at its metadata.
    pub async fn from_path(path: PathBuf) -> Self {
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => Self::Directory(path),
            Ok(meta) if meta.is_file() => Self::File(path),
            Ok(_) => Self::Unreadable,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read dropped item");
                Self::Unreadable
            }
        }
    }
}

/// Produces the flat, ordered list of files for a drop.
///
/// Top-level files keep no relative path; files found inside a dropped
/// directory get `dir/sub/name`.
pub async fn enumerate_drop(items: Vec<DropItem>) -> Vec<FileHandle> {
    let mut files = Vec::new();

    for item in items {
        match item {
            DropItem::File(path) => match tokio::fs::metadata(&path).await {
                Ok(meta) => files.push(FileHandle::from_metadata(&path, &meta, None)),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable file"),
            },
            DropItem::Directory(path) => {
                let mut ancestors = Vec::new();
                walk_dir(&path, String::new(), &mut ancestors, &mut files).await;
            }
            DropItem::Unreadable => {}
        }
    }

    debug!(files = files.len(), "drop enumerated");
    files
}

fn walk_dir<'a>(
    dir: &'a Path,
    prefix: String,
    ancestors: &'a mut Vec<PathBuf>,
    files: &'a mut Vec<FileHandle>,
) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
    Box::pin(async move {
        let canonical = match tokio::fs::canonicalize(dir).await {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "skipping unreadable directory");
                return;
            }
        };
        if ancestors.contains(&canonical) {
            warn!(path = %dir.display(), "skipping symlink cycle");
            return;
        }

        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let prefix = format!("{prefix}{name}/");

        let entries = match read_all_entries(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "skipping unreadable directory");
                return;
            }
        };

        ancestors.push(canonical);
        for path in entries {
            // Follows symlinks; dangling links fail here and are skipped.
            let meta = match tokio::fs::metadata(&path).await {
                Ok(m) => m,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            if meta.is_dir() {
                walk_dir(&path, prefix.clone(), ancestors, files).await;
            } else if meta.is_file() {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let relative = format!("{prefix}{file_name}");
                files.push(FileHandle::from_metadata(&path, &meta, Some(relative)));
            }
        }
        ancestors.pop();
    })
}

/// Reads directory entries until the listing is exhausted.
async fn read_all_entries(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut reader = tokio::fs::read_dir(dir).await?;
    let mut entries = Vec::new();
    loop {
        match reader.next_entry().await {
            Ok(Some(entry)) => entries.push(entry.path()),
            Ok(None) => break,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "directory listing interrupted");
                break;
            }
        }
    }
    entries.sort();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn relative_paths(files: &[FileHandle]) -> Vec<&str> {
        files.iter().map(FileHandle::display_path).collect()
    }

    #[tokio::test]
    async fn directory_yields_relative_paths_in_order() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("dir");
        fs::create_dir_all(dir.join("sub")).unwrap();
        fs::write(dir.join("a.txt"), b"A").unwrap();
        fs::write(dir.join("sub").join("b.txt"), b"BB").unwrap();

        let files = enumerate_drop(vec![DropItem::Directory(dir)]).await;

        assert_eq!(relative_paths(&files), vec!["dir/a.txt", "dir/sub/b.txt"]);
        assert_eq!(files[0].name, "a.txt");
        assert_eq!(files[1].size, 2);
    }

    #[tokio::test]
    async fn mixed_drop_preserves_item_order() {
        let tmp = TempDir::new().unwrap();
        let top = tmp.path().join("top.md");
        fs::write(&top, b"top").unwrap();
        let dir = tmp.path().join("docs");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("z.txt"), b"z").unwrap();
        fs::write(dir.join("m.txt"), b"m").unwrap();

        let files = enumerate_drop(vec![
            DropItem::Directory(dir),
            DropItem::Unreadable,
            DropItem::File(top),
        ])
        .await;

        assert_eq!(
            relative_paths(&files),
            vec!["docs/m.txt", "docs/z.txt", "top.md"]
        );
        assert!(files[2].relative_path.is_none());
    }

    #[tokio::test]
    async fn missing_entries_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let ok = tmp.path().join("ok.txt");
        fs::write(&ok, b"ok").unwrap();

        let files = enumerate_drop(vec![
            DropItem::File(tmp.path().join("gone.txt")),
            DropItem::Directory(tmp.path().join("gone")),
            DropItem::File(ok),
        ])
        .await;

        assert_eq!(relative_paths(&files), vec!["ok.txt"]);
    }

    #[tokio::test]
    async fn empty_directory_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("empty");
        fs::create_dir(&dir).unwrap();

        assert!(enumerate_drop(vec![DropItem::Directory(dir)]).await.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlink_cycle_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("loop");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("f.txt"), b"f").unwrap();
        std::os::unix::fs::symlink(&dir, dir.join("again")).unwrap();

        let files = enumerate_drop(vec![DropItem::Directory(dir)]).await;
        assert_eq!(relative_paths(&files), vec!["loop/f.txt"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn dangling_symlink_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("d");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("real.txt"), b"r").unwrap();
        std::os::unix::fs::symlink(tmp.path().join("nowhere"), dir.join("broken")).unwrap();

        let files = enumerate_drop(vec![DropItem::Directory(dir)]).await;
        assert_eq!(relative_paths(&files), vec!["d/real.txt"]);
    }

    #[tokio::test]
    async fn classify_paths() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("x.txt");
        fs::write(&file, b"x").unwrap();

        assert_eq!(
            DropItem::from_path(file.clone()).await,
            DropItem::File(file)
        );
        assert_eq!(
            DropItem::from_path(tmp.path().to_path_buf()).await,
            DropItem::Directory(tmp.path().to_path_buf())
        );
        assert_eq!(
            DropItem::from_path(tmp.path().join("nope")).await,
            DropItem::Unreadable
        );
    }
}
