//! Ordered collection of upload items.
//!
//! The registry is plain data. [`UploadOrchestrator`](crate::UploadOrchestrator)
//! owns it and notifies observers after every mutation.

use crate::types::{Progress, UploadItem};

/// Upload items in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    items: Vec<UploadItem>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends items at the end, keeping their order.
    pub fn append(&mut self, items: impl IntoIterator<Item = UploadItem>) {
        self.items.extend(items);
    }

    /// Replaces the item with the same id.
    ///
    /// Returns `false` when the id is gone or the replacement would move
    /// progress backwards.
    pub fn update_in_place(&mut self, item: UploadItem) -> bool {
        let Some(slot) = self.items.iter_mut().find(|i| i.id == item.id) else {
            return false;
        };
        if !slot.progress.can_advance_to(item.progress) {
            return false;
        }
        *slot = item;
        true
    }

    /// Moves an item's progress forward. Returns the updated item.
    pub fn advance(&mut self, id: &str, progress: Progress) -> Option<&UploadItem> {
        let slot = self.items.iter_mut().find(|i| i.id == id)?;
        if !slot.progress.can_advance_to(progress) {
            return None;
        }
        slot.progress = progress;
        Some(slot)
    }

    /// Removes an item by id.
    pub fn remove(&mut self, id: &str) -> Option<UploadItem> {
        let index = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&UploadItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Copy of every item, in order.
    pub fn snapshot(&self) -> Vec<UploadItem> {
        self.items.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UploadItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether there is at least one item and all of them have a server id.
    pub fn all_uploaded(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(UploadItem::is_uploaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FileHandle, FileRef};
    use intake_protocol::RemoteFile;
    use std::path::PathBuf;

    fn queued(id: &str) -> UploadItem {
        UploadItem::queued(
            id.into(),
            FileHandle {
                name: format!("{id}.txt"),
                path: PathBuf::from(format!("/tmp/{id}.txt")),
                size: 10,
                last_modified: None,
                relative_path: None,
            },
        )
    }

    fn remote(id: &str) -> RemoteFile {
        RemoteFile {
            id: id.into(),
            name: "done.txt".into(),
            size: 10,
            extension: "txt".into(),
            mime_type: "text/plain".into(),
            created_by: None,
            created_at: None,
        }
    }

    fn ids(registry: &Registry) -> Vec<&str> {
        registry.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn append_keeps_insertion_order() {
        let mut registry = Registry::new();
        registry.append([queued("a"), queued("b")]);
        registry.append([queued("c")]);
        assert_eq!(ids(&registry), vec!["a", "b", "c"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn remove_keeps_other_ids() {
        let mut registry = Registry::new();
        registry.append([queued("a"), queued("b"), queued("c")]);

        let removed = registry.remove("b").unwrap();
        assert_eq!(removed.id, "b");
        assert_eq!(ids(&registry), vec!["a", "c"]);
        assert!(registry.remove("b").is_none());
    }

    #[test]
    fn update_missing_id_is_noop() {
        let mut registry = Registry::new();
        registry.append([queued("a")]);

        assert!(!registry.update_in_place(UploadItem::completed("zz".into(), remote("x"))));
        assert!(registry.advance("zz", Progress::InFlight(3)).is_none());
        assert_eq!(ids(&registry), vec!["a"]);
    }

    #[test]
    fn update_replaces_payload() {
        let mut registry = Registry::new();
        registry.append([queued("a")]);
        registry.advance("a", Progress::InFlight(40));

        assert!(registry.update_in_place(UploadItem::completed("a".into(), remote("x1"))));
        let item = registry.get("a").unwrap();
        assert!(matches!(&item.file, FileRef::Remote(r) if r.id == "x1"));
        assert_eq!(item.progress, Progress::Complete);
    }

    #[test]
    fn progress_never_moves_backwards() {
        let mut registry = Registry::new();
        registry.append([queued("a")]);

        assert!(registry.advance("a", Progress::InFlight(60)).is_some());
        assert!(registry.advance("a", Progress::InFlight(20)).is_none());
        assert_eq!(registry.get("a").unwrap().progress, Progress::InFlight(60));

        assert!(registry.advance("a", Progress::Failed).is_some());
        assert!(registry.advance("a", Progress::InFlight(99)).is_none());
        assert!(!registry.update_in_place(UploadItem::completed("a".into(), remote("x"))));
        assert_eq!(registry.get("a").unwrap().progress, Progress::Failed);
    }

    #[test]
    fn all_uploaded_requires_items() {
        let mut registry = Registry::new();
        assert!(!registry.all_uploaded());

        registry.append([UploadItem::completed("a".into(), remote("x1"))]);
        assert!(registry.all_uploaded());

        registry.append([queued("b")]);
        assert!(!registry.all_uploaded());
    }
}
