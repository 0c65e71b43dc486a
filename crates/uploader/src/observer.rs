//! Caller notifications carrying full registry snapshots.

use tokio::sync::mpsc;
use tracing::trace;

use crate::types::UploadItem;

/// Receives registry changes.
///
/// Every call carries the complete ordered list, not a delta, so callers
/// can render straight from it.
pub trait UploadObserver: Send + Sync {
    /// New items were staged; no transfer has started yet.
    fn prepare_file_list(&self, items: &[UploadItem]);

    /// An item made progress or settled. `progress` uses the integer
    /// encoding of [`Progress::as_percent`](crate::Progress::as_percent).
    fn on_file_update(&self, item: &UploadItem, progress: i32, items: &[UploadItem]);

    /// Items were removed or added pre-completed.
    fn on_file_list_update(&self, items: &[UploadItem]);
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl UploadObserver for NoopObserver {
    fn prepare_file_list(&self, _items: &[UploadItem]) {}
    fn on_file_update(&self, _item: &UploadItem, _progress: i32, _items: &[UploadItem]) {}
    fn on_file_list_update(&self, _items: &[UploadItem]) {}
}

/// Registry change forwarded by [`ChannelObserver`].
#[derive(Debug, Clone)]
pub enum UploadEvent {
    ListPrepared(Vec<UploadItem>),
    FileUpdated {
        item: UploadItem,
        progress: i32,
        items: Vec<UploadItem>,
    },
    ListUpdated(Vec<UploadItem>),
}

/// Forwards observer calls as [`UploadEvent`]s over a channel.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    events_tx: mpsc::UnboundedSender<UploadEvent>,
}

impl ChannelObserver {
    /// Creates the observer and the receiving end of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<UploadEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        (Self { events_tx }, events_rx)
    }

    fn send(&self, event: UploadEvent) {
        if self.events_tx.send(event).is_err() {
            trace!("upload event receiver dropped");
        }
    }
}

impl UploadObserver for ChannelObserver {
    fn prepare_file_list(&self, items: &[UploadItem]) {
        self.send(UploadEvent::ListPrepared(items.to_vec()));
    }

    fn on_file_update(&self, item: &UploadItem, progress: i32, items: &[UploadItem]) {
        self.send(UploadEvent::FileUpdated {
            item: item.clone(),
            progress,
            items: items.to_vec(),
        });
    }

    fn on_file_list_update(&self, items: &[UploadItem]) {
        self.send(UploadEvent::ListUpdated(items.to_vec()));
    }
}
