//! Upload orchestrator: staging, bounded batches and per-file transfers.
//!
//! Batches run strictly one after another. Inside a batch every transfer
//! is polled concurrently on the calling task, so in-flight requests
//! overlap without extra threads. A failing transfer settles its own item
//! and never blocks or aborts its siblings.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::future::join_all;
use intake_protocol::{RemoteFile, UploadConfig};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::enumerate::{DropItem, enumerate_drop};
use crate::error::IntakeError;
use crate::intake::IntakePolicy;
use crate::notice::{Messages, NoticeLevel, Notifier};
use crate::observer::UploadObserver;
use crate::registry::Registry;
use crate::transport::FileTransport;
use crate::types::{FileHandle, FileRef, IdGenerator, Progress, UploadItem};

/// Owns the upload registry and drives transfers through a [`FileTransport`].
pub struct UploadOrchestrator {
    transport: Arc<dyn FileTransport>,
    observer: Arc<dyn UploadObserver>,
    notifier: Arc<dyn Notifier>,
    policy: IntakePolicy,
    messages: Messages,
    limits: OnceCell<UploadConfig>,
    registry: Mutex<Registry>,
    ids: IdGenerator,
}

impl UploadOrchestrator {
    /// Creates an orchestrator with the default policy and messages.
    pub fn new(
        transport: Arc<dyn FileTransport>,
        observer: Arc<dyn UploadObserver>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            transport,
            observer,
            notifier,
            policy: IntakePolicy::default(),
            messages: Messages::default(),
            limits: OnceCell::new(),
            registry: Mutex::new(Registry::new()),
            ids: IdGenerator::new(),
        }
    }

    pub fn with_policy(mut self, policy: IntakePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// Uses `config` instead of asking the transport.
    pub fn with_limits(mut self, config: UploadConfig) -> Self {
        self.limits = OnceCell::new_with(Some(config));
        self
    }

    pub fn policy(&self) -> IntakePolicy {
        self.policy
    }

    /// Upload limits, fetched on first use and cached afterwards.
    ///
    /// A failed fetch falls back to the defaults without telling the user.
    pub async fn limits(&self) -> &UploadConfig {
        self.limits
            .get_or_init(|| async {
                match self.transport.fetch_config().await {
                    Ok(config) => {
                        debug!(
                            batch_count_limit = config.batch_count_limit,
                            file_size_limit = config.file_size_limit,
                            "upload limits loaded"
                        );
                        config
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to fetch upload limits, using defaults");
                        UploadConfig::default()
                    }
                }
            })
            .await
    }

    /// Current registry contents, in order.
    pub fn snapshot(&self) -> Vec<UploadItem> {
        self.registry().snapshot()
    }

    /// Whether every item has been accepted by the server.
    pub fn all_uploaded(&self) -> bool {
        self.registry().all_uploaded()
    }

    /// Validates and appends new files as queued items.
    ///
    /// Returns the new item ids in input order. Nothing is sent yet; the
    /// observer receives the full list before any transfer starts.
    pub fn stage(&self, files: Vec<FileHandle>) -> Result<Vec<String>, IntakeError> {
        let files = self.policy.truncate(files);
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let (ids, snapshot) = {
            let mut registry = self.registry();
            if let Err(e) = self.policy.check(files.len(), registry.len()) {
                drop(registry);
                self.report_intake_error(&e);
                return Err(e);
            }

            let items: Vec<UploadItem> = files
                .into_iter()
                .map(|file| UploadItem::queued(self.ids.next_id(), file))
                .collect();
            let ids: Vec<String> = items.iter().map(|i| i.id.clone()).collect();
            registry.append(items);
            (ids, registry.snapshot())
        };

        info!(files = ids.len(), total = snapshot.len(), "files staged");
        self.observer.prepare_file_list(&snapshot);
        Ok(ids)
    }

    /// Uploads staged items in batches of the server's batch limit.
    ///
    /// Resolves once every item has settled. Items removed meanwhile are
    /// skipped.
    pub async fn upload(&self, ids: &[String]) {
        let limits = self.limits().await.clone();
        let window = limits.effective_batch_limit();

        for (batch, chunk) in ids.chunks(window).enumerate() {
            debug!(batch, files = chunk.len(), "starting upload batch");
            {
                let mut registry = self.registry();
                for id in chunk {
                    registry.advance(id, Progress::InFlight(0));
                }
            }

            join_all(chunk.iter().map(|id| self.transfer(id, &limits))).await;
            debug!(batch, "upload batch settled");
        }

        info!(files = ids.len(), "upload finished");
    }

    /// Stages `files` and uploads them.
    pub async fn intake(&self, files: Vec<FileHandle>) -> Result<Vec<String>, IntakeError> {
        let ids = self.stage(files)?;
        if !ids.is_empty() {
            self.upload(&ids).await;
        }
        Ok(ids)
    }

    /// Flattens a drop payload, then stages and uploads the files.
    pub async fn intake_drop(&self, items: Vec<DropItem>) -> Result<Vec<String>, IntakeError> {
        let files = enumerate_drop(items).await;
        self.intake(files).await
    }

    /// Removes an item. An in-flight transfer keeps running but its result
    /// is discarded.
    pub fn remove(&self, id: &str) -> bool {
        let snapshot = {
            let mut registry = self.registry();
            if registry.remove(id).is_none() {
                return false;
            }
            registry.snapshot()
        };

        debug!(file_id = %id, "item removed");
        self.observer.on_file_list_update(&snapshot);
        true
    }

    /// Appends files that already live on the server, such as a bulk
    /// selection from the synced catalog.
    pub fn add_completed(&self, files: Vec<RemoteFile>) -> Vec<String> {
        if files.is_empty() {
            return Vec::new();
        }

        let (ids, snapshot) = {
            let mut registry = self.registry();
            let items: Vec<UploadItem> = files
                .into_iter()
                .map(|remote| UploadItem::completed(self.ids.next_id(), remote))
                .collect();
            let ids: Vec<String> = items.iter().map(|i| i.id.clone()).collect();
            registry.append(items);
            (ids, registry.snapshot())
        };

        self.observer.on_file_list_update(&snapshot);
        ids
    }

    /// Runs one file's transfer to a terminal state.
    async fn transfer(&self, id: &str, limits: &UploadConfig) -> Option<UploadItem> {
        let handle = {
            let registry = self.registry();
            match registry.get(id) {
                Some(UploadItem {
                    file: FileRef::Local(handle),
                    ..
                }) => handle.clone(),
                _ => {
                    debug!(file_id = %id, "item gone before transfer, skipping");
                    return None;
                }
            }
        };

        if handle.size > limits.file_size_limit_bytes() {
            warn!(
                file_id = %id,
                bytes = handle.size,
                limit_mb = limits.file_size_limit,
                "file exceeds the server size limit"
            );
        }

        let on_progress = |sent: u64, total: u64| {
            if total == 0 {
                return;
            }
            let percent = sent.saturating_mul(100) / total;
            self.apply(id, |registry| {
                registry.advance(id, Progress::in_flight(percent)).cloned()
            });
        };

        match self.transport.upload(&handle, &on_progress).await {
            Ok(remote) => {
                debug!(file_id = %id, remote_id = %remote.id, "upload succeeded");
                self.apply(id, |registry| {
                    let item = UploadItem::completed(id.to_string(), remote);
                    registry.update_in_place(item.clone()).then_some(item)
                })
            }
            Err(e) => {
                warn!(file_id = %id, file = %handle.display_path(), error = %e, "upload failed");
                self.notifier
                    .notify(NoticeLevel::Error, &e.user_message(&self.messages));
                self.apply(id, |registry| {
                    registry.advance(id, Progress::Failed).cloned()
                })
            }
        }
    }

    /// Applies a registry change and reports the result to the observer.
    ///
    /// Changes against a removed id are dropped silently.
    fn apply(
        &self,
        id: &str,
        change: impl FnOnce(&mut Registry) -> Option<UploadItem>,
    ) -> Option<UploadItem> {
        let (item, snapshot) = {
            let mut registry = self.registry();
            let Some(item) = change(&mut registry) else {
                if registry.get(id).is_none() {
                    debug!(file_id = %id, "update for removed item ignored");
                }
                return None;
            };
            (item, registry.snapshot())
        };

        self.observer
            .on_file_update(&item, item.progress.as_percent(), &snapshot);
        Some(item)
    }

    fn report_intake_error(&self, error: &IntakeError) {
        warn!(error = %error, "intake rejected");
        if let IntakeError::TooManyFiles { limit, .. } = error {
            self.notifier
                .notify(NoticeLevel::Error, &self.messages.files_number_limit(*limit));
        }
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
