//! Batched dataset file upload pipeline.
//!
//! This crate implements the **business logic** behind the dataset
//! creation uploader. It has no UI or HTTP dependencies: the app provides
//! a [`FileTransport`] implementation that bridges to the real endpoint.
//!
//! # Pipeline
//!
//! 1. **Enumerate**: flatten dropped files and directories
//! 2. **Intake**: enforce the file-count ceiling and single-file mode
//! 3. **Stage**: append queued items to the registry
//! 4. **Upload**: run bounded batches of concurrent transfers
//! 5. **Settle**: mark each item complete or failed and notify

pub mod enumerate;
pub mod error;
pub mod intake;
pub mod notice;
pub mod observer;
pub mod orchestrator;
pub mod registry;
pub mod selection;
pub mod transport;
pub mod types;

pub use enumerate::{DropItem, enumerate_drop};
pub use error::{IntakeError, TransferError};
pub use intake::{FILES_NUMBER_LIMIT, IntakePolicy, PlanKind};
pub use notice::{Messages, Notice, NoticeLevel, NoticeQueue, Notifier};
pub use observer::{ChannelObserver, NoopObserver, UploadEvent, UploadObserver};
pub use orchestrator::UploadOrchestrator;
pub use registry::Registry;
pub use selection::{CatalogEntry, Selection};
pub use transport::FileTransport;
pub use types::{FileHandle, FileRef, IdGenerator, Progress, UploadItem};
