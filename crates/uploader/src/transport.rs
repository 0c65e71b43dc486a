//! Transport seam between the pipeline and the upload endpoint.
//!
//! The app implements [`FileTransport`] on top of its HTTP client. Keeping
//! the pipeline behind a trait makes it testable with mocks.

use std::future::Future;
use std::pin::Pin;

use intake_protocol::{RemoteFile, UploadConfig};

use crate::error::TransferError;
use crate::types::FileHandle;

/// Progress callback: `(bytes_sent, bytes_total)`.
pub type ProgressFn<'a> = dyn Fn(u64, u64) + Send + Sync + 'a;

/// Abstract connection to the upload endpoint.
pub trait FileTransport: Send + Sync {
    /// Sends one file and resolves to the server's descriptor.
    ///
    /// Implementations call `on_progress` as the request body goes out.
    fn upload<'a>(
        &'a self,
        file: &'a FileHandle,
        on_progress: &'a ProgressFn<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<RemoteFile, TransferError>> + Send + 'a>>;

    /// Fetches the server's upload limits.
    fn fetch_config(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<UploadConfig, TransferError>> + Send + '_>>;
}
