//! Bridge between the HTTP client and the pipeline's `FileTransport` trait.

use std::future::Future;
use std::pin::Pin;

use intake_protocol::{RemoteFile, UploadConfig};
use intake_uploader::transport::ProgressFn;
use intake_uploader::{FileHandle, FileTransport, TransferError};

/// Implements [`FileTransport`] on top of [`intake_api::Client`].
pub struct ApiBridge {
    client: intake_api::Client,
}

impl ApiBridge {
    pub fn new(client: intake_api::Client) -> Self {
        Self { client }
    }
}

impl FileTransport for ApiBridge {
    fn upload<'a>(
        &'a self,
        file: &'a FileHandle,
        on_progress: &'a ProgressFn<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<RemoteFile, TransferError>> + Send + 'a>> {
        Box::pin(async move {
            self.client
                .upload(&file.path, &file.name, on_progress)
                .await
                .map_err(transfer_error)
        })
    }

    fn fetch_config(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<UploadConfig, TransferError>> + Send + '_>> {
        Box::pin(async move {
            self.client
                .fetch_upload_config()
                .await
                .map_err(transfer_error)
        })
    }
}

fn transfer_error(e: intake_api::Error) -> TransferError {
    match e {
        intake_api::Error::Forbidden { message } => TransferError::Forbidden { message },
        intake_api::Error::Api { status, body } => TransferError::Rejected { status, body },
        intake_api::Error::Io(e) => TransferError::Io(e),
        other @ (intake_api::Error::Http(_) | intake_api::Error::Json(_)) => {
            TransferError::Network(other.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_keeps_server_message() {
        let e = transfer_error(intake_api::Error::Forbidden {
            message: "quota exceeded".into(),
        });
        assert!(matches!(e, TransferError::Forbidden { message } if message == "quota exceeded"));
    }

    #[test]
    fn api_error_becomes_rejected() {
        let e = transfer_error(intake_api::Error::Api {
            status: 413,
            body: "too large".into(),
        });
        assert!(matches!(e, TransferError::Rejected { status: 413, .. }));
    }

    #[test]
    fn io_error_is_preserved() {
        let e = transfer_error(intake_api::Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        )));
        assert!(matches!(e, TransferError::Io(_)));
    }

    #[test]
    fn json_error_becomes_network() {
        let json = serde_json_error();
        let e = transfer_error(intake_api::Error::Json(json));
        assert!(matches!(e, TransferError::Network(msg) if msg.starts_with("JSON error")));
    }

    fn serde_json_error() -> serde_json::Error {
        serde_json::from_str::<RemoteFile>("not json").unwrap_err()
    }
}
