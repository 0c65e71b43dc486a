//! Upload endpoint client.

use std::path::Path;

use futures_util::StreamExt;
use intake_protocol::{ApiErrorBody, RemoteFile, UploadConfig, UploadSource, detect_mime_type};
use reqwest::multipart::{Form, Part};
use tokio::sync::mpsc;
use tokio_util::io::ReaderStream;
use tracing::debug;

const UPLOAD_ENDPOINT: &str = "/files/upload";

/// Errors from the upload client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("{message}")]
    Forbidden { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Upload API client.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    source: Option<UploadSource>,
}

impl Client {
    /// Creates a client for the API rooted at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            source: None,
        })
    }

    /// Tags every upload with a source discriminator query parameter.
    pub fn with_source(mut self, source: UploadSource) -> Self {
        self.source = Some(source);
        self
    }

    fn upload_url(&self) -> String {
        format!("{}{}", self.base_url, UPLOAD_ENDPOINT)
    }

    /// Fetches the server's upload limits.
    pub async fn fetch_upload_config(&self) -> Result<UploadConfig, Error> {
        let resp = self.http.get(self.upload_url()).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(error_from_body(status.as_u16(), body));
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Uploads one file as multipart form data.
    ///
    /// `on_progress` receives `(bytes_sent, bytes_total)` each time the
    /// transport pulls another block of the request body.
    pub async fn upload(
        &self,
        path: &Path,
        file_name: &str,
        on_progress: &(dyn Fn(u64, u64) + Send + Sync),
    ) -> Result<RemoteFile, Error> {
        let file = tokio::fs::File::open(path).await?;
        let total = file.metadata().await?.len();

        // The body stream must be 'static, so byte counts travel back over
        // a channel and the callback runs on this task.
        let (progress_tx, mut progress_rx) = mpsc::unbounded_channel::<u64>();
        let mut sent: u64 = 0;
        let stream = ReaderStream::new(file).map(move |chunk| {
            if let Ok(bytes) = &chunk {
                sent += bytes.len() as u64;
                let _ = progress_tx.send(sent);
            }
            chunk
        });

        let part = Part::stream_with_length(reqwest::Body::wrap_stream(stream), total)
            .file_name(file_name.to_string())
            .mime_str(detect_mime_type(file_name))?;
        let form = Form::new().part("file", part);

        let mut request = self.http.post(self.upload_url()).multipart(form);
        if let Some(source) = self.source {
            request = request.query(&[("source", source.as_str())]);
        }

        debug!(file = %file_name, bytes = total, "uploading file");

        let send = request.send();
        tokio::pin!(send);
        let resp = loop {
            tokio::select! {
                resp = &mut send => break resp?,
                Some(sent) = progress_rx.recv() => on_progress(sent, total),
            }
        };
        while let Ok(sent) = progress_rx.try_recv() {
            on_progress(sent, total);
        }

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(error_from_body(status.as_u16(), body));
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Maps a non-2xx response body to an [`Error`].
fn error_from_body(status: u16, body: String) -> Error {
    match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(parsed) if parsed.is_forbidden() => Error::Forbidden {
            message: parsed.message,
        },
        _ => Error::Api { status, body },
    }
}
