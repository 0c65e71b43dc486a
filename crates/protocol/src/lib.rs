//! Wire types for the dataset upload endpoints.
//!
//! Shared by the HTTP client (`intake-api`) and the transport-agnostic
//! upload pipeline (`intake-uploader`).

pub mod format;
pub mod mime;
pub mod types;

pub use format::format_size;
pub use mime::{detect_mime_type, file_extension};
pub use types::{ApiErrorBody, DataSourceType, RemoteFile, UploadConfig, UploadSource};
