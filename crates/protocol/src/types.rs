use serde::{Deserialize, Serialize};

/// Default per-file size limit in MB when the server does not answer.
pub const DEFAULT_FILE_SIZE_LIMIT_MB: u64 = 15;

/// Default number of simultaneous transfers per batch.
pub const DEFAULT_BATCH_COUNT_LIMIT: u32 = 5;

/// Canonical file descriptor returned by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub extension: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

/// Upload limits published by the configuration endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Per-file limit in MB.
    #[serde(default = "default_file_size_limit")]
    pub file_size_limit: u64,
    /// Maximum simultaneous transfers per batch.
    #[serde(default = "default_batch_count_limit")]
    pub batch_count_limit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_file_size_limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_file_size_limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_file_size_limit: Option<u64>,
}

fn default_file_size_limit() -> u64 {
    DEFAULT_FILE_SIZE_LIMIT_MB
}

fn default_batch_count_limit() -> u32 {
    DEFAULT_BATCH_COUNT_LIMIT
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            file_size_limit: DEFAULT_FILE_SIZE_LIMIT_MB,
            batch_count_limit: DEFAULT_BATCH_COUNT_LIMIT,
            image_file_size_limit: None,
            video_file_size_limit: None,
            audio_file_size_limit: None,
        }
    }
}

impl UploadConfig {
    /// Per-file limit converted to bytes.
    pub fn file_size_limit_bytes(&self) -> u64 {
        self.file_size_limit.saturating_mul(1024 * 1024)
    }

    /// Batch window used by the scheduler. Never zero.
    pub fn effective_batch_limit(&self) -> usize {
        self.batch_count_limit.max(1) as usize
    }
}

/// Structured error body returned by the API on non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: u16,
}

impl ApiErrorBody {
    /// Whether the server refused the upload with a displayable reason.
    pub fn is_forbidden(&self) -> bool {
        self.code == "forbidden"
    }
}

/// Source discriminator appended to the upload URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadSource {
    #[default]
    Datasets,
}

impl UploadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Datasets => "datasets",
        }
    }
}

/// The data sources offered by the dataset creation wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataSourceType {
    #[serde(rename = "sync_bp2")]
    SyncedFiles,
    #[serde(rename = "upload_file")]
    LocalFile,
    #[serde(rename = "notion_import")]
    Notion,
    #[serde(rename = "website_crawl")]
    Website,
    #[serde(rename = "bp2")]
    SyncedCatalog,
}

impl DataSourceType {
    /// Whether this source produces entries in the upload registry.
    pub fn uses_file_registry(&self) -> bool {
        matches!(self, Self::SyncedFiles | Self::LocalFile | Self::SyncedCatalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_file_tolerates_unknown_fields() {
        let json = r#"{"id":"x1","name":"a.txt","size":12,"extension":"txt",
            "mime_type":"text/plain","created_by":"u1","created_at":1700000000,
            "preview_url":null}"#;
        let file: RemoteFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.id, "x1");
        assert_eq!(file.size, 12);
        assert_eq!(file.created_at, Some(1_700_000_000));
    }

    #[test]
    fn remote_file_minimal() {
        let file: RemoteFile = serde_json::from_str(r#"{"id":"x1","name":"a"}"#).unwrap();
        assert_eq!(file.size, 0);
        assert!(file.mime_type.is_empty());
        assert!(file.created_by.is_none());
    }

    #[test]
    fn upload_config_defaults_missing_fields() {
        let config: UploadConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, UploadConfig::default());
        assert_eq!(config.file_size_limit, 15);
        assert_eq!(config.batch_count_limit, 5);
    }

    #[test]
    fn upload_config_effective_batch_limit_never_zero() {
        let config = UploadConfig {
            batch_count_limit: 0,
            ..UploadConfig::default()
        };
        assert_eq!(config.effective_batch_limit(), 1);
        assert_eq!(UploadConfig::default().effective_batch_limit(), 5);
    }

    #[test]
    fn upload_config_size_in_bytes() {
        assert_eq!(UploadConfig::default().file_size_limit_bytes(), 15 * 1024 * 1024);
    }

    #[test]
    fn api_error_forbidden() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"code":"forbidden","message":"quota exceeded","status":403}"#)
                .unwrap();
        assert!(body.is_forbidden());
        assert_eq!(body.message, "quota exceeded");

        let other: ApiErrorBody = serde_json::from_str(r#"{"code":"file_too_large"}"#).unwrap();
        assert!(!other.is_forbidden());
    }

    #[test]
    fn data_source_wire_names() {
        assert_eq!(
            serde_json::to_string(&DataSourceType::LocalFile).unwrap(),
            r#""upload_file""#
        );
        let parsed: DataSourceType = serde_json::from_str(r#""sync_bp2""#).unwrap();
        assert_eq!(parsed, DataSourceType::SyncedFiles);
        assert!(parsed.uses_file_registry());
        assert!(!DataSourceType::Notion.uses_file_registry());
    }

    #[test]
    fn upload_source_query_value() {
        assert_eq!(UploadSource::Datasets.as_str(), "datasets");
    }
}
