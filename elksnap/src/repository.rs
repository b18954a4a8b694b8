//! Request bodies for `PUT /_snapshot/{name}`

use serde::Serialize;

use crate::config::RepositoryBackend;
use crate::error::{Result, SnapshotError};

/// Throughput cap applied to S3 snapshot and restore streams.
pub const S3_THROUGHPUT_CAP: &str = "200mb";

/// Throughput cap applied to filesystem snapshot and restore streams.
pub const FS_THROUGHPUT_CAP: &str = "50mb";

/// Repository definition as the cluster expects it:
/// `{"type": "...", "settings": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "settings", rename_all = "lowercase")]
pub enum RepositoryBody {
    S3(S3Settings),
    Fs(FsSettings),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    pub base_path: String,
    pub max_restore_bytes_per_sec: String,
    pub max_snapshot_bytes_per_sec: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FsSettings {
    pub compress: bool,
    pub location: String,
    pub max_restore_bytes_per_sec: String,
    pub max_snapshot_bytes_per_sec: String,
}

impl RepositoryBody {
    /// Build the body for `backend`, checking required S3 fields.
    pub fn from_backend(backend: &RepositoryBackend) -> Result<Self> {
        match backend {
            RepositoryBackend::S3 {
                bucket,
                prefix,
                region,
            } => {
                let bucket = required(bucket.as_deref(), "bucket")?;
                let prefix = required(prefix.as_deref(), "prefix")?;
                Ok(RepositoryBody::S3(S3Settings {
                    bucket: bucket.to_string(),
                    region: region.clone(),
                    base_path: format!("/{}", prefix.trim_start_matches('/')),
                    max_restore_bytes_per_sec: S3_THROUGHPUT_CAP.to_string(),
                    max_snapshot_bytes_per_sec: S3_THROUGHPUT_CAP.to_string(),
                }))
            }
            RepositoryBackend::Fs { location } => {
                if location.trim().is_empty() {
                    return Err(SnapshotError::Config(
                        "fs repository requires a location".to_string(),
                    ));
                }
                Ok(RepositoryBody::Fs(FsSettings {
                    compress: true,
                    location: location.clone(),
                    max_restore_bytes_per_sec: FS_THROUGHPUT_CAP.to_string(),
                    max_snapshot_bytes_per_sec: FS_THROUGHPUT_CAP.to_string(),
                }))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RepositoryBody::S3(_) => "s3",
            RepositoryBody::Fs(_) => "fs",
        }
    }
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(SnapshotError::Config(format!(
            "s3 repository requires --{}",
            field
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn s3(bucket: Option<&str>, prefix: Option<&str>) -> RepositoryBackend {
        RepositoryBackend::S3 {
            bucket: bucket.map(String::from),
            prefix: prefix.map(String::from),
            region: "ap-southeast-2".to_string(),
        }
    }

    #[test]
    fn test_s3_body_shape() {
        let body = RepositoryBody::from_backend(&s3(Some("backups"), Some("prod/es"))).unwrap();
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "s3",
                "settings": {
                    "bucket": "backups",
                    "region": "ap-southeast-2",
                    "base_path": "/prod/es",
                    "max_restore_bytes_per_sec": "200mb",
                    "max_snapshot_bytes_per_sec": "200mb"
                }
            })
        );
    }

    #[test]
    fn test_s3_base_path_single_leading_slash() {
        let body = RepositoryBody::from_backend(&s3(Some("b"), Some("/already"))).unwrap();
        match body {
            RepositoryBody::S3(settings) => assert_eq!(settings.base_path, "/already"),
            other => panic!("expected s3 body, got {:?}", other),
        }
    }

    #[test]
    fn test_s3_requires_bucket_and_prefix() {
        let err = RepositoryBody::from_backend(&s3(None, Some("p"))).unwrap_err();
        assert!(err.to_string().contains("--bucket"));

        let err = RepositoryBody::from_backend(&s3(Some("b"), Some("  "))).unwrap_err();
        assert!(err.to_string().contains("--prefix"));
    }

    #[test]
    fn test_fs_body_shape() {
        let backend = RepositoryBackend::Fs {
            location: "/mnt/backups".to_string(),
        };
        let value = serde_json::to_value(RepositoryBody::from_backend(&backend).unwrap()).unwrap();
        assert_eq!(value["type"], "fs");
        assert_eq!(value["settings"]["compress"], true);
        assert_eq!(value["settings"]["location"], "/mnt/backups");
        assert_eq!(value["settings"]["max_restore_bytes_per_sec"], "50mb");
        assert_eq!(value["settings"]["max_snapshot_bytes_per_sec"], "50mb");
    }

    #[test]
    fn test_fs_requires_location() {
        let backend = RepositoryBackend::Fs {
            location: String::new(),
        };
        assert!(matches!(
            RepositoryBody::from_backend(&backend),
            Err(SnapshotError::Config(_))
        ));
    }
}
