//! Connection, repository and retention configuration
//!
//! All settings are plain structs built once (usually from CLI flags) and
//! passed by value into the client and manager.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::auth::Credentials;
use crate::error::{Result, SnapshotError};
use crate::retention::{DEFAULT_INDEX_PREFIX, RETENTION_DAYS};

/// How to reach the cluster and how hard to try.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionConfig {
    /// `http` or `https`
    #[serde(default = "default_protocol")]
    pub protocol: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Embedded into the connection URL when present
    #[serde(default)]
    pub credentials: Option<Credentials>,

    /// Health check attempts before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between health check attempts in milliseconds
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,

    /// Timeout for a single health check in milliseconds
    #[serde(default = "default_health_timeout")]
    pub health_timeout_ms: u64,

    /// Timeout for repository registration in milliseconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_protocol() -> String {
    "http".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    9200
}

fn default_max_attempts() -> u32 {
    10
}

fn default_retry_delay() -> u64 {
    10_000
}

fn default_health_timeout() -> u64 {
    20_000
}

fn default_request_timeout() -> u64 {
    300_000
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            protocol: default_protocol(),
            host: default_host(),
            port: default_port(),
            credentials: None,
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay(),
            health_timeout_ms: default_health_timeout(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl ConnectionConfig {
    /// Base URL of the cluster, with credentials as userinfo when configured.
    pub fn url(&self) -> Result<Url> {
        let mut url = Url::parse(&format!("{}://{}:{}", self.protocol, self.host, self.port))?;

        if let Some(creds) = &self.credentials {
            url.set_username(&creds.username).map_err(|_| {
                SnapshotError::Config("cannot embed username into cluster URL".to_string())
            })?;
            url.set_password(Some(&creds.password)).map_err(|_| {
                SnapshotError::Config("cannot embed password into cluster URL".to_string())
            })?;
        }

        Ok(url)
    }

    /// Same as [`url`](Self::url) but with the password masked, for logging.
    pub fn redacted_url(&self) -> Result<String> {
        let mut url = self.url()?;
        if url.password().is_some() {
            let _ = url.set_password(Some("***"));
        }
        Ok(url.to_string())
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_millis(self.health_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

pub const DEFAULT_REPOSITORY: &str = "backup_to";
pub const DEFAULT_REGION: &str = "ap-southeast-2";
pub const DEFAULT_FS_LOCATION: &str = "/usr/local/elk/elasticsearch/data/repository";

/// A named snapshot repository and where it stores data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RepositoryConfig {
    #[serde(default = "default_repository")]
    pub name: String,

    pub backend: RepositoryBackend,
}

fn default_repository() -> String {
    DEFAULT_REPOSITORY.to_string()
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_fs_location() -> String {
    DEFAULT_FS_LOCATION.to_string()
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            name: default_repository(),
            backend: RepositoryBackend::S3 {
                bucket: None,
                prefix: None,
                region: default_region(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RepositoryBackend {
    /// S3 bucket; `bucket` and `prefix` are required at registration time
    S3 {
        bucket: Option<String>,
        prefix: Option<String>,
        #[serde(default = "default_region")]
        region: String,
    },
    /// Shared filesystem path registered in `path.repo` on every node
    Fs {
        #[serde(default = "default_fs_location")]
        location: String,
    },
}

impl RepositoryBackend {
    pub fn kind(&self) -> &'static str {
        match self {
            RepositoryBackend::S3 { .. } => "s3",
            RepositoryBackend::Fs { .. } => "fs",
        }
    }
}

/// Which date-partitioned index falls out of the retention window.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetentionConfig {
    #[serde(default = "default_index_prefix")]
    pub index_prefix: String,

    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

fn default_index_prefix() -> String {
    DEFAULT_INDEX_PREFIX.to_string()
}

fn default_window_days() -> u32 {
    RETENTION_DAYS
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            index_prefix: default_index_prefix(),
            window_days: default_window_days(),
        }
    }
}
