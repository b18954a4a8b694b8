//! elksnap: snapshot repository provisioning and index retention for
//! Elasticsearch clusters
//!
//! - Registers an S3 or filesystem snapshot repository (idempotent `PUT`)
//! - Deletes the daily index that fell out of the 7-day retention window

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod manager;
pub mod repository;
pub mod retention;

pub use auth::{load_credentials, Credentials, DEFAULT_AUTH_CONFIG};
pub use client::{ClusterApi, ClusterHealth, HttpClusterClient};
pub use config::{ConnectionConfig, RepositoryBackend, RepositoryConfig, RetentionConfig};
pub use error::{Result, SnapshotError};
pub use manager::SnapshotManager;
pub use repository::RepositoryBody;
pub use retention::{stale_index_name, PruneOutcome};
