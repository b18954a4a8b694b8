//! Snapshot manager
//!
//! Connects once with bounded retry, then registers repositories and prunes
//! stale indices. When the cluster stays unreachable every later operation is
//! a no-op that sends nothing; a cluster that answers with a hard error (bad
//! credentials, forbidden) fails the connect instead.

use chrono::{Local, NaiveDate};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::client::{ClusterApi, HttpClusterClient};
use crate::config::{ConnectionConfig, RepositoryConfig, RetentionConfig};
use crate::error::Result;
use crate::repository::RepositoryBody;
use crate::retention::{stale_index_name, PruneOutcome};

pub struct SnapshotManager<C> {
    client: C,
    connected: bool,
}

impl SnapshotManager<HttpClusterClient> {
    /// Build an HTTP client for `config` and connect with it.
    ///
    /// An unreachable cluster yields a manager with
    /// [`is_connected`](Self::is_connected) false; see [`connect`](Self::connect).
    pub async fn connect_http(config: &ConnectionConfig) -> Result<Self> {
        info!("Connecting to {}", config.redacted_url()?);
        let client = HttpClusterClient::new(config)?;
        Self::connect(client, config).await
    }
}

impl<C: ClusterApi> SnapshotManager<C> {
    /// Poll cluster health until it answers.
    ///
    /// Running out of attempts leaves the manager disconnected. An error that
    /// retrying cannot fix (e.g. 401) is returned.
    pub async fn connect(client: C, config: &ConnectionConfig) -> Result<Self> {
        let connected =
            wait_for_cluster(&client, config.max_attempts, config.retry_delay()).await?;
        Ok(Self { client, connected })
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Create or overwrite the repository described by `repo`.
    ///
    /// Returns `Ok(false)` without sending anything when not connected.
    pub async fn register_repository(&self, repo: &RepositoryConfig) -> Result<bool> {
        if !self.connected {
            debug!(repository = %repo.name, "Not connected, skipping repository registration");
            return Ok(false);
        }

        let body = RepositoryBody::from_backend(&repo.backend)?;
        info!(
            repository = %repo.name,
            kind = body.kind(),
            "Creating/Updating repository {}",
            repo.name
        );
        self.client.put_repository(&repo.name, &body).await?;
        Ok(true)
    }

    /// Delete the index that dropped out of the retention window today.
    pub async fn prune_stale_index(&self, retention: &RetentionConfig) -> PruneOutcome {
        self.prune_stale_index_at(retention, Local::now().date_naive())
            .await
    }

    /// Same as [`prune_stale_index`](Self::prune_stale_index) with an explicit
    /// current date. Failures are logged and reported in the outcome.
    pub async fn prune_stale_index_at(
        &self,
        retention: &RetentionConfig,
        today: NaiveDate,
    ) -> PruneOutcome {
        if !self.connected {
            debug!("Not connected, skipping index pruning");
            return PruneOutcome::Skipped;
        }

        let index = stale_index_name(&retention.index_prefix, today, retention.window_days);
        debug!(
            index = %index,
            window_days = retention.window_days,
            "Computed stale index"
        );

        match self.client.delete_index(&index).await {
            Ok(()) => {
                info!(index = %index, "Deleted index {}", index);
                PruneOutcome::Deleted { index }
            }
            Err(e) if e.is_not_found() => {
                error!(index = %index, error = %e, "Index to prune does not exist");
                PruneOutcome::NotFound { index }
            }
            Err(e) => {
                error!(index = %index, error = %e, "Failed to delete index");
                PruneOutcome::Failed {
                    index,
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Poll cluster health until it answers, up to `max_attempts` times with a
/// fixed `delay` between attempts.
async fn wait_for_cluster<C: ClusterApi>(
    client: &C,
    max_attempts: u32,
    delay: Duration,
) -> Result<bool> {
    for attempt in 1..=max_attempts {
        match client.cluster_health().await {
            Ok(health) => {
                info!(
                    cluster = %health.cluster_name,
                    status = %health.status,
                    nodes = health.number_of_nodes,
                    attempt,
                    "Connected to cluster"
                );
                return Ok(true);
            }
            Err(e) if e.is_retryable() => {
                warn!(attempt, max_attempts, error = %e, "Still trying to connect to cluster...");
            }
            Err(e) => {
                error!(attempt, error = %e, "Cluster health check failed, not retrying");
                return Err(e);
            }
        }

        if attempt < max_attempts {
            info!("Sleeping {} seconds...", delay.as_secs());
            tokio::time::sleep(delay).await;
        }
    }

    error!(max_attempts, "Giving up on cluster connection");
    Ok(false)
}
