use elksnap::{ClusterApi, PruneOutcome, RetentionConfig, SnapshotManager};

/// Delete the index that fell out of the retention window.
///
/// Never fails: a missing index or a rejected delete is only logged.
pub async fn run<C: ClusterApi>(manager: &SnapshotManager<C>, retention: &RetentionConfig) {
    match manager.prune_stale_index(retention).await {
        PruneOutcome::Skipped => {
            tracing::warn!("Cluster unavailable, nothing pruned");
        }
        PruneOutcome::Deleted { index } => {
            tracing::info!("Pruned {}", index);
        }
        PruneOutcome::NotFound { index } | PruneOutcome::Failed { index, .. } => {
            tracing::debug!("Index {} left in place", index);
        }
    }
}
