use anyhow::{Context, Result};
use elksnap::{ClusterApi, RepositoryConfig, SnapshotManager};

/// Register (or overwrite) the snapshot repository
pub async fn run<C: ClusterApi>(
    manager: &SnapshotManager<C>,
    repo: &RepositoryConfig,
) -> Result<()> {
    let applied = manager
        .register_repository(repo)
        .await
        .with_context(|| format!("Failed to register repository '{}'", repo.name))?;

    if applied {
        tracing::info!(
            "Repository '{}' ({}) is registered",
            repo.name,
            repo.backend.kind()
        );
    } else {
        tracing::warn!(
            "Cluster unavailable, repository '{}' was not registered",
            repo.name
        );
    }

    Ok(())
}
