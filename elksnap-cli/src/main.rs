use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use elksnap::config::{DEFAULT_FS_LOCATION, DEFAULT_REGION, DEFAULT_REPOSITORY};
use elksnap::retention::DEFAULT_INDEX_PREFIX;
use elksnap::{
    load_credentials, ConnectionConfig, RepositoryBackend, RepositoryConfig, RetentionConfig,
    SnapshotManager, DEFAULT_AUTH_CONFIG,
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "elksnap")]
#[command(about = "Register Elasticsearch snapshot repositories and prune old daily indices")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Bucket name where snapshots are stored
    #[arg(long, global = true)]
    bucket: Option<String>,

    /// Path within the S3 bucket for the backups to be stored
    #[arg(long, global = true)]
    prefix: Option<String>,

    /// Repository name to use in Elasticsearch
    #[arg(long, global = true, default_value = DEFAULT_REPOSITORY)]
    repository: String,

    /// S3 bucket region
    #[arg(long, global = true, default_value = DEFAULT_REGION)]
    region: String,

    /// Snapshot name to use for the backup/restore (default: all_YYYYMMDDHH)
    #[arg(long, global = true)]
    snapshot: Option<String>,

    /// Backup/restore specific indices (default: all)
    #[arg(long, global = true, num_args = 1..)]
    indices: Vec<String>,

    /// Print debug information
    #[arg(long, global = true)]
    debug: bool,

    /// Elasticsearch host
    #[arg(long, global = true, default_value = "localhost")]
    eshost: String,

    /// Elasticsearch port
    #[arg(long, global = true, default_value = "9200")]
    esport: u16,

    /// Protocol to use when talking to Elasticsearch
    #[arg(long, global = true, default_value = "http", value_parser = ["http", "https"])]
    esproto: String,

    /// File with USERNAME/PASSWORD used to authenticate against Elasticsearch
    #[arg(long, global = true, env = "ELKSNAP_AUTHCFG", default_value = DEFAULT_AUTH_CONFIG)]
    esauthcfg: PathBuf,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Commands {
    /// Create or update an S3 snapshot repository (default)
    S3Repo,

    /// Create or update a shared filesystem snapshot repository
    FsRepo {
        /// Repository location, must be listed in path.repo on every node
        #[arg(long, default_value = DEFAULT_FS_LOCATION)]
        location: String,
    },

    /// Delete the daily index that fell out of the 7-day retention window
    Prune {
        /// Prefix of the daily indices
        #[arg(long, default_value = DEFAULT_INDEX_PREFIX)]
        index_prefix: String,
    },
}

impl Cli {
    fn connection_config(&self) -> Result<ConnectionConfig> {
        let credentials = load_credentials(&self.esauthcfg)
            .with_context(|| format!("Failed to load {}", self.esauthcfg.display()))?;

        Ok(ConnectionConfig {
            protocol: self.esproto.clone(),
            host: self.eshost.clone(),
            port: self.esport,
            credentials,
            ..Default::default()
        })
    }

    fn s3_repository(&self) -> RepositoryConfig {
        RepositoryConfig {
            name: self.repository.clone(),
            backend: RepositoryBackend::S3 {
                bucket: self.bucket.clone(),
                prefix: self.prefix.clone(),
                region: self.region.clone(),
            },
        }
    }

    fn fs_repository(&self, location: &str) -> RepositoryConfig {
        RepositoryConfig {
            name: self.repository.clone(),
            backend: RepositoryBackend::Fs {
                location: location.to_string(),
            },
        }
    }
}

/// Filter directives: `RUST_LOG` (or `info`), with our own crates raised to
/// `debug` when `--debug` is given.
fn log_directives(debug: bool, rust_log: Option<String>) -> String {
    let base = rust_log
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "info".into());
    if debug {
        format!("{},elksnap=debug,elksnap_cli=debug", base)
    } else {
        base
    }
}

fn init_tracing(debug: bool) {
    let directives = log_directives(debug, std::env::var("RUST_LOG").ok());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(directives))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Some(snapshot) = &cli.snapshot {
        tracing::debug!("Snapshot: {}", snapshot);
    }
    if !cli.indices.is_empty() {
        tracing::debug!("Indices: {}", cli.indices.join(","));
    }

    let connection = cli.connection_config()?;
    let manager = SnapshotManager::connect_http(&connection)
        .await
        .context("Failed to connect to Elasticsearch")?;

    match cli.command.clone().unwrap_or(Commands::S3Repo) {
        Commands::S3Repo => commands::repo::run(&manager, &cli.s3_repository()).await?,
        Commands::FsRepo { location } => {
            commands::repo::run(&manager, &cli.fs_repository(&location)).await?
        }
        Commands::Prune { index_prefix } => {
            let retention = RetentionConfig {
                index_prefix,
                ..Default::default()
            };
            commands::prune::run(&manager, &retention).await;
        }
    }

    Ok(())
}
