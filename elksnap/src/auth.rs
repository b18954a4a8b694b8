//! Cluster credentials loaded from a `KEY = value` file.
//!
//! ```text
//! # /etc/default/elasticsearch-snapshots
//! USERNAME = elastic
//! PASSWORD = "s3cret"
//! ```

use std::fmt;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SnapshotError};

pub const DEFAULT_AUTH_CONFIG: &str = "/etc/default/elasticsearch-snapshots";

/// Basic-auth credentials for the cluster.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Credentials {
    pub username: String,
    /// Read from config, never written back out
    #[serde(skip_serializing)]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Load credentials from `path`.
///
/// A missing file means no credentials. A file that exists but cannot be read
/// is an error.
pub fn load_credentials(path: &Path) -> Result<Option<Credentials>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let creds = parse_credentials(&contents);
            if creds.is_none() {
                debug!("No USERNAME/PASSWORD pair in {}", path.display());
            }
            Ok(creds)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Auth config {} not found, connecting anonymously", path.display());
            Ok(None)
        }
        Err(e) => Err(SnapshotError::Credentials(format!(
            "failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Parse `USERNAME` and `PASSWORD` out of a key/value file.
///
/// Both keys must be present and non-empty, otherwise `None`.
pub fn parse_credentials(contents: &str) -> Option<Credentials> {
    let mut username = None;
    let mut password = None;

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = unquote(value.trim());
        match key.trim() {
            "USERNAME" => username = Some(value.to_string()),
            "PASSWORD" => password = Some(value.to_string()),
            _ => {}
        }
    }

    match (username, password) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Some(Credentials::new(u, p)),
        _ => None,
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
