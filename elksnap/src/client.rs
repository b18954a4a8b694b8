//! HTTP access to the cluster
//!
//! The manager only ever needs three calls, so they are expressed as the
//! [`ClusterApi`] trait with one `reqwest`-backed implementation.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::auth::Credentials;
use crate::config::ConnectionConfig;
use crate::error::{Result, SnapshotError};
use crate::repository::RepositoryBody;

/// Subset of the `_cluster/health` response we care about.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClusterHealth {
    pub cluster_name: String,
    pub status: String,
    #[serde(default)]
    pub number_of_nodes: u32,
}

/// Operations the snapshot manager issues against a cluster.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// `GET /_cluster/health?wait_for_status=green`
    async fn cluster_health(&self) -> Result<ClusterHealth>;

    /// `PUT /_snapshot/{name}`
    async fn put_repository(&self, name: &str, body: &RepositoryBody) -> Result<()>;

    /// `DELETE /{index}`
    async fn delete_index(&self, index: &str) -> Result<()>;
}

/// `reqwest` implementation of [`ClusterApi`].
pub struct HttpClusterClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Option<Credentials>,
    health_timeout: Duration,
    request_timeout: Duration,
}

impl HttpClusterClient {
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        let base_url = config.url()?;
        if base_url.cannot_be_a_base() {
            return Err(SnapshotError::Config(format!(
                "cluster URL {} cannot be used as a base",
                config.redacted_url()?
            )));
        }

        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            http,
            base_url,
            credentials: config.credentials.clone(),
            health_timeout: config.health_timeout(),
            request_timeout: config.request_timeout(),
        })
    }

    /// Base URL with `segments` as the path. Each segment is percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.clear().extend(segments);
        }
        url
    }

    /// Userinfo in the URL is percent-encoded, so auth is sent from the
    /// stored credentials and the request URL goes out without it.
    fn request(&self, method: reqwest::Method, mut url: Url) -> reqwest::RequestBuilder {
        let _ = url.set_password(None);
        let _ = url.set_username("");
        let builder = self.http.request(method, url);
        match &self.credentials {
            Some(creds) => builder.basic_auth(&creds.username, Some(&creds.password)),
            None => builder,
        }
    }
}

/// Turn a non-2xx response into [`SnapshotError::Status`].
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(SnapshotError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl ClusterApi for HttpClusterClient {
    async fn cluster_health(&self) -> Result<ClusterHealth> {
        let mut url = self.endpoint(&["_cluster", "health"]);
        url.query_pairs_mut().append_pair("wait_for_status", "green");
        debug!(path = url.path(), "Checking cluster health");

        let resp = self
            .request(reqwest::Method::GET, url)
            .timeout(self.health_timeout)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        Ok(resp.json::<ClusterHealth>().await?)
    }

    async fn put_repository(&self, name: &str, body: &RepositoryBody) -> Result<()> {
        let url = self.endpoint(&["_snapshot", name]);
        debug!(path = url.path(), kind = body.kind(), "Putting repository");

        let resp = self
            .request(reqwest::Method::PUT, url)
            .timeout(self.request_timeout)
            .json(body)
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<()> {
        let url = self.endpoint(&[index]);
        debug!(path = url.path(), "Deleting index");

        let resp = self
            .request(reqwest::Method::DELETE, url)
            .timeout(self.request_timeout)
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }
}
