//! HTTP client for the dashboard endpoint.

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::validate::parse_snapshot;
use async_trait::async_trait;
use paceboard_core::DashboardSnapshot;
use reqwest::{Client, ClientBuilder};
use tracing::{debug, warn};

/// Anything that can produce a dashboard snapshot.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch and validate one snapshot.
    async fn fetch_snapshot(&self) -> Result<DashboardSnapshot>;
}

/// Dashboard API client.
#[derive(Clone)]
pub struct DashboardClient {
    /// HTTP client
    client: Client,

    /// Connection settings
    config: ClientConfig,
}

impl DashboardClient {
    /// Create a new dashboard client.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { client, config })
    }

    /// Settings in use.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// GET the dashboard endpoint and validate the payload.
    pub async fn fetch(&self) -> Result<DashboardSnapshot> {
        let url = self.config.dashboard_url();
        debug!("Fetching dashboard data from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Dashboard API error (status {})", status);
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        let snapshot = parse_snapshot(&body).map_err(|e| {
            warn!("Dashboard API response has unexpected shape: {}", e);
            e
        })?;

        debug!(
            "Received snapshot: {} {} rows",
            snapshot.feed.len(),
            snapshot.feed.mode()
        );
        Ok(snapshot)
    }

    fn transport_error(&self, error: reqwest::Error) -> ClientError {
        if error.is_timeout() {
            ClientError::Timeout(self.config.request_timeout)
        } else {
            ClientError::Network(error)
        }
    }
}

#[async_trait]
impl SnapshotSource for DashboardClient {
    async fn fetch_snapshot(&self) -> Result<DashboardSnapshot> {
        self.fetch().await
    }
}
