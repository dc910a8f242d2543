//! HTTP client for the alert feed.

use std::time::Duration;

use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ConfigModel;
use crate::models::Region;

use super::FetchError;

/// Public mirror that needs no key.
pub const PUBLIC_BASE_URL: &str = "https://siren.pp.ua/api/v3";
/// Official API; requires an `authorization` key.
pub const OFFICIAL_BASE_URL: &str = "https://api.ukrainealarm.com/api/v3";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct FeedClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl FeedClient {
    pub fn new(config: &ConfigModel) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(!config.enable_ssl_validation)
            .build()?;

        Ok(Self {
            http,
            base_url: resolve_base_url(config.api_base_url.as_deref(), config.api_key.as_deref()),
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        log::debug!("GET {url}");

        let mut request = self
            .http
            .get(&url)
            .header(header::ACCEPT, "application/json");
        if let Some(key) = &self.api_key {
            request = request.header(header::AUTHORIZATION, key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        log::debug!("Packet received: {}", String::from_utf8_lossy(&bytes));
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Regions with their active alerts; all regions when `region_id` is `None`.
    pub async fn get_alerts(&self, region_id: Option<&str>) -> Result<Vec<Region>, FetchError> {
        match region_id {
            Some(id) => self.get(&format!("alerts/{id}")).await,
            None => self.get("alerts").await,
        }
    }

    /// Counter the feed bumps on every change in any region.
    pub async fn get_last_alert_index(&self) -> Result<Value, FetchError> {
        self.get("alerts/status").await
    }

    pub async fn get_regions(&self) -> Result<Value, FetchError> {
        self.get("regions").await
    }
}

fn resolve_base_url(configured: Option<&str>, api_key: Option<&str>) -> String {
    match (configured, api_key) {
        (Some(url), _) => url.to_string(),
        (None, Some(_)) => OFFICIAL_BASE_URL.to_string(),
        (None, None) => PUBLIC_BASE_URL.to_string(),
    }
}
