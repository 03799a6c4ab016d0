//! Anypoint Platform management API client
//!
//! One [`AnypointClient`] is built per run from the configuration. Its
//! methods are split by concern:
//!
//! - [`auth`]: username/password token exchange
//! - [`environments`]: environment listing per organization
//! - [`connected_apps`]: create, authorize, list and delete Connected Apps
//!
//! Every call is awaited before the next one is issued.

pub mod auth;
pub mod connected_apps;
pub mod environments;

pub use connected_apps::{AuthorizationReport, DeletionReport};

use crate::config::AnypointConfig;
use crate::error::{ConnectError, Result};
use std::time::Duration;

use reqwest::Client;

/// Page size sent with every list call; further pages are never fetched
pub const PAGE_LIMIT: u32 = 500;

/// Placeholder substituted with an organization id
pub const ORG_PLACEHOLDER: &str = "orgId";

/// Placeholder substituted with a Connected App client id
pub const CLIENT_PLACEHOLDER: &str = "clientId";

/// HTTP client bound to one platform base URL and its endpoint templates
#[derive(Debug, Clone)]
pub struct AnypointClient {
    http: Client,
    config: AnypointConfig,
}

impl AnypointClient {
    /// Create a client for the configured platform
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built
    pub fn new(config: AnypointConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent(concat!("anypoint-connect/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConnectError::Config(format!("Failed to create HTTP client: {}", e)))?;

        tracing::debug!(base_url = %config.base_url, "Initialized Anypoint client");

        Ok(Self { http, config })
    }

    /// The configuration this client was built from
    pub fn config(&self) -> &AnypointConfig {
        &self.config
    }

    /// Join the base URL and a path, tolerating a trailing slash on the base
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Standard paging parameters for list calls
    pub(crate) fn page_params() -> [(&'static str, u32); 2] {
        [("limit", PAGE_LIMIT), ("offset", 0)]
    }
}

/// Substitute `orgId` in a path template
pub fn org_path(template: &str, org_id: &str) -> String {
    template.replace(ORG_PLACEHOLDER, org_id)
}

/// Substitute `orgId` and `clientId` in a path template
pub fn org_client_path(template: &str, org_id: &str, client_id: &str) -> String {
    template
        .replace(ORG_PLACEHOLDER, org_id)
        .replace(CLIENT_PLACEHOLDER, client_id)
}
