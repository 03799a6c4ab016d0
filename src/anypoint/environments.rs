//! Environment listing per organization

use super::{org_path, AnypointClient};
use crate::error::{ConnectError, Result};
use crate::models::{Environment, Organization, Token};
use serde_json::Value;

impl AnypointClient {
    /// Fetch the environments of each organization, in input order
    ///
    /// One list call per organization with `limit=500&offset=0`; further
    /// pages are not followed.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::Environments`] if any listing fails or its
    /// body lacks a `data` array
    pub async fn get_environments(
        &self,
        token: &Token,
        organizations: &[String],
    ) -> Result<Vec<Organization>> {
        let mut results = Vec::with_capacity(organizations.len());

        for org_id in organizations {
            let url = self.url(&org_path(&self.config.environments_api, org_id));
            tracing::info!("Getting all environments from the Anypoint Platform at {}...", url);

            let response = self
                .http
                .get(&url)
                .query(&Self::page_params())
                .header(reqwest::header::AUTHORIZATION, token.bearer())
                .send()
                .await
                .map_err(|e| {
                    ConnectError::Environments(format!("request for org {org_id} failed: {e}"))
                })?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ConnectError::Environments(format!(
                    "listing for org {} returned {}: {}",
                    org_id, status, body
                ))
                .into());
            }

            let body: Value = response.json().await.map_err(|e| {
                ConnectError::Environments(format!("invalid listing for org {org_id}: {e}"))
            })?;
            let records = body.get("data").and_then(Value::as_array).ok_or_else(|| {
                ConnectError::Environments(format!("listing for org {org_id} has no data array"))
            })?;

            let environments = records
                .iter()
                .map(Environment::from_json)
                .collect::<Result<Vec<_>>>()?;
            tracing::info!("Successfully obtained {} environments", environments.len());
            tracing::debug!(org_id = %org_id, ?environments, "Anypoint environments");

            results.push(Organization {
                org_id: org_id.clone(),
                environments,
            });
        }

        Ok(results)
    }
}
