//! Connected App lifecycle calls
//!
//! Creation is the only fatal step. Authorization, listing and deletion
//! failures are logged and tolerated so one bad organization or app never
//! stops the rest of the run.

use super::{org_client_path, AnypointClient};
use crate::artifacts::{org_authz_file, ArtifactWriter, APP_LIST_FILE};
use crate::error::{ConnectError, Result};
use crate::models::{
    AuthorizationPayload, ConnectedApp, ConnectedAppSummary, CreatedConnectedApp, Token,
};
use reqwest::StatusCode;
use serde_json::Value;

/// Outcome of authorizing one Connected App across organizations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationReport {
    /// Organizations that answered 204
    pub authorized: Vec<String>,
    /// Organizations that answered anything else, with the status
    pub failed: Vec<(String, u16)>,
}

/// Outcome of deleting Connected Apps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionReport {
    /// Number of apps a deletion was attempted for
    pub total: usize,
    /// Client ids that answered 204
    pub deleted: Vec<String>,
}

impl AnypointClient {
    /// Create the Connected App
    ///
    /// # Errors
    ///
    /// Any status other than 201 is returned as
    /// [`ConnectError::AppCreation`] and must end the run
    pub async fn create_connected_app(
        &self,
        token: &Token,
        payload: &ConnectedApp,
    ) -> Result<CreatedConnectedApp> {
        tracing::info!(
            "Creating a new Connected App with the name {}...",
            payload.client_name
        );
        let url = self.url(&self.config.accounts_api);
        let body = payload.to_json();
        tracing::debug!(url = %url, payload = %body, "Connected App creation request");

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, token.bearer())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let message = response.text().await.unwrap_or_default();
            tracing::error!("Failed to create the Connected App: {}", status);
            return Err(ConnectError::AppCreation {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let value: Value = response.json().await?;
        let created = CreatedConnectedApp::from_json(value)?;
        tracing::info!("Connected App successfully created");
        tracing::debug!(?created, "New Connected App");

        Ok(created)
    }

    /// Authorize the Connected App for every organization in `payload`
    ///
    /// Each organization's `{"scopes": [...]}` body is written to
    /// `authz_<orgId>.json` before it is sent, including an empty list. A
    /// non-204 answer is logged and the next organization is tried; nothing
    /// is rolled back.
    pub async fn authorize_connected_app(
        &self,
        token: &Token,
        payload: &AuthorizationPayload,
        app_id: &str,
        artifacts: &ArtifactWriter,
    ) -> Result<AuthorizationReport> {
        let mut report = AuthorizationReport::default();

        for (org_id, entries) in payload.iter() {
            if entries.is_empty() {
                tracing::warn!("Organization {} has no scopes to authorize", org_id);
            }

            let url = self.url(&org_client_path(
                &self.config.authorize_scopes_api,
                org_id,
                app_id,
            ));
            let body = AuthorizationPayload::org_request_body(entries);
            artifacts.write_json(&org_authz_file(org_id), &body)?;
            tracing::debug!(url = %url, scopes = entries.len(), "Authorizing Connected App");

            let response = match self
                .http
                .put(&url)
                .header(reqwest::header::AUTHORIZATION, token.bearer())
                .json(&body)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!("Failed to authorize the Connected App for {}: {}", org_id, e);
                    report.failed.push((org_id.to_string(), 0));
                    continue;
                }
            };

            let status = response.status();
            if status == StatusCode::NO_CONTENT {
                tracing::info!("Connected App successfully authorized for {}", org_id);
                report.authorized.push(org_id.to_string());
            } else {
                tracing::warn!(
                    "Failed to authorize the Connected App for {}: {}",
                    org_id,
                    status.as_u16()
                );
                report.failed.push((org_id.to_string(), status.as_u16()));
            }
        }

        Ok(report)
    }

    /// List the Connected Apps of the account (first page only)
    ///
    /// On success the raw response is written to `list_of_apps.json`. A
    /// failed listing is logged and yields an empty list.
    pub async fn get_all_connected_apps(
        &self,
        token: &Token,
        artifacts: &ArtifactWriter,
    ) -> Result<Vec<ConnectedAppSummary>> {
        tracing::info!("Fetching a list of all the Connected Apps");
        let url = self.url(&self.config.accounts_api);

        let response = match self
            .http
            .get(&url)
            .query(&Self::page_params())
            .header(reqwest::header::AUTHORIZATION, token.bearer())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Failed to get a list of all connected apps: {}", e);
                return Ok(Vec::new());
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(
                "Failed to get a list of all connected apps: {}",
                status.as_u16()
            );
            return Ok(Vec::new());
        }

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Connected App listing was not valid JSON: {}", e);
                return Ok(Vec::new());
            }
        };
        tracing::info!("List of connected apps successfully retrieved");
        artifacts.write_json(APP_LIST_FILE, &body)?;

        let apps: Vec<ConnectedAppSummary> = body
            .get("data")
            .and_then(Value::as_array)
            .map(|records| {
                records
                    .iter()
                    .filter_map(|record| match ConnectedAppSummary::from_json(record) {
                        Ok(app) => Some(app),
                        Err(e) => {
                            tracing::warn!("Skipping Connected App record {}: {}", record, e);
                            None
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(apps)
    }

    /// Delete each Connected App by client id
    ///
    /// Only a 204 counts as deleted. Failures are not retried and only
    /// show up as absence from [`DeletionReport::deleted`].
    pub async fn delete_connected_apps(
        &self,
        token: &Token,
        connected_apps: &[ConnectedAppSummary],
    ) -> DeletionReport {
        let total = connected_apps.len();
        let mut report = DeletionReport {
            total,
            deleted: Vec::new(),
        };
        tracing::info!("Deleting [{}] Connected Apps", total);

        let base = self.url(&self.config.accounts_api);
        for (i, app) in connected_apps.iter().enumerate() {
            tracing::info!(
                "Deleting connected app {} - [{}/{}]",
                app.client_id,
                i + 1,
                total
            );
            let result = self
                .http
                .delete(format!("{}/{}", base, app.client_id))
                .header(reqwest::header::AUTHORIZATION, token.bearer())
                .send()
                .await;

            match result {
                Ok(response) if response.status() == StatusCode::NO_CONTENT => {
                    report.deleted.push(app.client_id.clone());
                }
                Ok(response) => {
                    tracing::debug!(
                        client_id = %app.client_id,
                        status = response.status().as_u16(),
                        "Deletion not confirmed"
                    );
                }
                Err(e) => {
                    tracing::debug!(client_id = %app.client_id, error = %e, "Deletion request failed");
                }
            }
        }

        tracing::info!("Final results:");
        for client_id in &report.deleted {
            tracing::info!("{} -> deleted", client_id);
        }

        report
    }
}
