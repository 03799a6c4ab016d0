//! Username/password token exchange

use super::AnypointClient;
use crate::error::{ConnectError, Result};
use crate::models::{Credentials, Token};

impl AnypointClient {
    /// Exchange credentials for a bearer token
    ///
    /// Issues a single form-encoded POST to the configured auth endpoint.
    /// There is no retry and no refresh.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::Authentication`] when the platform answers
    /// with a non-success status or without an `access_token`
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Token> {
        let url = self.url(&self.config.auth_api);
        tracing::info!("Authenticating with your Anypoint Platform at {}...", url);
        tracing::debug!(?credentials, url = %url, "Anypoint login parameters");

        let params = [
            ("username", credentials.username()),
            ("password", credentials.password()),
        ];
        let response = self
            .http
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|e| ConnectError::Authentication(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Authentication rejected with {}: {}", status, body);
            return Err(ConnectError::Authentication(format!(
                "platform returned {}: {}",
                status, body
            ))
            .into());
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            ConnectError::Authentication(format!("failed to parse token response: {e}"))
        })?;
        let token = Token::from_json(&body)?;
        tracing::info!("Successfully obtained Access Token");

        Ok(token)
    }
}
