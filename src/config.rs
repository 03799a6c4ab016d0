//! Configuration management for Anypoint Connect
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//! The resulting [`Config`] is built once in `main` and handed to every
//! component that needs it.

use crate::error::{ConnectError, Result};
use crate::models::Credentials;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Main configuration structure for Anypoint Connect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Enable debug logging
    #[serde(default)]
    pub debug: bool,

    /// Management API location and organizations to provision
    #[serde(default)]
    pub anypoint: AnypointConfig,

    /// Connected App settings and feature toggles
    #[serde(default)]
    pub app: AppConfig,

    /// Input and output file locations
    #[serde(default)]
    pub files: FilesConfig,

    /// Platform credentials, usually supplied through the environment
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Environment variables that were set but could not be parsed, as
    /// `(name, value)`. Loading happens before logging is up, so `main`
    /// reports these once the subscriber is installed.
    #[serde(skip)]
    pub rejected_env: Vec<(String, String)>,
}

/// Anypoint Platform management API configuration
///
/// Path templates carry the literal placeholders `orgId` and `clientId`,
/// which are substituted by plain string replacement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnypointConfig {
    /// Base URL of the platform
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Username/password token exchange endpoint
    #[serde(default = "default_auth_api")]
    pub auth_api: String,

    /// Connected Applications collection endpoint
    #[serde(default = "default_accounts_api")]
    pub accounts_api: String,

    /// Environment listing endpoint template (contains `orgId`)
    #[serde(default = "default_environments_api")]
    pub environments_api: String,

    /// Scope authorization endpoint template (contains `orgId` and `clientId`)
    #[serde(default = "default_authorize_scopes_api")]
    pub authorize_scopes_api: String,

    /// Organization ids the Connected App is authorized for
    #[serde(default)]
    pub organizations: Vec<String>,
}

fn default_base_url() -> String {
    "https://anypoint.mulesoft.com".to_string()
}

fn default_auth_api() -> String {
    "/api/v1/oauth/token".to_string()
}

fn default_accounts_api() -> String {
    "/accounts/api/connectedApplications".to_string()
}

fn default_environments_api() -> String {
    "/accounts/api/organizations/orgId/environments".to_string()
}

fn default_authorize_scopes_api() -> String {
    "/accounts/api/organizations/orgId/connectedApplications/clientId/scopes".to_string()
}

impl Default for AnypointConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_api: default_auth_api(),
            accounts_api: default_accounts_api(),
            environments_api: default_environments_api(),
            authorize_scopes_api: default_authorize_scopes_api(),
            organizations: Vec::new(),
        }
    }
}

/// Connected App configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Fixed client name registered for the integration
    #[serde(default)]
    pub client_name: Option<String>,

    /// Create and authorize the Connected App during `provision`
    #[serde(default = "default_create")]
    pub create: bool,

    /// Allow the destructive `cleanup` command to run
    #[serde(default)]
    pub delete: bool,
}

fn default_create() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client_name: None,
            create: default_create(),
            delete: false,
        }
    }
}

/// File locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Directory holding the scope catalog
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Scope catalog file name, relative to `data_dir`
    #[serde(default = "default_scopes_file")]
    pub scopes_file: String,

    /// Directory receiving the JSON artifacts
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_scopes_file() -> String {
    "scopes.json".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            scopes_file: default_scopes_file(),
            output_dir: default_output_dir(),
        }
    }
}

impl FilesConfig {
    /// Full path of the scope catalog
    pub fn scopes_path(&self) -> PathBuf {
        self.data_dir.join(&self.scopes_file)
    }
}

/// Credentials as configured; never serialized back out
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Platform username
    #[serde(default)]
    pub username: Option<String>,

    /// Platform password
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error: defaults are used and the
    /// environment fills in the rest.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConnectError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml(&contents)
    }

    /// Parse a configuration document
    pub fn from_yaml(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents)
            .map_err(|e| ConnectError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Some(debug) = self.env_bool("DEBUG") {
            self.debug = debug;
        }

        if let Ok(url) = std::env::var("ANYPOINT_URL") {
            self.anypoint.base_url = url;
        }

        if let Ok(api) = std::env::var("ANYPOINT_AUTH_API") {
            self.anypoint.auth_api = api;
        }

        if let Ok(api) = std::env::var("ANYPOINT_ACCOUNTS_API") {
            self.anypoint.accounts_api = api;
        }

        if let Ok(api) = std::env::var("ANYPOINT_ENVIRONMENTS_API") {
            self.anypoint.environments_api = api;
        }

        if let Ok(api) = std::env::var("ANYPOINT_AUTHORIZE_SCOPES_API") {
            self.anypoint.authorize_scopes_api = api;
        }

        if let Ok(orgs) = std::env::var("ANYPOINT_ORGANIZATIONS") {
            self.anypoint.organizations = parse_organizations(&orgs);
        }

        if let Ok(file) = std::env::var("SCOPES_SAMPLE_FILE") {
            self.files.scopes_file = file;
        }

        if let Ok(dir) = std::env::var("DATAFILE_DIRECTORY") {
            self.files.data_dir = PathBuf::from(dir);
        }

        if let Ok(dir) = std::env::var("OUTPUT_DIRECTORY") {
            self.files.output_dir = PathBuf::from(dir);
        }

        if let Ok(name) = std::env::var("CONNECTED_APP_CLIENT_NAME") {
            self.app.client_name = Some(name);
        }

        if let Some(create) = self.env_bool("CREATE") {
            self.app.create = create;
        }

        if let Some(delete) = self.env_bool("DELETE_APPS") {
            self.app.delete = delete;
        }

        if let Ok(username) = std::env::var("ANYPOINT_USERNAME") {
            self.credentials.username = Some(username);
        }

        if let Ok(password) = std::env::var("ANYPOINT_PASSWORD") {
            self.credentials.password = Some(password);
        }
    }

    /// Read a boolean toggle; an empty value counts as unset and anything
    /// unparseable is recorded in `rejected_env`
    fn env_bool(&mut self, name: &str) -> Option<bool> {
        let raw = std::env::var(name).ok()?;
        if raw.trim().is_empty() {
            return None;
        }
        let parsed = parse_bool(&raw);
        if parsed.is_none() {
            self.rejected_env.push((name.to_string(), raw));
        }
        parsed
    }

    /// Log every environment value that was ignored during loading
    pub fn report_rejected_env(&self) {
        for (name, value) in &self.rejected_env {
            tracing::warn!("Invalid value for {}: {}", name, value);
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            self.debug = true;
        }

        if let crate::cli::Commands::Provision { orgs, no_create } = &cli.command {
            if !orgs.is_empty() {
                self.anypoint.organizations = orgs
                    .iter()
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect();
            }
            if *no_create {
                self.app.create = false;
            }
        }
    }

    /// Validate the configuration
    ///
    /// Checks that the base URL parses and that every endpoint template
    /// carries the placeholders it needs.
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.anypoint.base_url.trim().is_empty() {
            return Err(ConnectError::Config("base_url cannot be empty".to_string()).into());
        }

        Url::parse(&self.anypoint.base_url).map_err(|e| {
            ConnectError::Config(format!(
                "Invalid base_url {}: {}",
                self.anypoint.base_url, e
            ))
        })?;

        let templates = [
            ("auth_api", &self.anypoint.auth_api),
            ("accounts_api", &self.anypoint.accounts_api),
            ("environments_api", &self.anypoint.environments_api),
            ("authorize_scopes_api", &self.anypoint.authorize_scopes_api),
        ];
        for (name, value) in templates {
            if value.trim().is_empty() {
                return Err(ConnectError::Config(format!("{} cannot be empty", name)).into());
            }
        }

        if !self.anypoint.environments_api.contains("orgId") {
            return Err(ConnectError::Config(
                "environments_api must contain the orgId placeholder".to_string(),
            )
            .into());
        }

        if !self.anypoint.authorize_scopes_api.contains("orgId")
            || !self.anypoint.authorize_scopes_api.contains("clientId")
        {
            return Err(ConnectError::Config(
                "authorize_scopes_api must contain the orgId and clientId placeholders"
                    .to_string(),
            )
            .into());
        }

        if self.files.scopes_file.trim().is_empty() {
            return Err(ConnectError::Config("scopes_file cannot be empty".to_string()).into());
        }

        Ok(())
    }

    /// Credentials for the token exchange
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the username or password is unset
    pub fn require_credentials(&self) -> Result<Credentials> {
        match (&self.credentials.username, &self.credentials.password) {
            (Some(username), Some(password)) if !username.is_empty() => {
                Ok(Credentials::new(username.clone(), password.clone()))
            }
            _ => Err(ConnectError::Config(
                "ANYPOINT_USERNAME and ANYPOINT_PASSWORD must be set".to_string(),
            )
            .into()),
        }
    }

    /// Client name of the Connected App to create
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no client name is configured
    pub fn require_client_name(&self) -> Result<&str> {
        match self.app.client_name.as_deref() {
            Some(name) if !name.trim().is_empty() => Ok(name),
            _ => Err(ConnectError::Config(
                "CONNECTED_APP_CLIENT_NAME must be set".to_string(),
            )
            .into()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            anypoint: AnypointConfig::default(),
            app: AppConfig::default(),
            files: FilesConfig::default(),
            credentials: CredentialsConfig::default(),
            rejected_env: Vec::new(),
        }
    }
}

/// Split a comma-separated organization list, dropping blanks
pub fn parse_organizations(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse a boolean flag the way operators tend to write them
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
