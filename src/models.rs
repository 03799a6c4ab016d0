//! Domain records and their JSON wire formats
//!
//! Every wire format is encoded and decoded field by field against
//! `serde_json::Value`, so the JSON shape the management API sees is
//! spelled out here rather than derived from struct layouts.

use crate::error::{ConnectError, Result};
use serde_json::{json, Map, Value};

/// Grant type every provisioned client uses
pub const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";

/// Audience of provisioned clients
pub const INTERNAL_AUDIENCE: &str = "internal";

/// Platform username and password
///
/// Held in memory for a single run and never written to disk.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create a new credentials pair
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The platform username
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The platform password
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Bearer token obtained from the username/password exchange
///
/// Lives for one run; there is no refresh.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    access_token: String,
}

impl Token {
    /// Wrap a raw access token
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    /// The raw access token
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Decode a token exchange response (`{"access_token": "..."}`)
    pub fn from_json(value: &Value) -> Result<Self> {
        let access_token = value
            .get("access_token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ConnectError::Authentication("response did not contain an access_token".into())
            })?;
        Ok(Self::new(access_token))
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

/// A deployment target inside an organization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub id: String,
    pub name: String,
    pub client_id: String,
    pub is_production: bool,
    pub env_type: String,
    pub org_id: String,
}

impl Environment {
    /// Decode one record of the environment listing
    ///
    /// `id` is required. The remaining fields fall back to empty values
    /// when the platform omits them.
    pub fn from_json(value: &Value) -> Result<Self> {
        let id = required_str(value, "id")
            .map_err(|e| ConnectError::Environments(format!("invalid environment record: {e}")))?;
        Ok(Self {
            id,
            name: optional_str(value, "name"),
            client_id: optional_str(value, "clientId"),
            is_production: value
                .get("isProduction")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            env_type: optional_str(value, "type"),
            org_id: optional_str(value, "organizationId"),
        })
    }
}

/// An organization and its environments, in API order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    pub org_id: String,
    pub environments: Vec<Environment>,
}

/// Connected App creation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedApp {
    pub client_name: String,
    pub scopes: Vec<String>,
    pub enabled: bool,
    pub audience: String,
    pub public_keys: Vec<String>,
    pub redirect_uris: Vec<String>,
    pub grant_types: Vec<String>,
    pub generate_iss_claim_without_token: bool,
}

impl ConnectedApp {
    /// Encode the creation request body
    pub fn to_json(&self) -> Value {
        json!({
            "client_name": self.client_name,
            "scopes": self.scopes,
            "enabled": self.enabled,
            "audience": self.audience,
            "public_keys": self.public_keys,
            "redirect_uris": self.redirect_uris,
            "grant_types": self.grant_types,
            "generate_iss_claim_without_token": self.generate_iss_claim_without_token,
        })
    }
}

/// The Connected App returned by a successful creation
#[derive(Clone)]
pub struct CreatedConnectedApp {
    pub client_id: String,
    pub client_secret: String,
    pub client_name: String,
    /// Full response body as returned by the platform
    pub raw: Value,
}

impl CreatedConnectedApp {
    /// Decode the 201 response body
    pub fn from_json(value: Value) -> Result<Self> {
        let client_id = required_str(&value, "client_id")?;
        let client_secret = required_str(&value, "client_secret")?;
        let client_name = optional_str(&value, "client_name");
        Ok(Self {
            client_id,
            client_secret,
            client_name,
            raw: value,
        })
    }
}

impl std::fmt::Debug for CreatedConnectedApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreatedConnectedApp")
            .field("client_id", &self.client_id)
            .field("client_name", &self.client_name)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// One entry of the Connected App listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedAppSummary {
    pub client_id: String,
    pub client_name: String,
}

impl ConnectedAppSummary {
    pub fn from_json(value: &Value) -> Result<Self> {
        Ok(Self {
            client_id: required_str(value, "client_id")?,
            client_name: optional_str(value, "client_name"),
        })
    }
}

/// Disambiguating identifiers attached to a scope grant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextParams {
    /// `{}`
    None,
    /// `{"org": ...}`
    Org { org: String },
    /// `{"org": ..., "envId": ...}`
    OrgEnv { org: String, env_id: String },
}

impl ContextParams {
    pub fn to_json(&self) -> Value {
        match self {
            ContextParams::None => json!({}),
            ContextParams::Org { org } => json!({ "org": org }),
            ContextParams::OrgEnv { org, env_id } => json!({ "org": org, "envId": env_id }),
        }
    }

    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| {
            ConnectError::Artifact("context_params must be a JSON object".to_string())
        })?;
        let org = obj.get("org").and_then(Value::as_str);
        let env_id = obj.get("envId").and_then(Value::as_str);
        match (org, env_id) {
            (None, None) => Ok(ContextParams::None),
            (Some(org), None) => Ok(ContextParams::Org {
                org: org.to_string(),
            }),
            (Some(org), Some(env_id)) => Ok(ContextParams::OrgEnv {
                org: org.to_string(),
                env_id: env_id.to_string(),
            }),
            (None, Some(_)) => Err(ConnectError::Artifact(
                "context_params has envId without org".to_string(),
            )
            .into()),
        }
    }
}

/// A single `{scope, context_params}` grant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeAuthorization {
    pub scope: String,
    pub context_params: ContextParams,
}

impl ScopeAuthorization {
    pub fn to_json(&self) -> Value {
        json!({
            "scope": self.scope,
            "context_params": self.context_params.to_json(),
        })
    }

    pub fn from_json(value: &Value) -> Result<Self> {
        let scope = required_str(value, "scope")?;
        let context_params = match value.get("context_params") {
            Some(params) => ContextParams::from_json(params)?,
            None => ContextParams::None,
        };
        Ok(Self {
            scope,
            context_params,
        })
    }
}

/// Scope grants keyed by organization id, in organization order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationPayload {
    orgs: Vec<(String, Vec<ScopeAuthorization>)>,
}

impl AuthorizationPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the grant list for an organization, replacing any previous list
    pub fn insert(&mut self, org_id: impl Into<String>, entries: Vec<ScopeAuthorization>) {
        let org_id = org_id.into();
        match self.orgs.iter_mut().find(|(id, _)| *id == org_id) {
            Some((_, existing)) => *existing = entries,
            None => self.orgs.push((org_id, entries)),
        }
    }

    /// Grants for one organization
    pub fn get(&self, org_id: &str) -> Option<&[ScopeAuthorization]> {
        self.orgs
            .iter()
            .find(|(id, _)| id == org_id)
            .map(|(_, entries)| entries.as_slice())
    }

    /// Organization ids in insertion order
    pub fn org_ids(&self) -> impl Iterator<Item = &str> {
        self.orgs.iter().map(|(id, _)| id.as_str())
    }

    /// `(org id, grants)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ScopeAuthorization])> {
        self.orgs
            .iter()
            .map(|(id, entries)| (id.as_str(), entries.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.orgs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orgs.is_empty()
    }

    /// Body of the per-organization PUT: `{"scopes": [...]}`
    pub fn org_request_body(entries: &[ScopeAuthorization]) -> Value {
        json!({
            "scopes": entries.iter().map(ScopeAuthorization::to_json).collect::<Vec<_>>(),
        })
    }

    /// Encode as `{"<orgId>": [{scope, context_params}, ...], ...}`
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (org_id, entries) in &self.orgs {
            map.insert(
                org_id.clone(),
                Value::Array(entries.iter().map(ScopeAuthorization::to_json).collect()),
            );
        }
        Value::Object(map)
    }

    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| {
            ConnectError::Artifact("authorization payload must be a JSON object".to_string())
        })?;
        let mut payload = Self::new();
        for (org_id, entries) in obj {
            let entries = entries.as_array().ok_or_else(|| {
                ConnectError::Artifact(format!("entries for {org_id} must be an array"))
            })?;
            let entries = entries
                .iter()
                .map(ScopeAuthorization::from_json)
                .collect::<Result<Vec<_>>>()?;
            payload.insert(org_id.clone(), entries);
        }
        Ok(payload)
    }
}

fn required_str(value: &Value, key: &str) -> Result<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ConnectError::Artifact(format!("missing string field '{key}'")).into())
}

fn optional_str(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
