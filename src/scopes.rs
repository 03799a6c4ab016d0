//! Scope catalog loading and classification
//!
//! The catalog is a JSON document of the form
//!
//! ```json
//! {"data": [{"scope": "read:apis", "context_params": {"org": "", "envId": ""}}]}
//! ```
//!
//! Each named scope is classified by which context keys it declares.
//! Records without a `scope` name are skipped with a warning.

use crate::error::{ConnectError, Result};
use serde_json::Value;
use std::path::Path;

/// Context a scope needs to be granted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeContext {
    /// Declares both `org` and `envId`
    OrgAndEnv,
    /// Declares `org` only
    OrgOnly,
    /// Declares `envId` only
    EnvOnly,
    /// Declares neither
    NoContext,
}

impl ScopeContext {
    fn from_flags(org: bool, env: bool) -> Self {
        match (org, env) {
            (true, true) => ScopeContext::OrgAndEnv,
            (true, false) => ScopeContext::OrgOnly,
            (false, true) => ScopeContext::EnvOnly,
            (false, false) => ScopeContext::NoContext,
        }
    }

    /// Whether grants of this scope carry an environment id
    pub fn is_env_scoped(self) -> bool {
        matches!(self, ScopeContext::OrgAndEnv | ScopeContext::EnvOnly)
    }

    /// Short label used in tables and logs
    pub fn label(self) -> &'static str {
        match self {
            ScopeContext::OrgAndEnv => "org+env",
            ScopeContext::OrgOnly => "org",
            ScopeContext::EnvOnly => "env",
            ScopeContext::NoContext => "none",
        }
    }
}

/// A named scope and its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeEntry {
    pub name: String,
    pub context: ScopeContext,
}

/// The classified catalog, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeCatalog {
    entries: Vec<ScopeEntry>,
    skipped: usize,
}

impl ScopeCatalog {
    /// Read and classify a catalog file
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::ScopeCatalog`] if the file cannot be read,
    /// is not JSON, or lacks a `data` array
    pub fn load(path: &Path) -> Result<Self> {
        tracing::info!("Loading scopes from file {}...", path.display());
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConnectError::ScopeCatalog(format!("failed to read {}: {}", path.display(), e))
        })?;
        let value: Value = serde_json::from_str(&contents).map_err(|e| {
            ConnectError::ScopeCatalog(format!("failed to parse {}: {}", path.display(), e))
        })?;
        Self::from_json(&value)
    }

    /// Classify an already parsed catalog document
    pub fn from_json(value: &Value) -> Result<Self> {
        let records = value
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| ConnectError::ScopeCatalog("missing 'data' array".to_string()))?;

        let mut catalog = Self::default();
        for record in records {
            let Some(name) = record.get("scope").and_then(Value::as_str) else {
                tracing::warn!("Scope {} does not have a name", record);
                catalog.skipped += 1;
                continue;
            };

            let params = record.get("context_params").and_then(Value::as_object);
            let org = params.map_or(false, |p| p.contains_key("org"));
            let env = params.map_or(false, |p| p.contains_key("envId"));
            let context = ScopeContext::from_flags(org, env);

            tracing::debug!(scope = name, context = context.label(), "Classified scope");
            catalog.entries.push(ScopeEntry {
                name: name.to_string(),
                context,
            });
        }

        tracing::debug!(
            total = catalog.entries.len(),
            org_only = catalog.org_only().len(),
            env_only = catalog.env_only().len(),
            no_context = catalog.no_context().len(),
            skipped = catalog.skipped,
            "Scope catalog loaded"
        );

        Ok(catalog)
    }

    /// Every named scope
    pub fn entries(&self) -> &[ScopeEntry] {
        &self.entries
    }

    /// Every named scope, including ones needing both org and environment
    pub fn scopes(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    pub fn org_only(&self) -> Vec<String> {
        self.names_with(ScopeContext::OrgOnly)
    }

    pub fn env_only(&self) -> Vec<String> {
        self.names_with(ScopeContext::EnvOnly)
    }

    pub fn no_context(&self) -> Vec<String> {
        self.names_with(ScopeContext::NoContext)
    }

    /// Number of records dropped for lacking a name
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn names_with(&self, context: ScopeContext) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.context == context)
            .map(|e| e.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample() -> Value {
        json!({
            "data": [
                {"scope": "profile"},
                {"scope": "read:orgs", "context_params": {"org": ""}},
                {"scope": "read:apps", "context_params": {"envId": ""}},
                {"scope": "manage:apis", "context_params": {"org": "", "envId": ""}},
                {"context_params": {"org": ""}},
                {"scope": "view:environment", "context_params": {}}
            ]
        })
    }

    #[test]
    fn test_classifies_each_bucket() {
        let catalog = ScopeCatalog::from_json(&sample()).unwrap();
        assert_eq!(
            catalog.scopes(),
            vec![
                "profile",
                "read:orgs",
                "read:apps",
                "manage:apis",
                "view:environment"
            ]
        );
        assert_eq!(catalog.org_only(), vec!["read:orgs"]);
        assert_eq!(catalog.env_only(), vec!["read:apps"]);
        assert_eq!(catalog.no_context(), vec!["profile", "view:environment"]);
    }

    #[test]
    fn test_org_and_env_scope_is_in_no_single_bucket() {
        let catalog = ScopeCatalog::from_json(&sample()).unwrap();
        let name = "manage:apis".to_string();
        assert!(catalog.scopes().contains(&name));
        assert!(!catalog.org_only().contains(&name));
        assert!(!catalog.env_only().contains(&name));
        assert!(!catalog.no_context().contains(&name));
        assert_eq!(catalog.entries()[3].context, ScopeContext::OrgAndEnv);
    }

    #[test]
    fn test_unnamed_records_are_skipped() {
        let catalog = ScopeCatalog::from_json(&sample()).unwrap();
        assert_eq!(catalog.skipped(), 1);
        assert_eq!(catalog.len(), 5);
    }

    #[test]
    fn test_every_named_scope_lands_in_exactly_one_context() {
        let catalog = ScopeCatalog::from_json(&sample()).unwrap();
        for entry in catalog.entries() {
            let hits = [
                catalog.org_only().contains(&entry.name),
                catalog.env_only().contains(&entry.name),
                catalog.no_context().contains(&entry.name),
                entry.context == ScopeContext::OrgAndEnv,
            ]
            .iter()
            .filter(|hit| **hit)
            .count();
            assert_eq!(hits, 1, "scope {} classified {} times", entry.name, hits);
        }
    }

    #[test]
    fn test_missing_data_array_is_an_error() {
        let err = ScopeCatalog::from_json(&json!({"scopes": []})).unwrap_err();
        assert!(err.to_string().contains("data"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scopes.json");
        std::fs::write(&path, sample().to_string()).unwrap();

        let catalog = ScopeCatalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 5);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ScopeCatalog::load(Path::new("/nonexistent/scopes.json")).unwrap_err();
        assert!(err.to_string().contains("Scope catalog error"));
    }
}
