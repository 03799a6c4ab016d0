//! Request payload construction
//!
//! Both builders are pure over already-loaded data; only
//! [`prepare_scope_authorizations`] touches the filesystem, to leave the
//! payload behind as an artifact.

use crate::artifacts::{ArtifactWriter, AUTHZ_PAYLOAD_FILE};
use crate::error::Result;
use crate::models::{
    AuthorizationPayload, ConnectedApp, ContextParams, Organization, ScopeAuthorization,
    CLIENT_CREDENTIALS_GRANT, INTERNAL_AUDIENCE,
};
use crate::scopes::{ScopeCatalog, ScopeContext};

/// Build the Connected App creation request for `client_name`
pub fn prepare_connected_app(client_name: &str, scopes: Vec<String>) -> ConnectedApp {
    tracing::info!("Preparing the Connected App payload...");
    let app = ConnectedApp {
        client_name: client_name.to_string(),
        scopes,
        enabled: true,
        audience: INTERNAL_AUDIENCE.to_string(),
        public_keys: Vec::new(),
        redirect_uris: Vec::new(),
        grant_types: vec![CLIENT_CREDENTIALS_GRANT.to_string()],
        generate_iss_claim_without_token: true,
    };
    tracing::debug!(?app, "Connected App payload");
    app
}

/// Build the per-organization grant lists
///
/// For each organization, scopes that need no environment (org-only and
/// no-context) are granted once, then every environment receives one
/// grant per env-scoped scope. Grants accumulate across environments.
pub fn build_scope_authorizations(
    catalog: &ScopeCatalog,
    organizations: &[Organization],
) -> AuthorizationPayload {
    let mut payload = AuthorizationPayload::new();
    let total_orgs = organizations.len();

    for (o, organization) in organizations.iter().enumerate() {
        let org_id = &organization.org_id;
        tracing::debug!("[{}/{}] O:[{}]", o + 1, total_orgs, org_id);

        let mut entries = Vec::new();
        for entry in catalog.entries() {
            let context_params = match entry.context {
                ScopeContext::NoContext => ContextParams::None,
                ScopeContext::OrgOnly => ContextParams::Org {
                    org: org_id.clone(),
                },
                ScopeContext::EnvOnly | ScopeContext::OrgAndEnv => continue,
            };
            entries.push(ScopeAuthorization {
                scope: entry.name.clone(),
                context_params,
            });
        }

        let total_envs = organization.environments.len();
        for (e, environment) in organization.environments.iter().enumerate() {
            tracing::debug!(
                "--> [{}/{}] O:[{}] [{}/{}] E:[{}]",
                o + 1,
                total_orgs,
                org_id,
                e + 1,
                total_envs,
                environment.id
            );
            for entry in catalog.entries().iter().filter(|s| s.context.is_env_scoped()) {
                entries.push(ScopeAuthorization {
                    scope: entry.name.clone(),
                    context_params: ContextParams::OrgEnv {
                        org: org_id.clone(),
                        env_id: environment.id.clone(),
                    },
                });
            }
        }

        tracing::debug!(
            "[{}/{}] Org [{}] processed with {} grants",
            o + 1,
            total_orgs,
            org_id,
            entries.len()
        );
        payload.insert(org_id.clone(), entries);
    }

    payload
}

/// Build the grant lists and write them to `authz_payload.json`
pub fn prepare_scope_authorizations(
    catalog: &ScopeCatalog,
    organizations: &[Organization],
    artifacts: &ArtifactWriter,
) -> Result<AuthorizationPayload> {
    tracing::info!("Preparing scope authorizations for the environments...");
    tracing::debug!(
        organizations = organizations.len(),
        scopes = catalog.len(),
        "Authorization stats"
    );

    let payload = build_scope_authorizations(catalog, organizations);
    let path = artifacts.write_json(AUTHZ_PAYLOAD_FILE, &payload.to_json())?;
    tracing::info!("Authorization payload written to {}", path.display());

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Environment;
    use serde_json::json;
    use tempfile::TempDir;

    fn env(id: &str, org: &str) -> Environment {
        Environment {
            id: id.to_string(),
            name: id.to_uppercase(),
            client_id: format!("client-{id}"),
            is_production: false,
            env_type: "sandbox".to_string(),
            org_id: org.to_string(),
        }
    }

    fn org(id: &str, envs: &[&str]) -> Organization {
        Organization {
            org_id: id.to_string(),
            environments: envs.iter().map(|e| env(e, id)).collect(),
        }
    }

    fn catalog(value: serde_json::Value) -> ScopeCatalog {
        ScopeCatalog::from_json(&value).unwrap()
    }

    #[test]
    fn test_prepare_connected_app_fixed_fields() {
        let app = prepare_connected_app("noname", vec!["profile".to_string()]);
        assert_eq!(app.client_name, "noname");
        assert!(app.enabled);
        assert_eq!(app.audience, "internal");
        assert_eq!(app.grant_types, vec!["client_credentials"]);
        assert!(app.public_keys.is_empty());
        assert!(app.redirect_uris.is_empty());
        assert!(app.generate_iss_claim_without_token);
    }

    #[test]
    fn test_env_scoped_catalog_yields_envs_times_scopes() {
        let catalog = catalog(json!({"data": [
            {"scope": "a", "context_params": {"org": "", "envId": ""}},
            {"scope": "b", "context_params": {"envId": ""}},
            {"scope": "c", "context_params": {"org": "", "envId": ""}}
        ]}));
        let orgs = vec![org("o1", &["e1", "e2"]), org("o2", &["e3", "e4", "e5"])];

        let payload = build_scope_authorizations(&catalog, &orgs);
        assert_eq!(payload.get("o1").unwrap().len(), 2 * 3);
        assert_eq!(payload.get("o2").unwrap().len(), 3 * 3);
    }

    #[test]
    fn test_org_level_scopes_granted_once_per_org() {
        let catalog = catalog(json!({"data": [
            {"scope": "profile"},
            {"scope": "read:orgs", "context_params": {"org": ""}},
            {"scope": "read:apps", "context_params": {"envId": ""}}
        ]}));
        let orgs = vec![org("o1", &["e1", "e2", "e3"])];

        let entries = build_scope_authorizations(&catalog, &orgs);
        let entries = entries.get("o1").unwrap();
        assert_eq!(entries.len(), 2 + 3);
        assert_eq!(entries[0].scope, "profile");
        assert_eq!(entries[0].context_params, ContextParams::None);
        assert_eq!(
            entries[1].context_params,
            ContextParams::Org {
                org: "o1".to_string()
            }
        );
        assert_eq!(
            entries[4].context_params,
            ContextParams::OrgEnv {
                org: "o1".to_string(),
                env_id: "e3".to_string()
            }
        );
    }

    #[test]
    fn test_entries_accumulate_across_environments() {
        let catalog = catalog(json!({"data": [
            {"scope": "read:apps", "context_params": {"envId": ""}}
        ]}));
        let orgs = vec![org("o1", &["e1", "e2"])];

        let payload = build_scope_authorizations(&catalog, &orgs);
        let env_ids: Vec<_> = payload
            .get("o1")
            .unwrap()
            .iter()
            .map(|e| match &e.context_params {
                ContextParams::OrgEnv { env_id, .. } => env_id.clone(),
                other => panic!("unexpected context {:?}", other),
            })
            .collect();
        assert_eq!(env_ids, vec!["e1", "e2"]);
    }

    #[test]
    fn test_org_without_environments_keeps_its_key() {
        let catalog = catalog(json!({"data": [
            {"scope": "read:orgs", "context_params": {"org": ""}},
            {"scope": "read:apps", "context_params": {"envId": ""}}
        ]}));
        let orgs = vec![org("empty", &[])];

        let payload = build_scope_authorizations(&catalog, &orgs);
        assert_eq!(payload.len(), 1);
        assert_eq!(payload.get("empty").unwrap().len(), 1);
    }

    #[test]
    fn test_no_organizations_yields_empty_payload() {
        let catalog = catalog(json!({"data": [{"scope": "profile"}]}));
        assert!(build_scope_authorizations(&catalog, &[]).is_empty());
    }

    #[test]
    fn test_prepare_scope_authorizations_artifact_reads_back() {
        let tmp = TempDir::new().unwrap();
        let artifacts = ArtifactWriter::new(tmp.path());
        let catalog = catalog(json!({"data": [
            {"scope": "profile"},
            {"scope": "read:orgs", "context_params": {"org": ""}},
            {"scope": "manage:apis", "context_params": {"org": "", "envId": ""}}
        ]}));
        let orgs = vec![org("o2", &["e1"]), org("o1", &["e2", "e3"])];

        let payload = prepare_scope_authorizations(&catalog, &orgs, &artifacts).unwrap();

        let written = artifacts.read_json(AUTHZ_PAYLOAD_FILE).unwrap();
        let reread = AuthorizationPayload::from_json(&written).unwrap();
        assert_eq!(reread, payload);
        assert_eq!(reread.org_ids().collect::<Vec<_>>(), vec!["o2", "o1"]);
    }
}
