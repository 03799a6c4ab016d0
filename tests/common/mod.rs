use std::path::Path;

use anypoint_connect::config::Config;
use serde_json::json;
use tempfile::TempDir;

pub const USERNAME: &str = "operator";
pub const PASSWORD: &str = "s3cret";
pub const TOKEN: &str = "token-abc";

/// Config pointed at a mock server, with data and output under `tmp`
#[allow(dead_code)]
pub fn test_config(base_url: &str, tmp: &TempDir) -> Config {
    let mut config = Config::default();
    config.anypoint.base_url = base_url.to_string();
    config.anypoint.organizations = vec!["org-1".to_string(), "org-2".to_string()];
    config.app.client_name = Some("noname-integration".to_string());
    config.credentials.username = Some(USERNAME.to_string());
    config.credentials.password = Some(PASSWORD.to_string());
    config.files.data_dir = tmp.path().join("data");
    config.files.output_dir = tmp.path().join("output");
    config
}

/// Write a small catalog covering every classification
#[allow(dead_code)]
pub fn write_catalog(data_dir: &Path) {
    std::fs::create_dir_all(data_dir).expect("failed to create data dir");
    let catalog = json!({
        "data": [
            {"scope": "profile"},
            {"scope": "read:organization", "context_params": {"org": ""}},
            {"scope": "read:applications", "context_params": {"envId": ""}},
            {"scope": "manage:apis", "context_params": {"org": "", "envId": ""}},
            {"description": "record without a name"}
        ]
    });
    std::fs::write(data_dir.join("scopes.json"), catalog.to_string())
        .expect("failed to write catalog");
}

/// Environment listing body for `org_id` with the given environment ids
#[allow(dead_code)]
pub fn environments_body(org_id: &str, env_ids: &[&str]) -> serde_json::Value {
    let data: Vec<_> = env_ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "name": format!("Env {}", id),
                "clientId": format!("client-{}", id),
                "isProduction": false,
                "type": "sandbox",
                "organizationId": org_id
            })
        })
        .collect();
    json!({ "data": data, "total": env_ids.len() })
}
