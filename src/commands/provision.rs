//! Provisioning flow
//!
//! Scope catalog → token → environments → payloads → create → authorize.

use crate::anypoint::{AnypointClient, AuthorizationReport};
use crate::artifacts::ArtifactWriter;
use crate::config::Config;
use crate::error::Result;
use crate::models::{AuthorizationPayload, CreatedConnectedApp};
use crate::payload::{prepare_connected_app, prepare_scope_authorizations};
use crate::scopes::ScopeCatalog;
use colored::Colorize;

/// What a provisioning run produced
#[derive(Debug)]
pub struct ProvisionOutcome {
    /// The grants written to `authz_payload.json`
    pub authorizations: AuthorizationPayload,
    /// The created app, absent when creation is disabled
    pub created: Option<CreatedConnectedApp>,
    /// Per-organization authorization results, absent when creation is disabled
    pub report: Option<AuthorizationReport>,
}

/// Run the provisioning flow
///
/// With creation disabled the run stops after the authorization payload
/// has been written, which makes it usable as a dry run.
///
/// # Errors
///
/// Fails on missing configuration, an unreadable catalog, rejected
/// credentials, a failed environment listing, or a non-201 creation
pub async fn run_provision(config: &Config) -> Result<ProvisionOutcome> {
    let credentials = config.require_credentials()?;
    let client_name = config.require_client_name()?.to_string();

    let catalog = ScopeCatalog::load(&config.files.scopes_path())?;
    if catalog.is_empty() {
        tracing::warn!("The scope catalog contains no named scopes");
    }

    let client = AnypointClient::new(config.anypoint.clone())?;
    let artifacts = ArtifactWriter::new(&config.files.output_dir);

    let token = client.authenticate(&credentials).await?;

    if config.anypoint.organizations.is_empty() {
        tracing::warn!("No organizations configured; the Connected App will not be authorized");
    }
    let organizations = client
        .get_environments(&token, &config.anypoint.organizations)
        .await?;

    let app_payload = prepare_connected_app(&client_name, catalog.scopes());
    let authorizations = prepare_scope_authorizations(&catalog, &organizations, &artifacts)?;

    if !config.app.create {
        tracing::info!("The Connected App creation is disabled");
        return Ok(ProvisionOutcome {
            authorizations,
            created: None,
            report: None,
        });
    }

    let created = client.create_connected_app(&token, &app_payload).await?;
    print_credentials(&created);

    let report = client
        .authorize_connected_app(&token, &authorizations, &created.client_id, &artifacts)
        .await?;
    tracing::info!(
        authorized = report.authorized.len(),
        failed = report.failed.len(),
        "Authorization finished"
    );

    Ok(ProvisionOutcome {
        authorizations,
        created: Some(created),
        report: Some(report),
    })
}

fn print_credentials(app: &CreatedConnectedApp) {
    println!();
    println!(
        "{}",
        "Copy the following information and use it when configuring the integration.".yellow()
    );
    println!("{}", "Connected App Credentials:".bold());
    println!();
    println!(" client_name: \t\t{}", app.client_name);
    println!(" client_id: \t\t{}", app.client_id.cyan());
    println!(" client_secret: \t{}", app.client_secret.cyan());
    println!();
}
