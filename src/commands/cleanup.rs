//! Destructive cleanup of every Connected App in the account
//!
//! Used for testing and development accounts only. Nothing touches the
//! network until the operator has passed both confirmation prompts.

use crate::anypoint::{AnypointClient, DeletionReport};
use crate::artifacts::ArtifactWriter;
use crate::config::Config;
use crate::confirm::{confirm_deletion, CancelReason, GateState};
use crate::error::Result;
use colored::Colorize;
use std::io::{BufRead, Write};

/// How a cleanup run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// `DELETE_APPS` is off; no prompt was shown
    Disabled,
    /// The operator did not confirm
    Cancelled(CancelReason),
    /// Deletion ran
    Completed(DeletionReport),
}

/// Run the cleanup, reading confirmations from `input`
///
/// # Errors
///
/// Fails when prompting fails, credentials are missing or rejected, or the
/// listing artifact cannot be written
pub async fn run_cleanup<R: BufRead, W: Write>(
    config: &Config,
    input: &mut R,
    output: &mut W,
) -> Result<CleanupOutcome> {
    if !config.app.delete {
        tracing::info!("The Connected App deletion is disabled");
        return Ok(CleanupOutcome::Disabled);
    }

    match confirm_deletion(input, output)? {
        GateState::Execute => {}
        GateState::Cancelled(reason) => {
            match &reason {
                CancelReason::Declined => tracing::info!("Deletion aborted by the user"),
                CancelReason::SignatureMismatch(signature) => tracing::info!(
                    "Signature [{}] does not match with: {}",
                    signature,
                    crate::confirm::SIGNATURE
                ),
            }
            return Ok(CleanupOutcome::Cancelled(reason));
        }
        // confirm_deletion only returns terminal states
        GateState::Prompt | GateState::Signature => {
            return Ok(CleanupOutcome::Cancelled(CancelReason::Declined))
        }
    }

    let credentials = config.require_credentials()?;
    writeln!(
        output,
        "{}",
        "Deleting all the Anypoint Connected Apps. You've been warned...".red()
    )?;
    tracing::warn!("Deleting all the Anypoint Connected Apps");

    let client = AnypointClient::new(config.anypoint.clone())?;
    let artifacts = ArtifactWriter::new(&config.files.output_dir);

    let token = client.authenticate(&credentials).await?;
    let apps = client.get_all_connected_apps(&token, &artifacts).await?;
    tracing::warn!("There are {} Connected Apps to be deleted", apps.len());

    let report = client.delete_connected_apps(&token, &apps).await;
    Ok(CleanupOutcome::Completed(report))
}
