//! Command-line interface definition for Anypoint Connect
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for provisioning, cleanup, and scope inspection.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Anypoint Connect - Connected App provisioning CLI
///
/// Creates an OAuth Connected App on the Anypoint Platform and authorizes
/// it for a catalog of scopes across organizations and environments.
#[derive(Parser, Debug, Clone)]
#[command(name = "anypoint-connect")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Anypoint Connect
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create the Connected App and authorize it across organizations
    Provision {
        /// Organization ids to authorize (overrides ANYPOINT_ORGANIZATIONS)
        #[arg(long = "org", value_delimiter = ',')]
        orgs: Vec<String>,

        /// Build and write the payloads without creating the app
        #[arg(long)]
        no_create: bool,
    },

    /// Delete every Connected App in the account (asks twice)
    Cleanup,

    /// Show how the scope catalog is classified
    Scopes {
        /// Scope catalog to read instead of the configured one
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_provision() {
        let cli = Cli::try_parse_from(["anypoint-connect", "provision"]).unwrap();
        assert_eq!(cli.config, "config/config.yaml");
        if let Commands::Provision { orgs, no_create } = cli.command {
            assert!(orgs.is_empty());
            assert!(!no_create);
        } else {
            panic!("Expected Provision command");
        }
    }

    #[test]
    fn test_cli_parse_provision_with_orgs() {
        let cli = Cli::try_parse_from([
            "anypoint-connect",
            "provision",
            "--org",
            "org-a,org-b",
            "--org",
            "org-c",
            "--no-create",
        ])
        .unwrap();
        if let Commands::Provision { orgs, no_create } = cli.command {
            assert_eq!(orgs, vec!["org-a", "org-b", "org-c"]);
            assert!(no_create);
        } else {
            panic!("Expected Provision command");
        }
    }

    #[test]
    fn test_cli_parse_cleanup() {
        let cli = Cli::try_parse_from(["anypoint-connect", "-v", "cleanup"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Cleanup));
    }

    #[test]
    fn test_cli_parse_scopes_with_file() {
        let cli =
            Cli::try_parse_from(["anypoint-connect", "scopes", "--file", "catalog.json"]).unwrap();
        if let Commands::Scopes { file } = cli.command {
            assert_eq!(file, Some(PathBuf::from("catalog.json")));
        } else {
            panic!("Expected Scopes command");
        }
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["anypoint-connect"]).is_err());
    }
}
