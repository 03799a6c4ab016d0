//! Anypoint Connect - Connected App provisioning library
//!
//! This library provisions an OAuth Connected App on the Anypoint Platform
//! and authorizes it for a catalog of scopes across organizations and their
//! environments.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `scopes`: Scope catalog loading and classification
//! - `anypoint`: Management API client (auth, environments, Connected Apps)
//! - `payload`: Connected App and authorization payload builders
//! - `artifacts`: JSON artifacts written under the output directory
//! - `confirm`: Two-step operator confirmation for destructive actions
//! - `commands`: Command handlers used by the binary
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use anypoint_connect::{AnypointClient, Config, ScopeCatalog};
//! use anypoint_connect::models::Credentials;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let catalog = ScopeCatalog::load(&config.files.scopes_path())?;
//!     let client = AnypointClient::new(config.anypoint.clone())?;
//!     let token = client
//!         .authenticate(&Credentials::new("operator", "password"))
//!         .await?;
//!     let orgs = client.get_environments(&token, &config.anypoint.organizations).await?;
//!     println!("{} scopes, {} organizations", catalog.len(), orgs.len());
//!     Ok(())
//! }
//! ```

pub mod anypoint;
pub mod artifacts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod confirm;
pub mod error;
pub mod models;
pub mod payload;
pub mod scopes;

// Re-export commonly used types
pub use anypoint::AnypointClient;
pub use artifacts::ArtifactWriter;
pub use config::Config;
pub use error::{ConnectError, Result};
pub use scopes::{ScopeCatalog, ScopeContext};
