//! Offline view of the scope catalog classification

use crate::config::Config;
use crate::error::Result;
use crate::scopes::ScopeCatalog;
use colored::Colorize;
use prettytable::{cell, format, row, Table};
use std::path::PathBuf;

/// Load the catalog and print one row per scope
///
/// `file` overrides the configured catalog path.
pub fn show_scopes(config: &Config, file: Option<PathBuf>) -> Result<ScopeCatalog> {
    let path = file.unwrap_or_else(|| config.files.scopes_path());
    let catalog = ScopeCatalog::load(&path)?;

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.set_titles(row!["Scope", "Context"]);
    for entry in catalog.entries() {
        table.add_row(row![entry.name, entry.context.label()]);
    }

    println!("\n{} {}", "Scope catalog:".bold(), path.display());
    table.printstd();
    println!(
        "{} scopes ({} org-only, {} env-only, {} without context), {} skipped",
        catalog.len(),
        catalog.org_only().len(),
        catalog.env_only().len(),
        catalog.no_context().len(),
        catalog.skipped()
    );

    Ok(catalog)
}
