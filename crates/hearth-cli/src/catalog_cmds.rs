//! Operator CLI handlers for `hearth catalog` subcommands.

use anyhow::{Context, Result};
use sqlx::PgPool;

use hearth_core::catalog_file::{import_catalog, parse_catalog_toml};

use crate::CatalogCommands;

/// Dispatch a `CatalogCommands` variant to the appropriate handler.
pub async fn run_catalog_command(command: CatalogCommands, pool: &PgPool) -> Result<()> {
    match command {
        CatalogCommands::Import { file } => cmd_import(pool, &file).await,
    }
}

/// Read a catalog TOML file, validate it, and upsert every entry by name.
async fn cmd_import(pool: &PgPool, file_path: &str) -> Result<()> {
    let content = std::fs::read_to_string(file_path)
        .with_context(|| format!("failed to read catalog file: {file_path}"))?;

    let catalog = parse_catalog_toml(&content)
        .with_context(|| format!("failed to parse catalog file: {file_path}"))?;

    let summary = import_catalog(pool, &catalog).await?;

    println!("Catalog imported.");
    println!("  Recipes:   {}", summary.recipes);
    println!("  Exercises: {}", summary.exercises);
    Ok(())
}
