mod catalog_cmds;
mod config;
mod generate_cmd;
mod show_cmd;
#[cfg(test)]
mod test_util;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use hearth_db::config::DbConfig;
use hearth_db::pool;

use config::HearthConfig;

#[derive(Parser)]
#[command(name = "hearth", about = "Weekly meal and workout plan generator")]
struct Cli {
    /// Database URL (overrides HEARTH_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a hearth config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = DbConfig::DEFAULT_URL)]
        db_url: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Create the hearth database and run migrations
    DbInit,
    /// Generate this week's and next week's plans
    Generate {
        /// Only generate for this user
        #[arg(long)]
        user: Option<Uuid>,
        /// Treat this date (YYYY-MM-DD) as today
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Number of (user, week) units to run concurrently
        #[arg(long)]
        max_workers: Option<usize>,
    },
    /// Plan a single day without writing anything
    Preview {
        /// User to plan for
        #[arg(long)]
        user: Uuid,
        /// Date to plan (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the stored plan for a week
    Show {
        /// User to show
        #[arg(long)]
        user: Uuid,
        /// Any date in the week to show (defaults to this week)
        #[arg(long)]
        week: Option<NaiveDate>,
    },
    /// Recipe and exercise catalog management
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// Upsert recipes and exercises from a TOML file
    Import {
        /// Path to the catalog TOML file
        file: String,
    },
}

/// Execute the `hearth init` command: write config file.
fn cmd_init(db_url: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_string(),
        },
        generator: config::GeneratorSection::default(),
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    println!();
    println!("Next: run `hearth db-init` to create and migrate the database.");

    Ok(())
}

/// Execute the `hearth db-init` command: create database and run migrations.
async fn cmd_db_init(cli_db_url: Option<&str>) -> anyhow::Result<()> {
    let resolved = HearthConfig::resolve(cli_db_url, None)?;

    println!("Initializing hearth database...");

    pool::ensure_database_exists(&resolved.db_config).await?;
    let db_pool = pool::create_pool(&resolved.db_config, 1).await?;
    pool::run_migrations(&db_pool).await?;

    let counts = pool::table_counts(&db_pool).await?;
    println!("Database ready. Tables:");
    for (table, count) in &counts {
        println!("  {table}: {count} rows");
    }

    db_pool.close().await;

    println!("hearth db-init complete.");
    Ok(())
}

/// Pool size for a run with `workers` concurrent units.
fn pool_size(workers: usize) -> u32 {
    u32::try_from(workers.saturating_add(1)).unwrap_or(u32::MAX)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { db_url, force } => {
            cmd_init(&db_url, force)?;
        }
        Commands::DbInit => {
            cmd_db_init(cli.database_url.as_deref()).await?;
        }
        Commands::Generate {
            user,
            today,
            max_workers,
        } => {
            let resolved = HearthConfig::resolve(cli.database_url.as_deref(), max_workers)?;
            let db_pool =
                pool::create_pool(&resolved.db_config, pool_size(resolved.generator.max_workers))
                    .await?;
            let result =
                generate_cmd::run_generate(&db_pool, resolved.generator, user, today).await;
            db_pool.close().await;
            result?;
        }
        Commands::Preview { user, date, json } => {
            let resolved = HearthConfig::resolve(cli.database_url.as_deref(), None)?;
            let db_pool = pool::create_pool(&resolved.db_config, 2).await?;
            let result = show_cmd::run_preview(&db_pool, resolved.generator, user, date, json).await;
            db_pool.close().await;
            result?;
        }
        Commands::Show { user, week } => {
            let resolved = HearthConfig::resolve(cli.database_url.as_deref(), None)?;
            let db_pool = pool::create_pool(&resolved.db_config, 2).await?;
            let result = show_cmd::run_show(&db_pool, resolved.generator, user, week).await;
            db_pool.close().await;
            result?;
        }
        Commands::Catalog { command } => {
            let resolved = HearthConfig::resolve(cli.database_url.as_deref(), None)?;
            let db_pool = pool::create_pool(&resolved.db_config, 2).await?;
            let result = catalog_cmds::run_catalog_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_parses_typed_flags() {
        let cli = Cli::try_parse_from([
            "hearth",
            "generate",
            "--user",
            "6f1c2d3e-0000-4000-8000-000000000001",
            "--today",
            "2025-03-06",
            "--max-workers",
            "4",
        ])
        .unwrap();
        let Commands::Generate {
            user,
            today,
            max_workers,
        } = cli.command
        else {
            panic!("expected generate");
        };
        assert!(user.is_some());
        assert_eq!(today, NaiveDate::from_ymd_opt(2025, 3, 6));
        assert_eq!(max_workers, Some(4));
    }

    #[test]
    fn invalid_date_is_rejected() {
        let user = Uuid::nil().to_string();
        let args = ["hearth", "show", "--user", user.as_str(), "--week", "03/06/2025"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn pool_size_leaves_room_for_the_profile_query() {
        assert_eq!(pool_size(1), 2);
        assert_eq!(pool_size(8), 9);
        assert_eq!(pool_size(usize::MAX), u32::MAX);
    }
}
