//! Configuration file management for hearth.
//!
//! Provides a TOML-based config file at `~/.config/hearth/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use hearth_core::GeneratorConfig;
use hearth_db::config::DbConfig;

/// Upper bound on concurrent (user, week) units.
pub const MAX_WORKERS: usize = 64;

/// Environment variable overriding the reference UTC offset, in minutes.
pub const UTC_OFFSET_ENV_VAR: &str = "HEARTH_UTC_OFFSET_MINUTES";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub database: DatabaseSection,
    #[serde(default)]
    pub generator: GeneratorSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub url: String,
}

/// Optional generator tunables; anything unset falls back to the built-in
/// defaults.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSection {
    /// Minutes east of UTC used to decide what "today" is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc_offset_minutes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine_cap: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_workers: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_pattern_match: Option<bool>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the hearth config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/hearth` or `~/.config/hearth`,
/// on every platform.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("hearth");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("hearth")
}

/// Return the path to the hearth config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct HearthConfig {
    pub db_config: DbConfig,
    pub generator: GeneratorConfig,
}

impl HearthConfig {
    /// Resolve configuration from the CLI flags, the process environment and
    /// the config file (when present).
    ///
    /// A config file that exists but does not parse is an error rather than
    /// silently ignored.
    pub fn resolve(cli_db_url: Option<&str>, cli_max_workers: Option<usize>) -> Result<Self> {
        let file_config = if config_path().exists() {
            Some(load_config()?)
        } else {
            None
        };
        Self::resolve_with(
            cli_db_url,
            cli_max_workers,
            |key| std::env::var(key).ok(),
            file_config.as_ref(),
        )
    }

    /// Resolution chain with the environment and file injected.
    ///
    /// - DB URL: `cli_db_url` > `HEARTH_DATABASE_URL` > `database.url` > `DbConfig::DEFAULT_URL`
    /// - UTC offset: `HEARTH_UTC_OFFSET_MINUTES` > `generator.utc_offset_minutes` > +05:30
    /// - Workers: `cli_max_workers` > `generator.max_workers` > 1, at most [`MAX_WORKERS`]
    pub fn resolve_with(
        cli_db_url: Option<&str>,
        cli_max_workers: Option<usize>,
        env: impl Fn(&str) -> Option<String>,
        file_config: Option<&ConfigFile>,
    ) -> Result<Self> {
        let db_url = if let Some(url) = cli_db_url {
            url.to_owned()
        } else if let Some(url) = env(DbConfig::ENV_VAR) {
            url
        } else if let Some(cfg) = file_config {
            cfg.database.url.clone()
        } else {
            DbConfig::DEFAULT_URL.to_owned()
        };

        let section = file_config.map(|cfg| &cfg.generator);
        let mut generator = GeneratorConfig::default();

        let offset_minutes = match env(UTC_OFFSET_ENV_VAR) {
            Some(raw) => Some(
                raw.trim()
                    .parse::<i32>()
                    .with_context(|| format!("{UTC_OFFSET_ENV_VAR} is not an integer: {raw:?}"))?,
            ),
            None => section.and_then(|s| s.utc_offset_minutes),
        };
        if let Some(minutes) = offset_minutes {
            generator.reference_offset = GeneratorConfig::offset_from_minutes(minutes)?;
        }
        if let Some(cap) = section.and_then(|s| s.cuisine_cap) {
            generator.cuisine_cap = cap;
        }
        if let Some(workers) = cli_max_workers.or(section.and_then(|s| s.max_workers)) {
            if workers > MAX_WORKERS {
                bail!("max_workers must be at most {MAX_WORKERS}, got {workers}");
            }
            generator.max_workers = workers.max(1);
        }
        if let Some(strict) = section.and_then(|s| s.strict_pattern_match) {
            generator.strict_pattern_match = strict;
        }

        Ok(Self {
            db_config: DbConfig::new(db_url),
            generator,
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
