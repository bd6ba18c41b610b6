//! CLI configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! configuration file, then `INDIVO_*` environment variables using `__` as
//! the nesting separator (`INDIVO_VALIDATION__FAIL_FAST=true`).

use anyhow::Context;
use config::{Environment, File};
use indivo_validator::ValidationPlan;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub schemas: SchemaConfig,
    pub validation: ValidationConfig,
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchemaConfig {
    /// SDML files registered on top of the clinical catalogue.
    #[serde(default)]
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidationConfig {
    pub fail_fast: bool,
    pub max_issues: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Validate legacy SDMX documents like canonical ones.
    pub validate_legacy: bool,
}

impl Config {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        // A missing .env file is fine.
        let _ = dotenvy::dotenv();

        let mut builder = config::Config::builder()
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("schemas.paths", Vec::<String>::new())?
            .set_default("validation.fail_fast", false)?
            .set_default("validation.max_issues", 1000_i64)?
            .set_default("ingest.validate_legacy", true)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .add_source(
                Environment::with_prefix("INDIVO")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("schemas.paths"),
            )
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn validate(&self) -> Result<(), String> {
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(format!(
                "logging.level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            ));
        }
        self.validation_plan().map(|_| ()).map_err(|e| e.to_string())
    }

    pub fn validation_plan(&self) -> Result<ValidationPlan, indivo_validator::ConfigError> {
        ValidationPlan::builder()
            .fail_fast(self.validation.fail_fast)
            .max_issues(self.validation.max_issues)
            .build()
    }
}
