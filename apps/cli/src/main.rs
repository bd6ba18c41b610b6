//! Indivo SDM command-line tools

mod config;
mod logging;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use crate::config::Config;
use indivo_data_models::{catalogue_registry, IngestError, Ingestor, OptionsRegistry, Serializer};
use indivo_models::{Fact, MemoryFactStore, ModelDefinition, ModelRegistry};
use indivo_sdm::load_schema;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "indivo")]
#[command(version, about = "Parse, validate and serialize Indivo Simple Data Modeling documents")]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse SDML schema files and print the resulting model definitions
    Schema {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List the models of the clinical catalogue
    Models,
    /// Ingest an instance document and print the stored facts
    Ingest {
        #[arg(long, value_enum, default_value_t = InputFormat::Sdmj)]
        format: InputFormat,
        #[arg(long, value_enum, default_value_t = OutputFormat::Xml)]
        output: OutputFormat,
        /// Extra SDML files to register before ingesting
        #[arg(long = "schema")]
        schemas: Vec<PathBuf>,
        file: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    Sdmj,
    Sdmx,
    /// SDMX using legacy field names
    Legacy,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Xml,
    Json,
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_schemas(registry: &ModelRegistry, paths: &[PathBuf]) -> anyhow::Result<()> {
    for path in paths {
        let names = load_schema(registry, &read(path)?)
            .with_context(|| format!("Invalid schema in {}", path.display()))?;
        tracing::info!(file = %path.display(), models = ?names, "loaded schema");
    }
    Ok(())
}

fn print_schema(files: &[PathBuf]) -> anyhow::Result<()> {
    let registry = ModelRegistry::new();
    load_schemas(&registry, files)?;

    let definitions: Vec<_> = registry
        .names()
        .iter()
        .filter_map(|name| registry.get(name))
        .collect();
    let rendered: Vec<&ModelDefinition> = definitions.iter().map(|d| &**d).collect();
    println!("{}", serde_json::to_string_pretty(&rendered)?);
    Ok(())
}

fn print_models() -> anyhow::Result<()> {
    let registry = catalogue_registry()?;
    let options = OptionsRegistry::builtin();
    for name in registry.names() {
        let validated = options
            .get(&name)
            .map(|o| o.field_validators().fields().count())
            .unwrap_or(0);
        println!("{name}\t{validated} validated field(s)");
    }
    Ok(())
}

fn ingest(
    config: &Config,
    format: InputFormat,
    output: OutputFormat,
    schemas: &[PathBuf],
    file: &Path,
) -> anyhow::Result<()> {
    let registry = catalogue_registry()?;
    load_schemas(&registry, &config.schemas.paths)?;
    load_schemas(&registry, schemas)?;

    let options = OptionsRegistry::builtin();
    let ingestor = Ingestor::new(&registry, options)
        .with_plan(config.validation_plan()?)
        .with_legacy_validation(config.ingest.validate_legacy);

    let input = read(file)?;
    let mut store = MemoryFactStore::new();
    let result = match format {
        InputFormat::Sdmj => ingestor.ingest_sdmj(&input, &mut store),
        InputFormat::Sdmx => ingestor.ingest_sdmx(&input, &mut store),
        InputFormat::Legacy => ingestor.ingest_legacy_sdmx(&input, &mut store),
    };

    let facts: Vec<Fact> = match result {
        Ok(facts) => facts,
        Err(IngestError::Validation(outcomes)) => {
            let report: Vec<_> = outcomes.iter().map(|o| o.to_json()).collect();
            eprintln!("{}", serde_json::to_string_pretty(&report)?);
            bail!("{} failed validation", file.display());
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to ingest {}", file.display())),
    };

    let serializer = Serializer::new(&registry, options);
    let rendered = match output {
        OutputFormat::Xml => serializer.to_xml(&facts)?,
        OutputFormat::Json => serde_json::to_string_pretty(&serializer.to_json_value(&facts))?,
    };
    println!("{rendered}");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    match &cli.command {
        Commands::Schema { files } => print_schema(files),
        Commands::Models => print_models(),
        Commands::Ingest {
            format,
            output,
            schemas,
            file,
        } => ingest(&config, *format, *output, schemas, file),
    }
}
