//! Schema Flatten CLI
//!
//! Flattens attribute schema documents and inspects the result.

use std::path::PathBuf;
use clap::{Parser, Subcommand};
use serde::Serialize;
use attribute_schemas::{
    load_path, Checksum, FlattenConfig, FlattenReport, Flattener, OutputFormat, SchemaNode,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-flatten")]
#[command(about = "Flatten nested attribute schemas into qualified leaf attributes")]
#[command(version)]
struct Cli {
    /// Config file to load (optional)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flatten a schema file or directory to JSON
    Flatten {
        /// Schema file or directory
        path: PathBuf,
        /// Prefix every leaf name with this parent name
        #[arg(short, long)]
        parent: Option<String>,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Compact JSON output
        #[arg(long)]
        compact: bool,
    },

    /// Print qualified leaf names, one per line
    Names {
        /// Schema file or directory
        path: PathBuf,
    },

    /// Report leaf counts, duplicates and checksums
    Check {
        /// Schema file or directory
        path: PathBuf,
        /// Output file (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// View or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
    /// Write the default configuration to a file
    Init {
        #[arg(short, long, default_value = "schema-flatten.toml")]
        output: String,
    },
}

#[derive(Serialize)]
struct FlattenedResource<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    checksum: Option<Checksum>,
    attributes: Vec<SchemaNode>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = FlattenConfig::load_from(cli.config.as_deref())?;
    let flattener = Flattener::new(config.flatten.to_options());

    match cli.command {
        Commands::Flatten { path, parent, output, compact } => {
            let resources = load_path(&path)?;
            let mut flattened = Vec::with_capacity(resources.len());

            for resource in &resources {
                let attributes = match parent.as_deref() {
                    Some(parent) => flattener.flatten(&resource.attributes, Some(parent))?,
                    None => resource.flatten(&flattener, config.flatten.qualify_with_id)?,
                };
                let checksum = config
                    .output
                    .include_checksum
                    .then(|| Checksum::of_leaves(&attributes));
                flattened.push(FlattenedResource { id: &resource.id, checksum, attributes });
            }

            let json = if compact || config.output.format == OutputFormat::Compact {
                serde_json::to_string(&flattened)?
            } else {
                serde_json::to_string_pretty(&flattened)?
            };

            if let Some(path) = output {
                std::fs::write(&path, &json)?;
                eprintln!("✅ Flattened {} resource(s) to {:?}", flattened.len(), path);
            } else {
                println!("{}", json);
            }
            Ok(())
        }

        Commands::Names { path } => {
            for resource in load_path(&path)? {
                for leaf in resource.flatten(&flattener, config.flatten.qualify_with_id)? {
                    println!("{}", leaf.name);
                }
            }
            Ok(())
        }

        Commands::Check { path, output } => {
            let resources = load_path(&path)?;
            let report = FlattenReport::build(&resources, &flattener, config.flatten.qualify_with_id)?;

            for resource in &report.resources {
                if resource.duplicates.is_empty() {
                    eprintln!("  ✅ {} - {} leaves", resource.id, resource.leaf_count);
                } else {
                    eprintln!("  ❌ {} - {} duplicate name(s)", resource.id, resource.duplicates.len());
                    for name in &resource.duplicates {
                        eprintln!("     └─ {}", name);
                    }
                }
            }

            let report_json = serde_json::to_string_pretty(&report)?;
            if let Some(path) = output {
                std::fs::write(&path, &report_json)?;
                eprintln!("✅ Report written to {:?}", path);
            } else {
                println!("{}", report_json);
            }

            if report.has_duplicates() {
                std::process::exit(1);
            }
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show { json } => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&config)?);
                } else {
                    println!("{}", toml::to_string_pretty(&config)?);
                }
                Ok(())
            }
            ConfigAction::Init { output } => {
                FlattenConfig::default().save(&output)?;
                eprintln!("✅ Created config file: {}", output);
                Ok(())
            }
        },
    }
}
