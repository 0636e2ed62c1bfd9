use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;

use tracing_subscriber::EnvFilter;

use sysgraph::classify::Classification;
use sysgraph::config::{find_config, load_config, save_config, GraphConfig, CONFIG_FILENAME};
use sysgraph::context::MappingOptions;
use sysgraph::errors::{Result, SysGraphError};
use sysgraph::index::CollisionPolicy;
use sysgraph::mapping::Mapper;
use sysgraph::meta::{default_prefixes, parse_prefixes, MetaInformation};
use sysgraph::model::SourceModel;
use sysgraph::types::OutputFormat;
use sysgraph::writer::{render, writer_for};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "SYSGRAPH_LOG";

/// Transforms SysML design models into an RDF-ready resource graph.
#[derive(Parser)]
#[command(name = "sysgraph", version, about = "Transforms SysML models into an RDF-ready resource graph")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map a model document and write the resulting graph
    Transform {
        /// Path to the JSON model document
        model: PathBuf,
        /// Project scope (default: model file stem)
        #[arg(short, long)]
        project: Option<String>,
        /// Configuration file (default: sysgraph.toml lookup)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the base URI from the configuration
        #[arg(short, long)]
        base: Option<String>,
        /// Output format (json or triples)
        #[arg(short, long, default_value = "json")]
        format: String,
        /// Output file or http(s) endpoint (default: stdout)
        #[arg(short, long)]
        target: Option<String>,
        /// Meta-property as prefix:name=value, or graph=<id>
        #[arg(short, long)]
        meta: Vec<String>,
        /// Extra vocabulary prefix as prefix=namespace
        #[arg(long)]
        nsprefix: Vec<String>,
        /// Collision policy (last_write_wins, first_write_wins, reject)
        #[arg(long)]
        collision_policy: Option<String>,
    },
    /// Classify a model document and print element counts per kind
    Inspect {
        /// Path to the JSON model document
        model: PathBuf,
        /// Configuration file (default: sysgraph.toml lookup)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Write a default configuration file
    InitConfig {
        /// Target path (default: ./sysgraph.toml)
        path: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Transform {
            model,
            project,
            config,
            base,
            format,
            target,
            meta,
            nsprefix,
            collision_policy,
        } => {
            let mut cfg = resolve_config(config.as_deref(), &model)?;
            if let Some(base) = base {
                cfg.base_uri = base;
            }
            if let Some(policy) = collision_policy {
                cfg.collision_policy =
                    CollisionPolicy::from_str(&policy).ok_or_else(|| SysGraphError::Config {
                        message: format!("unknown collision policy '{}'", policy),
                    })?;
            }
            cfg.validate()?;

            let format = OutputFormat::from_str(&format).ok_or_else(|| SysGraphError::Config {
                message: format!("unknown output format '{}'", format),
            })?;
            let scope = project.unwrap_or_else(|| model_stem(&model));

            let descriptor = cfg.descriptor()?;
            let mut prefixes = default_prefixes(&descriptor);
            prefixes.extend(cfg.prefixes.clone());
            prefixes.extend(parse_prefixes(&nsprefix)?);
            let meta = MetaInformation::parse(&prefixes, &meta)?;

            let source = SourceModel::load(&model)?;
            let options = MappingOptions::from_config(&cfg, scope)?;
            let graph = Mapper::run(&source, options)?;

            let payload = render(&graph, &descriptor, &meta, format)?;
            let mut writer = writer_for(target.as_deref(), meta.id());
            writer.write(&payload, format)?;

            let stats = graph.stats();
            eprintln!(
                "Mapped {} resources ({} links, {} omitted, {} unknown, {} collisions) in {}ms -> {}",
                stats.resource_count(),
                stats.links_resolved,
                stats.links_omitted,
                stats.links_unknown,
                stats.collisions,
                stats.duration_ms,
                writer.target()
            );
        }
        Commands::Inspect { model, config } => {
            let cfg = resolve_config(config.as_deref(), &model)?;
            let source = SourceModel::load(&model)?;
            let classification = Classification::with_exclusions(&source, &cfg.excluded_packages);
            println!("Model {}", model.display());
            println!("  Elements:      {}", source.len());
            println!("  Relationships: {}", source.relationships().len());
            println!("\n  Elements by kind:");
            for (kind, count) in classification.counts() {
                println!("    {}: {}", kind.as_str(), count);
            }
        }
        Commands::InitConfig { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));
            if path.exists() {
                return Err(SysGraphError::Config {
                    message: format!("'{}' already exists", path.display()),
                });
            }
            save_config(&path, &GraphConfig::default())?;
            println!("Wrote default configuration to {}", path.display());
        }
    }
    Ok(())
}

/// Loads the explicit config, else the one found next to the model or in the
/// user config directory, else the defaults.
fn resolve_config(explicit: Option<&Path>, model: &Path) -> Result<GraphConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(SysGraphError::Config {
                message: format!("config file '{}' not found", path.display()),
            });
        }
        return load_config(path);
    }
    let dir = model
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    match find_config(dir) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "using config");
            load_config(&path)
        }
        None => Ok(GraphConfig::default()),
    }
}

fn model_stem(model: &Path) -> String {
    model
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "model".to_string())
}
