//! # vectra CLI
//!
//! Command-line interface for vectra, a multimodal content ingestion and
//! similarity search pipeline.
//!
//! ## Commands
//!
//! - `vectra extract <FILE>` - Extract a file into its canonical content item
//! - `vectra demo [QUERY]` - Seed a demo catalog and search it
//! - `vectra config <ACTION>` - Manage configuration
//!
//! ## Examples
//!
//! ```bash
//! # Inspect what the pipeline would ingest for a file
//! vectra extract products.csv
//!
//! # Seed the demo catalog and search it
//! vectra demo "red summer dress"
//!
//! # Get JSON output
//! vectra demo "leather" --format json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use vectra_core::{ContentItem, Metadata, Modality, Payload, RankedResult};
use vectra_embed::HashEmbedder;
use vectra_extract::{Dispatcher, SizeLimits};
use vectra_pipeline::Pipeline;
use vectra_store::MemoryStore;

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "vectra")]
#[command(about = "Multimodal content ingestion and similarity search")]
#[command(version)]
struct Cli {
    /// Path to config file (default: ~/.config/vectra/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a file into its canonical content item (no embedding)
    Extract {
        /// File to extract
        file: PathBuf,
    },

    /// Seed a demo product catalog and search it
    Demo {
        /// Search query
        #[arg(default_value = "red summer")]
        query: String,

        /// Similarity threshold
        #[arg(short, long)]
        threshold: Option<f32>,

        /// Maximum results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Print sample configuration file
    Init,
    /// Show config file path
    Path,
}

/// Output structure for extraction results.
#[derive(Serialize)]
struct ExtractOutput {
    content_id: String,
    modality: Modality,
    metadata: Metadata,
    content_preview: String,
}

/// Output structure for search results.
#[derive(Serialize)]
struct SearchOutput {
    query: String,
    seeded: String,
    results: Vec<ResultItem>,
}

#[derive(Serialize)]
struct ResultItem {
    content_id: String,
    modality: Modality,
    similarity: f32,
    content: String,
}

const DEMO_PRODUCTS: &[(&str, &str)] = &[
    ("Red Summer Dress", "Flowing red dress perfect for summer occasions"),
    ("Black Leather Boots", "Genuine leather boots with sturdy sole"),
    ("Blue Denim Jacket", "Classic denim jacket in vintage blue"),
    ("White Sneakers", "Comfortable white sneakers for everyday wear"),
    ("Green Backpack", "Durable green backpack for outdoor adventures"),
    ("Silver Watch", "Elegant silver watch with leather strap"),
    ("Pink Floral Blouse", "Delicate pink blouse with floral patterns"),
    ("Brown Leather Wallet", "Classic brown leather wallet with multiple compartments"),
    ("Navy Blue Jeans", "Comfortable navy blue jeans with modern fit"),
    ("Black Sunglasses", "Stylish black sunglasses with UV protection"),
];

/// Build the in-process pipeline from configuration.
fn create_pipeline(config: &Config) -> Pipeline {
    let embedder = Arc::new(HashEmbedder::new(config.embedding.dimension));
    let store = Arc::new(MemoryStore::new());
    Pipeline::new(embedder, store, config.pipeline_config())
}

/// Seed the demo catalog; returns (stored, attempted).
async fn seed_demo(pipeline: &Pipeline) -> (usize, usize) {
    let mut stored = 0;
    for (i, (name, description)) in DEMO_PRODUCTS.iter().enumerate() {
        let item = ContentItem {
            content_id: format!("product_{}", i + 1),
            modality: Modality::Text,
            payload: Payload::Text(format!("{name} - {description}")),
            metadata: Metadata::from([
                ("type".to_string(), "product".into()),
                ("name".to_string(), (*name).into()),
                ("description".to_string(), (*description).into()),
            ]),
        };
        match pipeline.ingest(&item).await {
            Ok(_) => stored += 1,
            Err(e) => warn!(product = %name, error = %e, "failed to seed product"),
        }
    }
    (stored, DEMO_PRODUCTS.len())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(Some(path.clone())),
        None => Config::load(),
    }
    .context("Failed to load config")?;

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        config.logging.level.parse().unwrap_or(Level::INFO)
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    match cli.command {
        Commands::Extract { file } => {
            if !file.exists() {
                anyhow::bail!("File does not exist: {}", file.display());
            }
            let filename = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| file.display().to_string());
            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;

            // detection and extraction only; nothing is embedded or stored
            let dispatcher = Dispatcher::new(SizeLimits {
                default: config.limits.max_file_size,
                image: config.limits.max_image_size,
            });
            let item = dispatcher
                .extract_file(&filename, bytes)
                .await
                .context("Extraction failed")?;

            match cli.format {
                OutputFormat::Json => {
                    let output = ExtractOutput {
                        content_id: item.content_id.clone(),
                        modality: item.modality,
                        metadata: item.metadata.clone(),
                        content_preview: truncate(item.payload.as_str(), 200),
                    };
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Text => {
                    println!("Content ID: {}", item.content_id);
                    println!("Modality:   {}", item.modality);
                    let mut keys: Vec<&String> = item.metadata.keys().collect();
                    keys.sort();
                    for key in keys {
                        println!("  {key}: {}", item.metadata[key]);
                    }
                    println!("\n{}", truncate(item.payload.as_str(), 400));
                }
            }
        }

        Commands::Demo {
            query,
            threshold,
            limit,
        } => {
            let pipeline = create_pipeline(&config);

            let (stored, attempted) = seed_demo(&pipeline).await;
            info!("Demo catalog ready: {stored}/{attempted} products seeded");

            let results = pipeline
                .search(&Payload::Text(query.clone()), None, threshold, limit)
                .await
                .context("Search failed")?;

            match cli.format {
                OutputFormat::Json => {
                    let output = SearchOutput {
                        query: query.clone(),
                        seeded: format!("{stored}/{attempted}"),
                        results: results.into_iter().map(result_item).collect(),
                    };
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Text => {
                    println!("Query: {query}\n");
                    if results.is_empty() {
                        println!("No results found.");
                    } else {
                        for (i, result) in results.iter().enumerate() {
                            println!(
                                "{}. {} (similarity: {:.3})",
                                i + 1,
                                result.content_id,
                                result.similarity
                            );
                            println!("   {}", truncate(&result.content, 100));
                            println!();
                        }
                    }
                }
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&config)
                            .context("Failed to serialize config")?
                    );
                }
                OutputFormat::Text => {
                    println!(
                        "{}",
                        toml::to_string_pretty(&config).context("Failed to serialize config")?
                    );
                }
            },
            ConfigAction::Init => {
                println!("{}", Config::sample_toml());
            }
            ConfigAction::Path => {
                if let Some(path) = Config::config_path() {
                    println!("{}", path.display());
                } else {
                    println!("Could not determine config directory");
                }
            }
        },
    }

    Ok(())
}

fn result_item(result: RankedResult) -> ResultItem {
    ResultItem {
        content_id: result.content_id,
        modality: result.modality,
        similarity: result.similarity,
        content: result.content,
    }
}

/// Truncate a string to max length, adding ellipsis if needed.
fn truncate(s: &str, max_len: usize) -> String {
    let s = s.replace('\n', " ").replace('\r', "");
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len.saturating_sub(3);
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}
