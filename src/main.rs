// CRUNCHBOX Main Entry Point
// Copyright (c) 2026 Lushy | CRUNCHBOX

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tracing::info;

use crunchbox_core::server;
use crunchbox_core::styler::transformer::StyleParams;
use crunchbox_core::styler::StyleEngine;

#[derive(Parser)]
#[command(name = "crunchbox-core")]
#[command(about = "CRUNCHBOX Style-Biased Prompt Structuring Engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a prompt into semantic components and weights
    Parse {
        /// Free-text creative prompt
        #[arg(short, long)]
        prompt: String,
    },

    /// List the available aesthetic categories
    Categories,

    /// Suggest the best-matching category for a prompt
    Suggest {
        #[arg(short, long)]
        prompt: String,
    },

    /// Run the full pipeline and print the assembled skeleton
    Build {
        #[arg(short, long)]
        prompt: String,

        /// Aesthetic category (suggested automatically when omitted)
        #[arg(short, long)]
        category: Option<String>,

        /// Energy multiplier; above 1.0 intensifies action effects
        #[arg(long)]
        energy: Option<f64>,

        /// Saturation keyword override (e.g. pastel, neon, muted)
        #[arg(long)]
        saturation: Option<String>,

        /// Composition density in [0,1]; lower keeps fewer effects
        #[arg(long)]
        density: Option<f64>,

        /// Era tag for vintage typography (e.g. 1970s)
        #[arg(long)]
        era: Option<String>,
    },

    /// Generate stylistic variants of one prompt
    Variants {
        #[arg(short, long)]
        prompt: String,

        #[arg(short, long)]
        category: String,

        /// Number of variants, 1-5
        #[arg(long, default_value_t = 3)]
        count: u32,
    },

    /// Start the Tool API server
    Serve {
        /// Port to run the server on
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let engine = StyleEngine::new().context("rule catalog failed to load")?;

    let args = Cli::parse();

    match args.command {
        Commands::Parse { prompt } => {
            let parsed = engine.parse(&prompt);
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }

        Commands::Categories => {
            let summaries = engine.catalog().summaries();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }

        Commands::Suggest { prompt } => {
            let parsed = engine.parse(&prompt);
            let suggestion = engine.suggest_category(&parsed.components);
            println!("{}", serde_json::to_string_pretty(&suggestion)?);
        }

        Commands::Build {
            prompt,
            category,
            energy,
            saturation,
            density,
            era,
        } => {
            let parsed = engine.parse(&prompt);

            let category = match category {
                Some(name) => name,
                None => {
                    let suggestion = engine.suggest_category(&parsed.components);
                    info!(
                        "[BUILD] No category given, suggesting '{}' ({})",
                        suggestion.primary, suggestion.reasoning
                    );
                    suggestion.primary
                }
            };

            let defaults = StyleParams::default();
            let params = StyleParams {
                energy_level: energy.unwrap_or(defaults.energy_level),
                color_saturation: saturation,
                composition_density: density.unwrap_or(defaults.composition_density),
                era,
            };

            let transformed = engine.transform(&parsed.components, &category, Some(params))?;
            let skeleton =
                engine.assemble(&transformed, &category, &parsed.semantic_weights)?;

            println!("{}", serde_json::to_string_pretty(&skeleton)?);
            println!();
            println!("Prompt:   {}", skeleton.render());
            println!("Negative: {}", skeleton.negative_prompt);
        }

        Commands::Variants {
            prompt,
            category,
            count,
        } => {
            let parsed = engine.parse(&prompt);
            let variants = engine.generate_variants(&parsed.components, &category, count)?;
            println!("{}", serde_json::to_string_pretty(&variants)?);
        }

        Commands::Serve { port } => {
            info!("--- CRUNCHBOX STYLE ENGINE v{} ---", env!("CARGO_PKG_VERSION"));
            server::start_server(port, Arc::new(engine)).await;
        }
    }

    Ok(())
}
