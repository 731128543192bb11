//! Command line interface
//!
//! | Command | Action |
//! |---------|--------|
//! | `chat` | Interactive session over stdin/stdout |
//! | `search` | Top matches for a query with the strategy each would imply |
//! | `add-reference` | Append a script to the reference library |
//! | `rebuild` | Recompute the embedding index |
//! | `stats` | Library statistics |

mod chat;
mod library;
pub mod render;

use std::path::PathBuf;

use cadgen_domain::constants::DEFAULT_TOP_K;
use cadgen_domain::error::Result;
use cadgen_domain::value_objects::ComplexityTier;
use cadgen_infrastructure::config::ConfigLoader;
use cadgen_infrastructure::di::init_app;
use cadgen_infrastructure::logging::init_logging;
use clap::{Parser, Subcommand};

/// Command line interface for cadgen
#[derive(Parser, Debug)]
#[command(name = "cadgen")]
#[command(about = "Conversational CadQuery script generator")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Talk to the assistant; Ctrl-C cancels the running turn
    Chat {
        /// Directory where generated scripts are written
        #[arg(long)]
        save_dir: Option<PathBuf>,
    },
    /// Show the closest references for a request
    Search {
        query: String,
        /// Number of matches
        #[arg(short, default_value_t = DEFAULT_TOP_K)]
        k: usize,
    },
    /// Add a reference script to the library
    AddReference {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        script_file: PathBuf,
        #[arg(long, default_value = "primitive")]
        complexity: ComplexityTier,
        #[arg(long, default_value = "general")]
        category: String,
    },
    /// Recompute the embedding index
    Rebuild,
    /// Print library statistics
    Stats,
}

/// Load configuration, wire the services and run one command
pub async fn run(cli: Cli) -> Result<()> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let config = loader.load()?;
    init_logging(&config.logging)?;

    let context = init_app(config).await?;
    match cli.command {
        Command::Chat { save_dir } => {
            context.initialize().await?;
            chat::run(&context, save_dir.as_deref()).await
        }
        Command::Search { query, k } => {
            context.initialize().await?;
            library::search(&context, &query, k).await
        }
        Command::AddReference {
            name,
            description,
            script_file,
            complexity,
            category,
        } => {
            library::add_reference(
                &context,
                library::AddArgs {
                    name,
                    description,
                    script_file,
                    complexity,
                    category,
                },
            )
            .await
        }
        Command::Rebuild => library::rebuild(&context).await,
        Command::Stats => library::stats(&context),
    }
}
