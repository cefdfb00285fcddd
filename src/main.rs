//! # Product Recs CLI (`recs`)
//!
//! ## Usage
//!
//! ```bash
//! recs --config ./config/recs.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `recs recommend "<query>"` | Similar products ranked by blended score |
//! | `recs resolve "<query>"` | Show which product a query resolves to |
//! | `recs autocomplete "<prefix>"` | Fuzzy product-name completions |
//! | `recs trending` | Trending carousel rows |
//! | `recs stats` | Catalogue and index statistics |
//! | `recs shell` | Interactive session with `:reload` |
//!
//! Logs go to stderr. Set `RUST_LOG` or pass `--verbose` for more detail.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use product_recs::{catalogue, config, recommend, shell, stats, trending};

/// Product Recs CLI — content-based product recommendations.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/recs.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "recs",
    about = "Product Recs — content-based product recommendations",
    version,
    long_about = "Product Recs indexes a product catalogue with TF-IDF over names, brands, \
    categories, tags and descriptions, blends text similarity with a rating and review \
    popularity score, and resolves misspelled product names with fuzzy matching."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/recs.toml")]
    config: PathBuf,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend products similar to the one named by the query.
    ///
    /// The query is resolved to a catalogue product (exact, substring, then
    /// fuzzy match). Exits non-zero when nothing matches.
    Recommend {
        /// Product name or fragment.
        query: String,

        /// Number of recommendations. Defaults to `[ranking].default_top_n`.
        #[arg(long)]
        top_n: Option<usize>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Resolve a query to a catalogue product without ranking.
    Resolve {
        query: String,

        #[arg(long)]
        json: bool,
    },

    /// Suggest product names for a partial or misspelled query.
    Autocomplete {
        prefix: String,

        /// Maximum number of completions. Defaults to `[resolver].suggestion_limit`.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show the trending-products carousel.
    Trending {
        #[arg(long)]
        limit: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Show catalogue and index statistics.
    Stats,

    /// Start an interactive session reading queries from stdin.
    Shell,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = config::load_config(&cli.config)?;

    // Trending rows never touch the index, so skip building it.
    if let Commands::Trending { limit, json } = cli.command {
        trending::run_trending(&cfg, limit, json)?;
        return Ok(ExitCode::SUCCESS);
    }

    let recommender = catalogue::open_recommender(&cfg)?;

    let found = match cli.command {
        Commands::Recommend { query, top_n, json } => {
            recommend::run_recommend(&recommender, &cfg, &query, top_n, json)?
        }
        Commands::Resolve { query, json } => {
            recommend::run_resolve(&recommender, &cfg, &query, json)?
        }
        Commands::Autocomplete { prefix, limit } => {
            let limit = limit.unwrap_or(cfg.resolver.suggestion_limit);
            recommend::run_autocomplete(&recommender, &prefix, limit)?;
            true
        }
        Commands::Stats => {
            stats::run_stats(&recommender, &cfg)?;
            true
        }
        Commands::Shell => {
            shell::run_shell(&recommender, &cfg)?;
            true
        }
        Commands::Trending { .. } => {
            // Handled above (before the index is built)
            unreachable!()
        }
    };

    Ok(if found {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
