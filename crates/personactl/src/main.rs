//! personactl - command-line front end for the debate persona engine
//!
//! Reads a session history export, evaluates statistics and archetypes, and
//! prints the result. Logs go to stderr; results go to stdout.

use anyhow::Result;
use clap::{Parser, Subcommand};
use personactl::commands;
use personactl::config::{OutputFormat, PersonaConfig};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "personactl")]
#[command(about = "Debate practice analytics and persona classification", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: $PERSONA_CONFIG or the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Archetype catalog file, overrides the config
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Output format (text or json), overrides the config
    #[arg(long, global = true)]
    format: Option<OutputFormat>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute stats and archetype states for a history export
    Evaluate {
        /// Session history JSON file
        history: PathBuf,

        /// Sessions used for recent dimension averages
        #[arg(long)]
        window: Option<usize>,
    },

    /// Compute stats only
    Stats {
        /// Session history JSON file
        history: PathBuf,

        /// Sessions used for recent dimension averages
        #[arg(long)]
        window: Option<usize>,
    },

    /// Print the effective archetype catalog as TOML
    Catalog,

    /// Categorize an error message the way the UI error boundary does
    Categorize {
        /// Error message text
        message: String,
    },

    /// Show the effective configuration
    Config,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = PersonaConfig::load(cli.config.as_deref())?;
    if let Some(catalog) = cli.catalog {
        config.catalog_path = Some(catalog);
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    debug!(?config, "effective configuration");

    let output = match cli.command {
        Commands::Evaluate { history, window } => {
            apply_window(&mut config, window)?;
            commands::evaluate_command(&history, &config)?
        }
        Commands::Stats { history, window } => {
            apply_window(&mut config, window)?;
            commands::stats_command(&history, &config)?
        }
        Commands::Catalog => commands::catalog_command(&config)?,
        Commands::Categorize { message } => commands::categorize_command(&message, config.output.format)?,
        Commands::Config => commands::config_command(&config)?,
    };

    print!("{}", output);
    Ok(())
}

fn apply_window(config: &mut PersonaConfig, window: Option<usize>) -> Result<()> {
    if let Some(window) = window {
        config.engine.recent_window = window;
    }
    config.validate()
}
