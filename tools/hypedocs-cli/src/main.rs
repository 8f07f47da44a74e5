//! hypedocs — build tool for the Tumult Hype user manual.
//!
//! Usage:
//!   hypedocs build [OPTIONS]      Combine chapters and clean up unused images
//!   hypedocs combine [OPTIONS]    Combine chapters into the manual only
//!   hypedocs chapter <FILE>       Print one processed chapter
//!   hypedocs images [OPTIONS]     Audit the image folder against the manual
//!   hypedocs links [FILE]         Check internal anchor links
//!   hypedocs config               Write the effective configuration file

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hypedocs_common::config::{DocsConfig, LoggingConfig};

mod commands;

#[derive(Parser)]
#[command(
    name = "hypedocs",
    about = "Build the combined Tumult Hype documentation",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Documentation root (contains hypedocs.json, md/ and images/)
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Combine chapters, then audit and clean up unused images
    Build {
        /// Delete unused images without asking
        #[arg(short = 'y', long)]
        auto_cleanup: bool,

        /// Keep class attributes and original whitespace
        #[arg(long)]
        no_compact: bool,

        /// Print a JSON build summary instead of progress text
        #[arg(long)]
        json: bool,
    },

    /// Combine chapters into the manual without touching images
    Combine {
        /// Output file (relative to the root)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep class attributes and original whitespace
        #[arg(long)]
        no_compact: bool,
    },

    /// Process a single chapter and print the result
    Chapter {
        /// Path to the chapter source
        file: PathBuf,

        /// Keep class attributes and original whitespace
        #[arg(long)]
        no_compact: bool,
    },

    /// Audit the image folder against the combined manual
    Images {
        /// Delete unused images without asking
        #[arg(short = 'y', long)]
        auto_cleanup: bool,

        /// Report only; never delete or write the unused list
        #[arg(long)]
        dry_run: bool,
    },

    /// Check that every #fragment link resolves to a heading or anchor
    Links {
        /// Markdown file to check (defaults to the combined manual)
        file: Option<PathBuf>,
    },

    /// Write the effective configuration to hypedocs.json
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = DocsConfig::load_strict(&cli.root)
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?;

    // Initialize logging
    let logging = LoggingConfig {
        level: if cli.verbose {
            "debug".to_string()
        } else {
            config.logging.level.clone()
        },
        ..config.logging.clone()
    };
    hypedocs_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Build {
            auto_cleanup,
            no_compact,
            json,
        } => {
            config.compact &= !no_compact;
            commands::build::run(&cli.root, &config, auto_cleanup, json)
        }
        Commands::Combine { output, no_compact } => {
            config.compact &= !no_compact;
            if let Some(output) = output {
                config.output = output;
            }
            commands::combine::run(&cli.root, &config)
        }
        Commands::Chapter { file, no_compact } => {
            config.compact &= !no_compact;
            commands::chapter::run(file, &config)
        }
        Commands::Images {
            auto_cleanup,
            dry_run,
        } => commands::images::run(&cli.root, &config, auto_cleanup, dry_run),
        Commands::Links { file } => commands::links::run(&cli.root, &config, file),
        Commands::Config => commands::config::run(&cli.root, &config),
    }
}
