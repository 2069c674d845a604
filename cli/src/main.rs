use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

mod commands;
mod logging;
mod utils;

use commands::{autorequire, config, validate};
use utils::env_paths::EnvPaths;

/// ACL CLI - Command line interface for validating declarative Windows ACL manifests
#[derive(Parser)]
#[command(name = "aclc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate ACL manifests and print the normalized resources
    Validate {
        /// Manifest file or directory (defaults to ACL_MANIFEST_PATH)
        path: Option<PathBuf>,

        /// Output format (json, yaml, text)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Compute the ordering dependencies of each ACL against a catalog
    Autorequire {
        /// Manifest file or directory (defaults to ACL_MANIFEST_PATH)
        path: Option<PathBuf>,

        /// Catalog file (defaults to ACL_CATALOG_PATH)
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Output format (json, text)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show the resolved configuration
    Config {
        /// Output format (json, yaml, text)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    let env_paths = match EnvPaths::load() {
        Ok(paths) => paths,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    // Initialize logging; the guard flushes the log file on exit
    let _guard = logging::init_logging(cli.verbose, env_paths.log_path.as_deref())?;

    let result = match cli.command {
        Commands::Validate { path, format } => {
            let path = path.unwrap_or_else(|| env_paths.manifest_path.clone());
            validate::execute(path, format).await
        }
        Commands::Autorequire {
            path,
            catalog,
            format,
        } => {
            let path = path.unwrap_or_else(|| env_paths.manifest_path.clone());
            let catalog = catalog.unwrap_or_else(|| env_paths.catalog_path.clone());
            autorequire::execute(path, catalog, format).await
        }
        Commands::Config { format } => config::show(&env_paths, format),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
