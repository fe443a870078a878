#![doc = include_str!("./README.md")]

/// Clap argument definitions
mod args;

/// System clipboard binding
mod clipboard;

/// Config command handlers
mod config;

/// Interactive confirmation gate in the terminal
mod gate;

/// Console notifications
mod notify;

/// `paste` and `from-file` commands
mod paste;

/// Markdown file as an editing surface
mod surface;

/// `tags` command
mod tags;

use clap::Parser;
use std::path::PathBuf;

use snapnote_core::config::Config;
use snapnote_core::fs::RealFileSystem;
use snapnote_core::store::Vault;

/// Type alias for the vault the CLI works on.
pub type CliVault = Vault<RealFileSystem>;

/// Helper to run async operations in sync context
fn block_on<F: std::future::Future>(f: F) -> F::Output {
    futures_lite::future::block_on(f)
}

pub use args::Cli;
use args::Commands;

/// Main entry point for the CLI
pub fn run_cli() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ Could not load config: {}", e);
            std::process::exit(1);
        }
    };

    // Execute commands and track success
    let success = match cli.command {
        Commands::Paste { options } => {
            let vault = open_vault(cli.vault, &config);
            paste::handle_paste(&vault, &config, &options)
        }

        Commands::FromFile { path, options } => {
            let vault = open_vault(cli.vault, &config);
            paste::handle_from_file(&vault, &config, &options, &path)
        }

        Commands::Tags => {
            let vault = open_vault(cli.vault, &config);
            tags::handle_tags(&vault)
        }

        Commands::Config { command } => config::handle_config_command(command, cli.vault, config),
    };

    if !success {
        std::process::exit(1);
    }
}

/// Logging goes to stderr; `RUST_LOG` wins over the default filter.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();
}

/// Vault from `--vault`, else the configured default.
fn open_vault(vault_override: Option<PathBuf>, config: &Config) -> CliVault {
    let root = vault_override.unwrap_or_else(|| config.default_vault.clone());
    log::debug!("Using vault at {}", root.display());
    Vault::new(RealFileSystem, root)
}
