//! Configuration management CLI commands.
//!
//! Provides `config path`, `config list` and `config init` for inspecting
//! and creating `~/.placekey/config.ini`.

use clap::Subcommand;
use placekey::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// List the effective configuration settings
    List,

    /// Write a configuration file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,

        /// API key to store in the new file
        #[arg(long)]
        api_key: Option<String>,
    },
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => run_path(),
        ConfigCommands::List => run_list(),
        ConfigCommands::Init { force, api_key } => run_init(force, api_key),
    }
}

fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

fn run_list() -> Result<(), CliError> {
    let config = ConfigFile::load()?;

    println!("[api]");
    println!(
        "key = {}",
        if config.api.key.is_some() { "(set)" } else { "(not set)" }
    );
    println!("base_url = {}", config.api.base_url);
    println!("timeout_secs = {}", config.api.timeout_secs);
    println!("max_retries = {}", config.api.max_retries);
    println!();
    println!("[cache]");
    println!("enabled = {}", config.cache.enabled);
    println!("capacity = {}", config.cache.capacity);
    println!();
    println!("[rate_limit]");
    println!(
        "single = {} per {}s",
        config.rate_limit.single_requests, config.rate_limit.single_period_secs
    );
    println!(
        "batch = {} per {}s",
        config.rate_limit.batch_requests, config.rate_limit.batch_period_secs
    );
    println!();
    println!("[batch]");
    println!("chunk_size = {}", config.batch.chunk_size);

    Ok(())
}

fn run_init(force: bool, api_key: Option<String>) -> Result<(), CliError> {
    let path = config_file_path();
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        )));
    }

    let mut config = ConfigFile::default();
    config.apply_api_key_override(api_key);
    config.save_to(&path)?;

    println!("Wrote {}", path.display());
    Ok(())
}
