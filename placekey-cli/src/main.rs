//! Placekey CLI - Command-line interface
//!
//! This binary provides a command-line interface to the placekey library.

mod commands;
mod error;

use clap::{Parser, Subcommand};
use commands::api::QueryArgs;
use commands::config::ConfigCommands;
use commands::spatial::BoundaryFormat;
use error::CliError;
use placekey::config::{ConfigFile, DEFAULT_BATCH_SIZE};
use placekey::logging::{default_log_file, init_logging, init_logging_with_file};
use placekey::spatial::SpatialQuery;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "placekey")]
#[command(version = placekey::VERSION)]
#[command(about = "Encode, validate and resolve placekeys", long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to placekey.log in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a coordinate as a placekey
    Encode {
        /// Latitude in decimal degrees
        #[arg(allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(allow_hyphen_values = true)]
        lng: f64,
    },

    /// Decode a placekey to the centre of its cell
    Decode {
        placekey: String,

        /// Also print the grid cell index
        #[arg(long)]
        cell: bool,
    },

    /// Check placekeys for validity
    Validate {
        #[arg(required = true)]
        placekeys: Vec<String>,
    },

    /// Repair placekeys as returned by the API
    Normalize {
        #[arg(required = true)]
        inputs: Vec<String>,
    },

    /// List placekeys within k grid steps
    Neighbors {
        placekey: String,

        /// Grid distance
        #[arg(short, default_value = "1")]
        k: u32,
    },

    /// Distance in meters between two placekeys
    Distance { a: String, b: String },

    /// Print the boundary of a placekey's cell
    Boundary {
        placekey: String,

        #[arg(long, value_enum, default_value = "coords")]
        format: BoundaryFormat,

        /// Print coordinates as lng lat
        #[arg(long)]
        geo_json: bool,
    },

    /// List placekeys covering a WKT or GeoJSON polygon
    Fill {
        /// File holding the polygon, or - for stdin
        input: String,

        /// Count cells that only touch the polygon as boundary cells
        #[arg(long)]
        include_touching: bool,
    },

    /// List placekeys within a distance of a coordinate
    Nearby {
        #[arg(allow_hyphen_values = true)]
        lat: f64,

        #[arg(allow_hyphen_values = true)]
        lng: f64,

        /// Distance in meters (at most about 4.2 km)
        #[arg(long, default_value = "1000")]
        distance: f64,
    },

    /// Resolve one place through the API
    Lookup {
        #[command(flatten)]
        query: QueryArgs,

        /// API key (overrides config and PLACEKEY_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Resolve queries read as JSON lines through the API
    Batch {
        /// File of JSON queries, one per line, or - for stdin
        input: String,

        /// Queries per request (1-100)
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        #[arg(long)]
        api_key: Option<String>,
    },

    /// Fill in placekeys for place records read as JSON lines
    Geocode {
        /// File of JSON places, one per line, or - for stdin
        input: String,

        #[arg(long)]
        api_key: Option<String>,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { "placekey=debug,info" } else { "warn" };

    // Kept alive until exit so the log file is flushed.
    let _guard = match &cli.log_dir {
        Some(dir) => match init_logging_with_file(level, dir, default_log_file()) {
            Ok(guard) => Some(guard),
            Err(e) => CliError::LoggingInit(e.to_string()).exit(),
        },
        None => {
            init_logging(level);
            None
        }
    };

    if let Err(e) = run(cli.command) {
        e.exit();
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Config { command } => commands::config::run(command),
        Commands::Normalize { inputs } => commands::keys::run_normalize(&inputs),
        Commands::Encode { lat, lng } => commands::keys::run_encode(&*commands::codec()?, lat, lng),
        Commands::Decode { placekey, cell } => {
            commands::keys::run_decode(&*commands::codec()?, &placekey, cell)
        }
        Commands::Validate { placekeys } => {
            commands::keys::run_validate(commands::codec()?, &placekeys)
        }
        Commands::Neighbors { placekey, k } => {
            commands::spatial::run_neighbors(&spatial()?, &placekey, k)
        }
        Commands::Distance { a, b } => commands::spatial::run_distance(&spatial()?, &a, &b),
        Commands::Boundary {
            placekey,
            format,
            geo_json,
        } => commands::spatial::run_boundary(&spatial()?, &placekey, format, geo_json),
        Commands::Fill {
            input,
            include_touching,
        } => commands::spatial::run_fill(&spatial()?, &input, include_touching),
        Commands::Nearby { lat, lng, distance } => {
            commands::spatial::run_nearby(&spatial()?, lat, lng, distance)
        }
        Commands::Lookup { query, api_key } => {
            let config = ConfigFile::load()?;
            commands::api::run_lookup(
                commands::api::client_config(&config, api_key),
                &query.to_query(),
            )
        }
        Commands::Batch {
            input,
            batch_size,
            api_key,
        } => {
            let config = ConfigFile::load()?;
            commands::api::run_batch(
                commands::api::client_config(&config, api_key),
                &input,
                batch_size,
            )
        }
        Commands::Geocode { input, api_key } => {
            let config = ConfigFile::load()?;
            debug!(chunk_size = config.batch.chunk_size, "geocoding");
            commands::api::run_geocode(
                commands::codec()?,
                commands::api::client_config(&config, api_key),
                &input,
                config.batch.chunk_size,
            )
        }
    }
}

fn spatial() -> Result<SpatialQuery, CliError> {
    Ok(SpatialQuery::new(commands::codec()?))
}
