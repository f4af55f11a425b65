//! Resolution API commands.

use clap::Args;
use placekey::batch::{BatchProcessor, GeocodeOutcome, Place};
use placekey::client::{PlacekeyClient, Query};
use placekey::codec::PlacekeyCodec;
use placekey::config::{ClientConfig, ConfigFile};
use placekey::log::TracingLogger;
use serde_json::Value;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::info;

use super::spatial::read_input;
use crate::error::CliError;

/// Fields of a single lookup query.
#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Name of the place (e.g. "Twin Peaks Petroleum")
    #[arg(long)]
    pub location_name: Option<String>,

    #[arg(long)]
    pub street_address: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    /// State or province
    #[arg(long)]
    pub region: Option<String>,

    #[arg(long)]
    pub postal_code: Option<String>,

    /// Two-letter country code
    #[arg(long)]
    pub country: Option<String>,
}

impl QueryArgs {
    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        if let Some(lat) = self.lat {
            query = query.with("latitude", lat);
        }
        if let Some(lng) = self.lng {
            query = query.with("longitude", lng);
        }

        let fields = [
            ("location_name", &self.location_name),
            ("street_address", &self.street_address),
            ("city", &self.city),
            ("region", &self.region),
            ("postal_code", &self.postal_code),
            ("iso_country_code", &self.country),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                query = query.with(key, value.as_str());
            }
        }
        query
    }
}

/// Build the client configuration from the config file and an optional
/// `--api-key` override.
pub fn client_config(config: &ConfigFile, api_key: Option<String>) -> Option<ClientConfig> {
    let mut config = config.clone();
    config.apply_api_key_override(api_key);
    config.client_config()
}

fn client(config: Option<ClientConfig>) -> Result<PlacekeyClient, CliError> {
    let config = config.ok_or_else(|| CliError::Config("no API key configured".to_string()))?;
    Ok(PlacekeyClient::new(config)?.with_logger(Arc::new(TracingLogger::new())))
}

/// Resolve one query and print the API's answer.
pub fn run_lookup(config: Option<ClientConfig>, query: &Query) -> Result<(), CliError> {
    let result = client(config)?.lookup(query)?;
    println!("{}", result);
    Ok(())
}

/// Resolve queries read as JSON lines, printing one result per line.
pub fn run_batch(
    config: Option<ClientConfig>,
    path: &str,
    batch_size: usize,
) -> Result<(), CliError> {
    let queries = read_json_lines(path)?
        .into_iter()
        .map(Query::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let results = client(config)?.lookup_batch(queries, batch_size)?;

    let mut out = io::stdout().lock();
    for result in results {
        writeln!(out, "{}", result)?;
    }
    Ok(())
}

/// Fill in placekeys for places read as JSON lines and print the updated
/// places. Coordinates are encoded locally; address-only places need an
/// API key.
pub fn run_geocode(
    codec: Arc<PlacekeyCodec>,
    config: Option<ClientConfig>,
    path: &str,
    chunk_size: usize,
) -> Result<(), CliError> {
    let mut places = read_json_lines(path)?
        .into_iter()
        .map(serde_json::from_value::<Place>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CliError::Input(format!("Invalid place record: {}", e)))?;

    let processor = BatchProcessor::new(codec)
        .with_chunk_size(chunk_size)
        .with_logger(Arc::new(TracingLogger::new()))
        .with_progress(|processed, successful| {
            info!(processed, successful, "geocode progress");
        });

    let summary = match config {
        Some(config) => processor
            .with_client(Arc::new(client(Some(config))?))
            .geocode(&mut places),
        None => processor.geocode(&mut places),
    };

    let mut out = io::stdout().lock();
    for place in &places {
        writeln!(out, "{}", serde_json::to_string(place).map_err(io::Error::other)?)?;
    }

    let resolved = summary
        .results
        .iter()
        .filter(|(_, outcome)| matches!(outcome, GeocodeOutcome::Resolved(_)))
        .count();
    eprintln!(
        "{} records: {} successful ({} via API), {} failed",
        summary.total,
        summary.successful,
        resolved,
        summary.failed()
    );
    for error in &summary.errors {
        eprintln!("  record {}: {}", error.index, error.error);
    }
    Ok(())
}

fn read_json_lines(path: &str) -> Result<Vec<Value>, CliError> {
    read_input(path)?
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            serde_json::from_str(line)
                .map_err(|e| CliError::Input(format!("Line {}: {}", number + 1, e)))
        })
        .collect()
}
