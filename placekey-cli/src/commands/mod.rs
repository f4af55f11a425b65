//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`keys`] - Encode, decode, validate and normalize placekeys
//! - [`spatial`] - Neighbours, distances, boundaries and polygon fills
//! - [`api`] - Lookups through the resolution API, single and batch
//! - [`config`] - Configuration file management (path, list, init)

pub mod api;
pub mod config;
pub mod keys;
pub mod spatial;

use crate::error::CliError;
use placekey::codec::PlacekeyCodec;
use std::sync::Arc;

/// Builds the shared codec every command decodes with.
pub fn codec() -> Result<Arc<PlacekeyCodec>, CliError> {
    Ok(Arc::new(PlacekeyCodec::with_h3()?))
}
