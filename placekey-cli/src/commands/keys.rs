//! Placekey encoding and validation commands.

use placekey::codec::PlacekeyCodec;
use placekey::validate::{normalize, Validator};
use std::sync::Arc;

use crate::error::CliError;

/// Print the placekey for a coordinate.
pub fn run_encode(codec: &PlacekeyCodec, lat: f64, lng: f64) -> Result<(), CliError> {
    println!("{}", codec.encode(lat, lng)?);
    Ok(())
}

/// Print the centre of a placekey's cell, optionally with the cell index.
pub fn run_decode(codec: &PlacekeyCodec, placekey: &str, cell: bool) -> Result<(), CliError> {
    let point = codec.decode(placekey)?;
    if cell {
        println!("{}", codec.to_cell_string(placekey)?);
    }
    println!("{} {}", point.lat(), point.lng());
    Ok(())
}

/// Report whether each placekey is valid. Fails if any is not.
pub fn run_validate(codec: Arc<PlacekeyCodec>, placekeys: &[String]) -> Result<(), CliError> {
    let validator = Validator::new(codec);

    let mut invalid = 0;
    for placekey in placekeys {
        let valid = validator.is_valid_format(placekey.as_str());
        if !valid {
            invalid += 1;
        }
        println!("{}\t{}", placekey, if valid { "valid" } else { "invalid" });
    }

    if invalid > 0 {
        return Err(CliError::Input(format!(
            "{} of {} placekeys are invalid",
            invalid,
            placekeys.len()
        )));
    }
    Ok(())
}

/// Print the repaired form of each input.
pub fn run_normalize(inputs: &[String]) -> Result<(), CliError> {
    for input in inputs {
        if let Some(normalized) = normalize(Some(input)) {
            println!("{}", normalized);
        }
    }
    Ok(())
}
