//! Placekey codec
//!
//! Converts between grid cells (and geographic coordinates) and the compact
//! `@xxx-xxx-xxx` placekey form.
//!
//! # Encoding
//!
//! 1. **Shorten** the 64-bit cell: drop the 12 header bits (after bumping the
//!    base cell by one) and the 9 bits of resolutions 13–15.
//! 2. **Base encode** with [`ALPHABET`], most significant digit first.
//! 3. **Substitute** sequences that could spell objectionable words.
//! 4. **Pad** to 9 characters with [`PADDING_CHAR`].
//! 5. **Format** as three dash-joined groups behind an `@`.
//!
//! Decoding reverses each step. The constants involved are part of the
//! placekey format and must not change.

mod substitution;
mod types;

pub use types::{
    parse_placekey, CodecError, Placekey, ALPHABET, CODE_LENGTH, PADDING_CHAR, REPLACEMENT_CHARS,
    RESOLUTION, TUPLE_LENGTH,
};

use crate::grid::{GeoPoint, GridAdapter, GridCell, H3Grid, MAX_RESOLUTION};
use std::sync::Arc;

/// Resolution the shortening transform keeps digits for.
const BASE_RESOLUTION: u8 = 12;

/// Adding this increments the base cell field by one.
const BASE_CELL_SHIFT: u64 = 1 << (3 * MAX_RESOLUTION as u32);

/// Bits below the header (mode, reserved bits and resolution live above).
const HEADER_SHIFT: u32 = 52;

/// Bits holding the digits of resolutions finer than [`BASE_RESOLUTION`].
const UNUSED_RESOLUTION_BITS: u32 = 3 * (MAX_RESOLUTION - BASE_RESOLUTION) as u32;

/// All-ones digits restored for the dropped resolutions.
const UNUSED_RESOLUTION_FILLER: u64 = (1 << UNUSED_RESOLUTION_BITS) - 1;

/// Exclusive upper bound of a shortened cell value.
const SHORTENED_LIMIT: u64 = 1 << (HEADER_SHIFT - UNUSED_RESOLUTION_BITS);

/// Bidirectional placekey codec.
///
/// Holds the grid adapter it encodes with and the header bits every
/// resolution-10 cell shares.
///
/// # Example
///
/// ```
/// use placekey::codec::PlacekeyCodec;
///
/// let codec = PlacekeyCodec::with_h3().unwrap();
/// let placekey = codec.encode(37.7371, -122.44283).unwrap();
/// assert_eq!(placekey.as_str(), "@5vg-7gq-tvz");
/// ```
pub struct PlacekeyCodec {
    grid: Arc<dyn GridAdapter>,
    header: u64,
}

impl std::fmt::Debug for PlacekeyCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacekeyCodec")
            .field("header", &format_args!("{:#x}", self.header))
            .finish()
    }
}

impl PlacekeyCodec {
    /// Creates a codec over the given grid.
    ///
    /// The header is taken from the grid's resolution-10 cell at (0, 0).
    pub fn new(grid: Arc<dyn GridAdapter>) -> Result<Self, CodecError> {
        let origin = grid.coordinate_to_cell(GeoPoint::new(0.0, 0.0)?, RESOLUTION)?;
        let header = (origin.as_u64() >> HEADER_SHIFT) << HEADER_SHIFT;
        Ok(Self { grid, header })
    }

    /// Creates a codec over the `h3o` grid.
    pub fn with_h3() -> Result<Self, CodecError> {
        Self::new(Arc::new(H3Grid::new()))
    }

    /// The grid this codec encodes with.
    pub fn grid(&self) -> &Arc<dyn GridAdapter> {
        &self.grid
    }

    /// Encodes a coordinate at resolution 10.
    pub fn encode(&self, lat: f64, lng: f64) -> Result<Placekey, CodecError> {
        self.encode_point(GeoPoint::new(lat, lng)?)
    }

    /// Encodes a coordinate at resolution 10.
    pub fn encode_point(&self, point: GeoPoint) -> Result<Placekey, CodecError> {
        let cell = self.grid.coordinate_to_cell(point, RESOLUTION)?;
        Ok(self.encode_cell(cell))
    }

    /// Encodes a grid cell.
    pub fn encode_cell(&self, cell: GridCell) -> Placekey {
        let short = shorten(cell.as_u64());
        let cleaned = substitution::clean(&encode_short(short));
        Placekey::from_encoded(format_tuples(&cleaned))
    }

    /// Decodes a placekey to the centre of its cell.
    pub fn decode(&self, placekey: &str) -> Result<GeoPoint, CodecError> {
        let cell = self.to_cell(placekey)?;
        Ok(self.grid.cell_to_coordinate(cell)?)
    }

    /// Decodes a placekey to its grid cell.
    ///
    /// Only the `where` part is used. Fails when the text holds characters
    /// outside the alphabet or decodes to an index the grid rejects.
    pub fn to_cell(&self, placekey: &str) -> Result<GridCell, CodecError> {
        let (_, location) = parse_placekey(placekey);
        let code = strip_encoding(location);
        let short = decode_short(&substitution::dirty(&code))?;
        let cell = self.unshorten(short);

        if !self.grid.is_valid_cell(cell) {
            return Err(CodecError::InvalidCell(cell.as_u64()));
        }
        Ok(cell)
    }

    /// Returns the grid's hexadecimal form of the placekey's cell.
    pub fn to_cell_string(&self, placekey: &str) -> Result<String, CodecError> {
        Ok(self.grid.cell_to_string(self.to_cell(placekey)?))
    }

    /// Encodes a cell given in the grid's hexadecimal form.
    pub fn from_cell_string(&self, cell: &str) -> Result<Placekey, CodecError> {
        Ok(self.encode_cell(self.grid.string_to_cell(cell)?))
    }

    fn unshorten(&self, short: u64) -> GridCell {
        let unshifted = short << UNUSED_RESOLUTION_BITS;
        GridCell::new(self.header + UNUSED_RESOLUTION_FILLER - BASE_CELL_SHIFT + unshifted)
    }
}

/// Drops the header and the unused resolution digits.
fn shorten(cell: u64) -> u64 {
    let shifted = cell.wrapping_add(BASE_CELL_SHIFT) % (1 << HEADER_SHIFT);
    shifted >> UNUSED_RESOLUTION_BITS
}

fn radix() -> u64 {
    ALPHABET.len() as u64
}

fn encode_short(mut value: u64) -> String {
    let symbols = ALPHABET.as_bytes();
    if value == 0 {
        return (symbols[0] as char).to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(symbols[(value % radix()) as usize]);
        value /= radix();
    }
    digits.iter().rev().map(|&b| b as char).collect()
}

fn decode_short(code: &str) -> Result<u64, CodecError> {
    let mut value: u64 = 0;
    for c in code.chars() {
        let digit = ALPHABET.find(c).ok_or(CodecError::InvalidCharacter(c))? as u64;
        value = value
            .checked_mul(radix())
            .and_then(|v| v.checked_add(digit))
            .filter(|v| *v < SHORTENED_LIMIT)
            .ok_or_else(|| CodecError::OutOfRange(code.to_string()))?;
    }
    Ok(value)
}

fn strip_encoding(location: &str) -> String {
    location
        .chars()
        .filter(|c| *c != '@' && *c != '-' && *c != PADDING_CHAR)
        .collect()
}

fn format_tuples(code: &str) -> String {
    let padding = CODE_LENGTH.saturating_sub(code.len());
    let padded: Vec<char> = std::iter::repeat(PADDING_CHAR)
        .take(padding)
        .chain(code.chars())
        .collect();

    let tuples: Vec<String> = padded
        .chunks(TUPLE_LENGTH)
        .map(|chunk| chunk.iter().collect())
        .collect();
    format!("@{}", tuples.join("-"))
}
