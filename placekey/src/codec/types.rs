//! Placekey type definitions

use crate::grid::GridError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Symbols used by the base encoding, in digit order.
pub const ALPHABET: &str = "23456789bcdfghjkmnpqrstvwxyz";

/// Characters introduced by the profanity substitutions.
pub const REPLACEMENT_CHARS: &str = "eu";

/// Left padding symbol for short encodings.
pub const PADDING_CHAR: char = 'a';

/// Length of the `where` code before tuple formatting.
pub const CODE_LENGTH: usize = 9;

/// Characters per dash-separated group.
pub const TUPLE_LENGTH: usize = 3;

/// Grid resolution placekeys are encoded at.
pub const RESOLUTION: u8 = 10;

/// An identifier of the form `[what@]where`.
///
/// Produced by [`PlacekeyCodec`](super::PlacekeyCodec) or parsed from text with
/// [`str::parse`], which checks the structure but not that the `where` part
/// addresses a real cell (use [`Validator`](crate::validate::Validator) for that).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Placekey(String);

impl Placekey {
    pub(crate) fn from_encoded(encoded: String) -> Self {
        Self(encoded)
    }

    /// The full identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The optional `what` part.
    pub fn what(&self) -> Option<&str> {
        parse_placekey(&self.0).0
    }

    /// The `where` part, without the leading `@`.
    pub fn where_part(&self) -> &str {
        parse_placekey(&self.0).1
    }

    /// Consumes the placekey, returning its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Placekey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Placekey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Placekey> for String {
    fn from(placekey: Placekey) -> Self {
        placekey.0
    }
}

impl FromStr for Placekey {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if crate::validate::is_well_formed(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(CodecError::Malformed(s.to_string()))
        }
    }
}

impl TryFrom<String> for Placekey {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Splits a placekey into its `what` and `where` parts.
///
/// Splits on the first `@`. Without an `@` the whole string is `where`; a
/// leading `@` means there is no `what`. The returned `where` never carries
/// the `@`.
pub fn parse_placekey(placekey: &str) -> (Option<&str>, &str) {
    match placekey.split_once('@') {
        Some(("", location)) => (None, location),
        Some((what, location)) => (Some(what), location),
        None => (None, placekey),
    }
}

/// Errors that can occur while encoding or decoding placekeys.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// Character outside the alphabet
    #[error("Invalid placekey character '{0}'")]
    InvalidCharacter(char),
    /// Encoded value is too large to be a shortened cell
    #[error("Placekey value out of range: {0}")]
    OutOfRange(String),
    /// Decoded index is not a cell the grid recognises
    #[error("Placekey decodes to an invalid cell: {0:#x}")]
    InvalidCell(u64),
    /// Text does not have the `[what@]where` structure
    #[error("Malformed placekey: '{0}'")]
    Malformed(String),
    /// Grid engine failure
    #[error(transparent)]
    Grid(#[from] GridError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_where_only() {
        assert_eq!(parse_placekey("@5vg-7gq-tvz"), (None, "5vg-7gq-tvz"));
    }

    #[test]
    fn test_parse_without_at() {
        assert_eq!(parse_placekey("5vg-7gq-tvz"), (None, "5vg-7gq-tvz"));
    }

    #[test]
    fn test_parse_what_and_where() {
        assert_eq!(
            parse_placekey("223-227@5vg-7gq-tvz"),
            (Some("223-227"), "5vg-7gq-tvz")
        );
    }

    #[test]
    fn test_parse_splits_on_first_at() {
        assert_eq!(parse_placekey("a@b@c"), (Some("a"), "b@c"));
    }

    #[test]
    fn test_from_str_checks_structure() {
        let placekey: Placekey = "223-227@5vg-7gq-tvz".parse().unwrap();
        assert_eq!(placekey.what(), Some("223-227"));
        assert_eq!(placekey.where_part(), "5vg-7gq-tvz");

        assert!("not a placekey".parse::<Placekey>().is_err());
        assert!("@5vg-7gq".parse::<Placekey>().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let placekey: Placekey = "@5vg-7gq-tvz".parse().unwrap();
        let json = serde_json::to_string(&placekey).unwrap();
        assert_eq!(json, "\"@5vg-7gq-tvz\"");

        let back: Placekey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, placekey);
        assert!(serde_json::from_str::<Placekey>("\"nope\"").is_err());
    }
}
