//! Placekey format validation and normalization.
//!
//! A placekey is valid when its `where` part has the `xxx-xxx-xxx` shape
//! *and* decodes to a cell the grid recognises, and its optional `what`
//! part is either one or two dash-joined groups of alphabet characters or
//! the legacy 10-character form (`0`/`1` flag followed by 9 symbols).
//!
//! Validation never fails loudly: every malformed input is simply `false`.

use crate::codec::{parse_placekey, PlacekeyCodec, ALPHABET, PADDING_CHAR, REPLACEMENT_CHARS};
use regex::Regex;
use std::sync::{Arc, OnceLock};

fn where_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // First group may carry padding; cleaned encodings may carry the
        // replacement characters anywhere.
        let first = format!("[{ALPHABET}{REPLACEMENT_CHARS}{PADDING_CHAR}]{{3}}");
        let rest = format!("[{ALPHABET}{REPLACEMENT_CHARS}]{{3}}");
        Regex::new(&format!("^{first}-{rest}-{rest}$")).unwrap()
    })
}

fn what_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(&format!("^[{ALPHABET}]{{3,}}(-[{ALPHABET}]{{3,}})?$")).unwrap()
    })
}

fn legacy_what_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(&format!("^[01][{ALPHABET}]{{9}}$")).unwrap())
}

/// Checks whether a `what` part has one of the accepted shapes.
pub fn what_is_valid(what: &str) -> bool {
    what_pattern().is_match(what) || legacy_what_pattern().is_match(what)
}

/// Structural check only; does not consult the grid.
pub(crate) fn is_well_formed(placekey: &str) -> bool {
    let (what, location) = parse_placekey(placekey);
    where_pattern().is_match(location) && what.map_or(true, what_is_valid)
}

/// Validates placekeys against both the format and the grid.
#[derive(Debug, Clone)]
pub struct Validator {
    codec: Arc<PlacekeyCodec>,
}

impl Validator {
    /// Creates a validator decoding with `codec`.
    pub fn new(codec: Arc<PlacekeyCodec>) -> Self {
        Self { codec }
    }

    /// Returns `true` if the placekey is well formed and addresses a real cell.
    ///
    /// Accepts `&str` or `Option<&str>`; `None` and `""` are invalid.
    ///
    /// # Example
    ///
    /// ```
    /// use placekey::codec::PlacekeyCodec;
    /// use placekey::validate::Validator;
    /// use std::sync::Arc;
    ///
    /// let validator = Validator::new(Arc::new(PlacekeyCodec::with_h3().unwrap()));
    /// assert!(validator.is_valid_format("@5vg-7gq-tvz"));
    /// assert!(!validator.is_valid_format(None));
    /// ```
    pub fn is_valid_format<'a>(&self, placekey: impl Into<Option<&'a str>>) -> bool {
        let Some(placekey) = placekey.into() else {
            return false;
        };

        let (what, location) = parse_placekey(placekey);
        if let Some(what) = what {
            if !what_is_valid(what) {
                return false;
            }
        }
        self.where_is_valid(location)
    }

    /// Returns `true` if a `where` part is well formed, decodes to a valid
    /// cell and is the canonical encoding of that cell.
    pub fn where_is_valid(&self, location: &str) -> bool {
        let location = location.trim_start_matches('@');
        if !where_pattern().is_match(location) {
            return false;
        }
        match self.codec.to_cell(location) {
            Ok(cell) => self.codec.encode_cell(cell).where_part() == location,
            Err(_) => false,
        }
    }
}

/// Repairs placekeys as commonly returned by the resolution API.
///
/// - a bare `where` gains its leading `@`
/// - a 3-digit `what` gains a trailing `-`
/// - a 6-digit `what` is split into two dash-joined groups
/// - any other undashed alphanumeric `what` (except the legacy form) is dropped
/// - everything else passes through unchanged
///
/// ```
/// use placekey::validate::normalize;
///
/// assert_eq!(normalize(Some("223227@5vg-82n-kzz")).as_deref(), Some("223-227@5vg-82n-kzz"));
/// assert_eq!(normalize(Some("23b@5vg-82n-kzz")).as_deref(), Some("@5vg-82n-kzz"));
/// assert_eq!(normalize(None), None);
/// ```
pub fn normalize(input: Option<&str>) -> Option<String> {
    let input = input?;

    if where_pattern().is_match(input) {
        return Some(format!("@{input}"));
    }

    let Some((prefix, location)) = input.split_once('@') else {
        return Some(input.to_string());
    };
    if !where_pattern().is_match(location) {
        return Some(input.to_string());
    }

    let numeric = !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_digit());
    let what = if prefix.is_empty() || legacy_what_pattern().is_match(prefix) {
        prefix.to_string()
    } else if numeric && prefix.len() == 3 {
        format!("{prefix}-")
    } else if numeric && prefix.len() == 6 {
        format!("{}-{}", &prefix[..3], &prefix[3..])
    } else if prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
        String::new()
    } else {
        return Some(input.to_string());
    };

    Some(format!("{what}@{location}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> Validator {
        Validator::new(Arc::new(PlacekeyCodec::with_h3().unwrap()))
    }

    #[test]
    fn test_valid_where_only() {
        assert!(validator().is_valid_format("@5vg-7gq-tvz"));
    }

    #[test]
    fn test_valid_with_what() {
        let v = validator();
        assert!(v.is_valid_format("223@5vg-7gq-tvz"));
        assert!(v.is_valid_format("223-227@5vg-7gq-tvz"));
        assert!(v.is_valid_format("zzw-222@5vg-7gq-tvz"));
    }

    #[test]
    fn test_valid_legacy_what() {
        assert!(validator().is_valid_format("1bcdfghjkm@5vg-7gq-tvz"));
        assert!(!validator().is_valid_format("1bcdfghjk@5vg-7gq-tvz"));
    }

    #[test]
    fn test_rejects_empty_and_none() {
        let v = validator();
        assert!(!v.is_valid_format(""));
        assert!(!v.is_valid_format(None));
    }

    #[test]
    fn test_rejects_wrong_group_lengths() {
        let v = validator();
        assert!(!v.is_valid_format("@5vg-7gq-tv"));
        assert!(!v.is_valid_format("@5vg7-gq-tvz"));
        assert!(!v.is_valid_format("@5vg-7gq"));
        assert!(!v.is_valid_format("22@5vg-7gq-tvz"));
    }

    #[test]
    fn test_rejects_characters_outside_alphabet() {
        let v = validator();
        assert!(!v.is_valid_format("@5vg-7gq-tv1"));
        assert!(!v.is_valid_format("@5VG-7GQ-TVZ"));
        assert!(!v.is_valid_format("@5vg-7aq-tvz"));
        assert!(!v.is_valid_format("2i3@5vg-7gq-tvz"));
    }

    #[test]
    fn test_rejects_well_formed_invalid_cell() {
        assert!(!validator().is_valid_format("@222-222-222"));
    }

    #[test]
    fn test_rejects_non_canonical_where() {
        let v = validator();
        // "sht" decodes like the cleaned "she" but never comes out of encode.
        assert!(v.is_valid_format("@qyq-she-xt9"));
        assert!(!v.is_valid_format("@qyq-sht-xt9"));
        assert!(!v.where_is_valid("qyq-sht-xt9"));
    }

    #[test]
    fn test_valid_placekeys_round_trip() {
        let codec = PlacekeyCodec::with_h3().unwrap();
        let v = validator();
        for text in ["@5vg-7gq-tvz", "@5vg-82n-kzz", "@qyq-she-xt9", "@qyq-sht-xt9"] {
            if v.is_valid_format(text) {
                let centre = codec.decode(text).unwrap();
                let again = codec.encode_point(centre).unwrap();
                assert_eq!(again.as_str(), text);
            }
        }
    }

    #[test]
    fn test_where_is_valid_without_at() {
        assert!(validator().where_is_valid("5vg-7gq-tvz"));
    }

    #[test]
    fn test_is_well_formed_ignores_grid() {
        assert!(is_well_formed("@222-222-222"));
        assert!(!is_well_formed("@aaa-aaa"));
    }

    #[test]
    fn test_normalize_table() {
        let cases = [
            (Some("@5vg-82n-kzz"), Some("@5vg-82n-kzz")),
            (Some("23b@5vg-82n-kzz"), Some("@5vg-82n-kzz")),
            (Some("223227@5vg-82n-kzz"), Some("223-227@5vg-82n-kzz")),
            (Some("223@5vg-82n-kzz"), Some("223-@5vg-82n-kzz")),
            (Some("5vg-82n-kzz"), Some("@5vg-82n-kzz")),
            (Some("invalid-format"), Some("invalid-format")),
            (None, None),
            (Some(""), Some("")),
        ];

        for (input, expected) in cases {
            assert_eq!(
                normalize(input).as_deref(),
                expected,
                "normalize({:?})",
                input
            );
        }
    }

    #[test]
    fn test_normalize_keeps_dashed_what() {
        assert_eq!(
            normalize(Some("223-227@5vg-82n-kzz")).as_deref(),
            Some("223-227@5vg-82n-kzz")
        );
    }

    #[test]
    fn test_normalize_keeps_legacy_what() {
        assert_eq!(
            normalize(Some("1bcdfghjkm@5vg-82n-kzz")).as_deref(),
            Some("1bcdfghjkm@5vg-82n-kzz")
        );
    }
}
