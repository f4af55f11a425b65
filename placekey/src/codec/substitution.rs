//! Profanity-avoiding substitutions.
//!
//! Base encoded cells can spell objectionable words. After encoding, each
//! sequence on the left is replaced by the one on the right, in order;
//! decoding undoes the replacements in reverse order. The replacement
//! characters (`e`, `u`) are outside the alphabet, so the mapping is
//! unambiguous.

/// Ordered `(dirty, clean)` pairs. Part of the wire format.
pub(crate) const REPLACEMENT_MAP: [(&str, &str); 13] = [
    ("prn", "pre"),
    ("f4nny", "f4nne"),
    ("tw4t", "tw4e"),
    ("ngr", "ngu"),
    ("dck", "dce"),
    ("vjn", "vju"),
    ("fck", "fce"),
    ("pns", "pne"),
    ("sht", "she"),
    ("kkk", "kke"),
    ("fgt", "fgu"),
    ("dyk", "dye"),
    ("bch", "bce"),
];

/// Applies the substitutions in the encoding direction.
pub(crate) fn clean(encoded: &str) -> String {
    REPLACEMENT_MAP
        .iter()
        .fold(encoded.to_string(), |s, (dirty, clean)| {
            s.replace(dirty, clean)
        })
}

/// Reverses [`clean`].
pub(crate) fn dirty(cleaned: &str) -> String {
    REPLACEMENT_MAP
        .iter()
        .rev()
        .fold(cleaned.to_string(), |s, (dirty, clean)| {
            s.replace(clean, dirty)
        })
}
