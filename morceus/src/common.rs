//! Common settings and text helpers shared by the table builders and the cruncher.
use bincode::config::{self, Fixint, LittleEndian};

/// Marker for a long vowel in Morpheus notation, e.g. `a_` for `ā`.
pub const LONG_MARKER: char = '_';

/// Marker for a short vowel in Morpheus notation, e.g. `e^` for `ĕ`.
pub const SHORT_MARKER: char = '^';

/// Placeholder used by tables and the ending index for an empty ending.
pub const EMPTY_ENDING: &str = "*";

/// Gets the bincode configuration used for every serialized table.
pub fn bincode_config() -> config::Configuration<LittleEndian, Fixint> {
    config::standard()
        .with_little_endian()
        .with_fixed_int_encoding()
}

/// Removes vowel length markers (`^` and `_`) from an ending or stem.
pub fn strip_length_markers(input: &str) -> String {
    input
        .chars()
        .filter(|&c| c != LONG_MARKER && c != SHORT_MARKER)
        .collect()
}

/// Removes every Morpheus annotation from a stem so that it can be used as a
/// lookup key: vowel lengths, preverb separators (`-`), and diaereses (`+`).
pub fn clean_stem_key(input: &str) -> String {
    input
        .chars()
        .filter(|&c| !matches!(c, LONG_MARKER | SHORT_MARKER | '-' | '+'))
        .collect()
}
