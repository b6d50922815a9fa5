//! Spellings with consonantal `i` and `u` written as `j` and `v`.
use crate::cruncher::word::Length;

/// At most this many ambiguous letters are toggled, bounding the number of
/// alternates to `2^MAX_AMBIGUOUS - 1`.
const MAX_AMBIGUOUS: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Alternate {
    pub word: String,
    pub swapped_i: bool,
    pub swapped_u: bool,
}

const fn is_vowel(c: u8) -> bool {
    matches!(c.to_ascii_lowercase(), b'a' | b'e' | b'i' | b'o' | b'u' | b'y')
}

/// Finds the letters that may be a consonantal `i` or `u`: those next to a
/// vowel, except `u` after `q` and vowels marked for length.
///
/// A word that already has `j` is taken to use `i` only as a vowel, and
/// likewise for a lowercase `v` and `u`. Capital `V` does not count since it
/// is also written for `U`.
fn find_ambiguous(word: &[u8], lengths: &[Length], try_i: bool, try_u: bool) -> Vec<usize> {
    let mark_i = try_i && !word.iter().any(|c| c.eq_ignore_ascii_case(&b'j'));
    let mark_u = try_u && !word.contains(&b'v');
    if !mark_i && !mark_u {
        return vec![];
    }

    let mut result = vec![];
    for (i, &c) in word.iter().enumerate() {
        if lengths.get(i).map_or(false, |&l| l != Length::Unmarked) {
            continue;
        }
        let after_vowel = i >= 1 && is_vowel(word[i - 1]);
        let before_vowel = i + 1 < word.len() && is_vowel(word[i + 1]);
        if !after_vowel && !before_vowel {
            continue;
        }
        let not_after_q = i == 0 || !word[i - 1].eq_ignore_ascii_case(&b'q');
        match c.to_ascii_lowercase() {
            b'i' if mark_i => result.push(i),
            b'u' if mark_u && not_after_q => result.push(i),
            _ => {}
        }
        if result.len() == MAX_AMBIGUOUS {
            break;
        }
    }
    result
}

/// Generates every other spelling of an ASCII `word` in which some ambiguous
/// `i`/`u` are written `j`/`v`. The word itself is not included.
pub(crate) fn alternates_with_i_or_u(
    word: &str,
    lengths: &[Length],
    try_i: bool,
    try_u: bool,
) -> Vec<Alternate> {
    let bytes = word.as_bytes();
    let ambiguous = find_ambiguous(bytes, lengths, try_i, try_u);
    let mut results = vec![];
    for mask in 1..(1_u32 << ambiguous.len()) {
        let mut modified = bytes.to_vec();
        let mut swapped_i = false;
        let mut swapped_u = false;
        for (bit, &idx) in ambiguous.iter().enumerate() {
            if mask & (1 << bit) == 0 {
                continue;
            }
            modified[idx] = match bytes[idx] {
                b'i' => b'j',
                b'I' => b'J',
                b'u' => b'v',
                b'U' => b'V',
                c => c,
            };
            swapped_i |= bytes[idx].eq_ignore_ascii_case(&b'i');
            swapped_u |= bytes[idx].eq_ignore_ascii_case(&b'u');
        }
        // Only ASCII letters were replaced with ASCII letters.
        if let Ok(word) = String::from_utf8(modified) {
            results.push(Alternate {
                word,
                swapped_i,
                swapped_u,
            });
        }
    }
    results
}
