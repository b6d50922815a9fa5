//! Input normalization and vowel length comparison.
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::common::{LONG_MARKER, SHORT_MARKER};

const COMBINING_MACRON: char = '\u{0304}';
const COMBINING_BREVE: char = '\u{0306}';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Length {
    Unmarked,
    Long,
    Short,
}

/// A word reduced to ASCII letters, with the vowel length marked on each.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct InputWord {
    pub letters: String,
    pub lengths: Vec<Length>,
}

impl InputWord {
    /// Normalizes a raw word. Returns `None` if the word is empty or has
    /// anything other than letters and diacritics.
    pub fn new(word: &str) -> Option<Self> {
        let mut letters = String::with_capacity(word.len());
        let mut lengths = Vec::with_capacity(word.len());
        for c in word.nfd() {
            if c.is_ascii_alphabetic() {
                letters.push(c);
                lengths.push(Length::Unmarked);
                continue;
            }
            let length = match c {
                COMBINING_MACRON => Length::Long,
                COMBINING_BREVE => Length::Short,
                c if is_combining_mark(c) => continue,
                _ => return None,
            };
            *lengths.last_mut()? = length;
        }
        if letters.is_empty() {
            return None;
        }
        Some(Self { letters, lengths })
    }
}

fn form_lengths(form: &str) -> Vec<Length> {
    let mut lengths = vec![];
    for c in form.chars() {
        match c {
            LONG_MARKER => {
                if let Some(last) = lengths.last_mut() {
                    *last = Length::Long;
                }
            }
            SHORT_MARKER => {
                if let Some(last) = lengths.last_mut() {
                    *last = Length::Short;
                }
            }
            c if c.is_alphabetic() => lengths.push(Length::Unmarked),
            _ => {}
        }
    }
    lengths
}

/// Checks if the vowel lengths of `input` agree with a Morpheus `form`:
/// every long vowel of the form is marked long in the input, and every
/// vowel marked long in the input is long in the form.
///
/// The form may be shorter than the input (when an enclitic follows).
pub(crate) fn lengths_agree(form: &str, input: &[Length]) -> bool {
    form_lengths(form)
        .into_iter()
        .zip(input.iter().copied().chain(std::iter::repeat(Length::Unmarked)))
        .all(|(expected, observed)| {
            (expected == Length::Long) == (observed == Length::Long)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_plain() {
        let word = InputWord::new("cavete").unwrap();
        assert_eq!(word.letters, "cavete");
        assert!(word.lengths.iter().all(|&l| l == Length::Unmarked));
    }

    #[test]
    fn test_input_marked() {
        let word = InputWord::new("cavēte").unwrap();
        assert_eq!(word.letters, "cavete");
        assert_eq!(word.lengths[3], Length::Long);

        let word = InputWord::new("cavĕ").unwrap();
        assert_eq!(word.letters, "cave");
        assert_eq!(word.lengths[3], Length::Short);

        let word = InputWord::new("Aenēäs").unwrap();
        assert_eq!(word.letters, "Aeneas");
    }

    #[test]
    fn test_input_rejected() {
        assert_eq!(InputWord::new(""), None);
        assert_eq!(InputWord::new("arma1"), None);
        assert_eq!(InputWord::new("arma-"), None);
        assert_eq!(InputWord::new("\u{0304}a"), None);
    }

    #[test]
    fn test_lengths_agree() {
        let plain = InputWord::new("cavete").unwrap();
        let marked = InputWord::new("cavēte").unwrap();
        let wrong = InputWord::new("cāvete").unwrap();
        assert!(!lengths_agree("ca^ve_te", &plain.lengths));
        assert!(lengths_agree("ca^ve_te", &marked.lengths));
        assert!(!lengths_agree("ca^ve_te", &wrong.lengths));
        assert!(lengths_agree("ca^ve^", &InputWord::new("cave").unwrap().lengths));
        assert!(lengths_agree("ac-cla_m", &InputWord::new("acclām").unwrap().lengths));
    }

    #[test]
    fn test_lengths_agree_with_enclitic() {
        let input = InputWord::new("vi_rumque".replace('_', "\u{0304}").as_str()).unwrap();
        assert!(lengths_agree("vi_rum", &input.lengths));
    }
}
