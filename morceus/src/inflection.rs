//! Grammatical categories of Latin inflection and their compact representation.
//!
//! Inflection tables and stem files describe grammatical data with Morpheus
//! tags (e.g. `nom/voc sg`, `pres imperat act 2nd pl`). These are converted
//! into [`WordInflectionData`], a packed 32-bit value, plus free-form tags
//! kept in an [`InflectionContext`].
mod upos;

use std::fmt;

use bincode::{Decode, Encode};

use crate::errors::{MorceusError, Result};

pub use upos::convert_upos;

macro_rules! latin_category {
    (
        $(#[$meta:meta])*
        $name:ident { $( $variant:ident = $value:tt => $tag:literal, )* }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u8)]
        pub enum $name {
            $(
                #[allow(missing_docs)]
                $variant = $value,
            )*
        }

        impl $name {
            /// All values in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            #[inline(always)]
            const fn value(self) -> u32 {
                self as u32
            }

            #[allow(dead_code)]
            fn from_value(value: u32) -> Option<Self> {
                match value {
                    $($value => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Gets the Morpheus tag of the value.
            pub const fn tag(self) -> &'static str {
                match self {
                    $(Self::$variant => $tag,)*
                }
            }

            /// Parses a Morpheus tag.
            pub fn from_tag(tag: &str) -> Option<Self> {
                match tag {
                    $($tag => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

latin_category! {
    /// Grammatical case.
    LatinCase {
        Nominative = 1 => "nom",
        Accusative = 2 => "acc",
        Dative = 3 => "dat",
        Genitive = 4 => "gen",
        Ablative = 5 => "abl",
        Vocative = 6 => "voc",
        Locative = 7 => "loc",
    }
}

latin_category! {
    /// Grammatical number.
    LatinNumber {
        Singular = 1 => "sg",
        Plural = 2 => "pl",
    }
}

latin_category! {
    /// Grammatical gender.
    LatinGender {
        Masculine = 1 => "masc",
        Feminine = 2 => "fem",
        Neuter = 3 => "neut",
        Adverbial = 4 => "adverbial",
    }
}

latin_category! {
    /// Grammatical person.
    LatinPerson {
        First = 1 => "1st",
        Second = 2 => "2nd",
        Third = 3 => "3rd",
    }
}

latin_category! {
    /// Verbal mood, including the non-finite forms.
    LatinMood {
        Indicative = 1 => "ind",
        Imperative = 2 => "imperat",
        Subjunctive = 3 => "subj",
        Participle = 4 => "part",
        Gerundive = 5 => "gerundive",
        Infinitive = 6 => "inf",
        Supine = 7 => "supine",
    }
}

latin_category! {
    /// Verbal voice.
    LatinVoice {
        Active = 1 => "act",
        Passive = 2 => "pass",
    }
}

latin_category! {
    /// Verbal tense.
    LatinTense {
        Present = 1 => "pres",
        Imperfect = 2 => "imperf",
        Perfect = 3 => "perf",
        FuturePerfect = 4 => "futperf",
        Future = 5 => "fut",
        Pluperfect = 6 => "plupf",
    }
}

latin_category! {
    /// Degree of comparison.
    LatinDegree {
        Positive = 1 => "pos",
        Comparative = 2 => "comp",
        Superlative = 3 => "superl",
    }
}

#[derive(Clone, Copy)]
struct Field {
    shift: u32,
    mask: u32,
}

const TWO_BITS: u32 = 0b11;
const THREE_BITS: u32 = 0b111;
const BYTE_MASK: u32 = 0xff;

const NUMBER: Field = Field { shift: 0, mask: TWO_BITS };
const PERSON: Field = Field { shift: 2, mask: TWO_BITS };
const VOICE: Field = Field { shift: 4, mask: TWO_BITS };
const DEGREE: Field = Field { shift: 6, mask: TWO_BITS };
const TENSE: Field = Field { shift: 8, mask: THREE_BITS };
const MOOD: Field = Field { shift: 11, mask: THREE_BITS };
const CASES: Field = Field { shift: 16, mask: BYTE_MASK };
const GENDERS: Field = Field { shift: 24, mask: BYTE_MASK };

const SINGLE_FIELDS: [Field; 6] = [NUMBER, PERSON, VOICE, DEGREE, TENSE, MOOD];

/// Grammatical data of a word, ending, or stem, packed into 32 bits.
///
/// Layout:
///  - bits 0-1: number, 2-3: person, 4-5: voice, 6-7: degree,
///  - bits 8-10: tense, 11-13: mood,
///  - bits 16-23: a bitset of cases, 24-31: a bitset of genders.
///
/// A zero field means "not present". Case and gender are bitsets because a
/// single ending can serve several of them (e.g. `nom/voc`); every other
/// category holds at most one value.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Decode, Encode)]
pub struct WordInflectionData(u32);

impl WordInflectionData {
    /// Data with no category set.
    pub const EMPTY: Self = Self(0);

    /// Checks if no category is set.
    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    const fn get(self, field: Field) -> u32 {
        (self.0 >> field.shift) & field.mask
    }

    #[inline(always)]
    const fn set(self, field: Field, value: u32) -> Self {
        Self((self.0 & !(field.mask << field.shift)) | ((value & field.mask) << field.shift))
    }

    /// Gets the number.
    pub fn number(self) -> Option<LatinNumber> {
        LatinNumber::from_value(self.get(NUMBER))
    }

    /// Gets the person.
    pub fn person(self) -> Option<LatinPerson> {
        LatinPerson::from_value(self.get(PERSON))
    }

    /// Gets the voice.
    pub fn voice(self) -> Option<LatinVoice> {
        LatinVoice::from_value(self.get(VOICE))
    }

    /// Gets the degree.
    pub fn degree(self) -> Option<LatinDegree> {
        LatinDegree::from_value(self.get(DEGREE))
    }

    /// Gets the tense.
    pub fn tense(self) -> Option<LatinTense> {
        LatinTense::from_value(self.get(TENSE))
    }

    /// Gets the mood.
    pub fn mood(self) -> Option<LatinMood> {
        LatinMood::from_value(self.get(MOOD))
    }

    /// Gets an iterator over the cases set, in enum order.
    pub fn cases(self) -> impl Iterator<Item = LatinCase> {
        let bits = self.get(CASES);
        LatinCase::ALL
            .iter()
            .copied()
            .filter(move |c| bits & (1 << c.value()) != 0)
    }

    /// Gets an iterator over the genders set, in enum order.
    pub fn genders(self) -> impl Iterator<Item = LatinGender> {
        let bits = self.get(GENDERS);
        LatinGender::ALL
            .iter()
            .copied()
            .filter(move |g| bits & (1 << g.value()) != 0)
    }

    /// Checks if the given case is set.
    pub fn has_case(self, case: LatinCase) -> bool {
        self.get(CASES) & (1 << case.value()) != 0
    }

    /// Checks if the given gender is set.
    pub fn has_gender(self, gender: LatinGender) -> bool {
        self.get(GENDERS) & (1 << gender.value()) != 0
    }

    /// Adds a case to the case set.
    pub const fn with_case(self, case: LatinCase) -> Self {
        self.set(CASES, self.get(CASES) | (1 << case.value()))
    }

    /// Adds a gender to the gender set.
    pub const fn with_gender(self, gender: LatinGender) -> Self {
        self.set(GENDERS, self.get(GENDERS) | (1 << gender.value()))
    }

    /// Sets the number, replacing any previous value.
    pub const fn with_number(self, number: LatinNumber) -> Self {
        self.set(NUMBER, number.value())
    }

    /// Sets the person, replacing any previous value.
    pub const fn with_person(self, person: LatinPerson) -> Self {
        self.set(PERSON, person.value())
    }

    /// Sets the voice, replacing any previous value.
    pub const fn with_voice(self, voice: LatinVoice) -> Self {
        self.set(VOICE, voice.value())
    }

    /// Sets the degree, replacing any previous value.
    pub const fn with_degree(self, degree: LatinDegree) -> Self {
        self.set(DEGREE, degree.value())
    }

    /// Sets the tense, replacing any previous value.
    pub const fn with_tense(self, tense: LatinTense) -> Self {
        self.set(TENSE, tense.value())
    }

    /// Sets the mood, replacing any previous value.
    pub const fn with_mood(self, mood: LatinMood) -> Self {
        self.set(MOOD, mood.value())
    }

    /// Merges two sets of data, as done when one template invokes another.
    ///
    /// Single-valued categories must agree when both are present, and the
    /// case and gender sets are intersected when both are present. Returns
    /// `None` if the two are incompatible.
    pub fn merge(self, other: Self) -> Option<Self> {
        let mut merged = Self::EMPTY;
        for field in SINGLE_FIELDS {
            let (a, b) = (self.get(field), other.get(field));
            let value = match (a, b) {
                (0, v) | (v, 0) => v,
                (a, b) if a == b => a,
                _ => return None,
            };
            merged = merged.set(field, value);
        }
        for field in [CASES, GENDERS] {
            let (a, b) = (self.get(field), other.get(field));
            let bits = match (a, b) {
                (0, v) | (v, 0) => v,
                (a, b) if a & b != 0 => a & b,
                _ => return None,
            };
            merged = merged.set(field, bits);
        }
        Some(merged)
    }

    pub(crate) const fn case_bits(self) -> u32 {
        self.get(CASES)
    }

    pub(crate) const fn gender_bits(self) -> u32 {
        self.get(GENDERS)
    }

    pub(crate) const fn with_case_bits(self, bits: u32) -> Self {
        self.set(CASES, bits)
    }

    pub(crate) const fn with_gender_bits(self, bits: u32) -> Self {
        self.set(GENDERS, bits)
    }

    /// Gets the Morpheus tags for the data, in canonical order.
    pub fn to_tags(self) -> Vec<String> {
        let mut tags = vec![];
        if let Some(tense) = self.tense() {
            tags.push(tense.tag().to_string());
        }
        if let Some(mood) = self.mood() {
            tags.push(mood.tag().to_string());
        }
        if let Some(voice) = self.voice() {
            tags.push(voice.tag().to_string());
        }
        if let Some(person) = self.person() {
            tags.push(person.tag().to_string());
        }
        let genders: Vec<_> = self.genders().map(LatinGender::tag).collect();
        if !genders.is_empty() {
            tags.push(genders.join("/"));
        }
        let cases: Vec<_> = self.cases().map(LatinCase::tag).collect();
        if !cases.is_empty() {
            tags.push(cases.join("/"));
        }
        if let Some(number) = self.number() {
            tags.push(number.tag().to_string());
        }
        if let Some(degree) = self.degree() {
            tags.push(degree.tag().to_string());
        }
        tags
    }
}

impl fmt::Display for WordInflectionData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_tags().join(" "))
    }
}

impl fmt::Debug for WordInflectionData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "WordInflectionData({:?})", self.to_string())
    }
}

/// Tags that are bookkeeping for the analyzer rather than usage notes.
const INTERNAL_TAGS: &[&str] = &[
    "adverb",
    "comp_only",
    "conj",
    "demonstr",
    "dep",
    "exclam",
    "indecl",
    "indef",
    "interrog",
    "numeral",
    "particle",
    "prep",
    "pron1",
    "pron2",
    "pron3",
    "rel_pron",
];

fn is_internal_tag(tag: &str) -> bool {
    tag.starts_with("irreg_") || tag.starts_with("no_") || INTERNAL_TAGS.contains(&tag)
}

/// Grammatical data together with the tags attached to a stem or ending.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Decode, Encode)]
pub struct InflectionContext {
    /// The grammatical categories.
    pub grammatical_data: WordInflectionData,

    /// Usage notes, such as `poetic` or `archaic`.
    pub tags: Vec<String>,

    /// Tags used to restrict matching, such as `no_comp` or `irreg_pp1`.
    pub internal_tags: Vec<String>,
}

impl InflectionContext {
    /// Parses Morpheus tags, reporting errors against `source`.
    pub(crate) fn parse_tags<S>(tokens: &[S], source: &str) -> Result<Self>
    where
        S: AsRef<str>,
    {
        let mut context = Self::default();
        for token in tokens {
            let token = token.as_ref().trim();
            if token.is_empty() {
                continue;
            }
            context.add_tag(token, source)?;
        }
        Ok(context)
    }

    fn add_tag(&mut self, token: &str, source: &str) -> Result<()> {
        let data = self.grammatical_data;
        if token.contains('/') {
            let parts: Vec<_> = token.split('/').collect();
            if let Some(cases) = parts
                .iter()
                .map(|p| LatinCase::from_tag(p))
                .collect::<Option<Vec<_>>>()
            {
                self.grammatical_data = cases.into_iter().fold(data, |d, c| d.with_case(c));
                return Ok(());
            }
            if let Some(genders) = parts
                .iter()
                .map(|p| LatinGender::from_tag(p))
                .collect::<Option<Vec<_>>>()
            {
                self.grammatical_data = genders.into_iter().fold(data, |d, g| d.with_gender(g));
                return Ok(());
            }
            let msg = format!("Unrecognized combined tag {:?}", token);
            return Err(MorceusError::invalid_format(source, msg));
        }

        let updated = if let Some(c) = LatinCase::from_tag(token) {
            Some(data.with_case(c))
        } else if let Some(g) = LatinGender::from_tag(token) {
            Some(data.with_gender(g))
        } else if let Some(n) = LatinNumber::from_tag(token) {
            Some(check_single(data, data.number(), n, token, source)?.with_number(n))
        } else if let Some(p) = LatinPerson::from_tag(token) {
            Some(check_single(data, data.person(), p, token, source)?.with_person(p))
        } else if let Some(v) = LatinVoice::from_tag(token) {
            Some(check_single(data, data.voice(), v, token, source)?.with_voice(v))
        } else if let Some(m) = LatinMood::from_tag(token) {
            Some(check_single(data, data.mood(), m, token, source)?.with_mood(m))
        } else if let Some(t) = LatinTense::from_tag(token) {
            Some(check_single(data, data.tense(), t, token, source)?.with_tense(t))
        } else if let Some(d) = LatinDegree::from_tag(token) {
            Some(check_single(data, data.degree(), d, token, source)?.with_degree(d))
        } else {
            None
        };

        match updated {
            Some(updated) => self.grammatical_data = updated,
            None => {
                let target = if is_internal_tag(token) {
                    &mut self.internal_tags
                } else {
                    &mut self.tags
                };
                if !target.iter().any(|t| t == token) {
                    target.push(token.to_string());
                }
            }
        }
        Ok(())
    }
}

fn check_single<T>(
    data: WordInflectionData,
    current: Option<T>,
    value: T,
    token: &str,
    source: &str,
) -> Result<WordInflectionData>
where
    T: PartialEq + Copy,
{
    match current {
        Some(current) if current != value => Err(MorceusError::invalid_format(
            source,
            format!("Tag {:?} conflicts with an earlier tag of the same category", token),
        )),
        _ => Ok(data),
    }
}

/// Converts Morpheus tags (e.g. `["nom/voc", "sg", "poetic"]`) into an
/// [`InflectionContext`].
///
/// # Errors
///
/// [`MorceusError`] is returned when a combined tag is not made of cases or
/// genders, or when two tags give different values for one category.
pub fn to_inflection_data<S>(tokens: &[S]) -> Result<InflectionContext>
where
    S: AsRef<str>,
{
    InflectionContext::parse_tags(tokens, "tags")
}

impl fmt::Display for InflectionContext {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts: Vec<String> = self
            .grammatical_data
            .to_tags()
            .into_iter()
            .chain(self.tags.iter().cloned())
            .chain(self.internal_tags.iter().cloned())
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}
