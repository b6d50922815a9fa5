//! Lemmata and the stems and irregular forms they own.
mod parser;
mod rewriter;

use std::fmt;

use bincode::{Decode, Encode};

use crate::inflection::InflectionContext;

pub use parser::{all_stems, parse_noun_stem_file, parse_stem_source, parse_verb_stem_file};
pub use rewriter::rewrite_regular_lemmata;

/// Code at the start of a stem line, e.g. `no` in `:no:vit a_ae fem`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Decode, Encode)]
pub enum StemCode {
    /// `no`: a noun stem.
    Noun,

    /// `aj`: an adjective stem.
    Adjective,

    /// `vs`: a verb stem.
    VerbStem,

    /// `de`: a verb stem of a derived (compound) verb.
    Derived,

    /// `vb`: an irregular verb form.
    VerbForm,

    /// `wd`: an irregular word form.
    Word,
}

impl StemCode {
    /// Gets the two-letter code.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Noun => "no",
            Self::Adjective => "aj",
            Self::VerbStem => "vs",
            Self::Derived => "de",
            Self::VerbForm => "vb",
            Self::Word => "wd",
        }
    }

    /// Parses a two-letter code.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "no" => Some(Self::Noun),
            "aj" => Some(Self::Adjective),
            "vs" => Some(Self::VerbStem),
            "de" => Some(Self::Derived),
            "vb" => Some(Self::VerbForm),
            "wd" => Some(Self::Word),
            _ => None,
        }
    }

    /// Checks if the code introduces a complete form rather than a stem.
    pub const fn is_irregular(self) -> bool {
        matches!(self, Self::VerbForm | Self::Word)
    }
}

/// A stem that combines with the endings of an inflection table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Decode, Encode)]
pub struct Stem {
    /// The stem in Morpheus notation, e.g. `A^chill`.
    pub stem: String,

    /// The code of the stem. `None` for stems written `stem@template`, which
    /// are merged with endings by intersection.
    pub code: Option<StemCode>,

    /// Name of the inflection table.
    pub inflection: String,

    /// Restrictions and tags of the stem.
    pub context: InflectionContext,
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, ":{}:{} {}", code.tag(), self.stem, self.inflection)?,
            None => write!(f, "{}@{}", self.stem, self.inflection)?,
        }
        write_context(f, &self.context)
    }
}

/// A complete surface form that needs no ending.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Decode, Encode)]
pub struct IrregularForm {
    /// The form in Morpheus notation, e.g. `ca^ve^`.
    pub form: String,

    /// The code of the form. `None` for bare form lines.
    pub code: Option<StemCode>,

    /// Grammatical data and tags of the form.
    pub context: InflectionContext,
}

impl fmt::Display for IrregularForm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, ":{}:{}", code.tag(), self.form)?,
            None => write!(f, "{}", self.form)?,
        }
        write_context(f, &self.context)
    }
}

fn write_context(f: &mut fmt::Formatter, context: &InflectionContext) -> fmt::Result {
    let context = context.to_string();
    if context.is_empty() {
        Ok(())
    } else {
        write!(f, " {}", context)
    }
}

/// Where a lemma was read from.
#[derive(Clone, Debug, PartialEq, Eq, Decode, Encode)]
pub struct SourceData {
    /// The stem file.
    pub file_name: String,

    /// Index of the `:le:` line.
    pub start_line: usize,

    /// Index one past the last line of the lemma.
    pub end_line: usize,

    /// Position of the lemma in its file.
    pub index: usize,
}

/// A dictionary headword and everything it can inflect from.
#[derive(Clone, Debug, PartialEq, Eq, Decode, Encode)]
pub struct Lemma {
    /// The headword.
    pub lemma: String,

    /// Regular stems.
    pub stems: Vec<Stem>,

    /// Irregular forms.
    pub irregular_forms: Vec<IrregularForm>,

    /// Whether the lemma comes from a verb stem file.
    pub is_verb: bool,

    /// Where the lemma was parsed from, if it came from a file.
    pub source: Option<SourceData>,
}

impl Lemma {
    /// Compares everything except the source data.
    pub fn content_eq(&self, other: &Self) -> bool {
        self.lemma == other.lemma
            && self.stems == other.stems
            && self.irregular_forms == other.irregular_forms
            && self.is_verb == other.is_verb
    }

    /// Renders the lemma as stem file lines: the `:le:` line, then the stems,
    /// then the irregular forms.
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(":le:{}", self.lemma)];
        lines.extend(self.stems.iter().map(Stem::to_string));
        lines.extend(self.irregular_forms.iter().map(IrregularForm::to_string));
        lines
    }
}
