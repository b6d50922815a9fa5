//! Analyzer of inflected Latin words.
//!
//! # Examples
//!
//! ```
//! use morceus::cruncher::{CruncherOptions, MorceusCruncher};
//! use morceus::inflection::to_inflection_data;
//! use morceus::stems::{Lemma, Stem, StemCode};
//! use morceus::tables::{make_end_index, IndexMode, InflectionEnding, InflectionTable};
//!
//! let table = InflectionTable {
//!     name: "us_i".to_string(),
//!     endings: vec![InflectionEnding::new("o_", to_inflection_data(&["abl", "sg"]).unwrap())],
//! };
//! let ends = make_end_index(&[table], IndexMode::All).unwrap();
//! let lemma = Lemma {
//!     lemma: "morcus".to_string(),
//!     stems: vec![Stem {
//!         stem: "morc".to_string(),
//!         code: Some(StemCode::Noun),
//!         inflection: "us_i".to_string(),
//!         context: to_inflection_data(&["masc"]).unwrap(),
//!     }],
//!     irregular_forms: vec![],
//!     is_verb: false,
//!     source: None,
//! };
//!
//! let cruncher = MorceusCruncher::make(ends, vec![lemma]);
//! let analyses = cruncher.crunch("morco", &CruncherOptions::default());
//! assert_eq!(analyses.len(), 1);
//! assert_eq!(analyses[0].lemma, "morcus");
//! assert_eq!(analyses[0].inflected_forms[0].form, "morco_");
//! assert_eq!(
//!     analyses[0].inflected_forms[0].inflection_data[0].context.to_string(),
//!     "masc abl sg"
//! );
//! ```
mod alternates;
mod merge;
mod tables;
mod word;

use std::sync::Arc;

use crate::common::EMPTY_ENDING;
use crate::inflection::InflectionContext;
use crate::stems::{Lemma, Stem};
use crate::tables::{EndsResult, InflectionEnding};

use alternates::alternates_with_i_or_u;
use merge::merge_stem_and_ending;
use word::{lengths_agree, InputWord, Length};

pub use tables::{CruncherTables, MODEL_MAGIC};

const ENCLITICS: [&str; 3] = ["que", "ne", "ve"];

/// How vowel lengths marked in the input are compared with the analyses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VowelLength {
    /// Long vowels of a form must be macronized in the input, and macronized
    /// vowels of the input must be long in the form.
    Strict,

    /// Any marking is accepted. Analyses whose lengths disagree with a marked
    /// input are flagged.
    #[default]
    Relaxed,
}

/// Options of a single analysis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CruncherOptions {
    /// Vowel length comparison.
    pub vowel_length: VowelLength,

    /// Also tries the word with the case of its first letter flipped.
    pub relax_case: bool,

    /// Also tries `u` written as `v`.
    pub relax_u_and_v: bool,

    /// Also tries `i` written as `j`.
    pub relax_i_and_j: bool,

    /// Also tries the word with a trailing `que`, `ne` or `ve` removed.
    pub handle_enclitics: bool,
}

impl Default for CruncherOptions {
    fn default() -> Self {
        Self {
            vowel_length: VowelLength::Relaxed,
            relax_case: true,
            relax_u_and_v: true,
            relax_i_and_j: true,
            handle_enclitics: false,
        }
    }
}

/// A single analysis of a word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrunchResult {
    /// The lemma.
    pub lemma: String,

    /// The matched form in Morpheus notation, without any enclitic.
    pub form: String,

    /// The stem, or `None` for an irregular form.
    pub stem: Option<Stem>,

    /// The ending, or `None` for an irregular form.
    pub end: Option<InflectionEnding>,

    /// Merged grammatical data and tags.
    pub context: InflectionContext,

    /// Whether the lemma comes from a verb stem file.
    pub is_verb: bool,

    /// The case of the first letter had to be changed.
    pub relaxed_case: bool,

    /// The vowel lengths marked in the input disagree with the form.
    pub relaxed_vowel_lengths: bool,

    /// Some `u` of the input had to be read as `v`.
    pub relaxed_u_and_v: bool,

    /// Some `i` of the input had to be read as `j`.
    pub relaxed_i_and_j: bool,

    /// The enclitic removed from the input.
    pub enclitic: Option<String>,
}

impl CrunchResult {
    fn relaxations(&self) -> usize {
        [
            self.relaxed_case,
            self.relaxed_vowel_lengths,
            self.relaxed_u_and_v,
            self.relaxed_i_and_j,
        ]
        .into_iter()
        .filter(|&r| r)
        .count()
    }

    fn same_analysis(&self, other: &Self) -> bool {
        self.lemma == other.lemma
            && self.form == other.form
            && self.stem == other.stem
            && self.end == other.end
            && self.context == other.context
            && self.enclitic == other.enclitic
    }
}

/// A surface form of a lemma with all of its analyses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InflectedForm {
    /// The form in Morpheus notation.
    pub form: String,

    /// The analyses producing the form.
    pub inflection_data: Vec<CrunchResult>,
}

/// The analyses of a word grouped by lemma.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LatinWordAnalysis {
    /// The lemma.
    pub lemma: String,

    /// The forms of the lemma matching the word.
    pub inflected_forms: Vec<InflectedForm>,
}

/// A spelling of the input to be matched, with the relaxations that led to it.
struct Spelling {
    word: String,
    relaxed_case: bool,
    relaxed_u_and_v: bool,
    relaxed_i_and_j: bool,
}

/// Analyzer over shared [`CruncherTables`].
#[derive(Clone)]
pub struct MorceusCruncher {
    tables: Arc<CruncherTables>,
}

impl MorceusCruncher {
    /// Creates a new instance.
    pub const fn new(tables: Arc<CruncherTables>) -> Self {
        Self { tables }
    }

    /// Creates an instance owning new tables built from an ending index and
    /// lemmata.
    pub fn make(ends: EndsResult, lemmata: Vec<Lemma>) -> Self {
        Self::new(Arc::new(CruncherTables::new(ends, lemmata)))
    }

    /// Gets the tables.
    pub fn tables(&self) -> &CruncherTables {
        &self.tables
    }

    /// Analyzes a word and returns every match, including duplicates found
    /// through different relaxations.
    ///
    /// The word may carry combining or precomposed macrons and breves. A word
    /// with anything other than Latin letters has no analysis.
    pub fn crunch_word(&self, word: &str, options: &CruncherOptions) -> Vec<CrunchResult> {
        let input = match InputWord::new(word) {
            Some(input) => input,
            None => return vec![],
        };

        let mut results = vec![];
        for spelling in spellings(&input, options) {
            let start = results.len();
            self.match_exact(&spelling.word, options.handle_enclitics, &mut results);
            for result in &mut results[start..] {
                result.relaxed_case = spelling.relaxed_case;
                result.relaxed_u_and_v = spelling.relaxed_u_and_v;
                result.relaxed_i_and_j = spelling.relaxed_i_and_j;
            }
        }

        let has_marks = input.lengths.iter().any(|&l| l != Length::Unmarked);
        match options.vowel_length {
            VowelLength::Strict => {
                results.retain(|r| lengths_agree(&r.form, &input.lengths));
            }
            VowelLength::Relaxed => {
                if has_marks {
                    for result in &mut results {
                        result.relaxed_vowel_lengths = !lengths_agree(&result.form, &input.lengths);
                    }
                }
            }
        }
        results
    }

    /// Analyzes a word and groups the analyses by lemma, then by form.
    ///
    /// Lemmata and forms keep the order in which they were first matched.
    /// When the same analysis is found through several relaxations, only the
    /// least relaxed one is kept.
    pub fn crunch(&self, word: &str, options: &CruncherOptions) -> Vec<LatinWordAnalysis> {
        let mut analyses: Vec<LatinWordAnalysis> = vec![];
        for result in self.crunch_word(word, options) {
            let analysis_idx = match analyses.iter().position(|a| a.lemma == result.lemma) {
                Some(idx) => idx,
                None => {
                    analyses.push(LatinWordAnalysis {
                        lemma: result.lemma.clone(),
                        inflected_forms: vec![],
                    });
                    analyses.len() - 1
                }
            };
            let forms = &mut analyses[analysis_idx].inflected_forms;
            let form_idx = match forms.iter().position(|f| f.form == result.form) {
                Some(idx) => idx,
                None => {
                    forms.push(InflectedForm {
                        form: result.form.clone(),
                        inflection_data: vec![],
                    });
                    forms.len() - 1
                }
            };
            let data = &mut forms[form_idx].inflection_data;
            match data.iter_mut().find(|r| r.same_analysis(&result)) {
                Some(existing) => {
                    if result.relaxations() < existing.relaxations() {
                        *existing = result;
                    }
                }
                None => data.push(result),
            }
        }
        analyses
    }

    /// Checks if the word has any analysis under the default options.
    pub fn is_known(&self, word: &str) -> bool {
        !self.crunch_word(word, &CruncherOptions::default()).is_empty()
    }

    /// Matches every split of an ASCII `word` into a stem and an ending.
    fn match_exact(&self, word: &str, handle_enclitics: bool, results: &mut Vec<CrunchResult>) {
        for i in 1..=word.len() {
            let (stem_key, full_end) = word.split_at(i);
            let candidates = match self.tables.stem_candidates(stem_key) {
                Some(candidates) => candidates,
                None => continue,
            };
            self.match_candidates(candidates, full_end, None, results);

            if !handle_enclitics {
                continue;
            }
            for enclitic in ENCLITICS {
                if let Some(end) = full_end.strip_suffix(enclitic) {
                    self.match_candidates(candidates, end, Some(enclitic), results);
                }
            }
        }
    }

    fn match_candidates(
        &self,
        candidates: &[tables::StemMapValue],
        end: &str,
        enclitic: Option<&str>,
        results: &mut Vec<CrunchResult>,
    ) {
        let end = if end.is_empty() { EMPTY_ENDING } else { end };
        let table_names = self.tables.tables_for_ending(end).unwrap_or(&[]);

        for &candidate in candidates {
            let (lemma, stem, form) = match self.tables.stem(candidate) {
                Some(entry) => entry,
                None => continue,
            };
            if let Some(form) = form {
                if end != EMPTY_ENDING {
                    continue;
                }
                results.push(CrunchResult {
                    lemma: lemma.lemma.clone(),
                    form: form.form.clone(),
                    stem: None,
                    end: None,
                    context: form.context.clone(),
                    is_verb: lemma.is_verb,
                    relaxed_case: false,
                    relaxed_vowel_lengths: false,
                    relaxed_u_and_v: false,
                    relaxed_i_and_j: false,
                    enclitic: enclitic.map(str::to_string),
                });
            }
            let stem = match stem {
                Some(stem) => stem,
                None => continue,
            };
            if table_names.binary_search(&stem.inflection).is_err() {
                continue;
            }
            for ending in self.tables.endings(&stem.inflection, end) {
                let context = match merge_stem_and_ending(stem, ending) {
                    Some(context) => context,
                    None => continue,
                };
                results.push(CrunchResult {
                    lemma: lemma.lemma.clone(),
                    form: format!("{}{}", stem.stem, ending.text()),
                    stem: Some(stem.clone()),
                    end: Some(ending.clone()),
                    context,
                    is_verb: lemma.is_verb,
                    relaxed_case: false,
                    relaxed_vowel_lengths: false,
                    relaxed_u_and_v: false,
                    relaxed_i_and_j: false,
                    enclitic: enclitic.map(str::to_string),
                });
            }
        }
    }
}

/// Gets every spelling of the input to match under the options.
fn spellings(input: &InputWord, options: &CruncherOptions) -> Vec<Spelling> {
    let mut spellings = vec![];
    let mut push_cases = |word: &str, relaxed_u_and_v: bool, relaxed_i_and_j: bool| {
        for (word, relaxed_case) in case_variants(word, options.relax_case) {
            spellings.push(Spelling {
                word,
                relaxed_case,
                relaxed_u_and_v,
                relaxed_i_and_j,
            });
        }
    };

    push_cases(&input.letters, false, false);
    if options.relax_i_and_j || options.relax_u_and_v {
        for alternate in alternates_with_i_or_u(
            &input.letters,
            &input.lengths,
            options.relax_i_and_j,
            options.relax_u_and_v,
        ) {
            push_cases(&alternate.word, alternate.swapped_u, alternate.swapped_i);
        }
    }
    spellings
}

/// Gets the spellings of an ASCII word to try for its letter case: the
/// first letter as written followed by the lower-cased rest, and, with
/// `relax_case`, the first letter flipped. An initial `V` is also read as
/// `U`, and as `u` with `relax_case`.
fn case_variants(word: &str, relax_case: bool) -> Vec<(String, bool)> {
    let (first, body) = word.split_at(1.min(word.len()));
    let first = match first.chars().next() {
        Some(first) => first,
        None => return vec![],
    };
    let body = body.to_ascii_lowercase();

    let mut variants = vec![(format!("{}{}", first, body), false)];
    if first == 'V' {
        variants.push((format!("U{}", body), true));
    }
    if relax_case {
        let flipped = if first.is_ascii_uppercase() {
            first.to_ascii_lowercase()
        } else {
            first.to_ascii_uppercase()
        };
        variants.push((format!("{}{}", flipped, body), true));
        if first == 'V' {
            variants.push((format!("u{}", body), true));
        }
    }
    variants
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::inflection::to_inflection_data;
    use crate::stems::{IrregularForm, StemCode};
    use crate::tables::{make_end_index, EndIndexRow, IndexMode, InflectionTable};

    fn ending(ending: &str, tags: &[&str]) -> InflectionEnding {
        InflectionEnding::new(ending, to_inflection_data(tags).unwrap())
    }

    fn noun(lemma: &str, stem: &str, inflection: &str, tags: &[&str]) -> Lemma {
        Lemma {
            lemma: lemma.to_string(),
            stems: vec![Stem {
                stem: stem.to_string(),
                code: Some(StemCode::Noun),
                inflection: inflection.to_string(),
                context: to_inflection_data(tags).unwrap(),
            }],
            irregular_forms: vec![],
            is_verb: false,
            source: None,
        }
    }

    fn ends() -> EndsResult {
        let tables = vec![
            InflectionTable {
                name: "a_ae".to_string(),
                endings: vec![
                    ending("a", &["nom/voc", "sg"]),
                    ending("a_", &["abl", "sg"]),
                    ending("am", &["acc", "sg"]),
                    ending("ae_", &["gen/dat", "sg"]),
                    ending("ae_", &["nom/voc", "pl"]),
                ],
            },
            InflectionTable {
                name: "us_i".to_string(),
                endings: vec![
                    ending("us", &["nom", "sg"]),
                    ending("um", &["acc", "sg"]),
                    ending("o_", &["dat/abl", "sg"]),
                ],
            },
        ];
        make_end_index(&tables, IndexMode::All).unwrap()
    }

    fn cruncher() -> MorceusCruncher {
        let mut topper = noun("topper", "topper", "", &[]);
        topper.stems.clear();
        topper.irregular_forms.push(IrregularForm {
            form: "topper".to_string(),
            code: Some(StemCode::Word),
            context: to_inflection_data(&["adverb"]).unwrap(),
        });
        let lemmata = vec![
            noun("vita", "vi_t", "a_ae", &["fem"]),
            noun("Iulius", "Juli^", "us_i", &["masc"]),
            noun("iuvenis", "juven", "us_i", &["masc"]),
            noun("vir", "vir", "us_i", &["masc"]),
            topper,
        ];
        MorceusCruncher::make(ends(), lemmata)
    }

    fn contexts(analyses: &[LatinWordAnalysis]) -> Vec<String> {
        let mut result = vec![];
        for analysis in analyses {
            for form in &analysis.inflected_forms {
                for data in &form.inflection_data {
                    result.push(format!("{} {} {}", analysis.lemma, form.form, data.context));
                }
            }
        }
        result
    }

    #[test]
    fn test_crunch_ambiguous_ending() {
        let cruncher = cruncher();
        let analyses = cruncher.crunch("vitae", &CruncherOptions::default());
        assert_eq!(
            contexts(&analyses),
            vec!["vita vi_tae_ fem dat/gen sg", "vita vi_tae_ fem nom/voc pl"]
        );
    }

    #[test]
    fn test_crunch_irregular_form() {
        let cruncher = cruncher();
        let analyses = cruncher.crunch("topper", &CruncherOptions::default());
        assert_eq!(
            contexts(&analyses),
            vec!["topper topper adverb"]
        );
        assert!(cruncher.crunch("toppera", &CruncherOptions::default()).is_empty());
    }

    #[test]
    fn test_crunch_unknown() {
        let cruncher = cruncher();
        assert!(cruncher.crunch("xyz", &CruncherOptions::default()).is_empty());
        assert!(cruncher.crunch("vit4", &CruncherOptions::default()).is_empty());
        assert!(cruncher.crunch("", &CruncherOptions::default()).is_empty());
        assert!(!cruncher.is_known("123"));
        assert!(cruncher.is_known("vitam"));
    }

    #[test]
    fn test_crunch_case() {
        let cruncher = cruncher();
        let exact = CruncherOptions {
            relax_case: false,
            ..CruncherOptions::default()
        };
        assert!(cruncher.crunch("Vitam", &exact).is_empty());

        let results = cruncher.crunch_word("Vitam", &CruncherOptions::default());
        assert_eq!(results.len(), 1);
        assert!(results[0].relaxed_case);

        let results = cruncher.crunch_word("VITAM", &CruncherOptions::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].form, "vi_tam");
    }

    #[test]
    fn test_crunch_u_and_v() {
        let cruncher = cruncher();
        let results = cruncher.crunch_word("uita", &CruncherOptions::default());
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.relaxed_u_and_v && !r.relaxed_i_and_j));

        let exact = CruncherOptions {
            relax_u_and_v: false,
            ..CruncherOptions::default()
        };
        assert!(cruncher.crunch_word("uita", &exact).is_empty());
        assert!(!cruncher.crunch_word("vita", &exact).is_empty());
    }

    #[test]
    fn test_crunch_i_and_j() {
        let cruncher = cruncher();
        let results = cruncher.crunch_word("Iulius", &CruncherOptions::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].lemma, "Iulius");
        assert!(results[0].relaxed_i_and_j);
        assert!(!results[0].relaxed_case);

        let results = cruncher.crunch_word("iuuenis", &CruncherOptions::default());
        assert!(results.is_empty());
        let results = cruncher.crunch_word("iuuenum", &CruncherOptions::default());
        assert_eq!(results.len(), 1);
        assert!(results[0].relaxed_i_and_j && results[0].relaxed_u_and_v);
    }

    #[test]
    fn test_crunch_initial_v() {
        let cruncher = cruncher();
        let results = cruncher.crunch_word("Vir", &CruncherOptions::default());
        assert!(results.is_empty());
        let results = cruncher.crunch_word("Virum", &CruncherOptions::default());
        assert_eq!(results.len(), 1);
        assert!(results[0].relaxed_case);
    }

    #[test]
    fn test_crunch_vowel_length() {
        let cruncher = cruncher();
        let strict = CruncherOptions {
            vowel_length: VowelLength::Strict,
            ..CruncherOptions::default()
        };
        assert!(cruncher.crunch_word("vitam", &strict).is_empty());
        assert_eq!(cruncher.crunch_word("vītam", &strict).len(), 1);
        assert!(cruncher.crunch_word("vītām", &strict).is_empty());

        let relaxed = CruncherOptions::default();
        let results = cruncher.crunch_word("vitam", &relaxed);
        assert!(!results[0].relaxed_vowel_lengths);
        let results = cruncher.crunch_word("vītām", &relaxed);
        assert!(results[0].relaxed_vowel_lengths);
        let results = cruncher.crunch_word("vītam", &relaxed);
        assert!(!results[0].relaxed_vowel_lengths);
    }

    #[test]
    fn test_crunch_vowel_length_distinguishes_endings() {
        let cruncher = cruncher();
        let strict = CruncherOptions {
            vowel_length: VowelLength::Strict,
            ..CruncherOptions::default()
        };
        let results = cruncher.crunch_word("vīta", &strict);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].context.to_string(), "fem nom/voc sg");

        let results = cruncher.crunch_word("vītā", &strict);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].context.to_string(), "fem abl sg");
    }

    #[test]
    fn test_crunch_enclitics() {
        let cruncher = cruncher();
        assert!(cruncher.crunch("vitamque", &CruncherOptions::default()).is_empty());

        let options = CruncherOptions {
            handle_enclitics: true,
            ..CruncherOptions::default()
        };
        let results = cruncher.crunch_word("vitamque", &options);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].form, "vi_tam");
        assert_eq!(results[0].enclitic.as_deref(), Some("que"));

        let results = cruncher.crunch_word("topperne", &options);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].enclitic.as_deref(), Some("ne"));
    }

    #[test]
    fn test_crunch_groups_forms() {
        let cruncher = cruncher();
        let analyses = cruncher.crunch("vita", &CruncherOptions::default());
        assert_eq!(analyses.len(), 1);
        let forms: Vec<_> = analyses[0].inflected_forms.iter().map(|f| &f.form).collect();
        assert_eq!(forms, vec!["vi_ta", "vi_ta_"]);
    }

    #[test]
    fn test_crunch_keeps_least_relaxed() {
        // `Uita` is matched as written and again through `Vita` read as `Uita`.
        let cruncher = MorceusCruncher::make(ends(), vec![noun("Uita", "Ui_t", "a_ae", &["fem"])]);
        let results = cruncher.crunch_word("Uita", &CruncherOptions::default());
        assert_eq!(results.len(), 4);

        let analyses = cruncher.crunch("Uita", &CruncherOptions::default());
        assert_eq!(analyses.len(), 1);
        assert_eq!(analyses[0].inflected_forms.len(), 2);
        for form in &analyses[0].inflected_forms {
            assert_eq!(form.inflection_data.len(), 1);
            assert_eq!(form.inflection_data[0].relaxations(), 0);
        }
    }

    #[test]
    fn test_crunch_unsorted_index_row() {
        let (mut rows, lookup) = ends();
        for row in &mut rows {
            row.table_names.sort_unstable_by(|a, b| b.cmp(a));
            row.table_names.push("a_ae".to_string());
        }
        rows.push(EndIndexRow {
            ending: "a".to_string(),
            table_names: vec!["us_i".to_string(), "a_ae".to_string()],
        });
        let lemmata = vec![noun("vita", "vi_t", "a_ae", &["fem"])];
        let cruncher = MorceusCruncher::make((rows, lookup), lemmata);
        assert_eq!(
            contexts(&cruncher.crunch("vita", &CruncherOptions::default())),
            vec!["vita vi_ta fem nom/voc sg", "vita vi_ta_ fem abl sg"]
        );
        assert!(cruncher
            .tables()
            .end_index()
            .iter()
            .all(|row| row.table_names.windows(2).all(|w| w[0] < w[1])));
    }

    #[test]
    fn test_case_variants() {
        assert_eq!(case_variants("aMo", false), vec![("amo".to_string(), false)]);
        assert_eq!(
            case_variants("Vt", true),
            vec![
                ("Vt".to_string(), false),
                ("Ut".to_string(), true),
                ("vt".to_string(), true),
                ("ut".to_string(), true),
            ]
        );
    }
}
