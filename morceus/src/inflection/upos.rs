use crate::errors::{MorceusError, Result};
use crate::inflection::{
    LatinCase, LatinDegree, LatinGender, LatinMood, LatinNumber, LatinPerson, LatinTense,
    LatinVoice, WordInflectionData,
};

/// A value accepted for a key. `None` means the value is valid but carries
/// no information.
type Mapping<T> = &'static [(&'static str, Option<T>)];

const CASES: Mapping<LatinCase> = &[
    ("Nom", Some(LatinCase::Nominative)),
    ("Gen", Some(LatinCase::Genitive)),
    ("Dat", Some(LatinCase::Dative)),
    ("Acc", Some(LatinCase::Accusative)),
    ("Abl", Some(LatinCase::Ablative)),
    ("Voc", Some(LatinCase::Vocative)),
    ("Loc", Some(LatinCase::Locative)),
];

const NUMBERS: Mapping<LatinNumber> = &[
    ("Sing", Some(LatinNumber::Singular)),
    ("Plur", Some(LatinNumber::Plural)),
];

const GENDERS: Mapping<LatinGender> = &[
    ("Masc", Some(LatinGender::Masculine)),
    ("Fem", Some(LatinGender::Feminine)),
    ("Neut", Some(LatinGender::Neuter)),
];

const PERSONS: Mapping<LatinPerson> = &[
    ("1", Some(LatinPerson::First)),
    ("2", Some(LatinPerson::Second)),
    ("3", Some(LatinPerson::Third)),
];

const VOICES: Mapping<LatinVoice> = &[
    ("Act", Some(LatinVoice::Active)),
    ("Pass", Some(LatinVoice::Passive)),
];

const MOODS: Mapping<LatinMood> = &[
    ("Ind", Some(LatinMood::Indicative)),
    ("Sub", Some(LatinMood::Subjunctive)),
    ("Imp", Some(LatinMood::Imperative)),
    ("Gdv", Some(LatinMood::Gerundive)),
];

const VERB_FORMS: Mapping<LatinMood> = &[
    ("Fin", None),
    ("Part", Some(LatinMood::Participle)),
    ("Inf", Some(LatinMood::Infinitive)),
    ("Sup", Some(LatinMood::Supine)),
    ("Gdv", Some(LatinMood::Gerundive)),
];

// Aspectual values are accepted but have no Morpheus counterpart.
const TENSES: Mapping<LatinTense> = &[
    ("Pres", Some(LatinTense::Present)),
    ("Fut", Some(LatinTense::Future)),
    ("Pqp", Some(LatinTense::Pluperfect)),
    ("Imp", None),
    ("Perf", None),
    ("Ftp", None),
    ("Past", None),
];

const DEGREES: Mapping<LatinDegree> = &[
    ("Pos", Some(LatinDegree::Positive)),
    ("Cmp", Some(LatinDegree::Comparative)),
    ("Sup", Some(LatinDegree::Superlative)),
    ("Abs", Some(LatinDegree::Superlative)),
];

fn lookup<T>(key: &str, value: &str, mapping: Mapping<T>) -> Result<Option<T>>
where
    T: Copy,
{
    mapping
        .iter()
        .find(|(name, _)| *name == value)
        .map(|(_, mapped)| *mapped)
        .ok_or_else(|| {
            MorceusError::invalid_format(
                "upos",
                format!("Unrecognized value {:?} for key {:?}", value, key),
            )
        })
}

fn apply<T, F>(
    data: WordInflectionData,
    key: &str,
    value: &str,
    mapping: Mapping<T>,
    set: F,
) -> Result<WordInflectionData>
where
    T: Copy,
    F: Fn(WordInflectionData, T) -> WordInflectionData,
{
    Ok(match lookup(key, value, mapping)? {
        Some(mapped) => set(data, mapped),
        None => data,
    })
}

/// Converts Universal Dependencies features, e.g. `Case=Acc|Number=Plur`,
/// into grammatical data.
///
/// Segments without `=` are skipped. Case and gender accept comma-separated
/// values, as in `Case=Nom,Acc`.
///
/// # Errors
///
/// [`MorceusError`] is returned when a key or one of its values is not
/// recognized.
///
/// # Examples
///
/// ```
/// use morceus::inflection::{convert_upos, LatinCase, LatinNumber};
///
/// let data = convert_upos("Case=Nom|BadPart|Number=Sing").unwrap();
/// assert!(data.has_case(LatinCase::Nominative));
/// assert_eq!(data.number(), Some(LatinNumber::Singular));
/// ```
pub fn convert_upos(tags: &str) -> Result<WordInflectionData> {
    let mut data = WordInflectionData::EMPTY;
    for part in tags.trim().split('|') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        data = match key {
            "Case" => value.split(',').try_fold(data, |d, v| {
                apply(d, key, v, CASES, WordInflectionData::with_case)
            })?,
            "Gender" => value.split(',').try_fold(data, |d, v| {
                apply(d, key, v, GENDERS, WordInflectionData::with_gender)
            })?,
            "Number" => apply(data, key, value, NUMBERS, WordInflectionData::with_number)?,
            "Person" => apply(data, key, value, PERSONS, WordInflectionData::with_person)?,
            "Voice" => apply(data, key, value, VOICES, WordInflectionData::with_voice)?,
            "Mood" => apply(data, key, value, MOODS, WordInflectionData::with_mood)?,
            "VerbForm" => apply(data, key, value, VERB_FORMS, WordInflectionData::with_mood)?,
            "Tense" => apply(data, key, value, TENSES, WordInflectionData::with_tense)?,
            "Degree" => apply(data, key, value, DEGREES, WordInflectionData::with_degree)?,
            _ => {
                return Err(MorceusError::invalid_format(
                    "upos",
                    format!("Unrecognized key {:?}", key),
                ))
            }
        };
    }
    Ok(data)
}
