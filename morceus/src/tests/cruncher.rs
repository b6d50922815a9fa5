use std::path::PathBuf;
use std::sync::Arc;

use crate::cruncher::{CruncherOptions, CruncherTables, MorceusCruncher, VowelLength};
use crate::decompose::decompose_token;
use crate::MorceusConfig;

fn data_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/tests/resources")
}

fn cruncher() -> MorceusCruncher {
    let config = MorceusConfig::from_data_root(data_root());
    MorceusCruncher::new(Arc::new(CruncherTables::from_config(&config).unwrap()))
}

fn strict() -> CruncherOptions {
    CruncherOptions {
        vowel_length: VowelLength::Strict,
        ..CruncherOptions::default()
    }
}

fn forms(cruncher: &MorceusCruncher, word: &str, options: &CruncherOptions) -> Vec<String> {
    let mut result = vec![];
    for analysis in cruncher.crunch(word, options) {
        for form in analysis.inflected_forms {
            for data in form.inflection_data {
                result.push(format!("{} {} {}", analysis.lemma, form.form, data.context));
            }
        }
    }
    result
}

#[test]
fn test_crunch_cavete() {
    let cruncher = cruncher();
    let analyses = cruncher.crunch("cavete", &CruncherOptions::default());

    assert_eq!(analyses.len(), 1);
    assert_eq!(analyses[0].lemma, "caveo");
    assert_eq!(analyses[0].inflected_forms.len(), 1);

    let form = &analyses[0].inflected_forms[0];
    assert_eq!(form.form, "ca^ve_te");
    assert_eq!(form.inflection_data.len(), 1);

    let data = &form.inflection_data[0];
    assert_eq!(data.context.to_string(), "pres imperat act 2nd pl");
    assert!(data.is_verb);
    assert!(!data.relaxed_vowel_lengths);
    assert_eq!(data.enclitic, None);
    assert_eq!(data.stem.as_ref().map(|s| s.inflection.as_str()), Some("conj2"));
    assert_eq!(data.end.as_ref().map(|e| e.ending.as_str()), Some("e_te"));
}

#[test]
fn test_crunch_cavete_strict() {
    let cruncher = cruncher();
    assert!(cruncher.crunch("cavete", &strict()).is_empty());
    assert_eq!(
        forms(&cruncher, "cavēte", &strict()),
        vec!["caveo ca^ve_te pres imperat act 2nd pl"]
    );
}

#[test]
fn test_crunch_regular_and_irregular() {
    let cruncher = cruncher();
    assert_eq!(
        forms(&cruncher, "cave", &CruncherOptions::default()),
        vec![
            "caveo ca^ve_ pres imperat act 2nd sg",
            "caveo ca^ve^ pres imperat act 2nd sg",
        ]
    );
    assert_eq!(
        forms(&cruncher, "cavĕ", &strict()),
        vec!["caveo ca^ve^ pres imperat act 2nd sg"]
    );
    assert_eq!(
        forms(&cruncher, "cavē", &strict()),
        vec!["caveo ca^ve_ pres imperat act 2nd sg"]
    );
}

#[test]
fn test_crunch_template_stem() {
    let cruncher = cruncher();
    assert_eq!(
        forms(&cruncher, "fuit", &CruncherOptions::default()),
        vec!["sum fuit perf ind act 3rd sg"]
    );
    assert_eq!(
        forms(&cruncher, "est", &CruncherOptions::default()),
        vec!["sum est pres ind act 3rd sg"]
    );
}

#[test]
fn test_crunch_proper_noun() {
    let cruncher = cruncher();
    assert_eq!(
        forms(&cruncher, "Romae", &CruncherOptions::default()),
        vec!["Roma Ro_mae_ fem dat/gen sg", "Roma Ro_mae_ fem nom/voc pl"]
    );
    let results = cruncher.crunch_word("romae", &CruncherOptions::default());
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.relaxed_case));

    let exact_case = CruncherOptions {
        relax_case: false,
        ..CruncherOptions::default()
    };
    assert!(cruncher.crunch("romae", &exact_case).is_empty());
}

#[test]
fn test_crunch_enclitic() {
    let cruncher = cruncher();
    let options = CruncherOptions {
        handle_enclitics: true,
        ..CruncherOptions::default()
    };
    let results = cruncher.crunch_word("vitaque", &options);
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.enclitic.as_deref() == Some("que")));
    assert!(cruncher.crunch("vitaque", &CruncherOptions::default()).is_empty());
}

#[test]
fn test_crunch_unknown() {
    let cruncher = cruncher();
    assert!(cruncher.crunch("Caesar", &CruncherOptions::default()).is_empty());
    assert!(cruncher.crunch("12", &CruncherOptions::default()).is_empty());
    assert!(cruncher.crunch("vita!", &CruncherOptions::default()).is_empty());
    assert!(!cruncher.is_known("amo"));
    assert!(cruncher.is_known("topper"));
}

#[test]
fn test_crunch_deterministic() {
    let first = cruncher();
    let second = cruncher();
    for word in ["cavete", "cave", "vitae", "Romae", "topper", "fuisti"] {
        assert_eq!(
            first.crunch(word, &CruncherOptions::default()),
            second.crunch(word, &CruncherOptions::default())
        );
    }
}

#[test]
fn test_decompose_then_crunch() {
    let cruncher = cruncher();
    let known = |parts: &Vec<String>| parts.iter().all(|p| cruncher.is_known(p));

    let hypotheses = decompose_token("Romast");
    assert_eq!(hypotheses[0], vec!["Romast"]);
    let chosen = hypotheses.iter().find(|h| known(h));
    assert_eq!(chosen, Some(&vec!["Roma".to_string(), "est".to_string()]));

    let hypotheses = decompose_token("vita'st");
    assert_eq!(hypotheses.iter().find(|h| known(h)), Some(&hypotheses[0]));
}

#[test]
fn test_tables_write_read() {
    let config = MorceusConfig::from_data_root(data_root());
    let tables = CruncherTables::from_config(&config).unwrap();

    let mut data = vec![];
    let written = tables.write(&mut data).unwrap();
    assert_eq!(written, data.len());

    let read = CruncherTables::read(data.as_slice()).unwrap();
    assert_eq!(read.end_index(), tables.end_index());
    assert_eq!(read.lemmata(), tables.lemmata());

    let original = MorceusCruncher::new(Arc::new(tables));
    let restored = MorceusCruncher::new(Arc::new(read));
    assert_eq!(
        original.crunch("cavete", &CruncherOptions::default()),
        restored.crunch("cavete", &CruncherOptions::default())
    );
}

#[test]
fn test_tables_read_bad_magic() {
    let data = b"NotMorceusTables!!\n0000".to_vec();
    assert!(CruncherTables::read(data.as_slice()).is_err());
    assert!(CruncherTables::read(&b"Mor"[..]).is_err());
}

#[test]
fn test_tables_missing_root() {
    let config = MorceusConfig::from_data_root(data_root().join("missing"));
    assert!(CruncherTables::from_config(&config).is_err());
}
