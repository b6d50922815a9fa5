use std::fs;
use std::path::Path;

use crate::errors::{MorceusError, Result};
use crate::inflection::InflectionContext;
use crate::stems::{IrregularForm, Lemma, SourceData, Stem, StemCode};
use crate::utils::{files_in_paths, source_name};

const LEMMA_MARKER: &str = ":le:";

// Precedes the inflection class of nouns with an irregular nominative.
const IRREG_NOM2: &str = "irreg_nom2";

struct Block {
    lemma: String,
    start_line: usize,
    end_line: usize,
    stems: Vec<Stem>,
    irregular_forms: Vec<IrregularForm>,
}

impl Block {
    fn new(lemma: &str, line: usize) -> Self {
        Self {
            lemma: lemma.trim().to_string(),
            start_line: line,
            end_line: line + 1,
            stems: vec![],
            irregular_forms: vec![],
        }
    }

    fn add_line(&mut self, line: &str, source: &str) -> Result<()> {
        if line.starts_with(':') {
            self.add_coded_line(line, source)
        } else {
            self.add_bare_line(line, source)
        }
    }

    fn add_coded_line(&mut self, line: &str, source: &str) -> Result<()> {
        let code = match (line.get(1..3), line.get(3..4)) {
            (Some(code), Some(":")) => StemCode::from_tag(code).ok_or_else(|| {
                MorceusError::invalid_format(source, format!("Unknown stem code {:?}", code))
            })?,
            _ => {
                let msg = format!("Malformed stem line {:?}", line);
                return Err(MorceusError::invalid_format(source, msg));
            }
        };
        let mut tokens = line[4..].split_whitespace();
        let text = tokens.next().ok_or_else(|| {
            MorceusError::invalid_format(source, format!("Empty stem line {:?}", line))
        })?;

        if code.is_irregular() {
            let rest: Vec<_> = tokens.collect();
            self.irregular_forms.push(IrregularForm {
                form: text.to_string(),
                code: Some(code),
                context: InflectionContext::parse_tags(&rest, source)?,
            });
            return Ok(());
        }

        let mut tokens = tokens.peekable();
        if code == StemCode::Noun && tokens.peek() == Some(&IRREG_NOM2) {
            tokens.next();
        }
        let inflection = tokens.next().ok_or_else(|| {
            MorceusError::invalid_format(source, format!("Stem {:?} has no inflection class", text))
        })?;
        let rest: Vec<_> = tokens.collect();
        let context = InflectionContext::parse_tags(&rest, source)?;
        if code == StemCode::Noun && context.grammatical_data.genders().next().is_none() {
            let msg = format!("Noun stem {:?} has no gender", text);
            return Err(MorceusError::invalid_format(source, msg));
        }
        self.stems.push(Stem {
            stem: text.to_string(),
            code: Some(code),
            inflection: inflection.to_string(),
            context,
        });
        Ok(())
    }

    fn add_bare_line(&mut self, line: &str, source: &str) -> Result<()> {
        let mut tokens = line.split_whitespace();
        let text = tokens.next().unwrap_or_default();
        let rest: Vec<_> = tokens.collect();
        let context = InflectionContext::parse_tags(&rest, source)?;
        match text.split_once('@') {
            Some((stem, inflection)) => {
                if stem.is_empty() || inflection.is_empty() || inflection.contains('@') {
                    let msg = format!("Malformed template stem {:?}", text);
                    return Err(MorceusError::invalid_format(source, msg));
                }
                self.stems.push(Stem {
                    stem: stem.to_string(),
                    code: None,
                    inflection: inflection.to_string(),
                    context,
                });
            }
            None => self.irregular_forms.push(IrregularForm {
                form: text.to_string(),
                code: None,
                context,
            }),
        }
        Ok(())
    }

    fn finish(self, file_name: &str, index: usize, is_verb: bool) -> Result<Lemma> {
        if self.stems.is_empty() && self.irregular_forms.is_empty() {
            return Err(MorceusError::invalid_format(
                format!("{}:{}", file_name, self.start_line + 1),
                format!("Lemma {:?} has no stems or forms", self.lemma),
            ));
        }
        Ok(Lemma {
            lemma: self.lemma,
            stems: self.stems,
            irregular_forms: self.irregular_forms,
            is_verb,
            source: Some(SourceData {
                file_name: file_name.to_string(),
                start_line: self.start_line,
                end_line: self.end_line,
                index,
            }),
        })
    }
}

/// Parses the contents of a stem file.
///
/// # Arguments
///
///  - `file_name`: Name of the source, used for errors and [`SourceData`].
///  - `content`: Contents of the file.
///  - `is_verb`: Whether the lemmata are verbs.
///
/// # Errors
///
/// [`MorceusError`] will be returned when a line cannot be parsed, when a
/// regular stem lacks its inflection class, when a noun stem lacks a gender,
/// or when a lemma has neither stems nor forms.
pub fn parse_stem_source(file_name: &str, content: &str, is_verb: bool) -> Result<Vec<Lemma>> {
    let mut lemmata = vec![];
    let mut current: Option<Block> = None;
    for (i, raw) in content.split('\n').enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            if let Some(block) = current.take() {
                lemmata.push(block.finish(file_name, lemmata.len(), is_verb)?);
            }
            continue;
        }
        if line.starts_with('#') {
            continue;
        }
        if let Some(lemma) = line.strip_prefix(LEMMA_MARKER) {
            if let Some(block) = current.replace(Block::new(lemma, i)) {
                lemmata.push(block.finish(file_name, lemmata.len(), is_verb)?);
            }
            continue;
        }
        let source = format!("{}:{}", file_name, i + 1);
        match current.as_mut() {
            Some(block) => {
                block.add_line(line, &source)?;
                block.end_line = i + 1;
            }
            None if line.starts_with(':') => {
                let msg = format!("Stem line {:?} is outside of a lemma", line);
                return Err(MorceusError::invalid_format(source, msg));
            }
            // Free text between lemmata.
            None => {}
        }
    }
    if let Some(block) = current {
        lemmata.push(block.finish(file_name, lemmata.len(), is_verb)?);
    }
    Ok(lemmata)
}

fn parse_stem_file<P>(path: P, is_verb: bool) -> Result<Vec<Lemma>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let lemmata = parse_stem_source(&source_name(path), &content, is_verb)?;
    tracing::debug!(file = %path.display(), lemmata = lemmata.len(), is_verb, "parsed stem file");
    Ok(lemmata)
}

/// Parses a noun or adjective stem file.
pub fn parse_noun_stem_file<P>(path: P) -> Result<Vec<Lemma>>
where
    P: AsRef<Path>,
{
    parse_stem_file(path, false)
}

/// Parses a verb stem file. Every lemma is marked as a verb.
pub fn parse_verb_stem_file<P>(path: P) -> Result<Vec<Lemma>>
where
    P: AsRef<Path>,
{
    parse_stem_file(path, true)
}

/// Parses every stem file under the given paths, nouns first.
pub fn all_stems<P>(noun_paths: &[P], verb_paths: &[P]) -> Result<Vec<Lemma>>
where
    P: AsRef<Path>,
{
    let mut lemmata = vec![];
    for path in files_in_paths(noun_paths)? {
        lemmata.extend(parse_noun_stem_file(path)?);
    }
    for path in files_in_paths(verb_paths)? {
        lemmata.extend(parse_verb_stem_file(path)?);
    }
    Ok(lemmata)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::inflection::to_inflection_data;

    const NOUNS: &str = "
# Vita
:le:vita
:no:vit a_ae fem

A^chilles
:le:Achilles
:no:A^chill es_is masc
:wd:Achille_n masc acc sg

:le:bonus
:aj:bon us_a_um no_comp
:aj:mel ior_ius_comp
:aj:optim us_a_um irreg_superl
";

    #[test]
    fn test_parse_nouns() {
        let lemmata = parse_stem_source("nom.01", NOUNS, false).unwrap();
        assert_eq!(lemmata.len(), 3);

        let vita = &lemmata[0];
        assert_eq!(vita.lemma, "vita");
        assert!(!vita.is_verb);
        assert_eq!(
            vita.stems,
            vec![Stem {
                stem: "vit".to_string(),
                code: Some(StemCode::Noun),
                inflection: "a_ae".to_string(),
                context: to_inflection_data(&["fem"]).unwrap(),
            }]
        );
        assert_eq!(
            vita.source,
            Some(SourceData {
                file_name: "nom.01".to_string(),
                start_line: 2,
                end_line: 4,
                index: 0,
            })
        );

        let achilles = &lemmata[1];
        assert_eq!(achilles.stems.len(), 1);
        assert_eq!(
            achilles.irregular_forms,
            vec![IrregularForm {
                form: "Achille_n".to_string(),
                code: Some(StemCode::Word),
                context: to_inflection_data(&["masc", "acc", "sg"]).unwrap(),
            }]
        );

        let bonus = &lemmata[2];
        assert_eq!(bonus.stems.len(), 3);
        assert_eq!(bonus.stems[0].context.internal_tags, vec!["no_comp".to_string()]);
        assert_eq!(bonus.stems[2].context.internal_tags, vec!["irreg_superl".to_string()]);
    }

    #[test]
    fn test_parse_irregular_nominative() {
        let source = ":le:bos\n:no:bo^v irreg_nom2 is_is masc/fem\n:wd:bo_s masc/fem nom/voc sg\n";
        let lemmata = parse_stem_source("nom.02", source, false).unwrap();
        let stem = &lemmata[0].stems[0];
        assert_eq!(stem.stem, "bo^v");
        assert_eq!(stem.inflection, "is_is");
        assert_eq!(stem.context.to_string(), "masc/fem");
        assert_eq!(lemmata[0].irregular_forms.len(), 1);
    }

    #[test]
    fn test_parse_verbs() {
        let source = ":le:caveo\n:vs:ca^v conj2\n:vb:ca^ve^ 2nd sg pres imperat act irreg_pp1\n";
        let lemmata = parse_stem_source("vbs", source, true).unwrap();
        assert_eq!(lemmata.len(), 1);
        assert!(lemmata[0].is_verb);
        assert_eq!(lemmata[0].stems[0].code, Some(StemCode::VerbStem));
        assert_eq!(
            lemmata[0].irregular_forms[0].context.to_string(),
            "pres imperat act 2nd sg irreg_pp1"
        );
    }

    #[test]
    fn test_parse_irregular_block() {
        let source = ":le:sum\nes@pres_sum 2nd sg\ne_sse pres inf act\n:le:topper\n:wd:topper adverb\n";
        let lemmata = parse_stem_source("irreg", source, false).unwrap();
        assert_eq!(lemmata.len(), 2);
        assert_eq!(lemmata[0].stems[0].code, None);
        assert_eq!(lemmata[0].stems[0].inflection, "pres_sum");
        assert_eq!(lemmata[0].irregular_forms[0].form, "e_sse");
        assert_eq!(lemmata[0].irregular_forms[0].code, None);
        assert_eq!(lemmata[1].irregular_forms[0].context.internal_tags, vec!["adverb"]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_stem_source("f", ":le:vita\n:no:vit a_ae\n", false).is_err());
        assert!(parse_stem_source("f", ":le:vita\n:no:vit\n", false).is_err());
        assert!(parse_stem_source("f", ":le:vita\n:xx:vit a_ae fem\n", false).is_err());
        assert!(parse_stem_source("f", ":no:vit a_ae fem\n", false).is_err());
        assert!(parse_stem_source("f", ":le:vita\n\n:no:vit a_ae fem\n", false).is_err());
        assert!(parse_stem_source("f", ":le:vita\n:no:vit a_ae fem sg pl\n", false).is_err());
    }

    #[test]
    fn test_stem_display() {
        let lemmata = parse_stem_source("f", NOUNS, false).unwrap();
        assert_eq!(
            lemmata[1].to_lines(),
            vec![
                ":le:Achilles",
                ":no:A^chill es_is masc",
                ":wd:Achille_n masc acc sg",
            ]
        );
    }
}
