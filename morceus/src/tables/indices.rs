use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;

use bincode::{Decode, Encode};

use crate::common::strip_length_markers;
use crate::errors::{MorceusError, Result};
use crate::tables::{expand_templates, InflectionEnding, InflectionTable};

const VERB_TABLES: &[&str] = &[
    "conj1", "conj2", "conj3", "conj4", "conj3_io", "perfstem", "ivperf", "avperf", "evperf",
];

/// Table shared by the verb and noun indices.
const SHARED_TABLE: &str = "pp4";

/// Selection of tables to index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IndexMode {
    /// Every table.
    #[default]
    All,

    /// Verb tables only.
    Verbs,

    /// Everything but verb tables.
    Nouns,
}

impl IndexMode {
    fn includes(self, table: &str) -> bool {
        let is_verb = VERB_TABLES.contains(&table);
        match self {
            Self::All => true,
            Self::Verbs => is_verb || table == SHARED_TABLE,
            Self::Nouns => !is_verb,
        }
    }
}

impl FromStr for IndexMode {
    type Err = MorceusError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(Self::All),
            "verbs" => Ok(Self::Verbs),
            "nouns" => Ok(Self::Nouns),
            _ => Err(MorceusError::invalid_argument(
                "mode",
                format!("Unknown index mode {:?}", s),
            )),
        }
    }
}

impl fmt::Display for IndexMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::All => "all",
            Self::Verbs => "verbs",
            Self::Nouns => "nouns",
        };
        write!(f, "{}", name)
    }
}

/// A row of the ending index: an ending without length markers and the
/// tables that can produce it.
#[derive(Clone, Debug, PartialEq, Eq, Decode, Encode)]
pub struct EndIndexRow {
    /// The ending, without vowel length markers.
    pub ending: String,

    /// Names of the tables producing the ending, sorted and de-duplicated.
    pub table_names: Vec<String>,
}

impl EndIndexRow {
    /// Parses a row in the `ending table1 table2...` format.
    ///
    /// # Errors
    ///
    /// [`MorceusError`] will be returned when the row has no table names.
    pub fn parse(input: &str) -> Result<Self> {
        let mut words = input.split_whitespace();
        let ending = words.next().unwrap_or_default().to_string();
        let names: BTreeSet<String> = words.map(str::to_string).collect();
        if names.is_empty() {
            return Err(MorceusError::invalid_format(
                "indices",
                format!("Row {:?} needs an ending and at least one table", input.trim()),
            ));
        }
        Ok(Self {
            ending,
            table_names: names.into_iter().collect(),
        })
    }
}

impl FromStr for EndIndexRow {
    type Err = MorceusError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for EndIndexRow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut names: Vec<&str> = self.table_names.iter().map(String::as_str).collect();
        names.sort_unstable();
        write!(f, "{} {}", self.ending, names.join(" "))
    }
}

/// Table name => ending without length markers => the marked endings.
pub type InflectionLookup = BTreeMap<String, BTreeMap<String, Vec<InflectionEnding>>>;

/// The rows of the ending index, sorted by ending, and the lookup of marked
/// endings.
pub type EndsResult = (Vec<EndIndexRow>, InflectionLookup);

/// Builds the ending index of the given tables.
///
/// # Errors
///
/// [`MorceusError`] will be returned when two tables share a name.
pub fn make_end_index(tables: &[InflectionTable], mode: IndexMode) -> Result<EndsResult> {
    let mut index: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut lookup = InflectionLookup::new();
    for table in tables.iter().filter(|t| mode.includes(&t.name)) {
        if lookup.contains_key(&table.name) {
            return Err(MorceusError::invalid_format(
                &table.name,
                "Table has already been indexed",
            ));
        }
        let mut endings: BTreeMap<String, Vec<InflectionEnding>> = BTreeMap::new();
        for end in &table.endings {
            let clean = strip_length_markers(&end.ending);
            index
                .entry(clean.clone())
                .or_default()
                .insert(table.name.clone());
            endings.entry(clean).or_default().push(end.clone());
        }
        lookup.insert(table.name.clone(), endings);
    }
    let rows = index
        .into_iter()
        .map(|(ending, names)| EndIndexRow {
            ending,
            table_names: names.into_iter().collect(),
        })
        .collect();
    Ok((rows, lookup))
}

/// Expands the templates under the given paths and builds their ending index.
pub fn make_end_index_from_dirs<P>(
    target_dirs: &[P],
    dependency_dirs: &[P],
    mode: IndexMode,
) -> Result<EndsResult>
where
    P: AsRef<Path>,
{
    let tables = expand_templates(target_dirs, dependency_dirs)?;
    make_end_index(&tables, mode)
}

/// Writes index rows, one per line.
pub fn write_end_index<W>(rows: &[EndIndexRow], wtr: W) -> Result<()>
where
    W: Write,
{
    let mut wtr = BufWriter::new(wtr);
    for row in rows {
        writeln!(wtr, "{}", row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Reads index rows written by [`write_end_index`]. Blank lines are skipped.
pub fn read_end_index<R>(rdr: R) -> Result<Vec<EndIndexRow>>
where
    R: Read,
{
    let mut rows = vec![];
    for line in BufReader::new(rdr).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        rows.push(EndIndexRow::parse(&line)?);
    }
    Ok(rows)
}

/// Builds the ending index of the given tables and writes it to `path`.
pub fn make_end_index_and_save<P>(
    tables: &[InflectionTable],
    mode: IndexMode,
    path: P,
) -> Result<EndsResult>
where
    P: AsRef<Path>,
{
    let result = make_end_index(tables, mode)?;
    write_end_index(&result.0, File::create(path.as_ref())?)?;
    tracing::debug!(rows = result.0.len(), path = %path.as_ref().display(), %mode, "saved ending index");
    Ok(result)
}
