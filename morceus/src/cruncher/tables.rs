//! Lookup tables of the cruncher.
use std::io::{Read, Write};
use std::sync::Arc;

use bincode::{Decode, Encode};
use hashbrown::HashMap;
use once_cell::sync::OnceCell;

use crate::common::{self, clean_stem_key};
use crate::config::MorceusConfig;
use crate::errors::{MorceusError, Result};
use crate::stems::{all_stems, IrregularForm, Lemma, Stem};
use crate::tables::{
    expand_templates, make_end_index, EndIndexRow, EndsResult, IndexMode, InflectionEnding,
    InflectionLookup,
};
use crate::utils::FromU32;

/// Magic bytes at the start of a serialized [`CruncherTables`].
pub const MODEL_MAGIC: &[u8] = b"MorceusTables 0.1\n";

static CACHED: OnceCell<Arc<CruncherTables>> = OnceCell::new();

/// Inner data of [`CruncherTables`], which is what gets serialized.
#[derive(Decode, Encode)]
struct TablesData {
    end_index: Vec<EndIndexRow>,
    lookup: InflectionLookup,
    lemmata: Vec<Lemma>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StemEntry {
    Stem(u32),
    Form(u32),
}

/// A stem or irregular form reachable from a cleaned stem key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct StemMapValue {
    pub lemma: u32,
    pub entry: StemEntry,
}

/// The ending index, the inflection lookup and the stem map, built once and
/// shared by every cruncher.
pub struct CruncherTables {
    data: TablesData,
    ends_map: HashMap<String, Vec<String>>,
    stem_map: HashMap<String, Vec<StemMapValue>>,
}

impl CruncherTables {
    /// Creates tables from an ending index and lemmata.
    pub fn new(ends: EndsResult, lemmata: Vec<Lemma>) -> Self {
        let (end_index, lookup) = ends;
        Self::from_data(TablesData {
            end_index,
            lookup,
            lemmata,
        })
    }

    fn from_data(mut data: TablesData) -> Self {
        // Matching binary-searches the table names of a row.
        let mut ends_map: HashMap<String, Vec<String>> = HashMap::new();
        for row in &mut data.end_index {
            row.table_names.sort_unstable();
            row.table_names.dedup();
            ends_map
                .entry(row.ending.clone())
                .or_default()
                .extend(row.table_names.iter().cloned());
        }
        for table_names in ends_map.values_mut() {
            table_names.sort_unstable();
            table_names.dedup();
        }

        let mut stem_map: HashMap<String, Vec<StemMapValue>> = HashMap::new();
        for (lemma_id, lemma) in data.lemmata.iter().enumerate() {
            let lemma_id = u32::try_from(lemma_id).unwrap_or(u32::MAX);
            for (i, stem) in lemma.stems.iter().enumerate() {
                stem_map
                    .entry(clean_stem_key(&stem.stem))
                    .or_default()
                    .push(StemMapValue {
                        lemma: lemma_id,
                        entry: StemEntry::Stem(u32::try_from(i).unwrap_or(u32::MAX)),
                    });
            }
            for (i, form) in lemma.irregular_forms.iter().enumerate() {
                stem_map
                    .entry(clean_stem_key(&form.form))
                    .or_default()
                    .push(StemMapValue {
                        lemma: lemma_id,
                        entry: StemEntry::Form(u32::try_from(i).unwrap_or(u32::MAX)),
                    });
            }
        }

        tracing::info!(
            endings = data.end_index.len(),
            tables = data.lookup.len(),
            lemmata = data.lemmata.len(),
            stem_keys = stem_map.len(),
            "built cruncher tables"
        );
        Self {
            data,
            ends_map,
            stem_map,
        }
    }

    /// Builds tables from the sources named by a configuration.
    ///
    /// # Errors
    ///
    /// [`MorceusError`] will be returned when a template or stem file cannot
    /// be read or is malformed.
    pub fn from_config(config: &MorceusConfig) -> Result<Self> {
        let tables = expand_templates(&config.target_dirs, &config.dependency_dirs)?;
        let ends = make_end_index(&tables, IndexMode::All)?;
        let lemmata = all_stems(&config.noun_stem_paths, &config.verb_stem_paths)?;
        Ok(Self::new(ends, lemmata))
    }

    /// Gets the process-wide tables, built on first use from
    /// [`MorceusConfig::from_env()`].
    ///
    /// # Errors
    ///
    /// [`MorceusError`] will be returned when the environment is not set up
    /// or the tables cannot be built. A failed build is retried on the next
    /// call.
    pub fn cached() -> Result<Arc<Self>> {
        CACHED
            .get_or_try_init(|| {
                let config = MorceusConfig::from_env()?;
                Self::from_config(&config).map(Arc::new)
            })
            .map(Arc::clone)
    }

    /// Gets the rows of the ending index.
    pub fn end_index(&self) -> &[EndIndexRow] {
        &self.data.end_index
    }

    /// Gets every lemma.
    pub fn lemmata(&self) -> &[Lemma] {
        &self.data.lemmata
    }

    /// Gets the tables that can produce a cleaned ending.
    #[inline(always)]
    pub(crate) fn tables_for_ending(&self, ending: &str) -> Option<&[String]> {
        self.ends_map.get(ending).map(Vec::as_slice)
    }

    /// Gets the stems and forms whose cleaned text is `key`.
    #[inline(always)]
    pub(crate) fn stem_candidates(&self, key: &str) -> Option<&[StemMapValue]> {
        self.stem_map.get(key).map(Vec::as_slice)
    }

    /// Gets the marked endings of `table` whose cleaned text is `ending`.
    #[inline(always)]
    pub(crate) fn endings(&self, table: &str, ending: &str) -> &[InflectionEnding] {
        self.data
            .lookup
            .get(table)
            .and_then(|endings| endings.get(ending))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[inline(always)]
    pub(crate) fn lemma(&self, id: u32) -> Option<&Lemma> {
        self.data.lemmata.get(usize::from_u32(id))
    }

    /// Resolves a stem map value to its lemma and either its stem or its form.
    pub(crate) fn stem(
        &self,
        value: StemMapValue,
    ) -> Option<(&Lemma, Option<&Stem>, Option<&IrregularForm>)> {
        let lemma = self.lemma(value.lemma)?;
        match value.entry {
            StemEntry::Stem(i) => {
                let stem = lemma.stems.get(usize::from_u32(i))?;
                Some((lemma, Some(stem), None))
            }
            StemEntry::Form(i) => {
                let form = lemma.irregular_forms.get(usize::from_u32(i))?;
                Some((lemma, None, Some(form)))
            }
        }
    }

    /// Exports the tables.
    ///
    /// # Errors
    ///
    /// When bincode generates an error, it will be returned as is.
    pub fn write<W>(&self, mut wtr: W) -> Result<usize>
    where
        W: Write,
    {
        wtr.write_all(MODEL_MAGIC)?;
        let num_bytes =
            bincode::encode_into_std_write(&self.data, &mut wtr, common::bincode_config())?;
        Ok(MODEL_MAGIC.len() + num_bytes)
    }

    /// Creates tables from a reader of data exported by [`Self::write()`].
    ///
    /// # Errors
    ///
    /// When bincode generates an error, it will be returned as is. An error
    /// is also returned when the data does not start with [`MODEL_MAGIC`].
    pub fn read<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut magic = [0; MODEL_MAGIC.len()];
        rdr.read_exact(&mut magic)?;
        if magic != MODEL_MAGIC {
            return Err(MorceusError::invalid_argument(
                "rdr",
                "The magic number of the input model mismatches.",
            ));
        }
        let data = bincode::decode_from_std_read(&mut rdr, common::bincode_config())?;
        Ok(Self::from_data(data))
    }
}
