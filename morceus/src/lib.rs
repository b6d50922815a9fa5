//! # Morceus
//!
//! Morceus is a morphological analyzer of Latin driven by Morpheus-style
//! inflection templates and stem files.
//!
//! Templates are expanded into inflection tables, whose endings are indexed
//! by their text without vowel length markers. Stem files are parsed into
//! lemmata. A [`MorceusCruncher`] then analyzes a word by trying every split
//! into a known stem and a known ending.
//!
//! ## Examples
//!
//! ```no_run
//! use std::fs::File;
//! use std::sync::Arc;
//!
//! use morceus::{CruncherOptions, CruncherTables, MorceusCruncher};
//!
//! let reader = File::open("path/to/tables.bin").unwrap();
//! let tables = CruncherTables::read(reader).unwrap();
//! let cruncher = MorceusCruncher::new(Arc::new(tables));
//!
//! for analysis in cruncher.crunch("cavete", &CruncherOptions::default()) {
//!     println!("{}", analysis.lemma);
//! }
//! ```
#![deny(missing_docs)]

#[cfg(target_pointer_width = "16")]
compile_error!("`target_pointer_width` must be larger than or equal to 32");

pub mod common;
pub mod config;
pub mod cruncher;
pub mod decompose;
pub mod errors;
pub mod inflection;
pub mod stems;
pub mod tables;
mod utils;


pub use config::MorceusConfig;
pub use cruncher::{CruncherOptions, CruncherTables, LatinWordAnalysis, MorceusCruncher};
pub use decompose::decompose_token;
pub use utils::files_in_paths;
