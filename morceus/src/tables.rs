//! Inflection tables, the templates they are expanded from, and the index of
//! their endings.
mod indices;
mod template;

use std::fmt;

use bincode::{Decode, Encode};

use crate::common::EMPTY_ENDING;
use crate::inflection::InflectionContext;

pub use indices::{
    make_end_index, make_end_index_and_save, make_end_index_from_dirs, read_end_index,
    write_end_index, EndIndexRow, EndsResult, IndexMode, InflectionLookup,
};
pub use template::{
    expand_loaded_templates, expand_templates, expand_templates_and_save, save_expanded_tables,
    InflectionTemplate, TemplateDependency,
};

/// An ending of an inflection table, in Morpheus notation, and its grammatical data.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Decode, Encode)]
pub struct InflectionEnding {
    /// The ending, possibly with vowel length markers. `*` is the empty ending.
    pub ending: String,

    /// Grammatical data and tags of the ending.
    pub context: InflectionContext,
}

impl InflectionEnding {
    /// Creates a new ending.
    pub fn new<S>(ending: S, context: InflectionContext) -> Self
    where
        S: Into<String>,
    {
        Self {
            ending: ending.into(),
            context,
        }
    }

    /// Gets the ending text with the empty-ending placeholder resolved.
    pub fn text(&self) -> &str {
        if self.ending == EMPTY_ENDING {
            ""
        } else {
            &self.ending
        }
    }

    /// Copies the ending as seen through a template invocation: `prefix` is
    /// prepended and `args` is merged into the grammatical data.
    ///
    /// Returns `None` if `args` conflicts with the ending's data.
    pub fn expand(&self, prefix: &str, args: &InflectionContext) -> Option<Self> {
        let grammatical_data = self
            .context
            .grammatical_data
            .merge(args.grammatical_data)?;
        let ending = if prefix.is_empty() {
            self.ending.clone()
        } else {
            format!("{}{}", prefix, self.text())
        };
        Some(Self {
            ending,
            context: InflectionContext {
                grammatical_data,
                tags: merge_tags(&self.context.tags, &args.tags),
                internal_tags: merge_tags(&self.context.internal_tags, &args.internal_tags),
            },
        })
    }
}

pub(crate) fn merge_tags(first: &[String], second: &[String]) -> Vec<String> {
    let mut merged = first.to_vec();
    for tag in second {
        if !merged.contains(tag) {
            merged.push(tag.clone());
        }
    }
    merged
}

/// A fully expanded inflection table.
#[derive(Clone, Debug, PartialEq, Eq, Decode, Encode)]
pub struct InflectionTable {
    /// Name of the table, referenced by stems.
    pub name: String,

    /// The endings, in source order.
    pub endings: Vec<InflectionEnding>,
}

impl fmt::Display for InflectionTable {
    /// Prints the table in the Morpheus `ending table tags...` line format.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for ending in &self.endings {
            write!(f, "{} {}", ending.ending, self.name)?;
            let context = ending.context.to_string();
            if !context.is_empty() {
                write!(f, " {}", context)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
