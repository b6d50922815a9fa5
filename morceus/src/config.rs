//! File roots backing a set of cruncher tables.
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::errors::{MorceusError, Result};

/// Variable naming the root of the Morceus data.
pub const DATA_ROOT_VAR: &str = "MORCEUS_DATA_ROOT";

/// Variable overriding the target template directories.
pub const TARGET_DIRS_VAR: &str = "MORCEUS_TARGET_DIRS";

/// Variable overriding the dependency template directories.
pub const DEPENDENCY_DIRS_VAR: &str = "MORCEUS_DEPENDENCY_DIRS";

/// Variable overriding the noun stem files.
pub const NOUN_STEMS_VAR: &str = "MORCEUS_NOUN_STEMS";

/// Variable overriding the verb stem files.
pub const VERB_STEMS_VAR: &str = "MORCEUS_VERB_STEMS";

const TARGET_DIR: &str = "latin/ends/target";
const DEPENDENCY_DIR: &str = "latin/ends/dependency";
const NOUN_STEMS_DIR: &str = "latin/stems/nom";
const VERB_STEMS_DIR: &str = "latin/stems/verbs";

/// Paths of the template and stem sources. Each path may be a file or a
/// directory, whose files are all used.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MorceusConfig {
    /// Target templates.
    pub target_dirs: Vec<PathBuf>,

    /// Dependency templates.
    pub dependency_dirs: Vec<PathBuf>,

    /// Noun and adjective stem files.
    pub noun_stem_paths: Vec<PathBuf>,

    /// Verb stem files.
    pub verb_stem_paths: Vec<PathBuf>,
}

impl MorceusConfig {
    /// Creates a configuration with the default layout under `root`.
    pub fn from_data_root<P>(root: P) -> Self
    where
        P: AsRef<Path>,
    {
        let root = root.as_ref();
        Self {
            target_dirs: vec![root.join(TARGET_DIR)],
            dependency_dirs: vec![root.join(DEPENDENCY_DIR)],
            noun_stem_paths: vec![root.join(NOUN_STEMS_DIR)],
            verb_stem_paths: vec![root.join(VERB_STEMS_DIR)],
        }
    }

    /// Creates a configuration with the default layout under `data_root`, if
    /// any, in which every non-empty list of `overrides` replaces its entry.
    pub fn with_overrides<P>(data_root: Option<P>, overrides: Self) -> Self
    where
        P: AsRef<Path>,
    {
        let mut config = data_root.map(Self::from_data_root).unwrap_or_default();
        let entries = [
            (overrides.target_dirs, &mut config.target_dirs),
            (overrides.dependency_dirs, &mut config.dependency_dirs),
            (overrides.noun_stem_paths, &mut config.noun_stem_paths),
            (overrides.verb_stem_paths, &mut config.verb_stem_paths),
        ];
        for (paths, entry) in entries {
            if !paths.is_empty() {
                *entry = paths;
            }
        }
        config
    }

    /// Creates a configuration from the environment.
    ///
    /// `MORCEUS_DATA_ROOT` gives the default layout, and each of
    /// `MORCEUS_TARGET_DIRS`, `MORCEUS_DEPENDENCY_DIRS`, `MORCEUS_NOUN_STEMS`
    /// and `MORCEUS_VERB_STEMS` replaces one entry with a path list.
    ///
    /// # Errors
    ///
    /// [`MorceusError`] will be returned when `MORCEUS_DATA_ROOT` is not set.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| env::var_os(name))
    }

    fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let root = var(DATA_ROOT_VAR).ok_or_else(|| {
            MorceusError::invalid_argument(DATA_ROOT_VAR, "The variable is not set")
        })?;
        let mut config = Self::from_data_root(PathBuf::from(root));
        let overrides = [
            (TARGET_DIRS_VAR, &mut config.target_dirs),
            (DEPENDENCY_DIRS_VAR, &mut config.dependency_dirs),
            (NOUN_STEMS_VAR, &mut config.noun_stem_paths),
            (VERB_STEMS_VAR, &mut config.verb_stem_paths),
        ];
        for (name, paths) in overrides {
            if let Some(value) = var(name) {
                *paths = env::split_paths(&value).collect();
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::utils::hashmap;

    #[test]
    fn test_from_data_root() {
        let config = MorceusConfig::from_data_root("/data");
        assert_eq!(config.target_dirs, vec![PathBuf::from("/data/latin/ends/target")]);
        assert_eq!(config.verb_stem_paths, vec![PathBuf::from("/data/latin/stems/verbs")]);
    }

    #[test]
    fn test_from_vars() {
        let vars = hashmap![
            DATA_ROOT_VAR => OsString::from("/data"),
            NOUN_STEMS_VAR => env::join_paths(["/a/nom.01", "/b/nom.02"]).unwrap(),
        ];
        let config = MorceusConfig::from_vars(|name| vars.get(name).cloned()).unwrap();
        assert_eq!(
            config.noun_stem_paths,
            vec![PathBuf::from("/a/nom.01"), PathBuf::from("/b/nom.02")]
        );
        assert_eq!(
            config.dependency_dirs,
            vec![PathBuf::from("/data/latin/ends/dependency")]
        );
    }

    #[test]
    fn test_with_overrides() {
        let overrides = MorceusConfig {
            verb_stem_paths: vec![PathBuf::from("/extra/vbs.irreg")],
            ..MorceusConfig::default()
        };
        let config = MorceusConfig::with_overrides(Some("/data"), overrides.clone());
        assert_eq!(config.target_dirs, vec![PathBuf::from("/data/latin/ends/target")]);
        assert_eq!(config.verb_stem_paths, vec![PathBuf::from("/extra/vbs.irreg")]);

        let config = MorceusConfig::with_overrides(None::<&str>, overrides);
        assert!(config.target_dirs.is_empty());
        assert_eq!(config.verb_stem_paths, vec![PathBuf::from("/extra/vbs.irreg")]);
    }

    #[test]
    fn test_missing_root() {
        assert!(MorceusConfig::from_vars(|_| None).is_err());
    }
}
