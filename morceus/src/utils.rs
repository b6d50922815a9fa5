use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::Result;

pub trait FromU32 {
    fn from_u32(src: u32) -> Self;
}

#[cfg(any(target_pointer_width = "32", target_pointer_width = "64"))]
impl FromU32 for usize {
    #[inline(always)]
    fn from_u32(src: u32) -> Self {
        // Since the pointer width is guaranteed to be 32 or 64,
        // the following process always succeeds.
        unsafe { Self::try_from(src).unwrap_unchecked() }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| name.starts_with('.'))
}

fn collect_files(path: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    if is_hidden(path) {
        return Ok(());
    }
    if !path.is_dir() {
        files.push(path.to_path_buf());
        return Ok(());
    }
    let mut children = fs::read_dir(path)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    children.sort();
    for child in children {
        collect_files(&child, files)?;
    }
    Ok(())
}

/// Lists the regular files under the given paths.
///
/// Files are returned as given; directories are walked recursively in path
/// order. Hidden entries are skipped.
pub fn files_in_paths<P>(paths: &[P]) -> Result<Vec<PathBuf>>
where
    P: AsRef<Path>,
{
    let mut files = vec![];
    for path in paths {
        collect_files(path.as_ref(), &mut files)?;
    }
    Ok(files)
}

/// Gets the display name of a path for error messages.
pub fn source_name(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
macro_rules! hashmap {
    ( $($k:expr => $v:expr,)* ) => {
        {
            #[allow(unused_mut)]
            let mut h = hashbrown::HashMap::new();
            $(
                h.insert($k, $v);
            )*
            h
        }
    };
    ( $($k:expr => $v:expr),* ) => {
        hashmap![$( $k => $v, )*]
    };
}

#[cfg(test)]
pub(crate) use hashmap;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_in_paths() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("b");
        fs::create_dir(&nested).unwrap();
        fs::write(dir.path().join("c.end"), "").unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();
        fs::write(nested.join("a.end"), "").unwrap();

        let files = files_in_paths(&[dir.path()]).unwrap();
        assert_eq!(files, vec![nested.join("a.end"), dir.path().join("c.end")]);
    }
}
