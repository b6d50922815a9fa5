use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use crate::common::EMPTY_ENDING;
use crate::errors::{MorceusError, Result};
use crate::inflection::InflectionContext;
use crate::tables::{InflectionEnding, InflectionTable};
use crate::utils::{files_in_paths, source_name};

/// An invocation of another template, written `prefix@name [tags...]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateDependency {
    /// Name of the invoked template.
    pub name: String,

    /// Text prepended to every ending of the invoked template.
    pub prefix: String,

    /// Tags merged into every ending of the invoked template.
    pub args: Vec<String>,
}

/// An inflection template: endings with grammatical data, plus invocations
/// of other templates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InflectionTemplate {
    /// Name of the template (the file stem of its source).
    pub name: String,

    /// Endings defined directly by the template.
    pub endings: Vec<InflectionEnding>,

    /// Templates invoked by the template.
    pub templates: Vec<TemplateDependency>,
}

impl InflectionTemplate {
    /// Loads a template from a reader.
    ///
    /// # Arguments
    ///
    ///  - `name`: Name of the template.
    ///  - `rdr`: A reader of the template source.
    ///
    /// # Errors
    ///
    /// [`MorceusError`] will be returned when the source is malformed.
    pub fn from_reader<R>(name: &str, rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut endings = vec![];
        let mut templates = vec![];
        for (i, line) in BufReader::new(rdr).lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let source = format!("{}:{}", name, i + 1);
            let mut parts = line.split_whitespace();
            let first = parts.next().unwrap_or_default();
            let rest: Vec<_> = parts.collect();

            if let Some((prefix, dep_name)) = first.split_once('@') {
                if dep_name.is_empty() || dep_name.contains('@') {
                    let msg = format!("Malformed template invocation {:?}", first);
                    return Err(MorceusError::invalid_format(source, msg));
                }
                let prefix = if prefix == EMPTY_ENDING { "" } else { prefix };
                templates.push(TemplateDependency {
                    name: dep_name.to_string(),
                    prefix: prefix.to_string(),
                    args: rest.iter().map(|s| s.to_string()).collect(),
                });
                continue;
            }

            let context = InflectionContext::parse_tags(&rest, &source)?;
            if context.grammatical_data.is_empty() {
                let msg = format!("Ending {:?} has no grammatical data", first);
                return Err(MorceusError::invalid_format(source, msg));
            }
            endings.push(InflectionEnding::new(first, context));
        }

        if endings.is_empty() && templates.is_empty() {
            return Err(MorceusError::invalid_format(
                name,
                "Template has no endings or dependencies",
            ));
        }
        Ok(Self {
            name: name.to_string(),
            endings,
            templates,
        })
    }

    /// Loads a template from a file, named after the file stem.
    pub fn from_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                MorceusError::invalid_argument("path", format!("{} has no name", path.display()))
            })?;
        let template = Self::from_reader(name, File::open(path)?).map_err(|e| match e {
            MorceusError::InvalidFormat(e) => {
                MorceusError::invalid_format(format!("{} ({})", source_name(path), e.arg), e.msg)
            }
            e => e,
        })?;
        tracing::debug!(
            template = %template.name,
            endings = template.endings.len(),
            dependencies = template.templates.len(),
            "loaded template"
        );
        Ok(template)
    }

    fn expand(&self, expanded: &BTreeMap<String, InflectionTable>) -> Result<InflectionTable> {
        let mut endings = self.endings.clone();
        for dep in &self.templates {
            let table = expanded.get(&dep.name).ok_or_else(|| {
                MorceusError::invalid_format(
                    &self.name,
                    format!("Dependency {} has not been expanded", dep.name),
                )
            })?;
            let args = InflectionContext::parse_tags(&dep.args, &self.name)?;
            endings.extend(
                table
                    .endings
                    .iter()
                    .filter_map(|ending| ending.expand(&dep.prefix, &args)),
            );
        }
        if endings.is_empty() {
            return Err(MorceusError::invalid_format(
                &self.name,
                "Template expands to no endings",
            ));
        }
        Ok(InflectionTable {
            name: self.name.clone(),
            endings,
        })
    }
}

/// Expands already loaded templates into tables, sorted by name.
///
/// # Errors
///
/// [`MorceusError`] will be returned when two templates share a name, when a
/// template invokes an unknown template, or when invocations form a cycle.
pub fn expand_loaded_templates<I>(templates: I) -> Result<Vec<InflectionTable>>
where
    I: IntoIterator<Item = InflectionTemplate>,
{
    let mut pending = BTreeMap::new();
    for template in templates {
        if pending.contains_key(&template.name) {
            return Err(MorceusError::invalid_format(
                &template.name,
                "Template has already been loaded",
            ));
        }
        pending.insert(template.name.clone(), template);
    }
    for template in pending.values() {
        if let Some(dep) = template
            .templates
            .iter()
            .find(|dep| !pending.contains_key(&dep.name))
        {
            return Err(MorceusError::invalid_format(
                &template.name,
                format!("Unknown template {}", dep.name),
            ));
        }
    }

    let mut expanded = BTreeMap::new();
    while !pending.is_empty() {
        let ready: Vec<String> = pending
            .values()
            .filter(|t| t.templates.iter().all(|d| expanded.contains_key(&d.name)))
            .map(|t| t.name.clone())
            .collect();
        if ready.is_empty() {
            let names: Vec<_> = pending.keys().map(String::as_str).collect();
            return Err(MorceusError::invalid_format(
                names.join(", "),
                "Circular template dependencies",
            ));
        }
        for name in ready {
            if let Some(template) = pending.remove(&name) {
                let table = template.expand(&expanded)?;
                expanded.insert(name, table);
            }
        }
    }
    Ok(expanded.into_values().collect())
}

/// Expands the templates found under the given paths.
///
/// Target templates are the paradigms referenced by stems; dependency
/// templates are building blocks invoked by other templates. Both are
/// returned, sorted by name.
pub fn expand_templates<P>(target_dirs: &[P], dependency_dirs: &[P]) -> Result<Vec<InflectionTable>>
where
    P: AsRef<Path>,
{
    let mut templates = vec![];
    for path in files_in_paths(target_dirs)?
        .into_iter()
        .chain(files_in_paths(dependency_dirs)?)
    {
        templates.push(InflectionTemplate::from_path(path)?);
    }
    expand_loaded_templates(templates)
}

/// Writes one `<name>.table` file per table into `output_dir`, returning the
/// written paths.
pub fn save_expanded_tables<P>(tables: &[InflectionTable], output_dir: P) -> Result<Vec<PathBuf>>
where
    P: AsRef<Path>,
{
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;
    let mut written = vec![];
    for table in tables {
        let path = output_dir.join(format!("{}.table", table.name));
        fs::write(&path, table.to_string())?;
        written.push(path);
    }
    tracing::debug!(tables = written.len(), dir = %output_dir.display(), "saved expanded tables");
    Ok(written)
}

/// Expands templates and writes one `<name>.table` file per table into
/// `output_dir`, returning the written paths.
pub fn expand_templates_and_save<P, Q>(
    target_dirs: &[P],
    dependency_dirs: &[P],
    output_dir: Q,
) -> Result<Vec<PathBuf>>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let tables = expand_templates(target_dirs, dependency_dirs)?;
    save_expanded_tables(&tables, output_dir)
}
