use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use morceus::cruncher::{CrunchResult, VowelLength};
use morceus::{decompose_token, CruncherOptions, CruncherTables, MorceusConfig, MorceusCruncher};

use clap::{error::ErrorKind, CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(name = "crunch", about = "A program to analyze Latin words.")]
struct Args {
    /// Binary tables written by `compile` (in zstd).
    ///
    /// If this argument is not specified, the tables are built from the sources.
    #[clap(short = 'i', long)]
    tables_in: Option<PathBuf>,

    /// Root of the Latin data.
    #[clap(long, env = "MORCEUS_DATA_ROOT")]
    data_root: Option<PathBuf>,

    /// Target template file or directory, replacing the one under the data root.
    #[clap(long)]
    target_dir: Vec<PathBuf>,

    /// Dependency template file or directory, replacing the one under the data root.
    #[clap(long)]
    dependency_dir: Vec<PathBuf>,

    /// Noun stem file or directory, replacing the one under the data root.
    #[clap(long)]
    noun_stems: Vec<PathBuf>,

    /// Verb stem file or directory, replacing the one under the data root.
    #[clap(long)]
    verb_stems: Vec<PathBuf>,

    /// Requires the vowel lengths of the input to match.
    #[clap(long)]
    strict: bool,

    /// Does not try the first letter in the other case.
    #[clap(long)]
    exact_case: bool,

    /// Does not read `u` as `v`.
    #[clap(long)]
    exact_uv: bool,

    /// Does not read `i` as `j`.
    #[clap(long)]
    exact_ij: bool,

    /// Also tries the words with a trailing `que`, `ne`, or `ve` removed.
    #[clap(long)]
    enclitics: bool,

    /// Splits contracted tokens (e.g. `Romast`) before the analysis.
    #[clap(long)]
    decompose: bool,

    /// Words to analyze. Words are read from stdin, one per line, if none are given.
    words: Vec<String>,
}

impl Args {
    fn config(&self) -> MorceusConfig {
        let overrides = MorceusConfig {
            target_dirs: self.target_dir.clone(),
            dependency_dirs: self.dependency_dir.clone(),
            noun_stem_paths: self.noun_stems.clone(),
            verb_stem_paths: self.verb_stems.clone(),
        };
        MorceusConfig::with_overrides(self.data_root.as_ref(), overrides)
    }

    fn options(&self) -> CruncherOptions {
        CruncherOptions {
            vowel_length: if self.strict {
                VowelLength::Strict
            } else {
                VowelLength::Relaxed
            },
            relax_case: !self.exact_case,
            relax_u_and_v: !self.exact_uv,
            relax_i_and_j: !self.exact_ij,
            handle_enclitics: self.enclitics,
        }
    }
}

fn relaxations(result: &CrunchResult) -> String {
    let mut flags = vec![];
    if result.relaxed_case {
        flags.push("case");
    }
    if result.relaxed_vowel_lengths {
        flags.push("length");
    }
    if result.relaxed_u_and_v {
        flags.push("uv");
    }
    if result.relaxed_i_and_j {
        flags.push("ij");
    }
    if flags.is_empty() {
        "*".to_string()
    } else {
        flags.join(",")
    }
}

fn write_analyses<W>(
    out: &mut W,
    cruncher: &MorceusCruncher,
    word: &str,
    options: &CruncherOptions,
) -> std::io::Result<()>
where
    W: Write,
{
    for analysis in cruncher.crunch(word, options) {
        for form in &analysis.inflected_forms {
            for data in &form.inflection_data {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    word,
                    analysis.lemma,
                    form.form,
                    data.context,
                    data.enclitic.as_deref().unwrap_or("*"),
                    relaxations(data),
                )?;
            }
        }
    }
    Ok(())
}

/// Writes the analyses of a token followed by `EOS`. With `decompose`, the
/// first decomposition whose every part is known is analyzed.
fn crunch_token<W>(
    out: &mut W,
    cruncher: &MorceusCruncher,
    token: &str,
    decompose: bool,
    options: &CruncherOptions,
) -> std::io::Result<()>
where
    W: Write,
{
    let token = token.trim();
    if token.is_empty() {
        return Ok(());
    }
    if decompose {
        let is_known = |part: &String| !cruncher.crunch_word(part, options).is_empty();
        let hypotheses = decompose_token(token);
        match hypotheses.iter().find(|parts| parts.iter().all(&is_known)) {
            Some(parts) => {
                for part in parts {
                    write_analyses(out, cruncher, part, options)?;
                }
            }
            None => write_analyses(out, cruncher, token, options)?,
        }
    } else {
        write_analyses(out, cruncher, token, options)?;
    }
    writeln!(out, "EOS")?;
    out.flush()
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let options = args.options();

    eprintln!("Loading the tables...");
    let start = Instant::now();
    let tables = if let Some(tables_in) = &args.tables_in {
        let reader = zstd::Decoder::new(File::open(tables_in)?)?;
        CruncherTables::read(reader)?
    } else {
        let config = args.config();
        if config.target_dirs.is_empty() || config.noun_stem_paths.is_empty() {
            Args::command()
                .error(
                    ErrorKind::MissingRequiredArgument,
                    "Either --tables-in or --data-root (or MORCEUS_DATA_ROOT) must be specified.",
                )
                .exit();
        }
        CruncherTables::from_config(&config)?
    };
    let cruncher = MorceusCruncher::new(Arc::new(tables));
    eprintln!("{} seconds", start.elapsed().as_secs_f64());

    let out = std::io::stdout();
    let mut out = BufWriter::new(out.lock());
    if args.words.is_empty() {
        #[allow(clippy::significant_drop_in_scrutinee)]
        for line in std::io::stdin().lock().lines() {
            crunch_token(&mut out, &cruncher, &line?, args.decompose, &options)?;
        }
    } else {
        for word in &args.words {
            crunch_token(&mut out, &cruncher, word, args.decompose, &options)?;
        }
    }

    Ok(())
}
