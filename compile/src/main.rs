use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use morceus::stems::all_stems;
use morceus::tables::{
    expand_templates, make_end_index, make_end_index_and_save, save_expanded_tables, IndexMode,
};
use morceus::{CruncherTables, MorceusConfig};

use clap::{error::ErrorKind, CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(
    name = "compile",
    about = "A program to compile the inflection tables and stems of Morceus."
)]
struct Args {
    /// Root of the Latin data, laid out as `latin/ends/{target,dependency}` and
    /// `latin/stems/{nom,verbs}`.
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

    /// File to which the binary tables are output (in zstd).
    #[clap(short = 'o', long)]
    tables_out: Option<PathBuf>,

    /// File to which the ending index is output as text.
    #[clap(long)]
    index_out: Option<PathBuf>,

    /// Tables covered by `--index-out`: all, verbs, or nouns.
    #[clap(long, default_value = "all")]
    index_mode: IndexMode,

    /// Directory to which every expanded table is output as `<name>.table`.
    #[clap(long)]
    expanded_out: Option<PathBuf>,
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

    /// Stems are only needed for the binary tables.
    fn missing_argument(&self, config: &MorceusConfig) -> Option<&'static str> {
        if self.tables_out.is_none() && self.index_out.is_none() && self.expanded_out.is_none() {
            return Some(
                "At least one of --tables-out, --index-out, or --expanded-out must be specified.",
            );
        }
        if config.target_dirs.is_empty() {
            return Some(
                "--data-root (or MORCEUS_DATA_ROOT) must be specified unless --target-dir is given.",
            );
        }
        if self.tables_out.is_some() && config.noun_stem_paths.is_empty() {
            return Some("--tables-out needs --data-root (or MORCEUS_DATA_ROOT) or --noun-stems.");
        }
        None
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.config();
    if let Some(msg) = args.missing_argument(&config) {
        Args::command()
            .error(ErrorKind::MissingRequiredArgument, msg)
            .exit();
    }

    eprintln!("Expanding the templates...");
    let start = Instant::now();
    let tables = expand_templates(&config.target_dirs, &config.dependency_dirs)?;
    eprintln!("{} tables, {} seconds", tables.len(), start.elapsed().as_secs_f64());

    if let Some(expanded_out) = &args.expanded_out {
        eprintln!("Writing the expanded tables...: {:?}", expanded_out);
        let written = save_expanded_tables(&tables, expanded_out)?;
        eprintln!("{} files", written.len());
    }

    if let Some(index_out) = &args.index_out {
        eprintln!("Writing the {} ending index...: {:?}", args.index_mode, index_out);
        let (rows, _) = make_end_index_and_save(&tables, args.index_mode, index_out)?;
        eprintln!("{} endings", rows.len());
    }

    if let Some(tables_out) = args.tables_out {
        eprintln!("Parsing the stems...");
        let start = Instant::now();
        let lemmata = all_stems(&config.noun_stem_paths, &config.verb_stem_paths)?;
        eprintln!("{} lemmata, {} seconds", lemmata.len(), start.elapsed().as_secs_f64());

        let ends = make_end_index(&tables, IndexMode::All)?;
        let cruncher_tables = CruncherTables::new(ends, lemmata);

        eprintln!("Writing the tables in zstd...: {:?}", &tables_out);
        let mut f = zstd::Encoder::new(File::create(tables_out)?, 19)?;
        cruncher_tables.write(&mut f)?;
        f.finish()?;
    }

    Ok(())
}
