//! Command-line tools for Binairo puzzle files.
//!
//! ```text
//! binairo solve puzzles/6x6_easy.json --steps
//! binairo validate puzzles/*.json --strict
//! binairo rank puzzles/*.json --sort-by moves --export-csv ranking.csv
//! ```

use std::{
    fs,
    io::{self, Write as _},
    path::PathBuf,
    process::ExitCode,
};

use binairo_rank::{DifficultyRanker, RankPolicy};
use binairo_solver::{PropagationEngine, technique};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use self::{
    puzzle_file::PuzzleFileError,
    report::{SolveOptions, SortKey},
    validate::Validator,
};

mod puzzle_file;
mod report;
mod validate;

/// Solve, validate and rank Binairo puzzles with human techniques.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Show more detail.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve a puzzle step by step.
    Solve {
        /// Puzzle JSON file.
        file: PathBuf,
        /// Puzzle to solve when the file holds several.
        #[arg(long, value_name = "ID")]
        puzzle_id: Option<u64>,
        /// List every step.
        #[arg(long)]
        steps: bool,
        /// Technique set to solve with.
        #[arg(long, value_name = "SET", default_value_t = TechniqueSet::All)]
        techniques: TechniqueSet,
    },
    /// Check puzzle files for structural and logical problems.
    Validate {
        /// Puzzle JSON files.
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Treat puzzles the techniques cannot finish as invalid.
        #[arg(long)]
        strict: bool,
    },
    /// Rank puzzle difficulty by the techniques a solve needs.
    Rank {
        /// Puzzle JSON files.
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Show the full analysis of every puzzle.
        #[arg(long)]
        detailed: bool,
        /// Show technique usage across all puzzles.
        #[arg(long)]
        technique_breakdown: bool,
        /// Write one CSV row per puzzle to this file.
        #[arg(long, value_name = "PATH")]
        export_csv: Option<PathBuf>,
        /// Order of the summary table.
        #[arg(long, value_name = "KEY", default_value_t = SortKey::Difficulty)]
        sort_by: SortKey,
        /// JSON file overriding ranking constants.
        #[arg(long, value_name = "PATH")]
        policy: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, derive_more::Display)]
enum TechniqueSet {
    /// Every technique, including Forced-Move.
    #[display("all")]
    All,
    /// Line techniques only.
    #[display("lines")]
    Lines,
}

impl TechniqueSet {
    fn engine(self) -> PropagationEngine {
        match self {
            TechniqueSet::All => PropagationEngine::with_all_techniques(),
            TechniqueSet::Lines => PropagationEngine::new(technique::line_techniques()),
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
enum CliError {
    #[display("{_0}")]
    PuzzleFile(#[from] PuzzleFileError),
    #[display("cannot read policy {}: {source}", path.display())]
    ReadPolicy { path: PathBuf, source: io::Error },
    #[display("invalid policy {}: {source}", path.display())]
    ParsePolicy {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display("cannot export {}: {source}", path.display())]
    ExportCsv { path: PathBuf, source: csv::Error },
    #[display("cannot write output: {_0}")]
    Output(#[from] io::Error),
    #[display("no puzzles could be analyzed")]
    NothingRanked,
}

fn main() -> ExitCode {
    better_panic::install();
    env_logger::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let verbose = cli.verbose;
    match cli.command {
        Command::Solve {
            file,
            puzzle_id,
            steps,
            techniques,
        } => {
            let records = puzzle_file::load(&file)?;
            let record = puzzle_file::select(&records, puzzle_id)?;
            let grid = record.grid()?;
            let outcome = techniques.engine().solve(grid.clone());
            info!("{}: {:?}", file.display(), outcome.status);

            let mut out = io::stdout().lock();
            report::write_solve_report(
                &mut out,
                record,
                records.len(),
                &grid,
                &outcome,
                SolveOptions { steps, verbose },
            )?;
            Ok(if outcome.status.is_solved() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Validate { files, strict } => {
            let reports = Validator::new(strict).validate(&files);
            let mut out = io::stdout().lock();
            for report in &reports {
                validate::write_report(&mut out, report, verbose)?;
            }
            validate::write_summary(&mut out, &reports)?;
            Ok(if reports.iter().all(validate::FileReport::is_valid) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Rank {
            files,
            detailed,
            technique_breakdown,
            export_csv,
            sort_by,
            policy,
        } => {
            let ranker = match policy {
                Some(path) => DifficultyRanker::with_policy(load_policy(path)?),
                None => DifficultyRanker::new(),
            };
            let mut out = io::stdout().lock();
            writeln!(out, "Analyzing {} file(s)...", files.len())?;

            let (mut entries, errors) =
                report::rank_files(&files, &PropagationEngine::with_all_techniques(), &ranker);
            for err in &errors {
                eprintln!("error: {err}");
            }
            if entries.is_empty() {
                return Err(CliError::NothingRanked);
            }

            if detailed || entries.len() == 1 {
                for entry in &entries {
                    report::write_detailed(&mut out, entry)?;
                }
            } else {
                report::sort_entries(&mut entries, sort_by);
                report::write_table(&mut out, &entries)?;
            }
            if entries.len() > 1 {
                report::write_aggregate(&mut out, &entries)?;
            }
            if technique_breakdown {
                report::write_technique_breakdown(&mut out, &entries)?;
            }

            if let Some(path) = export_csv {
                report::export_csv(&path, &entries)
                    .map_err(|source| CliError::ExportCsv {
                        path: path.clone(),
                        source,
                    })?;
                writeln!(out, "Exported results to {}", path.display())?;
            }
            Ok(if errors.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

fn load_policy(path: PathBuf) -> Result<RankPolicy, CliError> {
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(source) => return Err(CliError::ReadPolicy { path, source }),
    };
    serde_json::from_str(&text).map_err(|source| CliError::ParsePolicy { path, source })
}
