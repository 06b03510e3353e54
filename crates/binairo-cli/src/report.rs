//! Human-readable output of the `solve` and `rank` commands.

use std::{
    collections::BTreeMap,
    io::{self, Write},
    path::{Path, PathBuf},
};

use binairo_core::Grid;
use binairo_rank::{Difficulty, DifficultyLabel, DifficultyRanker, MAX_SCORE};
use binairo_solver::{PropagationEngine, SolveOutcome, SolveStatus, technique::TechniqueKind};
use log::debug;
use rayon::prelude::*;
use serde::Serialize;

use crate::puzzle_file::{self, PuzzleFileError, PuzzleRecord};

/// What the solve report includes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolveOptions {
    /// List every step.
    pub steps: bool,
    /// Add the justification to every listed step.
    pub verbose: bool,
}

/// Writes the result of solving `record`.
///
/// `puzzle_count` is the number of puzzles in the file `record` came from.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_solve_report<W>(
    out: &mut W,
    record: &PuzzleRecord,
    puzzle_count: usize,
    initial: &Grid,
    outcome: &SolveOutcome,
    options: SolveOptions,
) -> io::Result<()>
where
    W: Write,
{
    if puzzle_count > 1 {
        writeln!(
            out,
            "File contains {puzzle_count} puzzles. Using puzzle ID {}.",
            record.id
        )?;
    }
    writeln!(out, "Puzzle ID: {}", record.id)?;
    writeln!(out, "Size: {}", record.size)?;
    writeln!(out, "Difficulty: {}", record.difficulty)?;
    writeln!(out, "Source ID: {}", record.source_label())?;
    writeln!(out)?;
    writeln!(out, "Initial puzzle ({} clues):", initial.givens_count())?;
    writeln!(out, "{initial}")?;
    writeln!(out)?;

    match &outcome.status {
        SolveStatus::Solved => {
            writeln!(out, "Solved in {} steps.", outcome.trace.len())?;
        }
        SolveStatus::Contradiction(contradiction) => {
            writeln!(out, "Contradiction: {contradiction}")?;
            if let Some(step) = contradiction.step {
                writeln!(out, "  at step: {step}")?;
            }
        }
        SolveStatus::Stalled | SolveStatus::Running => {
            writeln!(
                out,
                "Stalled after {} steps with {} unknown cells left.",
                outcome.trace.len(),
                outcome.grid.unknown_count()
            )?;
        }
    }
    writeln!(out)?;
    writeln!(out, "Final grid:")?;
    writeln!(out, "{}", outcome.grid)?;

    let stats = outcome.stats();
    if stats.has_progress() {
        writeln!(out)?;
        writeln!(out, "Technique usage:")?;
        for (kind, count) in stats.iter() {
            writeln!(out, "  {kind}: {count}")?;
        }
    }

    if options.steps && !outcome.trace.is_empty() {
        writeln!(out)?;
        writeln!(out, "Steps:")?;
        for (i, step) in outcome.trace.iter().enumerate() {
            if options.verbose {
                writeln!(out, "{:>4}. {step}: {}", i + 1, step.justification)?;
            } else {
                writeln!(out, "{:>4}. {step}", i + 1)?;
            }
        }
    }
    Ok(())
}

/// How a puzzle ended up in the ranking.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// The puzzle was solved and its trace ranked.
    Ranked(Difficulty),
    /// The techniques could not finish the puzzle.
    Stalled,
    /// The puzzle data is contradictory.
    Contradiction,
}

/// One ranked puzzle.
#[derive(Debug, Clone, PartialEq)]
pub struct RankEntry {
    /// The file the puzzle came from.
    pub file: PathBuf,
    /// Puzzle id within the collection.
    pub id: u64,
    /// Identifier on the source site.
    pub source: String,
    /// Declared size.
    pub size: String,
    /// Declared difficulty.
    pub stated: String,
    /// Final score.
    pub score: f64,
    /// Label of the score.
    pub label: DifficultyLabel,
    /// Ranking details.
    pub verdict: Verdict,
}

impl RankEntry {
    fn new(
        file: &Path,
        record: &PuzzleRecord,
        outcome: &SolveOutcome,
        ranker: &DifficultyRanker,
    ) -> Self {
        let verdict = match outcome.status {
            SolveStatus::Solved => {
                Verdict::Ranked(ranker.rank(&outcome.trace, outcome.grid.size()))
            }
            SolveStatus::Contradiction(_) => Verdict::Contradiction,
            SolveStatus::Stalled | SolveStatus::Running => Verdict::Stalled,
        };
        let score = match &verdict {
            Verdict::Ranked(difficulty) => difficulty.score,
            Verdict::Stalled | Verdict::Contradiction => MAX_SCORE,
        };
        Self {
            file: file.to_owned(),
            id: record.id,
            source: record.source_label(),
            size: record.size.clone(),
            stated: record.difficulty.clone(),
            score,
            label: ranker.label(score),
            verdict,
        }
    }

    /// Returns the ranking details of a solved puzzle.
    #[must_use]
    pub fn difficulty(&self) -> Option<&Difficulty> {
        match &self.verdict {
            Verdict::Ranked(difficulty) => Some(difficulty),
            Verdict::Stalled | Verdict::Contradiction => None,
        }
    }

    /// Returns the number of steps of a solved puzzle.
    #[must_use]
    pub fn moves(&self) -> Option<usize> {
        self.difficulty().map(|difficulty| difficulty.total_steps)
    }

    /// Describes the solve.
    #[must_use]
    pub fn analysis(&self) -> String {
        match &self.verdict {
            Verdict::Ranked(difficulty) => difficulty.analysis(),
            Verdict::Stalled => "Could not solve with human techniques".to_owned(),
            Verdict::Contradiction => "Puzzle data is contradictory".to_owned(),
        }
    }
}

/// Order of the summary table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, derive_more::Display)]
pub enum SortKey {
    /// Easiest first.
    #[default]
    #[display("difficulty")]
    Difficulty,
    /// Fewest steps first. Unsolved puzzles come last.
    #[display("moves")]
    Moves,
    /// By file name, then puzzle id.
    #[display("file")]
    File,
}

/// Solves and ranks every puzzle of every file.
///
/// Files are processed in parallel. Entries and errors are returned in
/// file order.
pub fn rank_files(
    files: &[PathBuf],
    engine: &PropagationEngine,
    ranker: &DifficultyRanker,
) -> (Vec<RankEntry>, Vec<PuzzleFileError>) {
    let results = files
        .par_iter()
        .map(|file| rank_file(file, engine, ranker))
        .collect::<Vec<_>>();

    let mut entries = vec![];
    let mut errors = vec![];
    for result in results.into_iter().flatten() {
        match result {
            Ok(entry) => entries.push(entry),
            Err(err) => errors.push(err),
        }
    }
    (entries, errors)
}

/// Ranks every puzzle of `file`. A puzzle with an invalid grid yields an
/// error in its place without dropping the rest of the file.
fn rank_file(
    file: &Path,
    engine: &PropagationEngine,
    ranker: &DifficultyRanker,
) -> Vec<Result<RankEntry, PuzzleFileError>> {
    let records = match puzzle_file::load(file) {
        Ok(records) => records,
        Err(err) => return vec![Err(err)],
    };
    records
        .iter()
        .map(|record| -> Result<RankEntry, PuzzleFileError> {
            let outcome = engine.solve(record.grid()?);
            debug!(
                "{} #{}: {} steps",
                file.display(),
                record.id,
                outcome.trace.len()
            );
            Ok(RankEntry::new(file, record, &outcome, ranker))
        })
        .collect()
}

/// Sorts entries for the summary table. The sort is stable.
pub fn sort_entries(entries: &mut [RankEntry], key: SortKey) {
    match key {
        SortKey::Difficulty => entries.sort_by(|a, b| a.score.total_cmp(&b.score)),
        SortKey::Moves => entries.sort_by_key(|entry| entry.moves().unwrap_or(usize::MAX)),
        SortKey::File => entries.sort_by(|a, b| a.file.cmp(&b.file).then(a.id.cmp(&b.id))),
    }
}

/// Writes the full analysis of one puzzle.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_detailed<W>(out: &mut W, entry: &RankEntry) -> io::Result<()>
where
    W: Write,
{
    writeln!(out)?;
    writeln!(out, "Puzzle: {}", entry.file.display())?;
    writeln!(out, "ID: {} (Source: {})", entry.id, entry.source)?;
    writeln!(out, "Size: {}, Stated: {}", entry.size, entry.stated)?;
    writeln!(
        out,
        "Human Difficulty Score: {}/10 ({})",
        entry.score, entry.label
    )?;
    if let Some(difficulty) = entry.difficulty() {
        let breakdown = difficulty
            .usage
            .iter()
            .map(|(kind, count)| format!("{kind}: {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "Total Moves: {}", difficulty.total_steps)?;
        writeln!(out, "Techniques Used: {}", difficulty.variety)?;
        writeln!(out, "Technique Breakdown: {breakdown}")?;
        writeln!(
            out,
            "Advanced Technique Ratio: {:.1}%",
            difficulty.advanced_ratio * 100.0
        )?;
        writeln!(
            out,
            "Interaction Complexity: {:.2}",
            difficulty.components.interaction
        )?;
    }
    writeln!(out, "Analysis: {}", entry.analysis())?;
    Ok(())
}

fn clip(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

/// Writes one line per entry, in the given order.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_table<W>(out: &mut W, entries: &[RankEntry]) -> io::Result<()>
where
    W: Write,
{
    writeln!(out)?;
    writeln!(
        out,
        "{:<20} {:<8} {:<6} {:<8} {:<6} {:<6} Analysis",
        "File", "ID", "Size", "Stated", "Score", "Moves"
    )?;
    writeln!(out, "{}", "-".repeat(80))?;
    for entry in entries {
        let file = entry
            .file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let moves = entry
            .moves()
            .map_or_else(|| "N/A".to_owned(), |moves| moves.to_string());
        writeln!(
            out,
            "{:<20} {:<8} {:<6} {:<8} {:<6} {:<6} {}",
            clip(&file, 18),
            clip(&entry.id.to_string(), 6),
            clip(&entry.size, 5),
            clip(&entry.stated, 6),
            format!("{}/10", entry.score),
            clip(&moves, 4),
            clip(&entry.analysis(), 30),
        )?;
    }
    Ok(())
}

/// Writes count, average and range of the scores.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_aggregate<W>(out: &mut W, entries: &[RankEntry]) -> io::Result<()>
where
    W: Write,
{
    let Some(first) = entries.first() else {
        return Ok(());
    };
    let (min, max, sum) = entries.iter().fold(
        (first.score, first.score, 0.0),
        |(min, max, sum), entry| (min.min(entry.score), max.max(entry.score), sum + entry.score),
    );
    #[expect(clippy::cast_precision_loss)]
    let average = sum / entries.len() as f64;
    writeln!(out)?;
    writeln!(out, "Aggregate Statistics:")?;
    writeln!(out, "Puzzles analyzed: {}", entries.len())?;
    writeln!(out, "Average difficulty: {average:.1}/10")?;
    writeln!(out, "Difficulty range: {min}-{max}")?;
    Ok(())
}

/// Writes how often each technique was used across all solved puzzles,
/// most used first.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_technique_breakdown<W>(out: &mut W, entries: &[RankEntry]) -> io::Result<()>
where
    W: Write,
{
    let mut totals = BTreeMap::<TechniqueKind, usize>::new();
    for difficulty in entries.iter().filter_map(RankEntry::difficulty) {
        for (&kind, &count) in &difficulty.usage {
            *totals.entry(kind).or_default() += count;
        }
    }
    let mut totals = totals.into_iter().collect::<Vec<_>>();
    totals.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    writeln!(out)?;
    writeln!(out, "Technique Usage Across All Puzzles:")?;
    for (kind, count) in totals {
        writeln!(out, "  {kind}: {count} uses")?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    file: String,
    puzzle_id: u64,
    source_id: &'a str,
    size: &'a str,
    stated_difficulty: &'a str,
    difficulty_score: f64,
    label: String,
    solved: bool,
    total_moves: Option<usize>,
    technique_variety: Option<usize>,
    complexity_score: Option<f64>,
    advanced_ratio: Option<f64>,
    interaction_complexity: Option<f64>,
    analysis: String,
}

impl<'a> CsvRow<'a> {
    fn new(entry: &'a RankEntry) -> Self {
        let difficulty = entry.difficulty();
        Self {
            file: entry.file.display().to_string(),
            puzzle_id: entry.id,
            source_id: &entry.source,
            size: &entry.size,
            stated_difficulty: &entry.stated,
            difficulty_score: entry.score,
            label: entry.label.to_string(),
            solved: difficulty.is_some(),
            total_moves: difficulty.map(|d| d.total_steps),
            technique_variety: difficulty.map(|d| d.variety),
            complexity_score: difficulty.map(|d| d.components.base),
            advanced_ratio: difficulty.map(|d| d.advanced_ratio),
            interaction_complexity: difficulty.map(|d| d.components.interaction),
            analysis: entry.analysis(),
        }
    }
}

/// Writes one CSV row per entry, with a header.
///
/// # Errors
///
/// Returns an error if serializing or writing fails.
pub fn write_csv<W>(writer: W, entries: &[RankEntry]) -> Result<(), csv::Error>
where
    W: Write,
{
    let mut writer = csv::Writer::from_writer(writer);
    for entry in entries {
        writer.serialize(CsvRow::new(entry))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the CSV export to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn export_csv(path: &Path, entries: &[RankEntry]) -> Result<(), csv::Error> {
    let file = std::fs::File::create(path)?;
    write_csv(file, entries)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const SCENARIO: &str = r#"{
        "id": 1,
        "size": "6x6",
        "difficulty": "easy",
        "puzzle": [
            [1, null, 1, null, null, 1],
            [null, null, null, 1, 1, null],
            [null, 0, 0, null, null, null],
            [null, null, null, null, 1, null],
            [0, null, null, null, null, 1],
            [1, null, 1, null, null, 0]
        ],
        "puzzle_id": "4,815,162"
    }"#;

    const SPARSE: &str = r#"{
        "id": 2,
        "size": "6x6",
        "difficulty": "hard",
        "puzzle": [
            [0, 0, null, null, null, null],
            [null, null, null, null, null, null],
            [null, null, null, null, null, null],
            [null, null, null, null, null, null],
            [null, null, null, null, null, null],
            [null, null, null, null, null, null]
        ]
    }"#;

    const BROKEN: &str = r#"{
        "id": 3,
        "size": "6x6",
        "difficulty": "hard",
        "puzzle": [
            [1, 1, 1, null, null, null],
            [null, null, null, null, null, null],
            [null, null, null, null, null, null],
            [null, null, null, null, null, null],
            [null, null, null, null, null, null],
            [null, null, null, null, null, null]
        ]
    }"#;

    fn rank_texts(texts: &[&str]) -> (Vec<RankEntry>, Vec<PuzzleFileError>) {
        let dir = tempfile::tempdir().unwrap();
        let files = texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let path = dir.path().join(format!("p{i}.json"));
                fs::write(&path, text).unwrap();
                path
            })
            .collect::<Vec<_>>();
        rank_files(
            &files,
            &PropagationEngine::with_all_techniques(),
            &DifficultyRanker::new(),
        )
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut out = vec![];
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_solve_report_solved() {
        let record = puzzle_file::parse(SCENARIO).unwrap().remove(0);
        let grid = record.grid().unwrap();
        let outcome = PropagationEngine::with_all_techniques().solve(grid.clone());
        let text = render(|out| {
            write_solve_report(
                out,
                &record,
                1,
                &grid,
                &outcome,
                SolveOptions {
                    steps: true,
                    verbose: true,
                },
            )
        });
        assert!(text.starts_with("Puzzle ID: 1\nSize: 6x6\n"));
        assert!(text.contains("Source ID: 4,815,162"));
        assert!(text.contains("Initial puzzle (13 clues):"));
        assert!(text.contains("Solved in 23 steps."));
        assert!(text.contains("  Duplicate prevention: 2"));
        assert!(text.contains("  23. Set "));
        assert!(!text.contains("  24. "));
    }

    #[test]
    fn test_solve_report_stalled_and_contradiction() {
        let engine = PropagationEngine::with_all_techniques();
        for (text, expected) in [
            (SPARSE, "Stalled after "),
            (BROKEN, "Contradiction: rule violated: "),
        ] {
            let record = puzzle_file::parse(text).unwrap().remove(0);
            let grid = record.grid().unwrap();
            let outcome = engine.solve(grid.clone());
            let report = render(|out| {
                write_solve_report(out, &record, 3, &grid, &outcome, SolveOptions::default())
            });
            assert!(report.starts_with("File contains 3 puzzles."), "{report}");
            assert!(report.contains(expected), "{report}");
            assert!(!report.contains("Steps:"));
        }
    }

    #[test]
    fn test_rank_files_keeps_file_order() {
        let (entries, errors) = rank_texts(&[SPARSE, SCENARIO, "{", BROKEN]);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], PuzzleFileError::Json { .. }));
        assert_eq!(
            entries.iter().map(|e| e.id).collect::<Vec<_>>(),
            [2, 1, 3]
        );

        assert_eq!(entries[0].verdict, Verdict::Stalled);
        assert_eq!(entries[0].score, MAX_SCORE);
        assert_eq!(entries[0].analysis(), "Could not solve with human techniques");
        assert_eq!(entries[0].moves(), None);

        assert_eq!(entries[1].moves(), Some(23));
        assert!(entries[1].score < MAX_SCORE);

        assert_eq!(entries[2].verdict, Verdict::Contradiction);
        assert_eq!(entries[2].analysis(), "Puzzle data is contradictory");
    }

    #[test]
    fn test_invalid_grid_keeps_rest_of_file() {
        let bad_grid =
            r#"{"id": 4, "size": "6x6", "difficulty": "easy", "puzzle": [[0, 1, 2, 0, 1, 0]]}"#;
        let file = format!("[{SPARSE}, {bad_grid}, {SCENARIO}]");
        let (entries, errors) = rank_texts(&[&file, BROKEN]);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], PuzzleFileError::Grid { id: 4, .. }));
        assert_eq!(
            entries.iter().map(|e| e.id).collect::<Vec<_>>(),
            [2, 1, 3]
        );
        assert_eq!(entries[1].moves(), Some(23));
    }

    #[test]
    fn test_sort_entries() {
        let (mut entries, _) = rank_texts(&[SPARSE, SCENARIO, BROKEN]);
        sort_entries(&mut entries, SortKey::Difficulty);
        assert_eq!(entries.iter().map(|e| e.id).collect::<Vec<_>>(), [1, 2, 3]);
        sort_entries(&mut entries, SortKey::File);
        assert_eq!(entries.iter().map(|e| e.id).collect::<Vec<_>>(), [2, 1, 3]);
        sort_entries(&mut entries, SortKey::Moves);
        assert_eq!(entries[0].id, 1);
    }

    #[test]
    fn test_table_and_aggregate() {
        let (entries, _) = rank_texts(&[SCENARIO, SPARSE]);
        let text = render(|out| {
            write_table(out, &entries)?;
            write_aggregate(out, &entries)?;
            write_technique_breakdown(out, &entries)
        });
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(
            lines[1],
            "File                 ID       Size   Stated   Score  Moves  Analysis"
        );
        assert_eq!(lines[2], "-".repeat(80));
        assert!(lines[3].starts_with("p0.json              1        6x6    easy     "));
        assert!(
            lines[4]
                .starts_with("p1.json              2        6x6    hard     10/10  N/A    Could not solve")
        );
        assert!(text.contains("Puzzles analyzed: 2\n"));
        assert!(text.contains(&format!("Difficulty range: {}-10\n", entries[0].score)));
        assert!(text.contains("Technique Usage Across All Puzzles:\n"));
        assert!(text.contains("  Duplicate prevention: 2 uses\n"));
    }

    #[test]
    fn test_detailed() {
        let (entries, _) = rank_texts(&[SCENARIO]);
        let text = render(|out| write_detailed(out, &entries[0]));
        assert!(text.contains("ID: 1 (Source: 4,815,162)\n"));
        assert!(text.contains("Size: 6x6, Stated: easy\n"));
        assert!(text.contains("Total Moves: 23\n"));
        assert!(text.contains("Analysis: Long solve required; requires duplicate prevention"));
    }

    #[test]
    fn test_csv_export() {
        let (entries, _) = rank_texts(&[SCENARIO, SPARSE]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranking.csv");
        export_csv(&path, &entries).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "file");
        assert_eq!(&headers[5], "difficulty_score");
        assert_eq!(headers.len(), 14);

        let rows = reader.records().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "1");
        assert_eq!(&rows[0][2], "4,815,162");
        assert_eq!(&rows[0][7], "true");
        assert_eq!(&rows[0][8], "23");
        assert_eq!(&rows[1][2], "N/A");
        assert_eq!(&rows[1][5], "10.0");
        assert_eq!(&rows[1][7], "false");
        assert_eq!(&rows[1][8], "");
    }
}
