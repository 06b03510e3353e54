//! Integrity checks for puzzle files.
//!
//! Each file is checked on its own first (in parallel): JSON syntax, required
//! fields, grid shape and cell values, clue counts, and solvability through
//! the propagation engine. Checks that span the batch (duplicate ids and
//! duplicate grid content) then run in file order.

use std::{
    collections::{BTreeSet, HashMap},
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use binairo_core::Grid;
use binairo_solver::{PropagationEngine, SolveStatus};
use log::debug;
use rayon::prelude::*;
use serde_json::{Map, Value};
use sha2::{Digest as _, Sha256};

/// Fields every puzzle must have.
pub const REQUIRED_FIELDS: [&str; 4] = ["id", "size", "difficulty", "puzzle"];

/// Fields a puzzle may have.
pub const OPTIONAL_FIELDS: [&str; 1] = ["puzzle_id"];

/// Accepted values of `size`.
pub const VALID_SIZES: [&str; 4] = ["6x6", "8x8", "10x10", "14x14"];

/// Accepted values of `difficulty`.
pub const VALID_DIFFICULTIES: [&str; 2] = ["easy", "hard"];

/// Validation result of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReport {
    /// The validated file.
    pub file: PathBuf,
    /// Problems that make the file invalid.
    pub errors: Vec<String>,
    /// Problems worth a look that do not invalidate the file.
    pub warnings: Vec<String>,
}

impl FileReport {
    /// Returns `true` if no error was found.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Solvability {
    Solved,
    Contradiction,
    Stalled,
}

/// Results of the checks that only need one puzzle.
#[derive(Debug, Default)]
struct PuzzleInspection {
    prefix: String,
    errors: Vec<String>,
    warnings: Vec<String>,
    id: Option<u64>,
    content_hash: Option<String>,
    solvability: Option<(Solvability, String)>,
}

#[derive(Debug)]
struct FileInspection {
    report: FileReport,
    puzzles: Vec<PuzzleInspection>,
}

/// Validates puzzle files.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    strict: bool,
    engine: PropagationEngine,
}

impl Validator {
    /// Creates a validator.
    ///
    /// In strict mode unexpected fields and very few clues produce warnings,
    /// and a puzzle the techniques cannot finish is an error.
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            engine: PropagationEngine::with_all_techniques(),
        }
    }

    /// Validates `files` as one batch and returns a report per file, in order.
    pub fn validate(&self, files: &[PathBuf]) -> Vec<FileReport> {
        let inspections = files
            .par_iter()
            .map(|file| self.inspect_file(file))
            .collect::<Vec<_>>();

        let mut seen_ids = HashMap::new();
        let mut seen_content = HashMap::new();
        inspections
            .into_iter()
            .map(|inspection| {
                let FileInspection {
                    mut report,
                    puzzles,
                } = inspection;
                for puzzle in puzzles {
                    self.finish(&mut report, puzzle, &mut seen_ids, &mut seen_content);
                }
                debug!(
                    "{}: {} errors, {} warnings",
                    report.file.display(),
                    report.errors.len(),
                    report.warnings.len()
                );
                report
            })
            .collect()
    }

    fn finish(
        &self,
        report: &mut FileReport,
        mut puzzle: PuzzleInspection,
        seen_ids: &mut HashMap<u64, PathBuf>,
        seen_content: &mut HashMap<String, PathBuf>,
    ) {
        if let Some(hash) = puzzle.content_hash.take() {
            if let Some(original) = seen_content.get(&hash) {
                puzzle.warnings.push(format!(
                    "Duplicate puzzle content found in: {}",
                    original.display()
                ));
            } else {
                seen_content.insert(hash, report.file.clone());
            }
        }

        if let Some(id) = puzzle.id {
            if seen_ids.contains_key(&id) {
                puzzle.errors.push(format!("Duplicate puzzle ID: {id}"));
            } else {
                seen_ids.insert(id, report.file.clone());
            }
        }

        if puzzle.errors.is_empty() {
            match puzzle.solvability {
                Some((Solvability::Solved, _)) | None => {}
                Some((Solvability::Contradiction, reason)) => {
                    puzzle
                        .errors
                        .push(format!("Puzzle data is contradictory: {reason}"));
                }
                Some((Solvability::Stalled, _)) if self.strict => {
                    puzzle
                        .errors
                        .push("Puzzle cannot be solved using human techniques".to_owned());
                }
                Some((Solvability::Stalled, _)) => {
                    puzzle
                        .warnings
                        .push("Puzzle may require advanced techniques or be unsolvable".to_owned());
                }
            }
        }

        let prefix = &puzzle.prefix;
        report
            .errors
            .extend(puzzle.errors.into_iter().map(|e| format!("{prefix}{e}")));
        report
            .warnings
            .extend(puzzle.warnings.into_iter().map(|w| format!("{prefix}{w}")));
    }

    fn inspect_file(&self, file: &Path) -> FileInspection {
        let mut report = FileReport {
            file: file.to_owned(),
            ..FileReport::default()
        };
        let mut puzzles = vec![];

        match fs::read_to_string(file) {
            Err(err) => report.errors.push(format!("Error reading file: {err}")),
            Ok(text) => match serde_json::from_str::<Value>(&text) {
                Err(err) => report.errors.push(format!("Invalid JSON: {err}")),
                Ok(Value::Array(entries)) => {
                    if entries.is_empty() {
                        report.errors.push("Empty puzzle array".to_owned());
                    }
                    for (i, entry) in entries.iter().enumerate() {
                        match entry {
                            Value::Object(data) => {
                                puzzles.push(self.inspect_puzzle(data, format!("Puzzle {i}: ")));
                            }
                            _ => report.errors.push(format!("Puzzle {i} is not an object")),
                        }
                    }
                }
                Ok(Value::Object(data)) => puzzles.push(self.inspect_puzzle(&data, String::new())),
                Ok(_) => report
                    .errors
                    .push("Root element must be an object or array".to_owned()),
            },
        }

        FileInspection { report, puzzles }
    }

    fn inspect_puzzle(&self, data: &Map<String, Value>, prefix: String) -> PuzzleInspection {
        let mut inspection = PuzzleInspection {
            prefix,
            ..PuzzleInspection::default()
        };
        self.check_fields(data, &mut inspection);
        if let Some(puzzle) = data.get("puzzle") {
            let rows = self.check_grid(data, puzzle, &mut inspection);
            inspection.content_hash = Some(content_hash(puzzle));
            if let Some(rows) = rows {
                if inspection.errors.is_empty() {
                    inspection.solvability = Some(self.check_solvability(&rows));
                }
            }
        }
        inspection
    }

    fn check_fields(&self, data: &Map<String, Value>, inspection: &mut PuzzleInspection) {
        let errors = &mut inspection.errors;
        for field in REQUIRED_FIELDS {
            if !data.contains_key(field) {
                errors.push(format!("Missing required field: {field}"));
            }
        }

        if let Some(id) = data.get("id") {
            match id.as_u64().filter(|&id| id > 0) {
                Some(id) => inspection.id = Some(id),
                None => errors.push("Field 'id' must be a positive integer".to_owned()),
            }
        }

        if let Some(size) = data.get("size") {
            if !size.as_str().is_some_and(|size| VALID_SIZES.contains(&size)) {
                errors.push(format!(
                    "Invalid size {size}. Must be one of: {}",
                    VALID_SIZES.join(", ")
                ));
            }
        }

        if let Some(difficulty) = data.get("difficulty") {
            if !difficulty
                .as_str()
                .is_some_and(|difficulty| VALID_DIFFICULTIES.contains(&difficulty))
            {
                errors.push(format!(
                    "Invalid difficulty {difficulty}. Must be one of: {}",
                    VALID_DIFFICULTIES.join(", ")
                ));
            }
        }

        if self.strict {
            let extra = data
                .keys()
                .filter(|key| {
                    !REQUIRED_FIELDS.contains(&key.as_str()) && !OPTIONAL_FIELDS.contains(&key.as_str())
                })
                .collect::<BTreeSet<_>>();
            if !extra.is_empty() {
                let fields = extra
                    .into_iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                inspection
                    .warnings
                    .push(format!("Unexpected fields: {fields}"));
            }
        }
    }

    /// Checks the grid shape and cell values, returning the rows when they
    /// are well formed.
    fn check_grid(
        &self,
        data: &Map<String, Value>,
        puzzle: &Value,
        inspection: &mut PuzzleInspection,
    ) -> Option<Vec<Vec<Option<u8>>>> {
        let errors = &mut inspection.errors;
        let Value::Array(rows) = puzzle else {
            errors.push("Puzzle must be a 2D array".to_owned());
            return None;
        };
        let size_label = data.get("size").and_then(Value::as_str)?;
        let expected = declared_side(size_label)?;

        if rows.len() != expected {
            errors.push(format!(
                "Grid height {} doesn't match size {size_label}",
                rows.len()
            ));
            return None;
        }

        let mut cells = Vec::with_capacity(expected);
        let mut well_formed = true;
        for (i, row) in rows.iter().enumerate() {
            let Value::Array(row) = row else {
                errors.push(format!("Row {i} is not an array"));
                well_formed = false;
                continue;
            };
            if row.len() != expected {
                errors.push(format!(
                    "Row {i} has {} cells, expected {expected}",
                    row.len()
                ));
                well_formed = false;
                continue;
            }
            let mut values = Vec::with_capacity(expected);
            for (j, cell) in row.iter().enumerate() {
                match cell {
                    Value::Null => values.push(None),
                    Value::Number(n) if matches!(n.as_u64(), Some(0 | 1)) => {
                        values.push(n.as_u64().and_then(|v| u8::try_from(v).ok()));
                    }
                    _ => {
                        errors.push(format!(
                            "Invalid cell value at ({i},{j}): {cell}. Must be null, 0, or 1"
                        ));
                        well_formed = false;
                    }
                }
            }
            cells.push(values);
        }
        if !well_formed {
            return None;
        }

        let total = expected * expected;
        let clues = cells.iter().flatten().filter(|cell| cell.is_some()).count();
        if clues == 0 {
            inspection.warnings.push("Puzzle has no clues".to_owned());
        } else if clues >= total {
            inspection
                .warnings
                .push("Puzzle is completely filled".to_owned());
        } else if self.strict && clues < expected / 2 {
            inspection.warnings.push(format!(
                "Very few clues ({clues}), puzzle may be too hard"
            ));
        }

        Some(cells)
    }

    fn check_solvability(&self, rows: &[Vec<Option<u8>>]) -> (Solvability, String) {
        let grid = match Grid::from_rows(rows) {
            Ok(grid) => grid,
            Err(err) => return (Solvability::Contradiction, err.to_string()),
        };
        let outcome = self.engine.solve(grid);
        match outcome.status {
            SolveStatus::Solved => (Solvability::Solved, String::new()),
            SolveStatus::Contradiction(contradiction) => {
                (Solvability::Contradiction, contradiction.to_string())
            }
            SolveStatus::Stalled | SolveStatus::Running => (
                Solvability::Stalled,
                format!("{} unknown cells left", outcome.grid.unknown_count()),
            ),
        }
    }
}

/// Parses the side length of a size label such as `"8x8"`.
fn declared_side(size: &str) -> Option<usize> {
    let (rows, _) = size.split_once('x')?;
    rows.parse().ok()
}

/// Hex SHA-256 digest of the canonical JSON form of a grid.
fn content_hash(puzzle: &Value) -> String {
    hex::encode(Sha256::digest(puzzle.to_string().as_bytes()))
}

/// Writes the result of one file.
///
/// Warnings are shown when `verbose` is set or the file is invalid.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_report<W>(out: &mut W, report: &FileReport, verbose: bool) -> io::Result<()>
where
    W: Write,
{
    let status = if report.is_valid() { "✓" } else { "✗" };
    let name = report
        .file
        .file_name()
        .map_or_else(|| report.file.display().to_string(), |name| {
            name.to_string_lossy().into_owned()
        });
    writeln!(out, "{status} {name}")?;
    for error in &report.errors {
        writeln!(out, "    ERROR: {error}")?;
    }
    if verbose || !report.is_valid() {
        for warning in &report.warnings {
            writeln!(out, "    WARNING: {warning}")?;
        }
    }
    Ok(())
}

/// Writes the batch summary.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_summary<W>(out: &mut W, reports: &[FileReport]) -> io::Result<()>
where
    W: Write,
{
    let total = reports.len();
    let valid = reports.iter().filter(|report| report.is_valid()).count();
    writeln!(out)?;
    writeln!(out, "Validation Summary:")?;
    writeln!(out, "  Total files: {total}")?;
    writeln!(out, "  Valid: {valid}")?;
    writeln!(out, "  Invalid: {}", total - valid)?;

    let mut counts = HashMap::<&str, usize>::new();
    for error in reports.iter().flat_map(|report| &report.errors) {
        *counts.entry(error).or_default() += 1;
    }
    let mut repeated = counts
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .collect::<Vec<_>>();
    if !repeated.is_empty() {
        repeated.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        writeln!(out)?;
        writeln!(out, "Common Errors:")?;
        for (error, count) in repeated {
            writeln!(out, "  {error} ({count} files)")?;
        }
    }
    Ok(())
}
