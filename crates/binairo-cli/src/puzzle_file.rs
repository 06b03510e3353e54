//! Loading puzzles from JSON puzzle files.
//!
//! A puzzle file holds either a single puzzle object or an array of them:
//!
//! ```json
//! {
//!   "id": 1,
//!   "size": "6x6",
//!   "difficulty": "easy",
//!   "puzzle": [[1, null, 1, null, null, 1], ...],
//!   "puzzle_id": "4,815,162"
//! }
//! ```

use std::{
    fmt::{self, Display},
    fs, io,
    path::{Path, PathBuf},
};

use binairo_core::{Grid, GridError};
use serde::Deserialize;

/// Errors produced while loading puzzle files.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PuzzleFileError {
    /// The file could not be read.
    #[display("cannot read {}: {source}", path.display())]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// The file is not a valid puzzle document.
    #[display("invalid puzzle file {}: {source}", path.display())]
    Json {
        /// The file being parsed.
        path: PathBuf,
        /// The underlying error.
        source: serde_json::Error,
    },
    /// A puzzle holds an invalid grid.
    #[display("puzzle {id} has an invalid grid: {source}")]
    Grid {
        /// The puzzle id.
        id: u64,
        /// The underlying error.
        source: GridError,
    },
    /// No puzzle has the requested id.
    #[display("no puzzle with id {id} (available ids: {})", join_ids(available))]
    NotFound {
        /// The requested id.
        id: u64,
        /// The ids present in the file.
        available: Vec<u64>,
    },
    /// The file holds an empty array.
    #[display("{} contains no puzzles", path.display())]
    Empty {
        /// The empty file.
        path: PathBuf,
    },
}

fn join_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Identifier of a puzzle on the site it was taken from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SourceId {
    /// A textual id such as `"4,815,162"`.
    Text(String),
    /// A numeric id.
    Number(u64),
}

impl Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceId::Text(text) => f.write_str(text),
            SourceId::Number(number) => write!(f, "{number}"),
        }
    }
}

/// One puzzle entry of a puzzle file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PuzzleRecord {
    /// Unique positive id.
    pub id: u64,
    /// Declared size such as `"6x6"`.
    pub size: String,
    /// Declared difficulty, `"easy"` or `"hard"`.
    pub difficulty: String,
    /// Rows of `0`, `1` or `null`.
    pub puzzle: Vec<Vec<Option<u8>>>,
    /// Identifier on the source site.
    #[serde(default)]
    pub puzzle_id: Option<SourceId>,
}

impl PuzzleRecord {
    /// Converts the rows into a grid.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleFileError::Grid`] if the rows do not form a valid grid.
    pub fn grid(&self) -> Result<Grid, PuzzleFileError> {
        Grid::from_rows(&self.puzzle).map_err(|source| PuzzleFileError::Grid {
            id: self.id,
            source,
        })
    }

    /// Returns the source id, or `N/A` when it is missing.
    pub fn source_label(&self) -> String {
        self.puzzle_id
            .as_ref()
            .map_or_else(|| "N/A".to_owned(), SourceId::to_string)
    }
}

/// Loads every puzzle of a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a puzzle document, or
/// holds an empty array.
pub fn load(path: &Path) -> Result<Vec<PuzzleRecord>, PuzzleFileError> {
    let text = fs::read_to_string(path).map_err(|source| PuzzleFileError::Io {
        path: path.to_owned(),
        source,
    })?;
    let records = parse(&text).map_err(|source| PuzzleFileError::Json {
        path: path.to_owned(),
        source,
    })?;
    if records.is_empty() {
        return Err(PuzzleFileError::Empty {
            path: path.to_owned(),
        });
    }
    Ok(records)
}

/// Parses a puzzle document, accepting a single object or an array.
///
/// # Errors
///
/// Returns an error if the text is not valid JSON or an entry does not match
/// the puzzle schema.
pub fn parse(text: &str) -> Result<Vec<PuzzleRecord>, serde_json::Error> {
    let document = serde_json::from_str::<serde_json::Value>(text)?;
    match document {
        serde_json::Value::Array(entries) => entries
            .into_iter()
            .map(serde_json::from_value)
            .collect(),
        single => Ok(vec![serde_json::from_value(single)?]),
    }
}

/// Picks the puzzle with `id`, or the first one when no id is given.
///
/// # Errors
///
/// Returns [`PuzzleFileError::NotFound`] if no puzzle has `id`.
pub fn select(
    records: &[PuzzleRecord],
    id: Option<u64>,
) -> Result<&PuzzleRecord, PuzzleFileError> {
    let found = match id {
        Some(id) => records.iter().find(|record| record.id == id),
        None => records.first(),
    };
    found.ok_or_else(|| PuzzleFileError::NotFound {
        id: id.unwrap_or_default(),
        available: records.iter().map(|record| record.id).collect(),
    })
}
