//! Core data structures for Binairo (Takuzu) puzzles.
//!
//! A Binairo puzzle is an N×N grid (N even) where every cell must end up
//! holding `0` or `1` such that:
//!
//! - no line (row or column) contains three consecutive equal values,
//! - every line holds exactly N/2 zeros and N/2 ones,
//! - no two rows are identical and no two columns are identical.
//!
//! This crate provides the grid model shared by the solver, the ranker and the
//! command-line tools.
//!
//! # Overview
//!
//! - [`Value`] and [`Cell`]: a determined value and a possibly-unknown cell
//! - [`Position`]: zero-based `(row, col)` coordinates
//! - [`Line`]: a row or a column, the unit every rule is checked over
//! - [`Grid`]: the mutable puzzle state with its clue set and invariant checks
//!
//! # Examples
//!
//! ```
//! use binairo_core::{Cell, Grid, Position, Value};
//!
//! let mut grid: Grid = "
//!     0..011
//!     ......
//!     ......
//!     ......
//!     ......
//!     ......
//! "
//! .parse()?;
//!
//! assert!(grid.is_given(Position::new(0, 0)));
//! assert_eq!(grid.set(Position::new(0, 1), Value::One), Ok(true));
//! assert_eq!(grid.get(Position::new(0, 1)), Cell::One);
//! assert!(grid.check_invariants().is_ok());
//! # Ok::<(), binairo_core::GridError>(())
//! ```

pub use self::{error::*, grid::*, line::*, position::*, value::*};

mod error;
mod grid;
mod line;
mod position;
mod value;
