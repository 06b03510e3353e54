//! Human-technique solving engine for Binairo puzzles.
//!
//! The engine fills a partially specified [`Grid`](binairo_core::Grid) using
//! only named deduction rules, records every assignment as an attributable
//! [`Step`], and reports one of three terminal outcomes:
//!
//! - [`SolveStatus::Solved`]: the grid is complete and satisfies every rule,
//! - [`SolveStatus::Contradiction`]: the input cannot be completed,
//! - [`SolveStatus::Stalled`]: no technique applies, but the grid is incomplete.
//!
//! There is no search fallback. A stalled puzzle is a correct result.
//!
//! # Examples
//!
//! ```
//! use binairo_core::Grid;
//! use binairo_solver::PropagationEngine;
//!
//! let grid: Grid = "
//!     1.1..1
//!     ...11.
//!     .00...
//!     ....1.
//!     0....1
//!     1.1..0
//! "
//! .parse()?;
//!
//! let engine = PropagationEngine::with_all_techniques();
//! let outcome = engine.solve(grid);
//! assert!(outcome.status.is_solved());
//! for step in &outcome.trace {
//!     println!("{step}");
//! }
//! # Ok::<(), binairo_core::GridError>(())
//! ```

pub use self::{error::*, propagation_engine::*, technique_step::*};

mod error;
mod propagation_engine;
pub mod technique;
mod technique_step;

#[cfg(test)]
mod testing;
