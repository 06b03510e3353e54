//! Difficulty ranking for Binairo step traces.
//!
//! The [`DifficultyRanker`] turns the technique tags of a solve run into a
//! score between 1 and 10, a usage breakdown and a qualitative label. It only
//! looks at the step trace and the grid size, never at the grid itself.
//!
//! # Examples
//!
//! ```
//! use binairo_rank::{DifficultyLabel, DifficultyRanker};
//! use binairo_solver::technique::TechniqueKind;
//!
//! let ranker = DifficultyRanker::new();
//! let easy = ranker.rank_techniques([TechniqueKind::AvoidThree; 10], 6);
//! let hard = ranker.rank_techniques(
//!     [
//!         TechniqueKind::DuplicatePrevention,
//!         TechniqueKind::ForcedMove,
//!         TechniqueKind::DuplicatePrevention,
//!         TechniqueKind::ForcedMove,
//!     ],
//!     6,
//! );
//! assert_eq!(easy.label, DifficultyLabel::Easy);
//! assert!(hard.score > easy.score);
//! ```

pub use self::{difficulty::*, policy::*, ranker::*};

mod difficulty;
mod policy;
mod ranker;
