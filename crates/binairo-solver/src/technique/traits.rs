use std::fmt::Debug;

use binairo_core::Grid;

use crate::{Proposal, SolverError, technique::TechniqueKind};

/// A Binairo deduction technique.
///
/// Techniques inspect a [`Grid`] and propose assignments; they never mutate
/// it. The [`PropagationEngine`](crate::PropagationEngine) applies proposals
/// and records them in the step trace.
pub trait Technique: Debug + Send + Sync {
    /// Returns which technique this is.
    fn kind(&self) -> TechniqueKind;

    /// Returns the name of the technique.
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Returns a boxed clone of the technique.
    fn clone_box(&self) -> BoxedTechnique;

    /// Collects every assignment the technique can justify on `grid`.
    ///
    /// Returns an empty list when the technique does not apply. Proposals
    /// may target cells that are already determined; the engine skips those
    /// when they agree and reports a conflict when they do not.
    ///
    /// # Errors
    ///
    /// Returns an error if the technique detects that the grid cannot be
    /// completed.
    fn find_proposals(&self, grid: &Grid) -> Result<Vec<Proposal>, SolverError>;
}

/// A boxed technique.
pub type BoxedTechnique = Box<dyn Technique>;

impl Clone for BoxedTechnique {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
