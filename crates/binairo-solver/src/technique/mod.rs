//! Binairo deduction techniques.
//!
//! Each technique implements the [`Technique`] trait and proposes assignments
//! for a [`Grid`](binairo_core::Grid). Techniques are ranked by cost, from the
//! local three-cell pattern up to single-cell refutation:
//!
//! 1. [`AvoidThree`]
//! 2. [`Balance`]
//! 3. [`DuplicatePrevention`]
//! 4. [`ForcedMove`]

pub use self::{
    avoid_three::AvoidThree, balance::Balance, duplicate_prevention::DuplicatePrevention,
    forced_move::ForcedMove, kind::TechniqueKind, traits::*,
};

mod avoid_three;
mod balance;
mod duplicate_prevention;
mod forced_move;
mod kind;
mod traits;

/// Returns all techniques in priority order.
///
/// # Examples
///
/// ```
/// use binairo_solver::technique::{self, TechniqueKind};
///
/// let kinds: Vec<_> = technique::all_techniques().iter().map(|t| t.kind()).collect();
/// assert_eq!(kinds, TechniqueKind::ALL);
/// ```
#[must_use]
pub fn all_techniques() -> Vec<BoxedTechnique> {
    TechniqueKind::ALL.into_iter().map(technique).collect()
}

/// Returns the techniques that reason about a single line.
///
/// These are the techniques [`ForcedMove`] propagates while testing a
/// hypothesis.
#[must_use]
pub fn line_techniques() -> Vec<BoxedTechnique> {
    vec![
        Box::new(AvoidThree::new()),
        Box::new(Balance::new()),
        Box::new(DuplicatePrevention::new()),
    ]
}

/// Returns the technique identified by `kind`.
#[must_use]
pub fn technique(kind: TechniqueKind) -> BoxedTechnique {
    match kind {
        TechniqueKind::AvoidThree => Box::new(AvoidThree::new()),
        TechniqueKind::Balance => Box::new(Balance::new()),
        TechniqueKind::DuplicatePrevention => Box::new(DuplicatePrevention::new()),
        TechniqueKind::ForcedMove => Box::new(ForcedMove::new()),
    }
}
