use std::collections::BTreeMap;

use binairo_solver::{Step, technique::TechniqueKind};
use log::trace;

use crate::{Difficulty, DifficultyLabel, RankPolicy, ScoreComponents};

/// Lowest possible score.
pub const MIN_SCORE: f64 = 1.0;

/// Highest possible score.
pub const MAX_SCORE: f64 = 10.0;

/// Scores step traces with a [`RankPolicy`].
///
/// The score is a pure function of the technique sequence and the grid size:
/// ranking the same trace twice gives the same result.
///
/// # Examples
///
/// ```
/// use binairo_core::Grid;
/// use binairo_rank::DifficultyRanker;
/// use binairo_solver::PropagationEngine;
///
/// let grid: Grid = "
///     1.1..1
///     ...11.
///     .00...
///     ....1.
///     0....1
///     1.1..0
/// "
/// .parse()?;
/// let outcome = PropagationEngine::with_all_techniques().solve(grid);
/// let difficulty = DifficultyRanker::new().rank(&outcome.trace, outcome.grid.size());
/// assert!((1.0..=10.0).contains(&difficulty.score));
/// # Ok::<(), binairo_core::GridError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DifficultyRanker {
    policy: RankPolicy,
}

impl DifficultyRanker {
    /// Creates a ranker with the default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(RankPolicy::default())
    }

    /// Creates a ranker with a custom policy.
    #[must_use]
    pub const fn with_policy(policy: RankPolicy) -> Self {
        Self { policy }
    }

    /// Returns the policy in use.
    #[must_use]
    pub const fn policy(&self) -> &RankPolicy {
        &self.policy
    }

    /// Scores the step trace of a solve run on a `size`×`size` grid.
    #[must_use]
    pub fn rank(&self, trace: &[Step], size: usize) -> Difficulty {
        self.rank_techniques(trace.iter().map(|step| step.technique), size)
    }

    /// Scores a sequence of technique tags in solve order.
    #[must_use]
    pub fn rank_techniques<I>(&self, techniques: I, size: usize) -> Difficulty
    where
        I: IntoIterator<Item = TechniqueKind>,
    {
        let sequence = techniques.into_iter().collect::<Vec<_>>();
        let mut usage = BTreeMap::new();
        for &kind in &sequence {
            *usage.entry(kind).or_insert(0) += 1;
        }

        if sequence.is_empty() {
            return Difficulty {
                score: MIN_SCORE,
                usage,
                label: self.label(MIN_SCORE),
                components: ScoreComponents::default(),
                total_steps: 0,
                variety: 0,
                advanced_ratio: 0.0,
            };
        }

        let policy = &self.policy;
        let steps = to_f64(sequence.len());
        let variety = usage.len();

        let average_weight = sequence
            .iter()
            .map(|&kind| policy.weights.weight(kind))
            .sum::<f64>()
            / steps;
        let compression = (to_f64(policy.reference_size) / to_f64(size.max(1))).sqrt();

        let switches = sequence
            .windows(2)
            .filter(|pair| {
                pair[0] != pair[1] && policy.is_advanced(pair[0]) && policy.is_advanced(pair[1])
            })
            .count();

        let advanced_ratio = to_f64(
            sequence
                .iter()
                .filter(|&&kind| policy.is_advanced(kind))
                .count(),
        ) / steps;

        let cells = to_f64(size * size).max(1.0);

        let components = ScoreComponents {
            base: average_weight * policy.base_scale * compression,
            interaction: (to_f64(switches) * policy.interaction_step).min(policy.interaction_cap),
            variety: to_f64(variety - 1) * policy.variety_step,
            advanced: advanced_ratio * policy.advanced_scale,
            length: (steps / cells * policy.length_scale).min(policy.length_cap),
        };
        let score = round_half(components.total().clamp(MIN_SCORE, MAX_SCORE));
        trace!("{} steps on {size}x{size}: {components:?} -> {score}", sequence.len());

        Difficulty {
            score,
            usage,
            label: self.label(score),
            components,
            total_steps: sequence.len(),
            variety,
            advanced_ratio,
        }
    }

    /// Returns the label of `score`.
    #[must_use]
    pub fn label(&self, score: f64) -> DifficultyLabel {
        if score <= self.policy.easy_max {
            DifficultyLabel::Easy
        } else if score <= self.policy.moderate_max {
            DifficultyLabel::Moderate
        } else {
            DifficultyLabel::Hard
        }
    }
}

#[expect(clippy::cast_precision_loss)]
fn to_f64(n: usize) -> f64 {
    n as f64
}

fn round_half(score: f64) -> f64 {
    (score * 2.0).round() / 2.0
}
