use std::fmt::{self, Display};

/// Identifies one of the deduction techniques.
///
/// Variants are declared in priority order, so the derived [`Ord`] sorts the
/// cheapest technique first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TechniqueKind {
    /// Two equal neighbors force the opposite value next to them.
    AvoidThree,
    /// A line holding half of one value fills the rest with the other.
    Balance,
    /// A nearly complete line may not copy a complete line.
    DuplicatePrevention,
    /// A value that leads to a contradiction is rejected.
    ForcedMove,
}

impl TechniqueKind {
    /// All techniques in priority order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::AvoidThree,
        Self::Balance,
        Self::DuplicatePrevention,
        Self::ForcedMove,
    ];

    /// Number of techniques.
    pub const COUNT: usize = 4;

    /// Returns the position of the technique in [`ALL`](Self::ALL).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AvoidThree => "Avoid three",
            Self::Balance => "Balance",
            Self::DuplicatePrevention => "Duplicate prevention",
            Self::ForcedMove => "Forced move",
        }
    }
}

impl Display for TechniqueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
