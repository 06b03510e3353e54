use std::fmt::{self, Display};

/// A cell position, zero-based.
///
/// Positions are displayed the way puzzle sheets label them: a column letter
/// followed by a one-based row number.
///
/// # Examples
///
/// ```
/// use binairo_core::Position;
///
/// let pos = Position::new(2, 0);
/// assert_eq!(pos.row(), 2);
/// assert_eq!(pos.col(), 0);
/// assert_eq!(pos.to_string(), "(A,3)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    row: usize,
    col: usize,
}

impl Position {
    /// Creates a position from row and column indices.
    #[must_use]
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the row index.
    #[must_use]
    #[inline]
    pub const fn row(self) -> usize {
        self.row
    }

    /// Returns the column index.
    #[must_use]
    #[inline]
    pub const fn col(self) -> usize {
        self.col
    }
}

/// Returns the sheet label of a column index (`A`, `B`, ...).
pub(crate) fn column_label(col: usize) -> String {
    let mut label = String::new();
    let mut n = col + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        label.insert(0, char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
        n = (n - 1) / 26;
    }
    label
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", column_label(self.col), self.row + 1)
    }
}
