use std::fmt::{self, Display};

use crate::{Position, position::column_label};

/// The two kinds of lines in a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LineKind {
    /// A horizontal line.
    Row,
    /// A vertical line.
    Column,
}

impl LineKind {
    /// Both kinds, rows first.
    pub const ALL: [Self; 2] = [Self::Row, Self::Column];

    /// Returns every line of this kind in a grid of the given size.
    pub fn lines(self, size: usize) -> impl Iterator<Item = Line> + Clone {
        (0..size).map(move |index| Line::new(self, index))
    }
}

impl Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineKind::Row => f.write_str("row"),
            LineKind::Column => f.write_str("column"),
        }
    }
}

/// A Binairo line (row or column).
///
/// Every rule of the puzzle is stated over lines, so techniques and invariant
/// checks iterate over [`Line::all`].
///
/// # Examples
///
/// ```
/// use binairo_core::{Line, Position};
///
/// let line = Line::Column { index: 2 };
/// assert_eq!(line.position(4), Position::new(4, 2));
/// assert_eq!(line.to_string(), "column C");
/// assert_eq!(Line::all(6).count(), 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Line {
    /// A row identified by its index.
    Row {
        /// Row index.
        index: usize,
    },
    /// A column identified by its index.
    Column {
        /// Column index.
        index: usize,
    },
}

impl Line {
    /// Creates a line of the given kind.
    #[must_use]
    #[inline]
    pub const fn new(kind: LineKind, index: usize) -> Self {
        match kind {
            LineKind::Row => Self::Row { index },
            LineKind::Column => Self::Column { index },
        }
    }

    /// Returns every row, then every column, of a grid of the given size.
    pub fn all(size: usize) -> impl Iterator<Item = Line> + Clone {
        LineKind::Row.lines(size).chain(LineKind::Column.lines(size))
    }

    /// Returns whether this is a row or a column.
    #[must_use]
    #[inline]
    pub const fn kind(self) -> LineKind {
        match self {
            Self::Row { .. } => LineKind::Row,
            Self::Column { .. } => LineKind::Column,
        }
    }

    /// Returns the row or column index.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Row { index } | Self::Column { index } => index,
        }
    }

    /// Converts a cell index within the line into an absolute [`Position`].
    #[must_use]
    #[inline]
    pub const fn position(self, i: usize) -> Position {
        match self {
            Self::Row { index } => Position::new(index, i),
            Self::Column { index } => Position::new(i, index),
        }
    }

    /// Returns the positions of the line in order.
    pub fn positions(self, size: usize) -> impl Iterator<Item = Position> + Clone {
        (0..size).map(move |i| self.position(i))
    }
}

impl Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Row { index } => write!(f, "row {}", index + 1),
            Line::Column { index } => write!(f, "column {}", column_label(*index)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_lines_order() {
        let lines: Vec<_> = Line::all(4).collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], Line::Row { index: 0 });
        assert_eq!(lines[3], Line::Row { index: 3 });
        assert_eq!(lines[4], Line::Column { index: 0 });
        assert_eq!(lines[7], Line::Column { index: 3 });
    }

    #[test]
    fn test_positions() {
        let row: Vec<_> = Line::Row { index: 1 }.positions(3).collect();
        assert_eq!(
            row,
            [Position::new(1, 0), Position::new(1, 1), Position::new(1, 2)]
        );
        let col: Vec<_> = Line::Column { index: 1 }.positions(3).collect();
        assert_eq!(
            col,
            [Position::new(0, 1), Position::new(1, 1), Position::new(2, 1)]
        );
    }

    #[test]
    fn test_kind_round_trip() {
        for kind in LineKind::ALL {
            assert_eq!(Line::new(kind, 3).kind(), kind);
            assert_eq!(Line::new(kind, 3).index(), 3);
        }
    }
}
