use std::{
    fmt::{self, Display},
    str::FromStr,
};

use crate::{
    Cell, ConflictError, GridError, InvariantViolation, Line, LineKind, Position, Value,
    position::column_label,
};

/// The state of a Binairo puzzle.
///
/// A grid stores the working value of every cell together with the set of
/// clues it was built from, so that deductions can always be told apart from
/// givens. Clues are recorded once at construction; afterwards [`Grid::set`]
/// is the only way to change a cell, and it can only turn an unknown cell into
/// a determined one.
///
/// # Design Notes
///
/// - `set`, `get`, `is_complete` and `check_invariants` are the chokepoint all
///   solver code goes through, which is what makes contradiction detection and
///   step attribution reliable.
/// - The size is only required to be positive and even.
///
/// # Examples
///
/// ```
/// use binairo_core::{Cell, Grid, Position, Value};
///
/// let mut grid = Grid::from_rows(&[
///     vec![Some(1), None, Some(0), None],
///     vec![None, None, None, None],
///     vec![None, None, None, None],
///     vec![None, None, None, None],
/// ])?;
///
/// assert_eq!(grid.size(), 4);
/// assert_eq!(grid.get(Position::new(0, 0)), Cell::One);
/// assert!(grid.set(Position::new(0, 1), Value::Zero).is_ok());
/// assert!(grid.set(Position::new(0, 0), Value::Zero).is_err());
/// # Ok::<(), binairo_core::GridError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
    givens: Vec<bool>,
}

impl Grid {
    /// Creates a grid where every cell is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidSize`] if `size` is zero or odd.
    pub fn new(size: usize) -> Result<Self, GridError> {
        Self::from_cells(size, vec![Cell::Unknown; size * size])
    }

    /// Creates a grid from cells in row-major order.
    ///
    /// Every determined cell is recorded as a clue.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidSize`] if `size` is zero or odd, and
    /// [`GridError::RaggedRow`] if `cells` does not hold `size * size` cells.
    pub fn from_cells(size: usize, cells: Vec<Cell>) -> Result<Self, GridError> {
        if size == 0 || size % 2 != 0 {
            return Err(GridError::InvalidSize { size });
        }
        if cells.len() != size * size {
            let row = cells.len() / size;
            return Err(GridError::RaggedRow {
                row,
                len: cells.len() % size,
                size,
            });
        }
        let givens = cells.iter().map(|cell| cell.is_determined()).collect();
        Ok(Self {
            size,
            cells,
            givens,
        })
    }

    /// Creates a grid from rows of optional clue values (`0`, `1` or `None`).
    ///
    /// This is the shape puzzle files store grids in.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] if the rows do not form an even square or a clue is
    /// not `0`/`1`.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, GridError>
    where
        R: AsRef<[Option<u8>]>,
    {
        let size = rows.len();
        if size == 0 || size % 2 != 0 {
            return Err(GridError::InvalidSize { size });
        }
        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != size {
                return Err(GridError::RaggedRow {
                    row,
                    len: values.len(),
                    size,
                });
            }
            for (col, value) in values.iter().enumerate() {
                let cell = match *value {
                    None => Cell::Unknown,
                    Some(v) => Value::from_u8(v).map(Cell::from).ok_or(GridError::InvalidClue {
                        position: Position::new(row, col),
                        value: v,
                    })?,
                };
                cells.push(cell);
            }
        }
        Self::from_cells(size, cells)
    }

    /// Returns the rows as optional clue values, the inverse of [`Grid::from_rows`].
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<Option<u8>>> {
        self.cells
            .chunks(self.size)
            .map(|row| row.iter().map(|cell| cell.value().map(Value::as_u8)).collect())
            .collect()
    }

    /// Returns the number of rows (and columns).
    #[must_use]
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the number of each value a complete line must hold.
    #[must_use]
    #[inline]
    pub fn half(&self) -> usize {
        self.size / 2
    }

    #[inline]
    fn index(&self, pos: Position) -> usize {
        debug_assert!(pos.row() < self.size && pos.col() < self.size);
        pos.row() * self.size + pos.col()
    }

    /// Returns the content of a cell.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the grid.
    #[must_use]
    #[inline]
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[self.index(pos)]
    }

    /// Returns `true` if the cell was given as a clue.
    #[must_use]
    #[inline]
    pub fn is_given(&self, pos: Position) -> bool {
        self.givens[self.index(pos)]
    }

    /// Assigns a value to a cell.
    ///
    /// Returns `Ok(true)` if an unknown cell was assigned and `Ok(false)` if the
    /// cell already held the same value.
    ///
    /// # Errors
    ///
    /// Returns [`ConflictError`] if the cell already holds the other value. The
    /// grid is left unchanged.
    pub fn set(&mut self, pos: Position, value: Value) -> Result<bool, ConflictError> {
        let index = self.index(pos);
        match self.cells[index].value() {
            None => {
                self.cells[index] = value.into();
                Ok(true)
            }
            Some(existing) if existing == value => Ok(false),
            Some(existing) => Err(ConflictError {
                position: pos,
                existing,
                attempted: value,
            }),
        }
    }

    /// Returns `true` if no cell is unknown.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_determined())
    }

    /// Returns all positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let size = self.size;
        (0..size * size).map(move |i| Position::new(i / size, i % size))
    }

    /// Returns the positions of unknown cells in row-major order.
    pub fn unknown_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions().filter(|&pos| self.get(pos).is_unknown())
    }

    /// Returns the number of unknown cells.
    #[must_use]
    pub fn unknown_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_unknown()).count()
    }

    /// Returns the number of clues.
    #[must_use]
    pub fn givens_count(&self) -> usize {
        self.givens.iter().filter(|&&given| given).count()
    }

    /// Returns the cells of a line in order, paired with their positions.
    pub fn line(&self, line: Line) -> impl Iterator<Item = (Position, Cell)> + '_ {
        line.positions(self.size).map(|pos| (pos, self.get(pos)))
    }

    /// Returns the cells of a line in order.
    #[must_use]
    pub fn line_cells(&self, line: Line) -> Vec<Cell> {
        self.line(line).map(|(_, cell)| cell).collect()
    }

    /// Returns the values of a line if every cell of it is determined.
    #[must_use]
    pub fn line_values(&self, line: Line) -> Option<Vec<Value>> {
        self.line(line).map(|(_, cell)| cell.value()).collect()
    }

    /// Returns how many cells of the line hold `value`.
    #[must_use]
    pub fn count(&self, line: Line, value: Value) -> usize {
        self.line(line)
            .filter(|(_, cell)| cell.value() == Some(value))
            .count()
    }

    /// Returns how many cells of the line are unknown.
    #[must_use]
    pub fn unknowns(&self, line: Line) -> usize {
        self.line(line).filter(|(_, cell)| cell.is_unknown()).count()
    }

    /// Returns `true` if every cell of the line is determined.
    #[must_use]
    pub fn is_line_complete(&self, line: Line) -> bool {
        self.line(line).all(|(_, cell)| cell.is_determined())
    }

    /// Checks the three Binairo rules over the determined cells.
    ///
    /// Every row and then every column is scanned for three equal consecutive
    /// values and for a value that occurs more than `size / 2` times. Then
    /// complete rows, followed by complete columns, are compared pairwise.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        for line in Line::all(self.size) {
            self.check_line(line)?;
        }
        for kind in LineKind::ALL {
            self.check_distinct(kind)?;
        }
        Ok(())
    }

    fn check_line(&self, line: Line) -> Result<(), InvariantViolation> {
        let cells = self.line_cells(line);
        for (start, window) in cells.windows(3).enumerate() {
            let Some(value) = window[0].value() else {
                continue;
            };
            if window[1..].iter().all(|cell| cell.value() == Some(value)) {
                return Err(InvariantViolation::ThreeInARow {
                    line,
                    start: line.position(start),
                    value,
                });
            }
        }
        for value in Value::ALL {
            let count = cells.iter().filter(|cell| cell.value() == Some(value)).count();
            if count > self.half() {
                return Err(InvariantViolation::Imbalance { line, value, count });
            }
        }
        Ok(())
    }

    fn check_distinct(&self, kind: LineKind) -> Result<(), InvariantViolation> {
        let complete = kind
            .lines(self.size)
            .filter_map(|line| Some((line, self.line_values(line)?)))
            .collect::<Vec<_>>();
        for (i, (first, first_values)) in complete.iter().enumerate() {
            for (second, second_values) in &complete[i + 1..] {
                if first_values == second_values {
                    return Err(InvariantViolation::DuplicateLine {
                        first: *first,
                        second: *second,
                    });
                }
            }
        }
        Ok(())
    }
}

impl FromStr for Grid {
    type Err = GridError;

    /// Parses the compact text form: one row per non-blank line, `0`/`1` for
    /// clues and `.`/`_` for unknown cells. Other whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows = Vec::new();
        for text in s.lines() {
            let mut row = Vec::new();
            for symbol in text.chars().filter(|c| !c.is_whitespace()) {
                row.push(Cell::from_symbol(symbol).ok_or(GridError::InvalidSymbol { symbol })?);
            }
            if !row.is_empty() {
                rows.push(row);
            }
        }
        let size = rows.len();
        if size == 0 || size % 2 != 0 {
            return Err(GridError::InvalidSize { size });
        }
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(GridError::RaggedRow {
                row,
                len: cells.len(),
                size,
            });
        }
        Self::from_cells(size, rows.into_iter().flatten().collect())
    }
}

impl Display for Grid {
    /// Renders the grid with column letters and one-based row numbers.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.size.to_string().len();
        write!(f, "{:width$}", "")?;
        for col in 0..self.size {
            write!(f, " {}", column_label(col))?;
        }
        for (row, cells) in self.cells.chunks(self.size).enumerate() {
            write!(f, "\n{:>width$}", row + 1)?;
            for cell in cells {
                write!(f, " {cell}")?;
            }
        }
        Ok(())
    }
}
