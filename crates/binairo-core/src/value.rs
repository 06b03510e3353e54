use std::fmt::{self, Display};

/// A determined cell value.
///
/// # Examples
///
/// ```
/// use binairo_core::Value;
///
/// assert_eq!(Value::Zero.opposite(), Value::One);
/// assert_eq!(Value::from_u8(1), Some(Value::One));
/// assert_eq!(Value::from_u8(2), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    /// The value `0`.
    Zero,
    /// The value `1`.
    One,
}

impl Value {
    /// Both values, `Zero` first.
    pub const ALL: [Self; 2] = [Self::Zero, Self::One];

    /// Returns the other value.
    #[must_use]
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Zero => Self::One,
            Self::One => Self::Zero,
        }
    }

    /// Returns the numeric value (`0` or `1`).
    #[must_use]
    #[inline]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }

    /// Converts `0` or `1` into a value.
    #[must_use]
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Zero),
            1 => Some(Self::One),
            _ => None,
        }
    }

    /// Returns the text symbol of the value.
    #[must_use]
    #[inline]
    pub const fn symbol(self) -> char {
        match self {
            Self::Zero => '0',
            Self::One => '1',
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// The content of a single grid cell.
///
/// # Examples
///
/// ```
/// use binairo_core::{Cell, Value};
///
/// assert!(Cell::Unknown.is_unknown());
/// assert_eq!(Cell::from(Value::One).value(), Some(Value::One));
/// assert_eq!(Cell::from_symbol('.'), Some(Cell::Unknown));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum Cell {
    /// The cell has not been determined yet.
    #[default]
    Unknown,
    /// The cell holds `0`.
    Zero,
    /// The cell holds `1`.
    One,
}

impl Cell {
    /// Returns the determined value, or `None` if the cell is unknown.
    #[must_use]
    #[inline]
    pub const fn value(self) -> Option<Value> {
        match self {
            Self::Unknown => None,
            Self::Zero => Some(Value::Zero),
            Self::One => Some(Value::One),
        }
    }

    /// Returns `true` if the cell holds a value.
    #[must_use]
    #[inline]
    pub const fn is_determined(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Returns the text symbol of the cell (`0`, `1` or `.`).
    #[must_use]
    #[inline]
    pub const fn symbol(self) -> char {
        match self {
            Self::Unknown => '.',
            Self::Zero => '0',
            Self::One => '1',
        }
    }

    /// Parses a text symbol. Both `.` and `_` denote an unknown cell.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' | '_' => Some(Self::Unknown),
            '0' => Some(Self::Zero),
            '1' => Some(Self::One),
            _ => None,
        }
    }
}

impl From<Value> for Cell {
    #[inline]
    fn from(value: Value) -> Self {
        match value {
            Value::Zero => Self::Zero,
            Value::One => Self::One,
        }
    }
}

impl From<Option<Value>> for Cell {
    #[inline]
    fn from(value: Option<Value>) -> Self {
        value.map_or(Self::Unknown, Self::from)
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
