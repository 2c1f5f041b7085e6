//! Slot addressing: viewers, rows and the title.

use crate::error::{Error, Result};
use std::fmt;

/// Identity of a connected viewer; each viewer owns at most one panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewerId(pub u64);

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl From<u64> for ViewerId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A row index, guaranteed to lie in `1..=15`.
///
/// Row 1 is displayed lowest, row 15 highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Row(u8);

impl Row {
    /// Lowest row.
    pub const MIN: u8 = 1;
    /// Highest row.
    pub const MAX: u8 = 15;
    /// Number of rows a panel can show.
    pub const COUNT: usize = Self::MAX as usize;

    /// Validate a row number.
    pub const fn new(row: u8) -> Result<Self> {
        if row >= Self::MIN && row <= Self::MAX {
            Ok(Self(row))
        } else {
            Err(Error::InvalidRow(row))
        }
    }

    /// The row number.
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Zero-based index for array storage.
    #[inline]
    pub(crate) const fn index(self) -> usize {
        (self.0 - Self::MIN) as usize
    }

    /// Every row, lowest first.
    pub fn all() -> impl DoubleEndedIterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }
}

impl TryFrom<u8> for Row {
    type Error = Error;

    fn try_from(row: u8) -> Result<Self> {
        Self::new(row)
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A displayable position: the title or one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    /// The panel title.
    Title,
    /// A numbered row.
    Row(Row),
}

impl Slot {
    /// The row, if this is a row slot.
    pub const fn row(self) -> Option<Row> {
        match self {
            Self::Title => None,
            Self::Row(row) => Some(row),
        }
    }
}

impl From<Row> for Slot {
    fn from(row: Row) -> Self {
        Self::Row(row)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => f.write_str("title"),
            Self::Row(row) => write!(f, "row {row}"),
        }
    }
}
