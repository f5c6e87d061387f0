// src/schema/types.rs

use std::fmt;

/// How a worksheet is selected inside a workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetRef {
    Name(&'static str),
    Index(usize),
}

impl fmt::Display for SheetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetRef::Name(n) => write!(f, "{:?}", n),
            SheetRef::Index(i) => write!(f, "#{}", i),
        }
    }
}

/// A label that must appear (case-insensitively) in a given cell.
/// Coordinates are 0-based and absolute from A1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub row: u32,
    pub col: u32,
    pub contains: &'static str,
}

/// Shape a sheet must have before any value is extracted from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub sheet: SheetRef,
    pub min_rows: u32,
    pub min_cols: u32,
    pub anchors: &'static [Anchor],
}

/// Which column(s) of a sheet a value block comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRule {
    /// A fixed 0-based column.
    Fixed(u32),
    /// The last `n` used columns, left to right.
    Last(u32),
}

impl ColumnRule {
    /// Resolve to concrete column indices for a sheet `width` columns wide.
    pub fn resolve(&self, width: u32) -> Vec<u32> {
        match *self {
            ColumnRule::Fixed(c) => vec![c],
            ColumnRule::Last(n) => (width.saturating_sub(n)..width).collect(),
        }
    }
}
