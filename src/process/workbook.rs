// src/process/workbook.rs

use crate::error::SchemaError;
use crate::schema::{SheetLayout, SheetRef};
use anyhow::{Context, Result};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};
use tracing::debug;

static EMPTY: Data = Data::Empty;

/// What a single cell holds, as far as the transforms care.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Number(f64),
    /// Any non-numeric content, e.g. the CRF notation keys "NO", "NE", "IE".
    Text,
    Empty,
}

impl Cell {
    pub fn number(self) -> Option<f64> {
        match self {
            Cell::Number(x) => Some(x),
            _ => None,
        }
    }
}

/// An open `.xlsx` file from which layout-validated sheets are taken.
pub struct Workbook {
    path: PathBuf,
    inner: Xlsx<BufReader<File>>,
}

impl Workbook {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let inner: Xlsx<_> = open_workbook(&path)
            .with_context(|| format!("opening workbook {}", path.display()))?;
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the sheet `layout` names and check it against the layout.
    pub fn sheet(&mut self, layout: &SheetLayout) -> Result<Sheet> {
        let names = self.inner.sheet_names();
        let name = match layout.sheet {
            SheetRef::Name(n) => names.iter().find(|s| s.as_str() == n).cloned(),
            SheetRef::Index(i) => names.get(i).cloned(),
        }
        .ok_or_else(|| SchemaError::MissingSheet {
            path: self.path.clone(),
            sheet: layout.sheet.to_string(),
            available: names.clone(),
        })?;

        let range = self
            .inner
            .worksheet_range(&name)
            .with_context(|| format!("reading sheet {:?} of {}", name, self.path.display()))?;
        let sheet = Sheet {
            path: self.path.clone(),
            name,
            range,
        };
        sheet.validate(layout)?;
        debug!(
            path = %sheet.path.display(),
            sheet = %sheet.name,
            rows = sheet.height(),
            cols = sheet.width(),
            "opened sheet"
        );
        Ok(sheet)
    }
}

/// One worksheet, addressed with 0-based absolute (row, col) from A1.
pub struct Sheet {
    path: PathBuf,
    name: String,
    range: Range<Data>,
}

impl Sheet {
    /// Shortcut for a workbook from which only one sheet is needed.
    pub fn open(path: impl AsRef<Path>, layout: &SheetLayout) -> Result<Self> {
        Workbook::open(path)?.sheet(layout)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows up to and including the last used one.
    pub fn height(&self) -> u32 {
        self.range.end().map(|(r, _)| r + 1).unwrap_or(0)
    }

    /// Number of columns up to and including the last used one.
    pub fn width(&self) -> u32 {
        self.range.end().map(|(_, c)| c + 1).unwrap_or(0)
    }

    fn raw(&self, row: u32, col: u32) -> &Data {
        self.range.get_value((row, col)).unwrap_or(&EMPTY)
    }

    pub fn cell(&self, row: u32, col: u32) -> Cell {
        match self.raw(row, col) {
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::Empty => Cell::Empty,
            _ => Cell::Text,
        }
    }

    /// Numeric value, `None` for text or empty cells.
    pub fn number(&self, row: u32, col: u32) -> Option<f64> {
        self.cell(row, col).number()
    }

    pub fn text(&self, row: u32, col: u32) -> String {
        match self.raw(row, col) {
            Data::Empty => String::new(),
            Data::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Fail unless the sheet spans at least `min_rows` x `min_cols`.
    pub fn require(&self, min_rows: u32, min_cols: u32) -> Result<(), SchemaError> {
        let (rows, cols) = (self.height(), self.width());
        if rows < min_rows || cols < min_cols {
            return Err(SchemaError::TooSmall {
                path: self.path.clone(),
                sheet: self.name.clone(),
                rows,
                cols,
                min_rows,
                min_cols,
            });
        }
        Ok(())
    }

    fn validate(&self, layout: &SheetLayout) -> Result<(), SchemaError> {
        self.require(layout.min_rows, layout.min_cols)?;
        for anchor in layout.anchors {
            let found = self.text(anchor.row, anchor.col);
            if !found
                .to_lowercase()
                .contains(&anchor.contains.to_lowercase())
            {
                return Err(SchemaError::AnchorMismatch {
                    path: self.path.clone(),
                    sheet: self.name.clone(),
                    row: anchor.row,
                    col: anchor.col,
                    expected: anchor.contains.to_string(),
                    found,
                });
            }
        }
        Ok(())
    }
}
