// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the cross-run state file. All of these are fatal.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("state file `{}` not found", .0.display())]
    Missing(PathBuf),

    #[error("parameter `{key}` not found in `{}`", .path.display())]
    MissingKey { key: String, path: PathBuf },

    #[error("malformed line {line_no} in `{}`: {line:?}", .path.display())]
    Malformed {
        path: PathBuf,
        line_no: usize,
        line: String,
    },
}

/// Upstream workbook layout did not match what a transform expects.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("`{}` has no sheet {sheet} (available: {available:?})", .path.display())]
    MissingSheet {
        path: PathBuf,
        sheet: String,
        available: Vec<String>,
    },

    #[error("sheet {sheet} in `{}` is {rows}x{cols}, need at least {min_rows}x{min_cols}", .path.display())]
    TooSmall {
        path: PathBuf,
        sheet: String,
        rows: u32,
        cols: u32,
        min_rows: u32,
        min_cols: u32,
    },

    #[error("sheet {sheet} in `{}`: cell ({row}, {col}) should contain {expected:?}, found {found:?}", .path.display())]
    AnchorMismatch {
        path: PathBuf,
        sheet: String,
        row: u32,
        col: u32,
        expected: String,
        found: String,
    },

    #[error("no source file matches `{pattern}` for year {year}")]
    MissingSource { year: i32, pattern: String },

    #[error("{} source files match year {year}: {matches:?}", .matches.len())]
    AmbiguousSource { year: i32, matches: Vec<PathBuf> },

    #[error("intermediate workbook `{}` has no column for year {year}", .path.display())]
    MissingYear { path: PathBuf, year: i32 },

    #[error("unknown sector `{0}`")]
    UnknownSector(String),
}
