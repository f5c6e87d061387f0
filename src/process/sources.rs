// src/process/sources.rs

use crate::error::SchemaError;
use anyhow::{Context, Result};
use glob::{glob, Pattern};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Reporting year of a download datestamp, e.g. `20240414` -> 2024.
pub fn report_year(datestamp: &str) -> Result<i32> {
    datestamp
        .get(..4)
        .and_then(|y| y.parse().ok())
        .with_context(|| format!("datestamp {:?} does not start with a year", datestamp))
}

/// Number of regular files in `dir`. Stands in for "number of inventory
/// years available", since there is one workbook per year.
pub fn count_files(dir: &Path) -> Result<usize> {
    let mut n = 0;
    for entry in fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        if entry?.file_type()?.is_file() {
            n += 1;
        }
    }
    Ok(n)
}

/// All `.xlsx` files in `dir`, sorted by name. Empty when `dir` is missing.
pub fn workbooks_in(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let pattern = format!("{}/*.xlsx", escaped(dir));
    let mut files = glob(&pattern)
        .context("invalid glob pattern for source workbooks")?
        .collect::<Result<Vec<_>, _>>()?;
    files.sort();
    Ok(files)
}

/// The single `SVN_<report>_<year>_*.xlsx` workbook in `dir` for `year`.
/// Zero or several matches are both errors.
pub fn find_source(dir: &Path, report_year: i32, year: i32) -> Result<PathBuf> {
    let pattern = format!("{}/SVN_{}_{:04}_*.xlsx", escaped(dir), report_year, year);
    let mut matches = glob(&pattern)
        .with_context(|| format!("invalid glob pattern {}", pattern))?
        .collect::<Result<Vec<_>, _>>()?;
    match matches.len() {
        0 => Err(SchemaError::MissingSource { year, pattern }.into()),
        1 => Ok(matches.remove(0)),
        _ => {
            matches.sort();
            Err(SchemaError::AmbiguousSource { year, matches }.into())
        }
    }
}

/// `dir` as a literal glob prefix, so `[`, `*` and `?` in it match themselves.
fn escaped(dir: &Path) -> String {
    Pattern::escape(&dir.to_string_lossy())
}
