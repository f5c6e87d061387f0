// src/process/table.rs

use crate::schema::{ColumnDef, SectorIndexMap, Source};
use anyhow::{Context, Result};
use std::{
    fs,
    io::BufWriter,
    ops::RangeInclusive,
    path::Path,
};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// A year-indexed table ready for CSV export: one row per consecutive year,
/// columns in declaration order, `None` for missing values.
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionTable {
    years: Vec<i32>,
    columns: Vec<(String, Vec<Option<f64>>)>,
}

impl EmissionTable {
    pub fn new(years: RangeInclusive<i32>) -> Self {
        Self {
            years: years.collect(),
            columns: Vec::new(),
        }
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Append a column; it must have exactly one value per year.
    pub fn push(&mut self, name: impl Into<String>, values: Vec<Option<f64>>) -> Result<()> {
        let name = name.into();
        if values.len() != self.years.len() {
            anyhow::bail!(
                "column {} has {} values for {} years",
                name,
                values.len(),
                self.years.len()
            );
        }
        self.columns.push((name, values));
        Ok(())
    }

    /// Build a table from column definitions over `map`. `row` yields the
    /// per-year series stored at a row offset of the underlying workbook.
    pub fn assemble<F>(
        columns: &[ColumnDef],
        map: &SectorIndexMap,
        years: RangeInclusive<i32>,
        mut row: F,
    ) -> Result<Self>
    where
        F: FnMut(usize) -> Result<Vec<Option<f64>>>,
    {
        let mut table = Self::new(years);
        let n = table.years.len();
        let mut series = |path: &str| -> Result<Vec<Option<f64>>> {
            match map.row(path)? {
                Some(r) => row(r).with_context(|| format!("{} row {} ({})", map.name, r, path)),
                None => {
                    warn!(map = map.name, sector = path, "sector not available, column left empty");
                    Ok(vec![None; n])
                }
            }
        };

        for def in columns {
            let values = match def.source {
                Source::Row(path) => series(path)?,
                Source::Sum(paths) => {
                    let mut acc = vec![Some(0.0); n];
                    for path in paths {
                        for (a, v) in acc.iter_mut().zip(series(path)?) {
                            *a = a.zip(v).map(|(x, y)| x + y);
                        }
                    }
                    acc
                }
            };
            table.push(def.name, values)?;
        }
        Ok(table)
    }

    /// Write as CSV: `year` first, values with two decimals, empty for missing.
    /// Goes through a temp file in the target directory and a rename.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

        let tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("creating temp file in {}", dir.display()))?;
        {
            let mut w = csv::WriterBuilder::new()
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(BufWriter::new(tmp.as_file()));

            let mut header = vec!["year"];
            header.extend(self.column_names());
            w.write_record(&header)?;

            for (i, year) in self.years.iter().enumerate() {
                let mut record = Vec::with_capacity(self.columns.len() + 1);
                record.push(year.to_string());
                record.extend(self.columns.iter().map(|(_, v)| format_value(v[i])));
                w.write_record(&record)?;
            }
            w.flush()
                .with_context(|| format!("writing {}", path.display()))?;
        }
        tmp.persist(path)
            .with_context(|| format!("renaming into {}", path.display()))?;
        debug!(path = %path.display(), rows = self.years.len(), "wrote csv");
        Ok(())
    }
}

fn format_value(v: Option<f64>) -> String {
    v.map(|x| format!("{:.2}", x)).unwrap_or_default()
}
