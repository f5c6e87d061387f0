// src/process/intermediate.rs

use super::sources::{count_files, find_source, report_year};
use super::workbook::Sheet;
use crate::error::SchemaError;
use crate::schema::layouts::{intermediate, summary2};
use crate::settings::Settings;
use anyhow::{bail, Context, Result};
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Workbook};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument};

/// The wide workbook every historical transform reads: sector labels in
/// column A, a header row of years, one column per inventory year.
#[derive(Debug, Clone, PartialEq)]
pub struct IntermediateWorkbook {
    path: PathBuf,
    labels: Vec<String>,
    years: Vec<i32>,
    columns: Vec<Vec<Option<f64>>>,
}

impl IntermediateWorkbook {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            labels: Vec::new(),
            years: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Read a previously saved workbook. Year columns are found by their
    /// header cell, so column order on disk does not matter.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let sheet = Sheet::open(path, &intermediate::LAYOUT)?;
        let rows = intermediate::FIRST_ROW..sheet.height().max(intermediate::FIRST_ROW);

        let mut wb = Self::new(path);
        wb.labels = rows
            .clone()
            .map(|r| sheet.text(r, intermediate::LABEL_COL))
            .collect();
        for col in intermediate::LABEL_COL + 1..sheet.width() {
            let Some(year) = sheet.number(intermediate::HEADER_ROW, col) else {
                debug!(col, "skipping column without a year header");
                continue;
            };
            let values = rows.clone().map(|r| sheet.number(r, col)).collect();
            wb.push_year(year as i32, values)?;
        }
        Ok(wb)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn set_labels(&mut self, labels: Vec<String>) {
        self.labels = labels;
    }

    pub fn push_year(&mut self, year: i32, values: Vec<Option<f64>>) -> Result<()> {
        if self.years.contains(&year) {
            bail!("year {} is already in {}", year, self.path.display());
        }
        self.years.push(year);
        self.columns.push(values);
        Ok(())
    }

    /// Value at sector `row` (offset from the first data row) for `year`.
    pub fn value(&self, year: i32, row: usize) -> Result<Option<f64>, SchemaError> {
        let idx = self
            .years
            .iter()
            .position(|&y| y == year)
            .ok_or_else(|| SchemaError::MissingYear {
                path: self.path.clone(),
                year,
            })?;
        Ok(self.columns[idx].get(row).copied().flatten())
    }

    /// One value per year in `years` for sector `row`.
    pub fn series(
        &self,
        years: impl IntoIterator<Item = i32>,
        row: usize,
    ) -> Result<Vec<Option<f64>>, SchemaError> {
        years.into_iter().map(|y| self.value(y, row)).collect()
    }

    /// Write the whole workbook to a temp file next to `path`, then rename it
    /// over the old one. A crash leaves either the previous or the new file.
    pub fn save(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

        let mut book = Workbook::new();
        // Fixed creation date keeps the bytes (and so the digest) stable
        // for identical content.
        let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
        book.set_properties(&DocProperties::new().set_creation_datetime(&created));

        let ws = book.add_worksheet().set_name(intermediate::SHEET)?;
        ws.write_string(intermediate::HEADER_ROW, intermediate::LABEL_COL as u16, "sector")?;
        for (i, label) in self.labels.iter().enumerate() {
            ws.write_string(
                intermediate::FIRST_ROW + i as u32,
                intermediate::LABEL_COL as u16,
                label,
            )?;
        }
        for (c, (year, values)) in self.years.iter().zip(&self.columns).enumerate() {
            let col = (intermediate::LABEL_COL as usize + 1 + c) as u16;
            ws.write_number(intermediate::HEADER_ROW, col, *year as f64)?;
            for (i, v) in values.iter().enumerate() {
                if let Some(v) = v {
                    ws.write_number(intermediate::FIRST_ROW + i as u32, col, *v)?;
                }
            }
        }

        let tmp = tempfile::Builder::new()
            .prefix(".intermediate")
            .suffix(".xlsx")
            .tempfile_in(dir)
            .with_context(|| format!("creating temp file in {}", dir.display()))?;
        book.save(tmp.path())
            .with_context(|| format!("writing {}", tmp.path().display()))?;
        tmp.persist(&self.path)
            .with_context(|| format!("renaming into {}", self.path.display()))?;
        Ok(())
    }
}

/// Merge the yearly source workbooks under `sources/<datestamp>` into a fresh
/// intermediate workbook, saving it after every year.
///
/// The number of years is the number of files in the dated directory,
/// counted from `settings.first_year`.
#[instrument(skip(settings))]
pub fn build(settings: &Settings, datestamp: &str) -> Result<IntermediateWorkbook> {
    let dir = settings.dated_dir(datestamp);
    let report = report_year(datestamp)?;
    let count = count_files(&dir)?;
    if count == 0 {
        bail!("no source workbooks in {}", dir.display());
    }
    let years = settings.first_year..settings.first_year + count as i32;
    info!(dir = %dir.display(), count, "building intermediate workbook");

    let mut wb = IntermediateWorkbook::new(&settings.intermediate);
    for year in years {
        let source = find_source(&dir, report, year)?;
        let sheet = Sheet::open(&source, &summary2::LAYOUT)?;
        let &[col] = summary2::TOTAL.resolve(sheet.width()).as_slice() else {
            bail!("total column of {} is not a single column", source.display());
        };
        let rows = summary2::FIRST_ROW..sheet.height();

        if wb.labels.is_empty() {
            wb.set_labels(rows.clone().map(|r| sheet.text(r, 0)).collect());
        }
        wb.push_year(year, rows.map(|r| sheet.number(r, col)).collect())?;
        wb.save()?;
        info!(year, source = %source.display(), "added year");
    }
    Ok(wb)
}
