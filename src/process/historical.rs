// src/process/historical.rs

use super::intermediate::IntermediateWorkbook;
use super::sources::report_year;
use super::table::EmissionTable;
use crate::schema::{sectors::HISTORICAL_TABLES, HISTORICAL};
use crate::settings::Settings;
use anyhow::{Context, Result};
use std::ops::RangeInclusive;
use tracing::{info, instrument};

/// The historical range ends before `report_year - YEAR_END_LAG`.
/// Deliberately not shared with the transport lag.
pub const YEAR_END_LAG: i32 = 1;

pub fn years(settings: &Settings, datestamp: &str) -> Result<RangeInclusive<i32>> {
    let end = report_year(datestamp)? - YEAR_END_LAG;
    Ok(settings.first_year..=end - 1)
}

/// Slice the intermediate workbook into the seven per-sector tables,
/// returned with their output file names.
#[instrument(skip(settings, wb))]
pub fn transform(
    settings: &Settings,
    wb: &IntermediateWorkbook,
    datestamp: &str,
) -> Result<Vec<(&'static str, EmissionTable)>> {
    let years = years(settings, datestamp)?;
    HISTORICAL_TABLES
        .iter()
        .map(|def| {
            let table = EmissionTable::assemble(def.columns, &HISTORICAL, years.clone(), |r| {
                Ok(wb.series(years.clone(), r)?)
            })
            .with_context(|| format!("assembling {}", def.file))?;
            Ok((def.file, table))
        })
        .collect()
}

#[instrument(skip(settings))]
pub fn run(settings: &Settings, datestamp: &str) -> Result<()> {
    let wb = IntermediateWorkbook::load(&settings.intermediate)?;
    for (file, table) in transform(settings, &wb, datestamp)? {
        let path = settings.output(file);
        table.write_csv(&path)?;
        info!(path = %path.display(), years = table.years().len(), "wrote historical emissions");
    }
    Ok(())
}
