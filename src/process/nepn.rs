// src/process/nepn.rs

use super::interp::annual;
use super::table::EmissionTable;
use super::workbook::Sheet;
use crate::schema::{layouts::nepn, sectors::PROJECTION_COLUMNS, NEPN};
use crate::settings::Settings;
use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tracing::{info, instrument};

pub fn output_name(scenario: &str) -> String {
    format!("emissions.projections.{}.csv", scenario)
}

/// Annual series for each sector row of one scenario block, interpolated
/// from the 5-year samples.
fn scenario_rows(sheet: &Sheet, first_col: u32) -> Vec<Vec<Option<f64>>> {
    (0..nepn::ROWS)
        .map(|r| {
            let samples: Vec<_> = (0..nepn::SAMPLE_YEARS.len() as u32)
                .map(|j| sheet.number(nepn::FIRST_ROW + r, first_col + j))
                .collect();
            annual(&nepn::SAMPLE_YEARS, &samples)
        })
        .collect()
}

/// One projection table per scenario, in the workbook's block order.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn transform(path: &Path) -> Result<Vec<(&'static str, EmissionTable)>> {
    let sheet = Sheet::open(path, &nepn::LAYOUT)?;
    let years = nepn::SAMPLE_YEARS[0]..=nepn::SAMPLE_YEARS[nepn::SAMPLE_YEARS.len() - 1];

    nepn::SCENARIOS
        .iter()
        .map(|&(scenario, first_col)| {
            let rows = scenario_rows(&sheet, first_col);
            let table = EmissionTable::assemble(PROJECTION_COLUMNS, &NEPN, years.clone(), |r| {
                rows.get(r)
                    .cloned()
                    .ok_or_else(|| anyhow!("row {} is outside the {}-row block", r, nepn::ROWS))
            })
            .with_context(|| format!("scenario {}", scenario))?;
            Ok((scenario, table))
        })
        .collect()
}

#[instrument(skip_all)]
pub fn run(settings: &Settings) -> Result<()> {
    for (scenario, table) in transform(&settings.nepn_projections)? {
        let path = settings.output(&output_name(scenario));
        table.write_csv(&path)?;
        info!(path = %path.display(), scenario, "wrote nepn projections");
    }
    Ok(())
}
