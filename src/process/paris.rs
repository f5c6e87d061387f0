// src/process/paris.rs

use super::table::EmissionTable;
use super::workbook::Sheet;
use crate::schema::layouts::paris;
use crate::settings::Settings;
use anyhow::Result;
use std::path::Path;
use tracing::{info, instrument};

pub const OUTPUT: &str = "emissions.projections.ec_paris.csv";

/// The five scenario columns of the Paris projection workbook, 2020 to 2030.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn transform(path: &Path) -> Result<EmissionTable> {
    let sheet = Sheet::open(path, &paris::LAYOUT)?;
    let mut table = EmissionTable::new(paris::FIRST_YEAR..=paris::LAST_YEAR);
    let n = table.years().len() as u32;
    for (name, col) in paris::COLUMNS {
        let values = (0..n)
            .map(|i| sheet.number(paris::FIRST_ROW + i, col))
            .collect();
        table.push(name, values)?;
    }
    Ok(table)
}

#[instrument(skip_all)]
pub fn run(settings: &Settings) -> Result<()> {
    let table = transform(&settings.paris_projections)?;
    let path = settings.output(OUTPUT);
    table.write_csv(&path)?;
    info!(path = %path.display(), "wrote paris projections");
    Ok(())
}
