// src/process/transport.rs

use super::sources::{find_source, report_year};
use super::table::EmissionTable;
use super::workbook::{Cell, Sheet, Workbook};
use crate::schema::layouts::{summary2, table1_a3, transport_split};
use crate::settings::Settings;
use anyhow::{bail, Result};
use std::{ops::RangeInclusive, path::Path};
use tracing::{debug, info, instrument};

pub const OUTPUT: &str = "emissions.historical.energy.transport.csv";

/// Global warming potentials (100-year) of CO2, CH4 and N2O.
pub const GWP: [f64; 3] = [1.0, 25.0, 298.0];

/// Last inventory year is the reporting year minus this lag, inclusive.
pub const YEAR_LAG: i32 = 2;

const COLUMNS: [&str; 14] = [
    "total",
    "road_transporation.total",
    "road_transporation.cars",
    "road_transporation.light_duty_trucks",
    "road_transporation.heavy_duty_trucks",
    "road_transporation.buses",
    "road_transporation.motorcycles",
    "road_transporation.other",
    "railways",
    "domestic_aviation",
    "domestic_navigation",
    "other_transportation",
    "international_aviation",
    "international_navigation",
];

/// CO2-equivalent of a (CO2, CH4, N2O) triple.
pub fn co2_equiv(gases: [f64; 3]) -> f64 {
    gases.iter().zip(GWP).map(|(g, w)| g * w).sum()
}

/// Notation keys ("NO", "IE", ...) count as zero so the weighting still
/// yields a value; empty cells stay missing.
fn coerce(cell: Cell) -> Option<f64> {
    match cell {
        Cell::Number(x) => Some(x),
        Cell::Text => Some(0.0),
        Cell::Empty => None,
    }
}

fn weighted(cells: [Cell; 3]) -> Option<f64> {
    let [a, b, c] = cells.map(coerce);
    Some(co2_equiv([a?, b?, c?]))
}

pub fn years(settings: &Settings, datestamp: &str) -> Result<RangeInclusive<i32>> {
    Ok(settings.first_year..=report_year(datestamp)? - YEAR_LAG)
}

/// Heavy-duty split sheet: one column per year starting at `FIRST_COL`.
struct Split(Sheet);

impl Split {
    fn open(path: &Path, n_years: usize) -> Result<Self> {
        let sheet = Sheet::open(path, &transport_split::LAYOUT)?;
        sheet.require(
            transport_split::FIRST_ROW + transport_split::ROWS,
            transport_split::FIRST_COL + n_years as u32,
        )?;
        Ok(Self(sheet))
    }

    /// Rows alternate trucks/buses per gas; `parity` 0 is trucks, 1 buses.
    fn equiv(&self, i: usize, parity: u32) -> Option<f64> {
        let col = transport_split::FIRST_COL + i as u32;
        let cell = |g: u32| self.0.cell(transport_split::FIRST_ROW + 2 * g + parity, col);
        weighted([cell(0), cell(1), cell(2)])
    }
}

/// One output row (without the year) from a yearly source workbook.
fn year_row(source: &Path, split: &Split, i: usize) -> Result<[Option<f64>; 14]> {
    let mut book = Workbook::open(source)?;

    let energy = book.sheet(&table1_a3::LAYOUT)?;
    let &[co2, ch4, n2o] = table1_a3::GASES.resolve(energy.width()).as_slice() else {
        bail!("{} has fewer than three gas columns", source.display());
    };
    let category = |offset: u32| {
        let row = table1_a3::FIRST_ROW + offset;
        weighted([
            energy.cell(row, co2),
            energy.cell(row, ch4),
            energy.cell(row, n2o),
        ])
    };

    let summary = book.sheet(&summary2::LAYOUT)?;
    let &[last] = summary2::LAST.resolve(summary.width()).as_slice() else {
        bail!("{} has an empty Summary2 sheet", source.display());
    };

    Ok([
        category(table1_a3::TOTAL),
        category(table1_a3::ROAD),
        category(table1_a3::CARS),
        category(table1_a3::LIGHT_DUTY_TRUCKS),
        split.equiv(i, 0),
        split.equiv(i, 1),
        category(table1_a3::MOTORCYCLES),
        category(table1_a3::ROAD_OTHER),
        category(table1_a3::RAILWAYS),
        category(table1_a3::DOMESTIC_AVIATION),
        category(table1_a3::DOMESTIC_NAVIGATION),
        category(table1_a3::OTHER_TRANSPORTATION),
        summary.number(summary2::INTERNATIONAL_AVIATION_ROW, last),
        coerce(summary.cell(summary2::INTERNATIONAL_NAVIGATION_ROW, last)),
    ])
}

/// Transport emissions per year in CO2 equivalents, from the yearly source
/// workbooks plus the heavy-duty trucks/buses split.
#[instrument(skip(settings))]
pub fn transform(settings: &Settings, datestamp: &str) -> Result<EmissionTable> {
    let years = years(settings, datestamp)?;
    let report = report_year(datestamp)?;
    let dir = settings.dated_dir(datestamp);
    let n = years.clone().count();
    let split = Split::open(&settings.transport_split, n)?;

    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::with_capacity(n); COLUMNS.len()];
    for (i, year) in years.clone().enumerate() {
        let source = find_source(&dir, report, year)?;
        let row = year_row(&source, &split, i)?;
        for (col, v) in columns.iter_mut().zip(row) {
            col.push(v);
        }
        debug!(year, source = %source.display(), "transport year");
    }

    let mut table = EmissionTable::new(years);
    for (name, values) in COLUMNS.iter().zip(columns) {
        table.push(*name, values)?;
    }
    Ok(table)
}

#[instrument(skip(settings))]
pub fn run(settings: &Settings, datestamp: &str) -> Result<()> {
    let table = transform(settings, datestamp)?;
    let path = settings.output(OUTPUT);
    table.write_csv(&path)?;
    info!(path = %path.display(), years = table.years().len(), "wrote transport emissions");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::testutil::{self, summary2_value, transport_co2, TRANSPORT_CH4, TRANSPORT_N2O};
    use tempfile::tempdir;

    fn close(a: Option<f64>, b: f64) -> bool {
        a.map_or(false, |a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn co2_equiv_is_linear() {
        let a = [1.5, 0.25, 0.01];
        let b = [-3.0, 2.0, 7.5];
        let sum = [a[0] + b[0], a[1] + b[1], a[2] + b[2]];
        assert!((co2_equiv(sum) - (co2_equiv(a) + co2_equiv(b))).abs() < 1e-9);
        for x in [0.0, 1.0, -42.5, 1e6] {
            assert_eq!(co2_equiv([x, 0.0, 0.0]), x);
        }
        assert_eq!(co2_equiv([0.0, 1.0, 1.0]), 323.0);
    }

    #[test]
    fn notation_keys_weigh_as_zero_and_blanks_stay_missing() {
        assert_eq!(weighted([Cell::Text, Cell::Text, Cell::Text]), Some(0.0));
        assert_eq!(weighted([Cell::Number(2.0), Cell::Text, Cell::Number(1.0)]), Some(300.0));
        assert_eq!(weighted([Cell::Number(2.0), Cell::Empty, Cell::Number(1.0)]), None);
    }

    #[test]
    fn transport_table_from_fixtures() -> Result<()> {
        let tmp = tempdir()?;
        let mut settings = Settings::rooted(tmp.path());
        settings.first_year = 2019;
        testutil::write_sources(&settings.dated_dir(testutil::DATESTAMP), 2019..=2023)?;
        testutil::write_transport_split(&settings.transport_split, 4)?;

        let table = transform(&settings, testutil::DATESTAMP)?;
        assert_eq!(table.years(), &[2019, 2020, 2021, 2022]);
        assert_eq!(table.column_names().count(), 14);

        let gases = TRANSPORT_CH4 * 25.0 + TRANSPORT_N2O * 298.0;
        let road = table.column("road_transporation.total").unwrap();
        assert!(close(road[1], transport_co2(2020, table1_a3::ROAD) + gases));

        assert_eq!(table.column("road_transporation.other").unwrap()[0], Some(0.0));
        assert!(close(table.column("road_transporation.heavy_duty_trucks").unwrap()[3], 1566.0));
        assert!(close(table.column("road_transporation.buses").unwrap()[3], 1890.0));
        assert_eq!(
            table.column("international_aviation").unwrap()[2],
            Some(summary2_value(2021, 51))
        );
        assert_eq!(
            table.column("international_navigation").unwrap()[2],
            Some(summary2_value(2021, 52))
        );
        Ok(())
    }

    #[test]
    fn split_workbook_must_cover_every_year() -> Result<()> {
        let tmp = tempdir()?;
        let mut settings = Settings::rooted(tmp.path());
        settings.first_year = 2019;
        testutil::write_sources(&settings.dated_dir(testutil::DATESTAMP), 2019..=2022)?;
        testutil::write_transport_split(&settings.transport_split, 2)?;

        let err = transform(&settings, testutil::DATESTAMP).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<crate::error::SchemaError>(),
            Some(crate::error::SchemaError::TooSmall { .. })
        ));
        Ok(())
    }
}
