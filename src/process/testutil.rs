//! Workbook fixtures shaped like the upstream files.

use crate::schema::layouts::{nepn, paris, summary2, table1_a3, transport_split};
use anyhow::Result;
use rust_xlsxwriter::Workbook;
use std::{fs, path::Path};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,emissions_etl=debug")),
        )
        .with_test_writer()
        .finish();
    // another test may have set it already
    let _ = tracing::subscriber::set_global_default(subscriber);
}

pub const DATESTAMP: &str = "20240414";
pub const REPORT_YEAR: i32 = 2024;

/// Value written to Summary2 column J for sector line `k` of `year`.
pub fn summary2_value(year: i32, k: u32) -> f64 {
    (year - 1900) as f64 * 1000.0 + k as f64
}

/// Summary2 line that holds a notation key instead of a number.
pub const SUMMARY2_TEXT_LINE: u32 = 48;

/// CO2 value written to Table1.A(a)s3 category row `offset` of `year`.
pub fn transport_co2(year: i32, offset: u32) -> f64 {
    (year - 1980) as f64 + offset as f64
}
pub const TRANSPORT_CH4: f64 = 0.5;
pub const TRANSPORT_N2O: f64 = 0.01;

pub fn source_name(report_year: i32, year: i32) -> String {
    format!("SVN_{}_{:04}_{}.xlsx", report_year, year, DATESTAMP)
}

/// A yearly CRF workbook with the Summary2 and Table1.A(a)s3 sheets.
pub fn write_source_year(path: &Path, year: i32) -> Result<()> {
    create_parent(path)?;
    let mut wb = Workbook::new();
    {
        let ws = wb.add_worksheet().set_name("Summary2")?;
        ws.write_string(0, 0, "TABLE SUMMARY 2 SUMMARY REPORT FOR CO2 EQUIVALENT EMISSIONS")?;
        for k in 0..=60u32 {
            let row = summary2::FIRST_ROW + k;
            let label = if k == 0 {
                "Total (net emissions)".to_string()
            } else {
                format!("line {}", k)
            };
            ws.write_string(row, 0, label)?;
            if k == SUMMARY2_TEXT_LINE {
                ws.write_string(row, 9, "NO")?;
            } else {
                ws.write_number(row, 9, summary2_value(year, k))?;
            }
        }
    }
    {
        let ws = wb.add_worksheet().set_name("Table1.A(a)s3")?;
        ws.write_string(0, 0, "TABLE 1.A(a) SECTORAL BACKGROUND DATA FOR ENERGY")?;
        ws.write_string(table1_a3::FIRST_ROW, 0, "1.A.3. Transport")?;
        for offset in 0..=table1_a3::OTHER_TRANSPORTATION {
            let row = table1_a3::FIRST_ROW + offset;
            if offset == table1_a3::ROAD_OTHER {
                for col in 2..5 {
                    ws.write_string(row, col, "NO")?;
                }
            } else {
                ws.write_number(row, 2, transport_co2(year, offset))?;
                ws.write_number(row, 3, TRANSPORT_CH4)?;
                ws.write_number(row, 4, TRANSPORT_N2O)?;
            }
        }
        ws.write_string(table1_a3::FIRST_ROW + table1_a3::OTHER_TRANSPORTATION + 2, 0, "Note")?;
    }
    wb.save(path)?;
    Ok(())
}

/// One yearly workbook per year in `years` under `dir`.
pub fn write_sources(dir: &Path, years: std::ops::RangeInclusive<i32>) -> Result<()> {
    fs::create_dir_all(dir)?;
    for year in years {
        write_source_year(&dir.join(source_name(REPORT_YEAR, year)), year)?;
    }
    Ok(())
}

/// Heavy-duty split workbook; block row `r` holds `r + 1` in every year column.
pub fn write_transport_split(path: &Path, years: usize) -> Result<()> {
    create_parent(path)?;
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, 0, "Emisije TGP iz cestnega prometa")?;
    for r in 0..transport_split::ROWS {
        let row = transport_split::FIRST_ROW + r;
        ws.write_string(row, 0, if r % 2 == 0 { "tovornjaki" } else { "avtobusi" })?;
        for i in 0..years {
            let col = (transport_split::FIRST_COL as usize + i) as u16;
            ws.write_number(row, col, (r + 1) as f64)?;
        }
    }
    wb.save(path)?;
    Ok(())
}

/// Paris projection cell value for scenario column `col`, row `i`.
pub fn paris_value(col: u32, i: u32) -> f64 {
    100.0 * col as f64 + i as f64
}

pub fn write_paris(path: &Path) -> Result<()> {
    create_parent(path)?;
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet().set_name("Projekcije")?;
    ws.write_string(0, 0, "leto")?;
    for i in 0..=(paris::LAST_YEAR - paris::FIRST_YEAR) as u32 {
        let row = paris::FIRST_ROW + i;
        ws.write_number(row, 0, (paris::FIRST_YEAR + i as i32) as f64)?;
        for (_, col) in paris::COLUMNS {
            ws.write_number(row, col as u16, paris_value(col, i))?;
        }
    }
    wb.save(path)?;
    Ok(())
}

/// NEPN sample for scenario `s`, sector row `r`, sample index `j`.
/// Linear in the year, so the annual series is `nepn_annual(s, r, year)`.
pub fn nepn_sample(s: usize, r: u32, j: usize) -> f64 {
    (s + 1) as f64 * 1000.0 + r as f64 * 10.0 + j as f64 * 5.0
}

pub fn nepn_annual(s: usize, r: u32, year: i32) -> f64 {
    (s + 1) as f64 * 1000.0 + r as f64 * 10.0 + (year - 2020) as f64
}

pub fn write_nepn(path: &Path) -> Result<()> {
    create_parent(path)?;
    let mut wb = Workbook::new();
    wb.add_worksheet().set_name("Bilanca")?;
    let ws = wb.add_worksheet().set_name("EmisijeTGP")?;
    ws.write_string(0, 0, "Emisije TGP")?;
    for (s, (_, start)) in nepn::SCENARIOS.iter().enumerate() {
        for (j, year) in nepn::SAMPLE_YEARS.iter().enumerate() {
            let col = (*start as usize + j) as u16;
            ws.write_number(nepn::FIRST_ROW - 1, col, *year as f64)?;
            for r in 0..nepn::ROWS {
                ws.write_number(nepn::FIRST_ROW + r, col, nepn_sample(s, r, j))?;
            }
        }
    }
    wb.save(path)?;
    Ok(())
}

pub fn write_state(path: &Path, date: &str, env: &str) -> Result<()> {
    create_parent(path)?;
    fs::write(
        path,
        format!(
            "EU_LATEST_ENV={}\nEU_LATEST_DATE={}\nCHKSUM_LATEST_INTERMEDIATE=\n\
             CHKSUM_LATEST_TRANSPORT=\nCHKSUM_LATEST_HISTORICAL=\nCHKSUM_PARIS=\nCHKSUM_NEPN=\n",
            env, date
        ),
    )?;
    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
