//! Where every value the pipeline needs lives inside the upstream workbooks.
//!
//! All coordinates are 0-based and absolute from cell A1.

use super::types::{Anchor, ColumnRule, SheetLayout, SheetRef};

/// CRF "Summary2" sheet of a yearly inventory workbook: CO2-equivalent
/// emissions per sector. Sector rows start at Excel row 7, one per line of
/// the historical sector map; the total column is J.
pub mod summary2 {
    use super::*;

    pub const FIRST_ROW: u32 = 6;
    pub const TOTAL: ColumnRule = ColumnRule::Fixed(9);
    pub const LAST: ColumnRule = ColumnRule::Last(1);
    pub const INTERNATIONAL_AVIATION_ROW: u32 = FIRST_ROW + 51;
    pub const INTERNATIONAL_NAVIGATION_ROW: u32 = FIRST_ROW + 52;

    pub const LAYOUT: SheetLayout = SheetLayout {
        sheet: SheetRef::Name("Summary2"),
        min_rows: FIRST_ROW + 60,
        min_cols: 10,
        anchors: &[Anchor {
            row: FIRST_ROW,
            col: 0,
            contains: "total",
        }],
    };
}

/// CRF "Table1.A(a)s3": fuel combustion in transport, one CO2/CH4/N2O triple
/// (the last three used columns) per sub-category row.
pub mod table1_a3 {
    use super::*;

    pub const FIRST_ROW: u32 = 8;
    pub const GASES: ColumnRule = ColumnRule::Last(3);

    pub const TOTAL: u32 = 0;
    pub const DOMESTIC_AVIATION: u32 = 6;
    pub const ROAD: u32 = 10;
    pub const CARS: u32 = 18;
    pub const LIGHT_DUTY_TRUCKS: u32 = 26;
    pub const MOTORCYCLES: u32 = 42;
    pub const ROAD_OTHER: u32 = 51;
    pub const RAILWAYS: u32 = 52;
    pub const DOMESTIC_NAVIGATION: u32 = 58;
    pub const OTHER_TRANSPORTATION: u32 = 66;

    /// The sheet ends with two footer rows below the last category.
    pub const LAYOUT: SheetLayout = SheetLayout {
        sheet: SheetRef::Name("Table1.A(a)s3"),
        min_rows: FIRST_ROW + OTHER_TRANSPORTATION + 3,
        min_cols: 3,
        anchors: &[Anchor {
            row: FIRST_ROW + TOTAL,
            col: 0,
            contains: "transport",
        }],
    };
}

/// Auxiliary road-transport workbook splitting heavy-duty vehicles into
/// trucks and buses. Six rows alternate trucks/buses for CO2, CH4 and N2O;
/// one column per inventory year starting at `FIRST_COL`.
pub mod transport_split {
    use super::*;

    pub const FIRST_ROW: u32 = 3;
    pub const FIRST_COL: u32 = 3;
    pub const ROWS: u32 = 6;

    pub const LAYOUT: SheetLayout = SheetLayout {
        sheet: SheetRef::Index(0),
        min_rows: FIRST_ROW + ROWS,
        min_cols: FIRST_COL + 1,
        anchors: &[],
    };
}

/// Paris-agreement projection workbook: years 2020..=2030 in rows, one
/// scenario per column.
pub mod paris {
    use super::*;

    pub const FIRST_ROW: u32 = 1;
    pub const FIRST_YEAR: i32 = 2020;
    pub const LAST_YEAR: i32 = 2030;
    pub const COLUMNS: [(&str, u32); 5] = [
        ("bau", 3),
        ("nepn", 4),
        ("ec", 6),
        ("paris20", 8),
        ("paris15", 10),
    ];

    pub const LAYOUT: SheetLayout = SheetLayout {
        sheet: SheetRef::Index(0),
        min_rows: FIRST_ROW + (LAST_YEAR - FIRST_YEAR) as u32 + 1,
        min_cols: 11,
        anchors: &[],
    };
}

/// NEPN energy-balance workbook, sheet "EmisijeTGP": six scenario blocks of
/// 21 sector rows by 7 sample years (2020, 2025, ..., 2050).
pub mod nepn {
    use super::*;

    pub const FIRST_ROW: u32 = 24;
    pub const ROWS: u32 = 21;
    pub const SAMPLE_YEARS: [i32; 7] = [2020, 2025, 2030, 2035, 2040, 2045, 2050];

    /// Output file suffix and first column of each scenario block.
    pub const SCENARIOS: [(&str, u32); 6] = [
        ("current", 20),
        ("bau", 60),
        ("additional_nuclear", 28),
        ("additional_synthetic", 36),
        ("ambitious_additional_nuclear", 44),
        ("ambitious_additional_synthetic", 52),
    ];

    pub const LAYOUT: SheetLayout = SheetLayout {
        sheet: SheetRef::Name("EmisijeTGP"),
        min_rows: FIRST_ROW + ROWS,
        min_cols: 67,
        anchors: &[],
    };
}

/// The intermediate workbook this crate writes and later reads back:
/// a header row of years, sector labels in column A.
pub mod intermediate {
    use super::*;

    pub const SHEET: &str = "Sheet1";
    pub const HEADER_ROW: u32 = 0;
    pub const FIRST_ROW: u32 = 1;
    pub const LABEL_COL: u32 = 0;

    pub const LAYOUT: SheetLayout = SheetLayout {
        sheet: SheetRef::Name(SHEET),
        min_rows: FIRST_ROW,
        min_cols: 1,
        anchors: &[],
    };
}
