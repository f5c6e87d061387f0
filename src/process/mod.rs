// src/process/mod.rs
//! Spreadsheet transforms: yearly sources -> intermediate workbook -> CSV tables.

pub mod historical;
pub mod intermediate;
pub mod interp;
pub mod nepn;
pub mod paris;
pub mod sources;
pub mod table;
pub mod transport;
pub mod workbook;

#[cfg(test)]
pub(crate) mod testutil;

pub use intermediate::IntermediateWorkbook;
pub use table::EmissionTable;
pub use workbook::{Cell, Sheet, Workbook};
