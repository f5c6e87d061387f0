//! Incremental emissions ETL: mirrors the national GHG inventory workbooks,
//! merges them into one intermediate workbook and derives the CSV tables,
//! skipping every stage whose inputs did not change since the last run.

pub mod error;
pub mod fetch;
pub mod history;
pub mod pipeline;
pub mod process;
pub mod schema;
pub mod settings;

pub use pipeline::{run, RunReport};
pub use settings::Settings;
