pub mod layouts;
pub mod sectors;
pub mod types;

pub use sectors::{ColumnDef, SectorIndexMap, Source, TableDef, HISTORICAL, NEPN};
pub use types::{Anchor, ColumnRule, SheetLayout, SheetRef};
