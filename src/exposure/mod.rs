//! Exposure reference data: the net loss ratio table and the sum-insured ceiling mapping

mod data;
mod table;
mod ceiling;
pub mod loader;

pub use data::ExposureRecord;
pub use table::ExposureTable;
pub use ceiling::{CeilingMap, normalize_label};
pub use loader::{
    load_table, load_table_from_reader, load_default_table,
    load_ceilings, load_ceilings_from_reader,
};
