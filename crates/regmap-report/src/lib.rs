//! Output generation for converted register maps.
//!
//! - **Frame**: a polars `DataFrame` with exactly the canonical columns
//! - **CSV**: that frame written through polars
//! - **JSON**: an array of records, keys in canonical order

mod frame;
mod json;

pub use frame::{ColumnType, column_type, records_to_frame, write_csv};
pub use json::{records_to_json, write_json};
