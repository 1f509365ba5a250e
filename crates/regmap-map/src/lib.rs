#![deny(unsafe_code)]

//! Header Resolver.
//!
//! Promotes one row of a raw table to header, picks the field family whose
//! spellings it matches best, and renames columns to canonical [`Field`]s.
//! Columns no family knows are dropped.
//!
//! [`Field`]: regmap_model::Field

pub mod error;
pub mod header;
pub mod resolver;
pub mod score;
pub mod utils;

pub use error::ResolveError;
pub use header::{HeaderMatch, column_fields, locate_header};
pub use resolver::HeaderResolver;
pub use score::{FamilyIndex, FamilyScore, best_family};
pub use utils::normalize_header;
