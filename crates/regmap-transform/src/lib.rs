//! Field normalization primitives.
//!
//! Each module handles one kind of noisy cell:
//!
//! - **numeric**: numbers and null placeholders (`---`, `nan`, blanks)
//! - **register**: decimal and hexadecimal register addresses
//! - **range**: free-text spans such as `-10 to 200 °C`
//! - **units**: unit canonicalization through the profile and the shared table
//! - **dimension**: `[a..b]` array templates
//! - **names**: duplicate-name disambiguation
//! - **bits**: packed-bit mask sequencing
//! - **text**: whitespace cleanup and truncation
//!
//! Nothing here knows about rows or tables; the core pipeline applies these
//! functions and turns failures into warnings.

pub mod bits;
pub mod dimension;
pub mod names;
pub mod numeric;
pub mod range;
pub mod register;
pub mod text;
pub mod units;

pub use bits::{MASK_GROUP_SIZE, RegisterBits, mask_for};
pub use dimension::{DimensionSpan, MAX_DIMENSION_CHILDREN, parse_dimension};
pub use names::disambiguate_names;
pub use numeric::{Coerced, coerce_number, is_placeholder};
pub use range::{RangeSpec, parse_range};
pub use register::decode_register;
pub use text::{clean_text, truncate_chars};
pub use units::canonical_unit;
