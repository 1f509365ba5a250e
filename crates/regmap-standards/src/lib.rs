#![deny(unsafe_code)]

//! Rule tables for register map conversion.
//!
//! Each source kind has one [`Profile`], embedded as TOML and loadable from
//! a user file with the same schema. Profiles are handed to every stage
//! explicitly; nothing here is global.

pub mod error;
pub mod profile;
pub mod registry;
pub mod units;

pub use crate::error::{Result, StandardsError};
pub use crate::profile::{
    AccessMatch, ClassificationRules, Codes, FieldFamily, LabelMatch, LengthRule, NameMatch,
    NameRule, NewKeyPolicy, PermissionOverride, PermissionRules, Profile, PropagationRule, Radix,
    SectionTitle, ValueRange,
};
pub use crate::registry::{Standards, builtin_profile_text};
pub use crate::units::{UnitTable, unit_key};
