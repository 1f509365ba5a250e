#![deny(unsafe_code)]

//! Register map conversion pipeline.
//!
//! # Stages
//!
//! 1. **adapter** - per-kind raw table extraction and document count checks
//! 2. **context** - header resolution and the running mode/category fold
//! 3. **draft** - field normalization and dimension expansion
//! 4. **classify** - first-match category rules
//! 5. **attributes** - permissions, sampling, ranges, lengths, views, masks
//! 6. **unify** - dense ids and the canonical schema check
//!
//! [`convert`] runs them in order for one request. Every stage takes the
//! rule [`Profile`](regmap_standards::Profile) explicitly; nothing is global
//! and nothing survives the call.

pub mod adapter;
pub mod attributes;
pub mod classify;
pub mod context;
pub mod draft;
pub mod pipeline;
pub mod unify;

pub use adapter::{SourceAdapter, adapter_for};
pub use classify::{Classification, RuleMatch, classify};
pub use context::{ContextState, Propagator, TaggedRow};
pub use draft::{DimensionRole, Draft};
pub use pipeline::{Conversion, Converter, convert};
pub use unify::unify;
