//! CLI library components for the register map converter.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
