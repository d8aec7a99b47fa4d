//! CLI command implementations

pub mod start;
pub mod status;
