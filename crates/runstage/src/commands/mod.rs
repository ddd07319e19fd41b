//! CLI command implementations

pub mod compare;
pub mod materialize;
pub mod version;
