//! Type definitions for run metadata and runtime configuration

mod metadata;
mod record;
mod runtime_config;

pub use metadata::*;
pub use record::*;
pub use runtime_config::*;
