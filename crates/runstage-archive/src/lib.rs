//! Archive handling for runstage
//!
//! - **Classification**: decide from a path's extension whether it names a
//!   supported archive, without touching the file
//! - **Extraction**: unpack zip and tar archives natively, falling back to an
//!   external unpack utility when that fails
//! - **Collection**: walk an extraction directory and describe every file
//!   found as a resource record

pub mod classify;
pub mod collect;
pub mod error;
pub mod extract;

pub use classify::{is_archive, ArchiveFormat, UnpackFormat, UNPACK_FORMATS};
pub use collect::collect_files;
pub use error::ExtractError;
pub use extract::{ArchiveExtractor, FallbackTool};
