//! Resource retrieval for runstage
//!
//! Fetches a remote resource over HTTP(S) and writes the whole body to a
//! local path. There are no retries, no resumption and no integrity checks;
//! callers decide whether a failure is fatal.

pub mod download;
pub mod error;

pub use download::{HttpFetcher, ResourceFetcher};
pub use error::FetchError;
