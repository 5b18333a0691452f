//! Filesystem-backed blob store
//!
//! Stores binary blobs under a root directory keyed by relative path, and
//! resolves each key to the public URL the directory is served from.

mod error;
mod fs;
mod store;
mod types;

pub use error::{BlobStoreError, Result};
pub use fs::FsBlobStore;
pub use store::{guess_mime_type, normalize_path, BlobStore};
pub use types::BlobStat;
