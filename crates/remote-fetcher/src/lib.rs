//! Remote fetcher
//!
//! Issues a single outbound HTTP GET with a timeout and hands back the
//! status, headers and body. No retries.

pub mod error;
pub mod fetcher;

pub use error::{FetchError, Result};
pub use fetcher::{FetchedResponse, RemoteFetcher, DEFAULT_TIMEOUT_SECS};
