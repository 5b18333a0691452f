//! Blob store types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Size and modification time of a stored blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobStat {
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}
