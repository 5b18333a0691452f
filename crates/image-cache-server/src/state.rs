use blob_store::BlobStore;
use chrono::{DateTime, Utc};
use remote_fetcher::RemoteFetcher;
use std::sync::Arc;

use crate::config::Config;

/// Shared state passed to all route handlers
pub struct ServerState {
    pub store: Arc<dyn BlobStore>,
    pub fetcher: RemoteFetcher,
    pub config: Config,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(store: Arc<dyn BlobStore>, fetcher: RemoteFetcher, config: Config) -> Self {
        Self {
            store,
            fetcher,
            config,
            started_at: Utc::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        (Utc::now() - self.started_at).num_seconds().max(0) as u64
    }
}

pub type SharedState = Arc<ServerState>;
