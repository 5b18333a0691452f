//! Blob store backed by a local directory

use crate::error::{BlobStoreError, Result};
use crate::store::{guess_mime_type, normalize_path, BlobStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Directory under the root holding content-type sidecars
const META_DIR: &str = ".meta";

/// A blob store rooted at a directory that is publicly served at `public_base`
pub struct FsBlobStore {
    /// Directory blobs are stored under
    root: PathBuf,
    /// URL the root directory is exposed at, without trailing slash
    public_base: String,
}

impl FsBlobStore {
    /// Create a new store; call [`FsBlobStore::init`] before use
    pub fn new(root: PathBuf, public_base: &str) -> Self {
        Self {
            root,
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }

    /// Ensure the root directory exists
    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        info!(root = ?self.root, "Blob store initialized");
        Ok(())
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.root.join(META_DIR).join(format!("{}.type", key))
    }

    /// Metadata of the file at `key`, treating directories as absent
    async fn file_metadata(&self, key: &str) -> Result<std::fs::Metadata> {
        let metadata = fs::metadata(self.blob_path(key))
            .await
            .map_err(|e| BlobStoreError::from_io(e, key))?;
        if !metadata.is_file() {
            return Err(BlobStoreError::NotFound(key.to_string()));
        }
        Ok(metadata)
    }
}

async fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    Ok(())
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn exists(&self, path: &str) -> Result<bool> {
        let key = normalize_path(path)?;
        match self.file_metadata(&key).await {
            Ok(_) => Ok(true),
            Err(BlobStoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn put(&self, path: &str, data: &[u8], content_type: &str) -> Result<()> {
        let key = normalize_path(path)?;

        let blob_path = self.blob_path(&key);
        ensure_parent(&blob_path).await?;
        fs::write(&blob_path, data).await?;

        let meta_path = self.meta_path(&key);
        ensure_parent(&meta_path).await?;
        fs::write(&meta_path, content_type.as_bytes()).await?;

        debug!(key = %key, size = data.len(), content_type, "Stored blob");
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>> {
        let key = normalize_path(path)?;
        self.file_metadata(&key).await?;
        fs::read(self.blob_path(&key))
            .await
            .map_err(|e| BlobStoreError::from_io(e, &key))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let key = normalize_path(path)?;
        self.file_metadata(&key).await?;
        fs::remove_file(self.blob_path(&key))
            .await
            .map_err(|e| BlobStoreError::from_io(e, &key))?;

        // A missing sidecar just means the blob was written by something else
        if let Err(e) = fs::remove_file(self.meta_path(&key)).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(key = %key, error = %e, "Failed to remove content-type sidecar");
            }
        }

        debug!(key = %key, "Deleted blob");
        Ok(())
    }

    async fn size(&self, path: &str) -> Result<u64> {
        let key = normalize_path(path)?;
        Ok(self.file_metadata(&key).await?.len())
    }

    async fn last_modified(&self, path: &str) -> Result<DateTime<Utc>> {
        let key = normalize_path(path)?;
        let modified = self.file_metadata(&key).await?.modified()?;
        Ok(DateTime::<Utc>::from(modified))
    }

    async fn mime_type(&self, path: &str) -> Result<String> {
        let key = normalize_path(path)?;
        self.file_metadata(&key).await?;

        match fs::read_to_string(self.meta_path(&key)).await {
            Ok(stored) if !stored.trim().is_empty() => Ok(stored.trim().to_string()),
            _ => Ok(guess_mime_type(&key).to_string()),
        }
    }

    fn url(&self, path: &str) -> String {
        let key = normalize_path(path).unwrap_or_else(|_| path.trim_start_matches('/').to_string());
        format!("{}/{}", self.public_base, key)
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let (dir, key_prefix) = if prefix.trim_matches('/').is_empty() {
            (self.root.clone(), String::new())
        } else {
            let key = normalize_path(prefix)?;
            (self.blob_path(&key), format!("{}/", key))
        };

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => paths.push(format!("{}{}", key_prefix, name)),
                Err(name) => warn!(name = ?name, "Skipping non UTF-8 file name"),
            }
        }

        paths.sort();
        Ok(paths)
    }
}
