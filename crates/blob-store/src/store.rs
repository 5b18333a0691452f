//! Storage abstraction shared by every blob store backend

use crate::error::{BlobStoreError, Result};
use crate::types::BlobStat;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Fallback content type when nothing better is known
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// A namespace of blobs keyed by relative, `/`-separated paths.
///
/// No operation is atomic with respect to another: `exists` followed by
/// `put` can race with a concurrent writer, and the last write wins.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Whether a blob is stored at `path`
    async fn exists(&self, path: &str) -> Result<bool>;

    /// Write `data` to `path`, replacing any previous blob
    async fn put(&self, path: &str, data: &[u8], content_type: &str) -> Result<()>;

    /// Read the blob at `path`
    async fn get(&self, path: &str) -> Result<Vec<u8>>;

    /// Remove the blob at `path`
    async fn delete(&self, path: &str) -> Result<()>;

    /// Size of the blob in bytes
    async fn size(&self, path: &str) -> Result<u64>;

    /// Last modification time of the blob
    async fn last_modified(&self, path: &str) -> Result<DateTime<Utc>>;

    /// Content type recorded at write time, else guessed from the extension
    async fn mime_type(&self, path: &str) -> Result<String>;

    /// Public URL the blob is reachable at
    fn url(&self, path: &str) -> String;

    /// Paths of the blobs directly under `prefix`, sorted
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Size and last modification time in one call
    async fn stat(&self, path: &str) -> Result<BlobStat> {
        Ok(BlobStat {
            size: self.size(path).await?,
            last_modified: self.last_modified(path).await?,
        })
    }
}

/// Validate a store-relative path and return its canonical `/`-joined form.
///
/// Empty paths, absolute paths and paths containing `.` or `..` segments are
/// rejected so that no key can resolve outside the store root.
pub fn normalize_path(path: &str) -> Result<String> {
    if path.starts_with('/') || path.contains('\\') {
        return Err(BlobStoreError::InvalidPath(path.to_string()));
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() || segments.iter().any(|s| *s == "." || *s == "..") {
        return Err(BlobStoreError::InvalidPath(path.to_string()));
    }

    Ok(segments.join("/"))
}

/// Guess a content type from the file extension of `path`
pub fn guess_mime_type(path: &str) -> &'static str {
    let extension = path
        .rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") | Some("jfif") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        Some("ico") => "image/x-icon",
        Some("avif") => "image/avif",
        Some("tif") | Some("tiff") => "image/tiff",
        Some("heic") => "image/heic",
        _ => DEFAULT_MIME_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path("downloaded_images/cat.png").unwrap(),
            "downloaded_images/cat.png"
        );
        assert_eq!(
            normalize_path("downloaded_images//cat.png/").unwrap(),
            "downloaded_images/cat.png"
        );
    }

    #[test]
    fn test_normalize_path_rejects_escapes() {
        assert!(normalize_path("").is_err());
        assert!(normalize_path("/etc/passwd").is_err());
        assert!(normalize_path("downloaded_images/../secret").is_err());
        assert!(normalize_path("./cat.png").is_err());
        assert!(normalize_path("..").is_err());
        assert!(normalize_path("a\\b").is_err());
    }

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type("downloaded_images/x_cat.png"), "image/png");
        assert_eq!(guess_mime_type("x_photo.JPG"), "image/jpeg");
        assert_eq!(guess_mime_type("x_anim.gif"), "image/gif");
        assert_eq!(guess_mime_type("x_noext"), DEFAULT_MIME_TYPE);
        assert_eq!(guess_mime_type("dir.d/noext"), DEFAULT_MIME_TYPE);
    }
}
