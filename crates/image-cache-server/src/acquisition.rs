//! Download a remote image into the blob store
//!
//! validate URL -> derive cache name -> fetch -> check content type -> persist

use blob_store::BlobStore;
use rand::distributions::Alphanumeric;
use rand::Rng;
use remote_fetcher::RemoteFetcher;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::AppError;
use crate::types::DownloadResponse;

/// Store prefix all downloaded images live under
pub const IMAGE_PREFIX: &str = "downloaded_images";

const RANDOM_PREFIX_LEN: usize = 10;
const DEFAULT_EXTENSION: &str = "jpg";

/// Parse the `url` parameter into an absolute http(s) URL
pub fn parse_source_url(raw: Option<&str>) -> Result<Url, AppError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());
    let raw = raw.ok_or(AppError::MissingUrl)?;

    let url = Url::parse(raw).map_err(|_| AppError::InvalidUrl(raw.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(AppError::InvalidUrl(raw.to_string()));
    }

    Ok(url)
}

/// Random alphanumeric prefix separating unrelated downloads
pub fn random_prefix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_PREFIX_LEN)
        .map(char::from)
        .collect()
}

/// Last non-empty segment of the URL path, or empty for a bare host
fn url_basename(url: &Url) -> &str {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .unwrap_or("")
}

/// Percent-decode a path segment and keep only `[A-Za-z0-9._-]`, so the stored
/// name reads the same raw, percent-decoded, and inside a URL
fn sanitize_basename(segment: &str) -> String {
    let decoded = urlencoding::decode_binary(segment.as_bytes());
    String::from_utf8_lossy(&decoded)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn has_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| !ext.is_empty())
        .unwrap_or(false)
}

/// Store path for a download of `url`: `downloaded_images/{prefix}_{basename}[.jpg]`
pub fn derive_file_name(url: &Url, prefix: &str) -> String {
    let mut name = format!("{}_{}", prefix, sanitize_basename(url_basename(url)));
    if !has_extension(&name) {
        name.push('.');
        name.push_str(DEFAULT_EXTENSION);
    }
    format!("{}/{}", IMAGE_PREFIX, name)
}

/// Strip the store prefix from a cache path
pub fn file_name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// The validate, fetch, verify and persist sequence for one image
pub struct ImageAcquisition<'a> {
    store: &'a dyn BlobStore,
    fetcher: &'a RemoteFetcher,
}

impl<'a> ImageAcquisition<'a> {
    pub fn new(store: &'a dyn BlobStore, fetcher: &'a RemoteFetcher) -> Self {
        Self { store, fetcher }
    }

    /// Run the whole workflow for a raw `url` parameter
    pub async fn acquire(&self, raw_url: Option<&str>) -> Result<DownloadResponse, AppError> {
        let url = parse_source_url(raw_url)?;
        let path = derive_file_name(&url, &random_prefix());
        self.acquire_into(&url, &path).await
    }

    /// Download `url` into `path` unless something is already stored there
    pub async fn acquire_into(&self, url: &Url, path: &str) -> Result<DownloadResponse, AppError> {
        if self.store.exists(path).await? {
            debug!(path, "Image already cached, skipping download");
            let content_type = self.store.mime_type(path).await?;
            let file_size = self.store.size(path).await?;
            return Ok(self.response("Resim zaten mevcut", url, path, file_size, content_type));
        }

        let fetched = self.fetcher.fetch(url).await.map_err(|e| {
            warn!(url = %url, error = %e, "Image download failed");
            AppError::DownloadFailed { status: e.status() }
        })?;

        let content_type = fetched.content_type().unwrap_or_default().to_string();
        if !is_image_content_type(&content_type) {
            warn!(url = %url, content_type = %content_type, "Rejected non-image response");
            return Err(AppError::NotAnImage { content_type });
        }

        self.store.put(path, &fetched.body, &content_type).await?;

        let file_size = fetched.body.len() as u64;
        info!(url = %url, path, file_size, content_type = %content_type, "Cached image");

        Ok(self.response("Resim başarıyla indirildi", url, path, file_size, content_type))
    }

    fn response(
        &self,
        message: &str,
        url: &Url,
        path: &str,
        file_size: u64,
        content_type: String,
    ) -> DownloadResponse {
        DownloadResponse {
            success: true,
            message: message.to_string(),
            filename: file_name_of(path).to_string(),
            url: self.store.url(path),
            path: path.to_string(),
            original_url: url.to_string(),
            file_size,
            content_type,
        }
    }
}

/// Media types compare case-insensitively
fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .get(..6)
        .map(|prefix| prefix.eq_ignore_ascii_case("image/"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blob_store::FsBlobStore;
    use tempfile::tempdir;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_parse_source_url_missing() {
        assert!(matches!(parse_source_url(None), Err(AppError::MissingUrl)));
        assert!(matches!(parse_source_url(Some("  ")), Err(AppError::MissingUrl)));
    }

    #[test]
    fn test_parse_source_url_invalid() {
        for raw in ["not a url", "/relative/cat.png", "ftp://example.com/cat.png", "mailto:a@b.c"] {
            assert!(
                matches!(parse_source_url(Some(raw)), Err(AppError::InvalidUrl(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_source_url_valid() {
        let parsed = parse_source_url(Some("https://example.com/cat.png")).unwrap();
        assert_eq!(parsed.host_str(), Some("example.com"));
    }

    #[test]
    fn test_random_prefix() {
        let a = random_prefix();
        let b = random_prefix();
        assert_eq!(a.len(), 10);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_derive_file_name() {
        assert_eq!(
            derive_file_name(&url("https://example.com/img/cat.png?size=large"), "abcdefghij"),
            "downloaded_images/abcdefghij_cat.png"
        );
        assert_eq!(
            derive_file_name(&url("https://example.com/photos/12345"), "abcdefghij"),
            "downloaded_images/abcdefghij_12345.jpg"
        );
        assert_eq!(
            derive_file_name(&url("https://example.com/"), "abcdefghij"),
            "downloaded_images/abcdefghij_.jpg"
        );
        assert_eq!(
            derive_file_name(&url("https://example.com/gallery/"), "abcdefghij"),
            "downloaded_images/abcdefghij_gallery.jpg"
        );
    }

    #[test]
    fn test_derive_file_name_decodes_and_sanitizes() {
        assert_eq!(
            derive_file_name(&url("https://example.com/my%20cat.png"), "abcdefghij"),
            "downloaded_images/abcdefghij_my_cat.png"
        );
        assert_eq!(
            derive_file_name(&url("https://example.com/kedi%C3%A7ik.webp"), "abcdefghij"),
            "downloaded_images/abcdefghij_kedi_ik.webp"
        );
        assert_eq!(
            derive_file_name(&url("https://example.com/a%2F..%2Fb"), "abcdefghij"),
            "downloaded_images/abcdefghij_a_.._b"
        );
    }

    #[test]
    fn test_file_name_of() {
        assert_eq!(file_name_of("downloaded_images/x_cat.png"), "x_cat.png");
        assert_eq!(file_name_of("x_cat.png"), "x_cat.png");
    }

    #[test]
    fn test_is_image_content_type() {
        assert!(is_image_content_type("image/png"));
        assert!(is_image_content_type("Image/JPEG; charset=binary"));
        assert!(!is_image_content_type("text/html"));
        assert!(!is_image_content_type("image"));
        assert!(!is_image_content_type(""));
    }

    #[tokio::test]
    async fn test_existing_file_skips_fetch() {
        let dir = tempdir().unwrap();
        let store = FsBlobStore::new(dir.path().to_path_buf(), "http://localhost:8000/storage");
        store.init().await.unwrap();
        let fetcher = RemoteFetcher::new().unwrap();

        let path = "downloaded_images/abcdefghij_cat.png";
        store.put(path, b"cached", "image/png").await.unwrap();

        // Port 1 is never listening, so any fetch attempt would fail
        let source = url("http://127.0.0.1:1/cat.png");
        let response = ImageAcquisition::new(&store, &fetcher)
            .acquire_into(&source, path)
            .await
            .unwrap();

        assert_eq!(response.message, "Resim zaten mevcut");
        assert_eq!(response.file_size, 6);
        assert_eq!(response.content_type, "image/png");
        assert_eq!(response.filename, "abcdefghij_cat.png");
    }

    #[tokio::test]
    async fn test_unreachable_remote_is_download_failure() {
        let dir = tempdir().unwrap();
        let store = FsBlobStore::new(dir.path().to_path_buf(), "http://localhost:8000/storage");
        store.init().await.unwrap();
        let fetcher = RemoteFetcher::new().unwrap();

        let result = ImageAcquisition::new(&store, &fetcher)
            .acquire(Some("http://127.0.0.1:1/cat.png"))
            .await;

        assert!(matches!(result, Err(AppError::DownloadFailed { status: None })));
        assert!(store.list(IMAGE_PREFIX).await.unwrap().is_empty());
    }
}
