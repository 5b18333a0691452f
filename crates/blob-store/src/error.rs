//! Error types for the blob store

use std::fmt;

#[derive(Debug)]
pub enum BlobStoreError {
    NotFound(String),
    InvalidPath(String),
    Io(Box<std::io::Error>),
}

impl fmt::Display for BlobStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlobStoreError::NotFound(path) => write!(f, "Blob not found: {}", path),
            BlobStoreError::InvalidPath(path) => write!(f, "Invalid blob path: {}", path),
            BlobStoreError::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for BlobStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BlobStoreError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BlobStoreError {
    fn from(err: std::io::Error) -> Self {
        BlobStoreError::Io(Box::new(err))
    }
}

impl BlobStoreError {
    /// Map an IO error on `path`, turning `ErrorKind::NotFound` into [`BlobStoreError::NotFound`]
    pub(crate) fn from_io(err: std::io::Error, path: &str) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            BlobStoreError::NotFound(path.to_string())
        } else {
            BlobStoreError::Io(Box::new(err))
        }
    }
}

pub type Result<T> = std::result::Result<T, BlobStoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = BlobStoreError::NotFound("downloaded_images/a.png".to_string());
        assert_eq!(format!("{}", err), "Blob not found: downloaded_images/a.png");
    }

    #[test]
    fn test_from_io_maps_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = BlobStoreError::from_io(io, "x.png");
        assert!(matches!(err, BlobStoreError::NotFound(ref p) if p == "x.png"));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = BlobStoreError::from_io(io, "x.png");
        assert!(matches!(err, BlobStoreError::Io(_)));
    }

    #[test]
    fn test_io_error_has_source() {
        use std::error::Error;
        let err: BlobStoreError = std::io::Error::other("disk full").into();
        assert!(err.source().is_some());
        assert!(format!("{}", err).contains("disk full"));
    }
}
