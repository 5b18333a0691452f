//! Error types for the remote fetcher

use std::fmt;

#[derive(Debug)]
pub enum FetchError {
    /// Timeout, connection failure or body read failure
    Http(Box<reqwest::Error>),
    /// The remote answered with a non-2xx status
    Status(u16),
    /// The client could not be constructed
    Client(String),
}

impl FetchError {
    /// HTTP status of the failed response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status(code) => Some(*code),
            FetchError::Http(err) => err.status().map(|s| s.as_u16()),
            FetchError::Client(_) => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Http(err) if err.is_timeout())
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Http(err) => write!(f, "HTTP error: {}", err),
            FetchError::Status(code) => write!(f, "Remote returned status {}", code),
            FetchError::Client(msg) => write!(f, "HTTP client error: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Http(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Http(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = FetchError::Status(404);
        assert_eq!(format!("{}", err), "Remote returned status 404");
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_client_error_has_no_status() {
        let err = FetchError::Client("tls backend unavailable".to_string());
        assert_eq!(err.status(), None);
        assert!(format!("{:?}", err).contains("Client"));
    }
}
