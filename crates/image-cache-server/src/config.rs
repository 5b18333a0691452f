use std::env;
use std::path::PathBuf;

/// Application configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Base URL the application is reachable at, without trailing slash
    pub app_url: String,
    /// Directory backing the public blob store
    pub storage_root: PathBuf,
    pub fetch_timeout_secs: u64,
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            app_url: "http://localhost:8000".to_string(),
            storage_root: PathBuf::from("./storage/public"),
            fetch_timeout_secs: remote_fetcher::DEFAULT_TIMEOUT_SECS,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl Config {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Parse configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let app_url = lookup("APP_URL")
            .filter(|u| !u.trim().is_empty())
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://localhost:{}", port));

        let storage_root = lookup("STORAGE_ROOT")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage_root);

        let fetch_timeout_secs = lookup("FETCH_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|s| *s > 0)
            .unwrap_or(defaults.fetch_timeout_secs);

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|s| s.split(',').map(|o| o.trim().to_string()).collect())
            .unwrap_or(defaults.cors_origins);

        Self {
            port,
            app_url,
            storage_root,
            fetch_timeout_secs,
            cors_origins,
        }
    }

    /// URL prefix the storage root is served under
    pub fn public_storage_url(&self) -> String {
        format!("{}/storage", self.app_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config.port, 8000);
        assert_eq!(config.app_url, "http://localhost:8000");
        assert_eq!(config.storage_root, PathBuf::from("./storage/public"));
        assert_eq!(config.fetch_timeout_secs, 30);
        assert_eq!(config.cors_origins, vec!["*"]);
    }

    #[test]
    fn test_app_url_follows_port() {
        let config = Config::from_lookup(lookup_from(&[("PORT", "9090")]));
        assert_eq!(config.app_url, "http://localhost:9090");
        assert_eq!(config.public_storage_url(), "http://localhost:9090/storage");
    }

    #[test]
    fn test_explicit_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("APP_URL", "https://images.example.com/"),
            ("STORAGE_ROOT", "/var/lib/images"),
            ("FETCH_TIMEOUT_SECS", "5"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
        ]));
        assert_eq!(config.app_url, "https://images.example.com");
        assert_eq!(config.storage_root, PathBuf::from("/var/lib/images"));
        assert_eq!(config.fetch_timeout_secs, 5);
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "not-a-port"),
            ("FETCH_TIMEOUT_SECS", "0"),
        ]));
        assert_eq!(config.port, 8000);
        assert_eq!(config.fetch_timeout_secs, 30);
    }
}
