//! Centralized configuration management for studio-admin

use std::time::Duration;
use anyhow::{Result, Context};

use crate::listing::DEFAULT_PAGE_SIZE;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/d/graphql/";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// GraphQL endpoint of the studio backend
    pub api_url: String,
    /// JWT sent as `Authorization: JWT <token>` (optional)
    pub api_token: Option<String>,
    /// Items requested per page by list screens
    pub page_size: usize,
    /// HTTP client configuration
    pub http: HttpConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: format!("studio-admin/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            page_size: DEFAULT_PAGE_SIZE,
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let api_url = lookup("STUDIO_ADMIN_API_URL").unwrap_or(defaults.api_url);
        let api_token = lookup("STUDIO_ADMIN_TOKEN").filter(|token| !token.trim().is_empty());

        let http = HttpConfig {
            timeout_seconds: parse_var(&lookup, "STUDIO_ADMIN_HTTP_TIMEOUT_SECONDS")?
                .unwrap_or(defaults.http.timeout_seconds),
            user_agent: lookup("STUDIO_ADMIN_USER_AGENT").unwrap_or(defaults.http.user_agent),
        };

        Ok(Config {
            api_url,
            api_token,
            page_size: parse_var(&lookup, "STUDIO_ADMIN_PAGE_SIZE")?.unwrap_or(defaults.page_size),
            http,
        })
    }

    /// Apply command line overrides on top of the loaded values
    pub fn with_overrides(mut self, api_url: Option<&str>, api_token: Option<&str>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url.to_string();
        }
        if let Some(token) = api_token {
            self.api_token = Some(token.to_string());
        }
        self
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "API URL must start with http:// or https://: {}",
                self.api_url
            ));
        }

        if self.page_size == 0 {
            return Err(anyhow::anyhow!("Page size must be at least 1"));
        }

        if self.http.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("HTTP timeout must be at least 1 second"));
        }

        Ok(())
    }
}

/// Helper function to parse a variable as a specific type
fn parse_var<T, F>(lookup: &F, var_name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match lookup(var_name) {
        Some(val) => val.trim().parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_config_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.api_token, None);
        assert_eq!(config.page_size, 15);
        assert_eq!(config.http.timeout_seconds, 30);
        assert!(config.http.user_agent.starts_with("studio-admin/"));
    }

    #[test]
    fn test_config_reads_variables() {
        let config = config_from(&[
            ("STUDIO_ADMIN_API_URL", "https://studio.example.com/d/graphql/"),
            ("STUDIO_ADMIN_TOKEN", "abc"),
            ("STUDIO_ADMIN_PAGE_SIZE", "50"),
            ("STUDIO_ADMIN_HTTP_TIMEOUT_SECONDS", "5"),
        ])
        .unwrap();
        assert_eq!(config.api_url, "https://studio.example.com/d/graphql/");
        assert_eq!(config.api_token.as_deref(), Some("abc"));
        assert_eq!(config.page_size, 50);
        assert_eq!(config.http_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_config_rejects_unparseable_numbers() {
        let err = config_from(&[("STUDIO_ADMIN_PAGE_SIZE", "lots")]).unwrap_err();
        assert!(err.to_string().contains("STUDIO_ADMIN_PAGE_SIZE"));
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let config = config_from(&[("STUDIO_ADMIN_TOKEN", "  ")]).unwrap();
        assert_eq!(config.api_token, None);
    }

    #[test]
    fn test_overrides_win() {
        let config = config_from(&[("STUDIO_ADMIN_TOKEN", "env")])
            .unwrap()
            .with_overrides(Some("https://other/graphql/"), Some("flag"));
        assert_eq!(config.api_url, "https://other/graphql/");
        assert_eq!(config.api_token.as_deref(), Some("flag"));
    }

    #[test]
    fn test_config_validation() {
        config_from(&[]).unwrap().validate().unwrap();

        let bad_url = config_from(&[("STUDIO_ADMIN_API_URL", "localhost:8000")]).unwrap();
        assert!(bad_url.validate().is_err());

        let zero_page = config_from(&[("STUDIO_ADMIN_PAGE_SIZE", "0")]).unwrap();
        assert!(zero_page.validate().is_err());
    }
}
