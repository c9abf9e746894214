//! Client configuration.

use std::time::Duration;

use authwire_core::ApiUrl;

/// Refresh endpoint path used when none is configured.
pub const DEFAULT_REFRESH_PATH: &str = "/auth/refresh";

/// Upper bound on a single refresh call, and therefore on how long any
/// waiter can be suspended behind it.
pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for an [`AuthClient`](crate::AuthClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL request paths are resolved against.
    pub base_url: ApiUrl,
    /// Path (or absolute URL) of the refresh endpoint.
    pub refresh_path: String,
    /// Timeout applied to the refresh call.
    pub refresh_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: ApiUrl) -> Self {
        Self {
            base_url,
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            refresh_timeout: DEFAULT_REFRESH_TIMEOUT,
        }
    }

    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    /// Fully resolved refresh endpoint URL.
    pub fn refresh_url(&self) -> String {
        self.base_url.resolve(&self.refresh_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::new(ApiUrl::new("https://api.example.com").unwrap());
        assert_eq!(config.refresh_url(), "https://api.example.com/auth/refresh");
        assert_eq!(config.refresh_timeout, Duration::from_secs(30));
    }

    #[test]
    fn custom_refresh_path() {
        let config = ClientConfig::new(ApiUrl::new("https://api.example.com/v1").unwrap())
            .with_refresh_path("token/refresh/")
            .with_refresh_timeout(Duration::from_secs(5));
        assert_eq!(
            config.refresh_url(),
            "https://api.example.com/v1/token/refresh/"
        );
        assert_eq!(config.refresh_timeout, Duration::from_secs(5));
    }
}
