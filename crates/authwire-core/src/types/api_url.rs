//! API base URL type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, InvalidInputError};

/// The base that request paths are resolved against.
///
/// Plain HTTP is accepted only for loopback hosts, so bearer tokens never
/// cross the network unencrypted.
///
/// ```
/// use authwire_core::ApiUrl;
///
/// let api = ApiUrl::new("https://api.example.com/v1/").unwrap();
/// assert_eq!(api.resolve("/me"), "https://api.example.com/v1/me");
/// assert_eq!(api.resolve("https://cdn.example.com/x"), "https://cdn.example.com/x");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiUrl(Url);

impl ApiUrl {
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let reject = |reason: &str| InvalidInputError::Url {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let url = Url::parse(s).map_err(|e| reject(&e.to_string()))?;
        let loopback = matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]"));

        match url.scheme() {
            _ if url.host_str().is_none() => Err(reject("must have a host").into()),
            "https" => Ok(Self(url)),
            "http" if loopback => Ok(Self(url)),
            "http" => Err(reject("plain HTTP is only allowed for localhost").into()),
            other => Err(reject(&format!("unsupported scheme '{other}'")).into()),
        }
    }

    /// Resolve a request path against this base.
    ///
    /// Absolute `http(s)://` URLs pass through unchanged; anything else is
    /// appended to the base path with exactly one separating slash.
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("https://") || path.starts_with("http://") {
            return path.to_string();
        }
        let base = self.0.as_str().trim_end_matches('/');
        match path.trim_start_matches('/') {
            "" => base.to_string(),
            path => format!("{base}/{path}"),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ApiUrl {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ApiUrl> for String {
    fn from(url: ApiUrl) -> Self {
        url.0.into()
    }
}
