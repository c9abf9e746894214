//! HTTP transport built on reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, instrument, trace};

use authwire_core::error::TransportError;
use authwire_core::{Body, Headers, HttpRequest, HttpResponse, Method, Part, Transport};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("authwire/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout used by [`ReqwestTransport::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// [`Transport`] that sends requests with a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create a transport with the default timeout.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a transport whose requests time out after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Http {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { client, timeout })
    }

    /// Wrap an existing client, e.g. one configured with proxies or extra
    /// root certificates.
    pub fn from_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn map_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::timeout(self.timeout)
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip_all, fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!("Sending request");

        let mut builder = self
            .client
            .request(method(request.method), &request.url)
            .headers(header_map(&request.headers)?);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Text(text) => builder.body(text),
            Body::Bytes { data, content_type } => {
                let builder = builder.body(data);
                match content_type {
                    Some(content_type) => builder.header(reqwest::header::CONTENT_TYPE, content_type),
                    None => builder,
                }
            }
            Body::Multipart(parts) => builder.multipart(form(parts)?),
        };

        let response = builder.send().await.map_err(|e| self.map_error(e))?;

        let status = response.status().as_u16();
        trace!(status, "Response received");

        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect::<Headers>();

        let body = response.bytes().await.map_err(|e| self.map_error(e))?;

        Ok(HttpResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

fn method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn header_map(headers: &Headers) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid_header(name, e))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| invalid_header(name, e))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

fn form(parts: Vec<Part>) -> Result<reqwest::multipart::Form, TransportError> {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        let mut field = reqwest::multipart::Part::bytes(part.data);
        if let Some(file_name) = part.file_name {
            field = field.file_name(file_name);
        }
        if let Some(content_type) = part.content_type {
            field = field.mime_str(&content_type).map_err(|e| TransportError::Http {
                message: format!("invalid content type for part '{}': {e}", part.name),
            })?;
        }
        form = form.part(part.name, field);
    }
    Ok(form)
}

fn invalid_header(name: &str, err: impl std::fmt::Display) -> TransportError {
    TransportError::Http {
        message: format!("invalid header '{name}': {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_creation() {
        let transport = ReqwestTransport::with_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(transport.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn user_agent_carries_version() {
        assert!(USER_AGENT.starts_with("authwire/"));
    }

    #[test]
    fn rejects_unrepresentable_header() {
        let mut headers = Headers::new();
        headers.insert("x-bad", "line\nbreak");
        let err = header_map(&headers).unwrap_err();
        assert!(err.to_string().contains("x-bad"));
    }

    #[test]
    fn builds_multipart_form() {
        let form = form(vec![
            Part::text("caption", "hello"),
            Part::bytes("file", vec![0, 1, 2])
                .file_name("a.bin")
                .content_type("application/octet-stream"),
        ])
        .unwrap();
        assert!(!form.boundary().is_empty());

        assert!(form_with_bad_type().is_err());
    }

    fn form_with_bad_type() -> Result<reqwest::multipart::Form, TransportError> {
        form(vec![Part::bytes("file", vec![1]).content_type("not a mime type")])
    }
}
