//! Transport trait.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::types::{HttpRequest, HttpResponse};

/// Sends a fully prepared request.
///
/// Any response that reached the client, whatever its status, is `Ok`;
/// `Err` means no response arrived.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
