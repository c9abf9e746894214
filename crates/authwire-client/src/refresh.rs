//! Refresh endpoint call.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use authwire_core::error::{AuthError, ProtocolError, TransportError};
use authwire_core::{Body, CredentialPair, HttpRequest, Method, RefreshToken, Transport};

use crate::classify::{Classification, classify};
use crate::config::ClientConfig;

/// Request body for the refresh endpoint.
#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

/// Response from the refresh endpoint. Extra fields are ignored.
#[derive(Deserialize)]
struct RefreshResponse {
    access: String,
    refresh: String,
}

/// Exchange `refresh` for a new credential pair.
///
/// Every failure mode (rejected token, other status, transport error,
/// timeout, malformed body) is reported as [`AuthError::RefreshFailed`].
#[instrument(skip_all, fields(url = %config.refresh_url()))]
pub(crate) async fn exchange(
    transport: &dyn Transport,
    config: &ClientConfig,
    refresh: &RefreshToken,
) -> Result<CredentialPair, AuthError> {
    let body = Body::json(&RefreshRequest {
        refresh: refresh.as_str(),
    })
    .map_err(|e| failed(format!("encoding refresh request: {e}")))?;

    let request = HttpRequest::new(Method::Post, config.refresh_url())
        .header("content-type", "application/json")
        .body(body);

    debug!("Calling refresh endpoint");

    let outcome = match tokio::time::timeout(config.refresh_timeout, transport.send(request)).await
    {
        Ok(outcome) => outcome,
        Err(_) => Err(TransportError::timeout(config.refresh_timeout)),
    };

    match (classify(&outcome, true), outcome) {
        (Classification::Ok, Ok(response)) => {
            let body: RefreshResponse = response
                .json()
                .map_err(|e| failed(format!("malformed refresh response: {e}")))?;
            if body.access.is_empty() || body.refresh.is_empty() {
                return Err(failed("refresh response carried an empty token"));
            }
            Ok(CredentialPair::new(body.access, body.refresh))
        }
        (Classification::RefreshEndpointFailed, _) => {
            Err(failed("refresh token rejected (HTTP 401)"))
        }
        (_, Ok(response)) => Err(failed(ProtocolError::from_response(&response).to_string())),
        (_, Err(e)) => Err(failed(e.to_string())),
    }
}

fn failed(reason: impl Into<String>) -> AuthError {
    AuthError::RefreshFailed {
        reason: reason.into(),
    }
}
