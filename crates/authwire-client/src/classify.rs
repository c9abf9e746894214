//! Response classification.

use authwire_core::HttpResponse;
use authwire_core::error::TransportError;

/// How a completed call should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// 2xx.
    Ok,
    /// 401 on an ordinary call; a refresh may fix it.
    CredentialExpired,
    /// 401 on the refresh call itself.
    RefreshEndpointFailed,
    /// Any other status, or no response at all.
    OtherFailure,
}

/// Classify the outcome of one call.
///
/// A 401 from the refresh endpoint is never reported as `CredentialExpired`,
/// so a rejected refresh cannot trigger another refresh.
pub fn classify(
    outcome: &Result<HttpResponse, TransportError>,
    is_refresh_call: bool,
) -> Classification {
    match outcome {
        Ok(response) if response.is_success() => Classification::Ok,
        Ok(response) if response.status == 401 => {
            if is_refresh_call {
                Classification::RefreshEndpointFailed
            } else {
                Classification::CredentialExpired
            }
        }
        Ok(_) | Err(_) => Classification::OtherFailure,
    }
}
