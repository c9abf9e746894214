//! One logical call: authenticate, send, classify, refresh and retry once.

use std::sync::Arc;

use tracing::{debug, instrument};

use authwire_core::error::{AuthError, ProtocolError, TransportError};
use authwire_core::{AccessToken, Error, HttpRequest, HttpResponse, Result, Transport};

use crate::authenticator::{self, Authenticator};
use crate::classify::{Classification, classify};
use crate::coordinator::RefreshCoordinator;

/// Per-call execution state.
#[derive(Debug, Default)]
struct CallContext {
    /// Set once the call has been retried after a refresh.
    retried: bool,
    /// Token to use for the next attempt instead of the stored one.
    fresh_token: Option<AccessToken>,
}

#[derive(Clone)]
pub(crate) struct Executor {
    transport: Arc<dyn Transport>,
    authenticator: Authenticator,
    coordinator: RefreshCoordinator,
}

impl Executor {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        authenticator: Authenticator,
        coordinator: RefreshCoordinator,
    ) -> Self {
        Self {
            transport,
            authenticator,
            coordinator,
        }
    }

    #[instrument(skip_all, fields(method = %request.method, url = %request.url))]
    pub(crate) async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut context = CallContext::default();

        loop {
            let mut attempt = request.clone();
            let used = match context.fresh_token.take() {
                Some(token) => {
                    authenticator::apply(&mut attempt, Some(&token));
                    Some(token)
                }
                None => self.authenticator.authenticate(&mut attempt).await,
            };

            let outcome = self.transport.send(attempt).await;

            match classify(&outcome, false) {
                Classification::Ok => return outcome.map_err(Error::from),
                Classification::OtherFailure | Classification::RefreshEndpointFailed => {
                    return Err(failure(outcome));
                }
                Classification::CredentialExpired if context.retried => {
                    debug!("Credential rejected again after refresh");
                    return Err(AuthError::CredentialExpired.into());
                }
                Classification::CredentialExpired => {
                    debug!("Credential expired, obtaining a fresh one");
                    context.retried = true;
                    let fresh = self
                        .coordinator
                        .obtain_fresh_credential(used.as_ref())
                        .await?;
                    context.fresh_token = Some(fresh);
                }
            }
        }
    }
}

/// Surface a failed outcome unchanged.
fn failure(outcome: std::result::Result<HttpResponse, TransportError>) -> Error {
    match outcome {
        Ok(response) => ProtocolError::from_response(&response).into(),
        Err(e) => e.into(),
    }
}
