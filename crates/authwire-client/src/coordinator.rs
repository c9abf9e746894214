//! Single-flight credential refresh.
//!
//! At most one refresh call is in flight per session. The first caller
//! that needs a fresh credential while the coordinator is idle starts a
//! refresh episode; callers arriving while it runs queue a waiter and are
//! woken with the episode's outcome. The leader waits on its own waiter
//! like everyone else, so the episode completes even if the leader's future
//! is dropped.
//!
//! Every write this layer makes to the credential store (refreshed pair,
//! failure clear, gate logout, explicit logout, new session) happens while
//! holding the state lock. Each episode is tagged with the session
//! generation it started in. A session change detaches the running episode:
//! its waiters are answered right away from the new session state, and the
//! episode's own result is discarded when it arrives.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, oneshot};
use tracing::{debug, info, instrument, warn};

use authwire_core::error::AuthError;
use authwire_core::{AccessToken, CredentialPair, Error, RefreshToken, Result, Transport};

use crate::config::ClientConfig;
use crate::events::SessionEvents;
use crate::refresh;
use crate::vault::CredentialVault;

type Outcome = std::result::Result<AccessToken, AuthError>;

/// A suspended caller awaiting the current episode's outcome.
type Waiter = oneshot::Sender<Outcome>;

enum RefreshState {
    Idle,
    Refreshing {
        waiters: Vec<Waiter>,
        /// Session generation the episode belongs to.
        generation: u64,
    },
}

struct CoordinatorState {
    phase: RefreshState,
    /// Bumped whenever a session starts or ends.
    generation: u64,
}

impl CoordinatorState {
    /// Start a new session generation, answering the waiters of any episode
    /// still running for the previous one with `outcome`.
    fn next_generation(&mut self, outcome: Outcome) {
        self.generation += 1;
        if let RefreshState::Refreshing { waiters, .. } =
            std::mem::replace(&mut self.phase, RefreshState::Idle)
        {
            debug!(waiters = waiters.len(), "Detaching refresh from ended session");
            for waiter in waiters {
                let _ = waiter.send(outcome.clone());
            }
        }
    }
}

struct CoordinatorInner {
    state: Mutex<CoordinatorState>,
    vault: CredentialVault,
    events: SessionEvents,
    transport: Arc<dyn Transport>,
    config: ClientConfig,
    episodes: AtomicU64,
}

/// Coordinates credential refresh across concurrent calls.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct RefreshCoordinator {
    inner: Arc<CoordinatorInner>,
}

impl RefreshCoordinator {
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        vault: CredentialVault,
        events: SessionEvents,
    ) -> Self {
        Self {
            inner: Arc::new(CoordinatorInner {
                state: Mutex::new(CoordinatorState {
                    phase: RefreshState::Idle,
                    generation: 0,
                }),
                vault,
                events,
                transport,
                config,
                episodes: AtomicU64::new(0),
            }),
        }
    }

    /// Obtain an access token to retry a call that was rejected with 401.
    ///
    /// `failed_with` is the token the rejected attempt carried. If the store
    /// already holds a different token, another call refreshed (or a new
    /// session started) in the meantime and that token is returned without
    /// a new refresh call.
    ///
    /// # Errors
    ///
    /// - [`AuthError::SessionEnded`] when stay-signed-in is off or no refresh
    ///   token is stored, or the session was logged out while waiting. The
    ///   store is cleared and a logout emitted.
    /// - [`AuthError::RefreshFailed`] when the refresh call fails. The store
    ///   is cleared and a single logout emitted for the episode.
    /// - [`Error::Store`] when the credential store cannot be read.
    #[instrument(skip_all)]
    pub async fn obtain_fresh_credential(
        &self,
        failed_with: Option<&AccessToken>,
    ) -> Result<AccessToken> {
        let waiter = {
            let mut state = self.inner.state.lock().await;

            let refresh_token = match self.refreshable_token().await? {
                Some(token) => token,
                None => {
                    self.inner
                        .end_session_locked(&mut state, "refresh not permitted")
                        .await;
                    return Err(AuthError::SessionEnded.into());
                }
            };

            let (tx, rx) = oneshot::channel();
            let current_generation = state.generation;
            if let RefreshState::Refreshing {
                waiters,
                generation,
            } = &mut state.phase
                && *generation == current_generation
            {
                waiters.push(tx);
                debug!(queued = waiters.len(), "Joining in-flight refresh");
            } else {
                if let Some(current) = self.inner.vault.access_token().await?
                    && Some(&current) != failed_with
                {
                    debug!("Credential already refreshed by another call");
                    return Ok(current);
                }

                state.phase = RefreshState::Refreshing {
                    waiters: vec![tx],
                    generation: current_generation,
                };
                self.inner.episodes.fetch_add(1, Ordering::Relaxed);
                tokio::spawn(
                    self.inner
                        .clone()
                        .run_episode(refresh_token, current_generation),
                );
            }
            rx
        };

        match waiter.await {
            Ok(outcome) => outcome.map_err(Error::from),
            Err(_) => Err(AuthError::RefreshAbandoned.into()),
        }
    }

    /// Force a refresh of the stored credentials.
    ///
    /// Joins an in-flight refresh if there is one.
    pub async fn refresh_now(&self) -> Result<AccessToken> {
        let current = self.inner.vault.access_token().await?;
        self.obtain_fresh_credential(current.as_ref()).await
    }

    /// Store a freshly issued session.
    ///
    /// Callers still waiting on a refresh for the previous session are
    /// handed the new access token to retry with.
    pub async fn begin_session(&self, pair: &CredentialPair, stay_signed_in: bool) -> Result<()> {
        let mut state = self.inner.state.lock().await;
        self.inner.vault.start_session(pair, stay_signed_in).await?;
        state.next_generation(Ok(pair.access.clone()));
        info!(stay_signed_in, "Session started");
        Ok(())
    }

    /// Clear the stored session and emit a logout if there was one.
    ///
    /// Returns whether a session was stored.
    pub async fn end_session(&self) -> Result<bool> {
        let mut state = self.inner.state.lock().await;
        state.next_generation(Err(AuthError::SessionEnded));
        let had_session = self.inner.vault.clear().await?;
        if had_session {
            info!("Session ended by caller");
            self.inner.events.logout();
        }
        Ok(had_session)
    }

    pub async fn is_refreshing(&self) -> bool {
        matches!(
            self.inner.state.lock().await.phase,
            RefreshState::Refreshing { .. }
        )
    }

    /// Number of refresh calls issued since construction.
    pub fn refresh_count(&self) -> u64 {
        self.inner.episodes.load(Ordering::Relaxed)
    }

    /// The stored refresh token, if refresh is permitted at all.
    async fn refreshable_token(&self) -> Result<Option<RefreshToken>> {
        if !self.inner.vault.stay_signed_in().await? {
            debug!("Stay signed in is off");
            return Ok(None);
        }
        Ok(self.inner.vault.refresh_token().await?)
    }
}

impl CoordinatorInner {
    /// Run one refresh episode to completion and wake every waiter.
    async fn run_episode(self: Arc<Self>, refresh_token: RefreshToken, generation: u64) {
        info!("Refreshing credentials");

        let exchanged =
            refresh::exchange(self.transport.as_ref(), &self.config, &refresh_token).await;

        let mut state = self.state.lock().await;

        let waiters = match &mut state.phase {
            RefreshState::Refreshing {
                waiters,
                generation: current,
            } if *current == generation => std::mem::take(waiters),
            _ => {
                debug!("Session changed during refresh, discarding result");
                return;
            }
        };
        state.phase = RefreshState::Idle;

        let outcome = match exchanged {
            Ok(pair) => match self.vault.replace_pair(&pair).await {
                Ok(()) => Ok(pair.access),
                Err(e) => Err(AuthError::RefreshFailed {
                    reason: format!("persisting refreshed credentials: {e}"),
                }),
            },
            Err(e) => Err(e),
        };

        let session_lost = match &outcome {
            Ok(_) => {
                info!("Credential refresh succeeded");
                false
            }
            Err(e) => {
                warn!(error = %e, "Credential refresh failed, ending session");
                state.generation += 1;
                if let Err(e) = self.vault.clear().await {
                    warn!(error = %e, "Failed to clear credentials");
                }
                true
            }
        };
        drop(state);

        debug!(waiters = waiters.len(), "Waking refresh waiters");
        for waiter in waiters {
            let _ = waiter.send(outcome.clone());
        }

        if session_lost {
            self.events.logout();
        }
    }

    /// Clear credentials on a terminal condition outside an episode.
    ///
    /// Emits a logout only if something was actually cleared, so concurrent
    /// callers hitting the same condition produce one event.
    async fn end_session_locked(&self, state: &mut CoordinatorState, reason: &str) {
        state.next_generation(Err(AuthError::SessionEnded));
        match self.vault.clear().await {
            Ok(true) => {
                warn!(reason, "Session ended");
                self.events.logout();
            }
            Ok(false) => debug!(reason, "No session to end"),
            Err(e) => warn!(error = %e, reason, "Failed to clear credentials"),
        }
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("refresh_url", &self.inner.config.refresh_url())
            .field("episodes", &self.refresh_count())
            .finish()
    }
}
