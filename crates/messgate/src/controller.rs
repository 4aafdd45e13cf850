//! The session controller: the only thing that talks to the gateway and
//! the only thing that writes to the session store.
//!
//! Each operation follows the same shape:
//!
//! 1. Check what can be checked locally (input, state, in-flight attempt).
//! 2. Emit the "started" event, remembering the current logout epoch.
//! 3. Await the gateway, bounded by the configured timeout.
//! 4. Emit the outcome, unless a logout happened in the meantime.
//!
//! # Concurrency
//!
//! - **One attempt at a time.** A login or refresh holds the in-flight
//!   flag until its gateway call returns. A second one is turned away with
//!   [`SessionError::AttemptInFlight`]; it's never queued or run in
//!   parallel, so two outcomes can't race each other into the store.
//! - **Logout always wins.** `logout()` ignores the in-flight flag. It
//!   bumps the epoch under the store lock, and an outcome carrying an
//!   older epoch is dropped on arrival.
//! - **Short critical sections.** The store lock is never held across a
//!   gateway call, only around a check-and-apply.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use messgate_gateway::{AuthGateway, GatewayError};
use messgate_router::{RoleRouter, Section};
use messgate_session::{
    ProfilePatch, SessionError, SessionEvent, SessionReader, SessionRecord,
    SessionStore, Snapshot,
};
use tokio::sync::Mutex;

use crate::ControllerConfig;
use crate::validate::validate_credentials;

/// The store plus the logout epoch, guarded together so "is this outcome
/// still current?" and "apply it" happen atomically.
struct Ledger {
    store: SessionStore,
    /// Bumped on every logout. An outcome is only applied if the epoch it
    /// started under is still current.
    epoch: u64,
}

/// Drop guard for the at-most-one-attempt rule.
///
/// Acquired before an attempt, released when it goes out of scope, even
/// if the attempt's future is dropped halfway through (the caller gave up,
/// the task was aborted). Without the guard, a cancelled login would leave
/// the flag set and lock the user out until restart.
struct AttemptGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> AttemptGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, SessionError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SessionError::AttemptInFlight)?;
        Ok(Self { flag })
    }
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Orchestrates login, refresh, profile updates, and logout.
///
/// Share it behind an `Arc` if several tasks need it; every method takes
/// `&self`.
pub struct SessionController<G: AuthGateway> {
    gateway: G,
    config: ControllerConfig,
    ledger: Mutex<Ledger>,
    reader: SessionReader,
    in_flight: AtomicBool,
}

impl<G: AuthGateway> SessionController<G> {
    /// Creates a controller with a fresh, anonymous session.
    pub fn new(gateway: G, config: ControllerConfig) -> Self {
        let (store, reader) = SessionStore::new();
        Self {
            gateway,
            config,
            ledger: Mutex::new(Ledger { store, epoch: 0 }),
            reader,
            in_flight: AtomicBool::new(false),
        }
    }

    // -- Reads ------------------------------------------------------------

    /// The current session record (a copy).
    pub fn observe(&self) -> SessionRecord {
        self.reader.record()
    }

    /// The section the UI should show right now. Computed fresh on every
    /// call.
    pub fn current_section(&self) -> Section {
        RoleRouter::section(&self.reader.record())
    }

    /// A new reader, for subscribers that want to await changes.
    pub fn reader(&self) -> SessionReader {
        self.reader.clone()
    }

    /// The gateway this controller talks to.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Returns `true` while a login or refresh is outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    // -- Operations -------------------------------------------------------

    /// Signs in with an email and password.
    ///
    /// Returns the section to show afterwards. Network trouble and
    /// rejected credentials are *not* `Err`s: they end up in the session
    /// record as `last_error`, and the returned section is
    /// [`Section::Auth`].
    ///
    /// # Errors
    /// - [`SessionError::AttemptInFlight`]: another login/refresh is
    ///   outstanding; nothing was changed
    /// - [`SessionError::Validation`]: the input can't be right; the
    ///   record is now errored with a `ValidationError`, and the gateway
    ///   was not contacted
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Section, SessionError> {
        let _attempt = AttemptGuard::acquire(&self.in_flight)?;

        if let Err(e) = validate_credentials(email, password) {
            tracing::warn!(error = %e, "login rejected before reaching the gateway");
            let failure = SessionEvent::LoginFailed {
                error: e.to_failure(),
            };
            self.ledger.lock().await.store.apply(failure)?;
            return Err(e);
        }

        let epoch = self.begin(SessionEvent::LoginRequested).await?;
        tracing::debug!(epoch, "login requested");

        let event = match self.call(self.gateway.login(email, password)).await {
            // The grant's role is checked here, before an event exists.
            Ok(grant) => grant.into_event().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "gateway granted an unknown role");
                SessionEvent::LoginFailed {
                    error: e.to_failure(),
                }
            }),
            Err(GatewayError::Network(m)) => failed(&SessionError::Network(m)),
            Err(GatewayError::Rejected(m)) => {
                failed(&SessionError::Credential(m))
            }
        };

        let Some(snapshot) = self.settle(epoch, vec![event]).await? else {
            return Ok(self.current_section());
        };
        log_outcome("login", &snapshot.record);
        Ok(RoleRouter::section(&snapshot.record))
    }

    /// Exchanges the refresh token for a new token pair.
    ///
    /// Any failure ends the session:
    ///
    /// - a rejected refresh token records `SessionExpired` and then resets
    ///   the session to the initial anonymous record (both under one lock,
    ///   so no other event can land in between), and the expiry is
    ///   returned as `Err` so it can't go unnoticed;
    /// - a network failure records `NetworkError`; the tokens are dropped
    ///   and the error stays in the record for the UI.
    ///
    /// Either way the section drops to [`Section::Auth`].
    ///
    /// # Errors
    /// Returned before any network call, with nothing changed:
    /// - [`SessionError::AttemptInFlight`]
    /// - [`SessionError::PreconditionViolation`]: not signed in
    /// - [`SessionError::MissingRefreshToken`]: signed in, but the
    ///   gateway never issued a refresh token
    ///
    /// Returned after the session was reset:
    /// - [`SessionError::SessionExpired`]: the gateway rejected the
    ///   refresh token
    pub async fn refresh(&self) -> Result<Section, SessionError> {
        let _attempt = AttemptGuard::acquire(&self.in_flight)?;

        let (epoch, refresh_token) = {
            let ledger = self.ledger.lock().await;
            let record = ledger.store.record();
            if !record.is_authenticated() {
                return Err(SessionError::PreconditionViolation {
                    event: "TokensRefreshed",
                    status: record.status(),
                });
            }
            let token = record
                .refresh_token()
                .ok_or(SessionError::MissingRefreshToken)?
                .to_string();
            (ledger.epoch, token)
        };

        let (events, expired) =
            match self.call(self.gateway.refresh(&refresh_token)).await {
                Ok(pair) => (vec![pair.into_event()], None),
                Err(GatewayError::Rejected(m)) => {
                    let e = SessionError::SessionExpired(m);
                    (vec![failed(&e), SessionEvent::LogoutRequested], Some(e))
                }
                Err(GatewayError::Network(m)) => {
                    (vec![failed(&SessionError::Network(m))], None)
                }
            };

        let Some(snapshot) = self.settle(epoch, events).await? else {
            return Ok(self.current_section());
        };
        if let Some(e) = expired {
            tracing::warn!(error = %e, "refresh rejected, session reset");
            return Err(e);
        }
        log_outcome("refresh", &snapshot.record);
        Ok(RoleRouter::section(&snapshot.record))
    }

    /// Merges `patch` into the signed-in principal. No network involved.
    ///
    /// # Errors
    /// [`SessionError::PreconditionViolation`] unless signed in.
    pub async fn update_profile(
        &self,
        patch: ProfilePatch,
    ) -> Result<(), SessionError> {
        let mut ledger = self.ledger.lock().await;
        ledger.store.apply(SessionEvent::ProfileUpdated { patch })?;
        Ok(())
    }

    /// Signs out. Always succeeds, works offline, and doesn't wait for an
    /// outstanding login or refresh: their results will be discarded.
    pub async fn logout(&self) {
        let mut ledger = self.ledger.lock().await;
        ledger.epoch += 1;
        match ledger.store.apply(SessionEvent::LogoutRequested) {
            Ok(_) => tracing::info!(epoch = ledger.epoch, "signed out"),
            Err(e) => tracing::error!(error = %e, "logout was rejected"),
        }
    }

    // -- Internals --------------------------------------------------------

    /// Applies the event that starts an attempt and returns the epoch the
    /// attempt runs under.
    async fn begin(&self, event: SessionEvent) -> Result<u64, SessionError> {
        let mut ledger = self.ledger.lock().await;
        ledger.store.apply(event)?;
        Ok(ledger.epoch)
    }

    /// Applies an attempt's outcome if no logout happened since it began.
    ///
    /// All events are applied under one lock acquisition. Returns the last
    /// snapshot, or `Ok(None)` when the outcome was discarded.
    async fn settle(
        &self,
        epoch: u64,
        events: Vec<SessionEvent>,
    ) -> Result<Option<Snapshot>, SessionError> {
        let mut ledger = self.ledger.lock().await;
        if ledger.epoch != epoch {
            tracing::debug!(
                started = epoch,
                current = ledger.epoch,
                "discarding gateway response that arrived after logout"
            );
            return Ok(None);
        }
        let mut last = None;
        for event in events {
            last = Some(ledger.store.apply(event)?);
        }
        Ok(last)
    }

    /// Runs a gateway call under the configured timeout. Running out of
    /// time counts as a network error.
    async fn call<T>(
        &self,
        request: impl Future<Output = Result<T, GatewayError>>,
    ) -> Result<T, GatewayError> {
        let timeout = self.config.gateway_timeout;
        tokio::time::timeout(timeout, request)
            .await
            .unwrap_or_else(|_| {
                Err(GatewayError::Network(format!(
                    "gateway did not answer within {timeout:?}"
                )))
            })
    }
}

fn failed(error: &SessionError) -> SessionEvent {
    SessionEvent::LoginFailed {
        error: error.to_failure(),
    }
}

fn log_outcome(operation: &'static str, record: &SessionRecord) {
    match record {
        SessionRecord::Authenticated {
            role, principal, ..
        } => {
            tracing::info!(
                operation,
                principal = %principal.id,
                %role,
                "session authenticated"
            );
        }
        SessionRecord::Errored { error } => {
            tracing::warn!(
                operation,
                kind = %error.kind,
                message = %error.message,
                "session attempt failed"
            );
        }
        other => {
            tracing::debug!(operation, status = %other.status(), "session settled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_guard_blocks_second_acquire() {
        let flag = AtomicBool::new(false);

        let first = AttemptGuard::acquire(&flag).expect("flag is free");
        let second = AttemptGuard::acquire(&flag);

        assert!(matches!(second, Err(SessionError::AttemptInFlight)));
        drop(first);
    }

    #[test]
    fn test_attempt_guard_releases_on_drop() {
        let flag = AtomicBool::new(false);

        {
            let _guard = AttemptGuard::acquire(&flag).unwrap();
            assert!(flag.load(Ordering::Acquire));
        }

        assert!(!flag.load(Ordering::Acquire));
        assert!(AttemptGuard::acquire(&flag).is_ok());
    }

    #[test]
    fn test_failed_wraps_error_as_login_failed() {
        let event = failed(&SessionError::Credential("Invalid".into()));

        match event {
            SessionEvent::LoginFailed { error } => {
                assert_eq!(error.message, "Invalid");
            }
            other => panic!("expected LoginFailed, got {other:?}"),
        }
    }
}
