//! An in-process [`AuthGateway`] backed by a fixed account table.
//!
//! Useful anywhere a real backend is in the way: local development, the
//! demo binary, and controller tests. It behaves like the real thing in
//! the ways the client can observe:
//!
//! - wrong email or password → `Rejected`
//! - every login and refresh mints fresh random tokens
//! - a refresh token works once; refreshing rotates it
//! - tokens can be revoked, and the gateway can be switched "offline"
//! - an optional artificial latency, for timeout and race tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use rand::Rng;
use tokio::sync::Mutex;

use crate::{AuthGateway, GatewayError, GatewayUser, LoginGrant, TokenPair};

/// Message for a failed login. Deliberately doesn't say which half of the
/// credentials was wrong.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

const INVALID_REFRESH: &str = "Refresh token expired or revoked";

struct Account {
    password: String,
    user: GatewayUser,
}

#[derive(Default)]
struct Ledger {
    /// Accounts keyed by email.
    accounts: HashMap<String, Account>,
    /// Live refresh tokens → the email they were issued to.
    refresh_tokens: HashMap<String, String>,
}

/// An in-memory auth backend.
///
/// Built with chained `with_*` calls, then shared (usually by moving it
/// into a controller).
///
/// ```rust
/// use messgate_gateway::{GatewayUser, MemoryGateway};
///
/// let gateway = MemoryGateway::new().with_account(
///     "admin@mess.io",
///     "hunter2",
///     GatewayUser { id: 2, email: "admin@mess.io".into(), name: "Ada".into(), role: "admin".into() },
/// );
/// assert_eq!(gateway.login_calls(), 0);
/// ```
pub struct MemoryGateway {
    ledger: Mutex<Ledger>,
    offline: AtomicBool,
    latency: Option<Duration>,
    login_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
}

impl MemoryGateway {
    /// Creates a gateway with no accounts.
    pub fn new() -> Self {
        Self {
            ledger: Mutex::new(Ledger::default()),
            offline: AtomicBool::new(false),
            latency: None,
            login_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
        }
    }

    /// Registers an account. Later registrations for the same email win.
    pub fn with_account(
        mut self,
        email: &str,
        password: &str,
        user: GatewayUser,
    ) -> Self {
        // `get_mut` needs no lock: `self` is owned, so nobody else can
        // be holding it.
        self.ledger.get_mut().accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                user,
            },
        );
        self
    }

    /// Delays every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Simulates losing (or regaining) connectivity. While offline every
    /// call fails with [`GatewayError::Network`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Invalidates every refresh token issued so far.
    pub async fn revoke_refresh_tokens(&self) {
        let mut ledger = self.ledger.lock().await;
        let revoked = ledger.refresh_tokens.len();
        ledger.refresh_tokens.clear();
        tracing::info!(revoked, "refresh tokens revoked");
    }

    /// How many times `login` has been called.
    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    /// How many times `refresh` has been called.
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    /// Applies latency, then fails if offline.
    async fn round_trip(&self) -> Result<(), GatewayError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(GatewayError::Network("gateway unreachable".into()));
        }
        Ok(())
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthGateway for MemoryGateway {
    async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginGrant, GatewayError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.round_trip().await?;

        let mut ledger = self.ledger.lock().await;
        let user = match ledger.accounts.get(email) {
            Some(account) if account.password == password => {
                account.user.clone()
            }
            _ => return Err(GatewayError::Rejected(INVALID_CREDENTIALS.into())),
        };

        let refresh_token = generate_token();
        ledger
            .refresh_tokens
            .insert(refresh_token.clone(), email.to_string());

        Ok(LoginGrant {
            user,
            token: generate_token(),
            refresh_token: Some(refresh_token),
        })
    }

    async fn refresh(
        &self,
        refresh_token: &str,
    ) -> Result<TokenPair, GatewayError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.round_trip().await?;

        let mut ledger = self.ledger.lock().await;
        // Removing the old token is what makes it single-use.
        let email = ledger
            .refresh_tokens
            .remove(refresh_token)
            .ok_or_else(|| GatewayError::Rejected(INVALID_REFRESH.into()))?;

        let next = generate_token();
        ledger.refresh_tokens.insert(next.clone(), email);

        Ok(TokenPair {
            token: generate_token(),
            refresh_token: next,
        })
    }
}

/// Generates a random 32-character hex string (128 bits of entropy).
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
