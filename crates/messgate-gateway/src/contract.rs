//! The [`AuthGateway`] trait and its response types.

use std::fmt;

use messgate_session::{
    Credentials, Principal, PrincipalId, Role, SessionError, SessionEvent,
};
use serde::{Deserialize, Serialize};

use crate::GatewayError;

// ---------------------------------------------------------------------------
// AuthGateway
// ---------------------------------------------------------------------------

/// A remote service that checks credentials and issues tokens.
///
/// # Trait bounds
///
/// - `Send + Sync` → the controller is shared across tasks, and so is its
///   gateway.
/// - `'static` → the gateway lives as long as the controller; it can't
///   borrow anything shorter-lived.
///
/// Timeouts are the controller's business (see `ControllerConfig`), so an
/// implementation doesn't need its own. If it has one anyway, it should
/// report expiry as [`GatewayError::Network`].
///
/// # Example
///
/// ```rust
/// use messgate_gateway::{AuthGateway, GatewayError, GatewayUser, LoginGrant, TokenPair};
///
/// /// Lets exactly one account in. Handy for a smoke test, nothing else.
/// struct SingleAccount;
///
/// impl AuthGateway for SingleAccount {
///     async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, GatewayError> {
///         if email != "user@gmail.com" || password != "1234" {
///             return Err(GatewayError::Rejected("Invalid email or password".into()));
///         }
///         Ok(LoginGrant {
///             user: GatewayUser { id: 1, email: email.into(), name: "U".into(), role: "user".into() },
///             token: "T1".into(),
///             refresh_token: Some("R1".into()),
///         })
///     }
///
///     async fn refresh(&self, _refresh_token: &str) -> Result<TokenPair, GatewayError> {
///         Err(GatewayError::Rejected("refresh not supported".into()))
///     }
/// }
/// ```
pub trait AuthGateway: Send + Sync + 'static {
    /// Exchanges an email and password for a session.
    ///
    /// # Returns
    /// - `Ok(LoginGrant)`: accepted; here's the user and their tokens
    /// - `Err(GatewayError::Rejected)`: wrong credentials
    /// - `Err(GatewayError::Network)`: couldn't get an answer
    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<LoginGrant, GatewayError>> + Send;

    /// Exchanges a refresh token for a fresh token pair.
    ///
    /// # Returns
    /// - `Ok(TokenPair)`: both tokens are new; the old refresh token is
    ///   spent
    /// - `Err(GatewayError::Rejected)`: the refresh token is expired or
    ///   revoked
    /// - `Err(GatewayError::Network)`: couldn't get an answer
    fn refresh(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = Result<TokenPair, GatewayError>> + Send;
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// The user object inside a login response.
///
/// `role` is deliberately a `String`: this is what the server *said*, and
/// it hasn't been checked yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayUser {
    pub id: u64,
    pub email: String,
    pub name: String,
    pub role: String,
}

/// A successful login response.
///
/// ```json
/// { "user": { "id": 1, "email": "...", "name": "...", "role": "user" },
///   "token": "T1", "refreshToken": "R1" }
/// ```
///
/// `refreshToken` may be missing; `#[serde(default)]` turns that into
/// `None` instead of a decode error.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginGrant {
    pub user: GatewayUser,
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl LoginGrant {
    /// Converts the response into a `LoginSucceeded` event.
    ///
    /// # Errors
    /// [`SessionError::UnrecognizedRole`] if `user.role` isn't one of
    /// `user`, `admin`, `superadmin`. No event is built in that case, so
    /// an unknown role can never reach the store.
    pub fn into_event(self) -> Result<SessionEvent, SessionError> {
        let role: Role = self.user.role.parse()?;
        Ok(SessionEvent::LoginSucceeded {
            role,
            principal: Principal {
                id: PrincipalId(self.user.id),
                email: self.user.email,
                name: self.user.name,
            },
            credentials: Credentials::new(self.token, self.refresh_token),
        })
    }
}

impl fmt::Debug for LoginGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginGrant")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// A successful refresh response. Both fields are required: a refresh
/// that only returns one token is malformed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

impl TokenPair {
    /// Converts the response into a `TokensRefreshed` event.
    pub fn into_event(self) -> SessionEvent {
        SessionEvent::TokensRefreshed {
            access_token: self.token,
            refresh_token: self.refresh_token,
        }
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(role: &str) -> LoginGrant {
        LoginGrant {
            user: GatewayUser {
                id: 1,
                email: "user@gmail.com".into(),
                name: "U".into(),
                role: role.into(),
            },
            token: "T1".into(),
            refresh_token: Some("R1".into()),
        }
    }

    #[test]
    fn test_into_event_known_role_builds_login_succeeded() {
        let event = grant("user").into_event().expect("role is known");

        match event {
            SessionEvent::LoginSucceeded {
                role,
                principal,
                credentials,
            } => {
                assert_eq!(role, Role::User);
                assert_eq!(principal.id, PrincipalId(1));
                assert_eq!(credentials.access_token, "T1");
                assert_eq!(credentials.refresh_token.as_deref(), Some("R1"));
            }
            other => panic!("expected LoginSucceeded, got {other:?}"),
        }
    }

    #[test]
    fn test_into_event_unknown_role_is_rejected() {
        let result = grant("owner").into_event();

        assert!(
            matches!(result, Err(SessionError::UnrecognizedRole(ref r)) if r == "owner"),
            "got {result:?}"
        );
    }

    #[test]
    fn test_token_pair_into_event_carries_both_tokens() {
        let pair = TokenPair {
            token: "T2".into(),
            refresh_token: "R2".into(),
        };

        assert_eq!(
            pair.into_event(),
            SessionEvent::TokensRefreshed {
                access_token: "T2".into(),
                refresh_token: "R2".into(),
            }
        );
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let debug = format!("{:?}", grant("admin"));
        assert!(!debug.contains("T1"));
        assert!(!debug.contains("R1"));
        assert!(debug.contains("user@gmail.com"));
    }
}
