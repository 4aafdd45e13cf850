//! Integration tests for a gateway that only sees raw response bodies.
//!
//! `CannedGateway` plays a backend that answers with fixed JSON, the way
//! an HTTP-backed gateway would after reading a response. It exercises
//! the full path: bytes → wire type → session event.

use messgate_gateway::{
    AuthGateway, GatewayError, LoginGrant, TokenPair, decode_login,
    decode_refresh,
};
use messgate_session::{Role, SessionError, SessionEvent};

// =========================================================================
// Canned backend
// =========================================================================

struct CannedGateway {
    login_body: &'static [u8],
    refresh_body: &'static [u8],
}

impl AuthGateway for CannedGateway {
    async fn login(
        &self,
        _email: &str,
        _password: &str,
    ) -> Result<LoginGrant, GatewayError> {
        decode_login(self.login_body)
    }

    async fn refresh(
        &self,
        _refresh_token: &str,
    ) -> Result<TokenPair, GatewayError> {
        decode_refresh(self.refresh_body)
    }
}

const USER_BODY: &[u8] = br#"{"user":{"id":1,"email":"user@gmail.com","name":"U","role":"user"},"token":"T1","refreshToken":"R1"}"#;
const OWNER_BODY: &[u8] = br#"{"user":{"id":9,"email":"o@mess.io","name":"O","role":"owner"},"token":"T9"}"#;
const PAIR_BODY: &[u8] = br#"{"token":"T2","refreshToken":"R2"}"#;

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_login_body_becomes_login_succeeded() {
    let gw = CannedGateway {
        login_body: USER_BODY,
        refresh_body: PAIR_BODY,
    };

    let event = gw
        .login("user@gmail.com", "1234")
        .await
        .expect("body decodes")
        .into_event()
        .expect("role is known");

    assert!(matches!(
        event,
        SessionEvent::LoginSucceeded { role: Role::User, .. }
    ));
}

#[tokio::test]
async fn test_unknown_role_stops_at_the_boundary() {
    let gw = CannedGateway {
        login_body: OWNER_BODY,
        refresh_body: PAIR_BODY,
    };

    let grant = gw.login("o@mess.io", "pw").await.expect("body decodes");

    assert!(matches!(
        grant.into_event(),
        Err(SessionError::UnrecognizedRole(_))
    ));
}

#[tokio::test]
async fn test_refresh_body_becomes_tokens_refreshed() {
    let gw = CannedGateway {
        login_body: USER_BODY,
        refresh_body: PAIR_BODY,
    };

    let event = gw.refresh("R1").await.expect("body decodes").into_event();

    assert_eq!(
        event,
        SessionEvent::TokensRefreshed {
            access_token: "T2".into(),
            refresh_token: "R2".into(),
        }
    );
}

#[tokio::test]
async fn test_garbage_body_is_network_error() {
    let gw = CannedGateway {
        login_body: b"",
        refresh_body: b"{",
    };

    assert!(matches!(
        gw.login("a@b.c", "x").await,
        Err(GatewayError::Network(_))
    ));
    assert!(matches!(
        gw.refresh("R").await,
        Err(GatewayError::Network(_))
    ));
}
