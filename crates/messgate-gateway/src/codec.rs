//! JSON decoding for gateway response bodies.
//!
//! A gateway implementation that talks HTTP gets bytes back. These helpers
//! turn those bytes into wire types. A body that doesn't parse is treated
//! as a transport failure ([`GatewayError::Network`]): the server never
//! told us anything about the credentials, we just couldn't read what it
//! sent.

use serde::de::DeserializeOwned;

use crate::{GatewayError, LoginGrant, TokenPair};

/// Decodes a successful login response body.
///
/// # Example
///
/// ```rust
/// let body = br#"{"user":{"id":1,"email":"user@gmail.com","name":"U","role":"user"},"token":"T1"}"#;
/// let grant = messgate_gateway::decode_login(body).unwrap();
/// assert_eq!(grant.user.role, "user");
/// assert!(grant.refresh_token.is_none());
/// ```
pub fn decode_login(body: &[u8]) -> Result<LoginGrant, GatewayError> {
    decode(body, "login")
}

/// Decodes a successful refresh response body.
pub fn decode_refresh(body: &[u8]) -> Result<TokenPair, GatewayError> {
    decode(body, "refresh")
}

fn decode<T: DeserializeOwned>(
    body: &[u8],
    what: &str,
) -> Result<T, GatewayError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, what, "undecodable gateway response");
        GatewayError::Network(format!("malformed {what} response: {e}"))
    })
}
