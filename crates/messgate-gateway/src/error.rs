//! Error types for the gateway layer.

/// What can go wrong when talking to the auth gateway.
///
/// The split matters more than the messages: a `Network` error says
/// nothing about the credentials (try again later), a `Rejected` error
/// says the server looked at them and said no.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The request never got a usable answer: connection refused, timed
    /// out, or the response body was garbage.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered and refused: bad credentials at login, an
    /// expired or revoked refresh token at refresh.
    #[error("rejected: {0}")]
    Rejected(String),
}

impl GatewayError {
    /// The human-readable message, without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Network(m) | Self::Rejected(m) => m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_strips_prefix() {
        let err = GatewayError::Rejected("Invalid password".into());
        assert_eq!(err.message(), "Invalid password");
        assert_eq!(err.to_string(), "rejected: Invalid password");
    }
}
