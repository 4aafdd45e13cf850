//! Unified error type for the Messgate facade.

use messgate_gateway::GatewayError;
use messgate_session::SessionError;

/// Top-level error that wraps all crate-specific errors.
///
/// Applications built on the facade can use this one type in their own
/// signatures; `#[from]` lets `?` convert the layer errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum MessgateError {
    /// A session-level error (validation, precondition, in-flight...).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A gateway error surfaced directly, outside the controller.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_session_error() {
        let err = SessionError::Validation("email is required".into());
        let messgate_err: MessgateError = err.into();
        assert!(matches!(messgate_err, MessgateError::Session(_)));
        assert!(messgate_err.to_string().contains("email is required"));
    }

    #[test]
    fn test_from_gateway_error() {
        let err = GatewayError::Network("down".into());
        let messgate_err: MessgateError = err.into();
        assert!(matches!(messgate_err, MessgateError::Gateway(_)));
        assert_eq!(messgate_err.to_string(), "network error: down");
    }
}
