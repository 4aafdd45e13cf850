//! Error types for the session layer.
//!
//! There are two flavors of "error" here and it's worth keeping them apart:
//!
//! - [`SessionError`] is a Rust error. It's returned from functions and
//!   travels up the call stack with `?`.
//! - [`SessionFailure`] is *data*. It's the `last_error` stored inside an
//!   errored [`SessionRecord`](crate::SessionRecord) so the UI can render
//!   it. It has to be `Clone` and serializable, which `SessionError`
//!   doesn't need to be.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::SessionStatus;

/// Errors that can occur around the session lifecycle.
///
/// Covers the whole taxonomy: bad input, transport trouble, server
/// rejections, expired sessions, and callers that emit an event in a
/// state where it makes no sense.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The input was malformed (empty password, email without `@`...).
    /// Detected locally, before any network call.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The gateway couldn't be reached, or didn't answer in time.
    /// Retrying later may succeed.
    #[error("network error: {0}")]
    Network(String),

    /// The gateway rejected the credentials. The message is the server's,
    /// untouched.
    #[error("credentials rejected: {0}")]
    Credential(String),

    /// The refresh token was rejected. The session is gone and the user
    /// has to sign in again.
    #[error("session expired: {0}")]
    SessionExpired(String),

    /// An event was emitted while its precondition didn't hold, e.g.
    /// refreshing tokens while nobody is signed in.
    ///
    /// This is a bug in the caller, not something a user can trigger
    /// by typing the wrong password.
    #[error("{event} is not allowed while {status}")]
    PreconditionViolation {
        event: &'static str,
        status: SessionStatus,
    },

    /// The gateway sent a role outside the closed set
    /// (`user`, `admin`, `superadmin`).
    #[error("unrecognized role: {0:?}")]
    UnrecognizedRole(String),

    /// The session is signed in, but the gateway never issued a refresh
    /// token for it, so there's nothing to refresh with.
    #[error("session has no refresh token")]
    MissingRefreshToken,

    /// A login or refresh is already outstanding for this controller.
    #[error("an authentication attempt is already in flight")]
    AttemptInFlight,
}

impl SessionError {
    /// Classifies this error into the taxonomy stored in session records.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::ValidationError,
            Self::Network(_) => ErrorKind::NetworkError,
            Self::Credential(_) => ErrorKind::CredentialError,
            Self::SessionExpired(_) => ErrorKind::SessionExpired,
            Self::PreconditionViolation { .. }
            | Self::MissingRefreshToken
            | Self::AttemptInFlight => ErrorKind::PreconditionViolation,
            Self::UnrecognizedRole(_) => ErrorKind::UnrecognizedRole,
        }
    }

    /// Converts this error into the failure record kept in the session.
    ///
    /// For the variants that wrap a message, the message is carried over
    /// as-is. That matters for [`SessionError::Credential`]: the server's
    /// wording must reach the user without being rewritten.
    pub fn to_failure(&self) -> SessionFailure {
        let message = match self {
            Self::Validation(m)
            | Self::Network(m)
            | Self::Credential(m)
            | Self::SessionExpired(m) => m.clone(),
            other => other.to_string(),
        };
        SessionFailure::new(self.kind(), message)
    }
}

/// The class of a [`SessionFailure`].
///
/// `#[serde(rename_all = "camelCase")]` → `"validationError"`,
/// `"sessionExpired"`, etc. on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    ValidationError,
    NetworkError,
    CredentialError,
    SessionExpired,
    PreconditionViolation,
    UnrecognizedRole,
}

impl ErrorKind {
    /// Returns `true` if the user can simply try again with the same input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkError)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ValidationError => "ValidationError",
            Self::NetworkError => "NetworkError",
            Self::CredentialError => "CredentialError",
            Self::SessionExpired => "SessionExpired",
            Self::PreconditionViolation => "PreconditionViolation",
            Self::UnrecognizedRole => "UnrecognizedRole",
        };
        f.write_str(name)
    }
}

/// A structured error kept in an errored session record (`lastError`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl SessionFailure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for SessionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_maps_each_variant() {
        assert_eq!(
            SessionError::Validation("x".into()).kind(),
            ErrorKind::ValidationError
        );
        assert_eq!(
            SessionError::Network("x".into()).kind(),
            ErrorKind::NetworkError
        );
        assert_eq!(
            SessionError::Credential("x".into()).kind(),
            ErrorKind::CredentialError
        );
        assert_eq!(
            SessionError::SessionExpired("x".into()).kind(),
            ErrorKind::SessionExpired
        );
        assert_eq!(
            SessionError::AttemptInFlight.kind(),
            ErrorKind::PreconditionViolation
        );
        assert_eq!(
            SessionError::UnrecognizedRole("owner".into()).kind(),
            ErrorKind::UnrecognizedRole
        );
    }

    #[test]
    fn test_to_failure_keeps_server_message_verbatim() {
        let err = SessionError::Credential("Invalid password!!".into());

        let failure = err.to_failure();

        assert_eq!(failure.kind, ErrorKind::CredentialError);
        assert_eq!(failure.message, "Invalid password!!");
    }

    #[test]
    fn test_to_failure_precondition_uses_display() {
        let err = SessionError::PreconditionViolation {
            event: "TokensRefreshed",
            status: SessionStatus::Anonymous,
        };

        let failure = err.to_failure();

        assert_eq!(failure.kind, ErrorKind::PreconditionViolation);
        assert_eq!(
            failure.message,
            "TokensRefreshed is not allowed while anonymous"
        );
    }

    #[test]
    fn test_only_network_errors_are_retryable() {
        assert!(ErrorKind::NetworkError.is_retryable());
        assert!(!ErrorKind::CredentialError.is_retryable());
        assert!(!ErrorKind::SessionExpired.is_retryable());
        assert!(!ErrorKind::ValidationError.is_retryable());
    }

    #[test]
    fn test_error_kind_serializes_camel_case() {
        let json = serde_json::to_string(&ErrorKind::SessionExpired).unwrap();
        assert_eq!(json, "\"sessionExpired\"");
    }
}
