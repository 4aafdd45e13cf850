//! The event vocabulary and the reducer that applies it.
//!
//! `reduce` is a plain function: it reads the current record and an
//! event, and returns the next record. No I/O, no clocks, no locks. That
//! makes every transition testable in isolation, and it means the store
//! only has to worry about *publishing* records, not computing them.

use crate::{
    Credentials, Principal, ProfilePatch, Role, SessionError, SessionFailure,
    SessionRecord, SessionStatus,
};

/// Every way a session record can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A login attempt has started.
    LoginRequested,

    /// The gateway accepted the credentials.
    LoginSucceeded {
        role: Role,
        principal: Principal,
        credentials: Credentials,
    },

    /// The attempt failed, or an authenticated session became unusable.
    LoginFailed { error: SessionFailure },

    /// Sign out. Allowed from any state.
    LogoutRequested,

    /// A new token pair. Both tokens travel together so the record can
    /// never hold a new access token next to an old refresh token.
    TokensRefreshed {
        access_token: String,
        refresh_token: String,
    },

    /// Shallow-merge into the signed-in principal.
    ProfileUpdated { patch: ProfilePatch },
}

impl SessionEvent {
    /// The event's name, for logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoginRequested => "LoginRequested",
            Self::LoginSucceeded { .. } => "LoginSucceeded",
            Self::LoginFailed { .. } => "LoginFailed",
            Self::LogoutRequested => "LogoutRequested",
            Self::TokensRefreshed { .. } => "TokensRefreshed",
            Self::ProfileUpdated { .. } => "ProfileUpdated",
        }
    }
}

/// Computes the record that follows `record` once `event` is applied.
///
/// | Event | Requires | Result |
/// |---|---|---|
/// | `LoginRequested` | any | `Authenticating` (any previous error is dropped) |
/// | `LoginSucceeded` | any | `Authenticated` with the given role/principal/tokens |
/// | `LoginFailed` | any | `Errored`, tokens gone |
/// | `LogoutRequested` | any | `Anonymous` |
/// | `TokensRefreshed` | authenticated | both tokens replaced, nothing else |
/// | `ProfileUpdated` | authenticated | principal merged, nothing else |
///
/// # Errors
/// [`SessionError::PreconditionViolation`] when the "Requires" column
/// doesn't hold. The input record is untouched in that case (it's only
/// borrowed), so a rejected event is a no-op.
pub fn reduce(
    record: &SessionRecord,
    event: SessionEvent,
) -> Result<SessionRecord, SessionError> {
    match event {
        SessionEvent::LoginRequested => Ok(SessionRecord::Authenticating),

        SessionEvent::LoginSucceeded {
            role,
            principal,
            credentials,
        } => Ok(SessionRecord::Authenticated {
            role,
            principal,
            credentials,
        }),

        // Building a fresh `Errored` value (rather than editing the old
        // record) is what guarantees no token survives a failure.
        SessionEvent::LoginFailed { error } => {
            Ok(SessionRecord::Errored { error })
        }

        SessionEvent::LogoutRequested => Ok(SessionRecord::Anonymous),

        SessionEvent::TokensRefreshed {
            access_token,
            refresh_token,
        } => match record {
            SessionRecord::Authenticated {
                role, principal, ..
            } => Ok(SessionRecord::Authenticated {
                role: *role,
                principal: principal.clone(),
                credentials: Credentials::new(
                    access_token,
                    Some(refresh_token),
                ),
            }),
            other => Err(violation("TokensRefreshed", other.status())),
        },

        SessionEvent::ProfileUpdated { patch } => match record {
            SessionRecord::Authenticated {
                role,
                principal,
                credentials,
            } => {
                let mut principal = principal.clone();
                principal.apply(&patch);
                Ok(SessionRecord::Authenticated {
                    role: *role,
                    principal,
                    credentials: credentials.clone(),
                })
            }
            other => Err(violation("ProfileUpdated", other.status())),
        },
    }
}

fn violation(event: &'static str, status: SessionStatus) -> SessionError {
    SessionError::PreconditionViolation { event, status }
}
