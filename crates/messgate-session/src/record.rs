//! The session record: who is signed in, as what, with which tokens.
//!
//! A session is always in exactly one of four states:
//!
//! ```text
//!   Anonymous ──(LoginRequested)──→ Authenticating ──(LoginSucceeded)──→ Authenticated
//!       ↑                                │                                   │
//!       │                         (LoginFailed)                        (LoginFailed)
//!       │                                ▼                                   │
//!       └───────(LogoutRequested)─── Errored ←───────────────────────────────┘
//! ```
//!
//! Instead of a struct with a `status` field plus a pile of optional
//! fields (where nothing stops you from writing `status = anonymous` next
//! to a live access token), the record is an enum. Role, principal, and
//! tokens only exist inside the `Authenticated` variant, so "role is set
//! iff the session is authenticated" holds by construction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{SessionError, SessionFailure};

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// An authorization level. The set is closed: there is no "other" variant.
///
/// Raw role strings coming from the gateway go through [`FromStr`], which
/// refuses anything it doesn't know. An unknown role therefore can't be
/// stored in a [`SessionRecord`] at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A regular mess member.
    User,
    /// Runs a single mess.
    Admin,
    /// Platform operator, across all messes.
    SuperAdmin,
}

impl Role {
    /// The wire name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::SuperAdmin => "superadmin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a role exactly as the gateway spells it. Matching is strict
/// (no trimming, no case folding): `"Admin"` is not `"admin"`.
impl FromStr for Role {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "superadmin" => Ok(Self::SuperAdmin),
            other => Err(SessionError::UnrecognizedRole(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Principal
// ---------------------------------------------------------------------------

/// The gateway's identifier for an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(pub u64);

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

/// The signed-in identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub email: String,
    pub name: String,
}

impl Principal {
    /// Shallow-merges a patch: every field set in the patch replaces the
    /// current value, every `None` leaves it alone. The id never changes.
    pub fn apply(&mut self, patch: &ProfilePatch) {
        if let Some(email) = &patch.email {
            self.email.clone_from(email);
        }
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
    }
}

/// A partial profile update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub email: Option<String>,
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// The opaque tokens backing an authenticated session.
///
/// `refresh_token` is optional because the gateway is allowed to omit it
/// at login. Such a session works until its access token dies and then
/// can't be refreshed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl Credentials {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
        }
    }
}

/// Hand-written so tokens never end up in logs through `{:?}`.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

/// The four mutually exclusive statuses, without their payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Anonymous,
    Authenticating,
    Authenticated,
    Errored,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Anonymous => "anonymous",
            Self::Authenticating => "authenticating",
            Self::Authenticated => "authenticated",
            Self::Errored => "errored",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// SessionRecord
// ---------------------------------------------------------------------------

/// The authoritative state of the current principal.
///
/// `#[serde(tag = "status")]` gives the familiar flat JSON shape:
/// `{ "status": "authenticated", "role": "user", ... }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SessionRecord {
    /// Nobody is signed in. The initial record at process start.
    #[default]
    Anonymous,

    /// A login is outstanding.
    Authenticating,

    /// Signed in.
    Authenticated {
        role: Role,
        principal: Principal,
        credentials: Credentials,
    },

    /// The last attempt failed. Holds no tokens, only the failure.
    Errored { error: SessionFailure },
}

impl SessionRecord {
    pub fn status(&self) -> SessionStatus {
        match self {
            Self::Anonymous => SessionStatus::Anonymous,
            Self::Authenticating => SessionStatus::Authenticating,
            Self::Authenticated { .. } => SessionStatus::Authenticated,
            Self::Errored { .. } => SessionStatus::Errored,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// The role, or `None` unless authenticated.
    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Authenticated { role, .. } => Some(*role),
            _ => None,
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Authenticated { principal, .. } => Some(principal),
            _ => None,
        }
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        match self {
            Self::Authenticated { credentials, .. } => Some(credentials),
            _ => None,
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.credentials().map(|c| c.access_token.as_str())
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.credentials().and_then(|c| c.refresh_token.as_deref())
    }

    /// The failure behind an errored record (`lastError`).
    pub fn last_error(&self) -> Option<&SessionFailure> {
        match self {
            Self::Errored { error } => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn signed_in(role: Role) -> SessionRecord {
        SessionRecord::Authenticated {
            role,
            principal: Principal {
                id: PrincipalId(1),
                email: "user@gmail.com".into(),
                name: "U".into(),
            },
            credentials: Credentials::new("T1", Some("R1".into())),
        }
    }

    #[test]
    fn test_role_from_str_accepts_closed_set() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("superadmin".parse::<Role>().unwrap(), Role::SuperAdmin);
    }

    #[test]
    fn test_role_from_str_rejects_unknown_and_miscased() {
        for raw in ["owner", "Admin", " user", "", "super_admin"] {
            let result = raw.parse::<Role>();
            assert!(
                matches!(result, Err(SessionError::UnrecognizedRole(ref r)) if r == raw),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_role_serializes_as_wire_name() {
        let json = serde_json::to_string(&Role::SuperAdmin).unwrap();
        assert_eq!(json, "\"superadmin\"");
        assert_eq!(Role::SuperAdmin.to_string(), "superadmin");
    }

    #[test]
    fn test_default_record_is_anonymous_and_empty() {
        let record = SessionRecord::default();

        assert_eq!(record.status(), SessionStatus::Anonymous);
        assert!(record.role().is_none());
        assert!(record.principal().is_none());
        assert!(record.access_token().is_none());
        assert!(record.refresh_token().is_none());
        assert!(record.last_error().is_none());
    }

    #[test]
    fn test_authenticated_record_exposes_role_and_tokens() {
        let record = signed_in(Role::Admin);

        assert!(record.is_authenticated());
        assert_eq!(record.role(), Some(Role::Admin));
        assert_eq!(record.principal().unwrap().id, PrincipalId(1));
        assert_eq!(record.access_token(), Some("T1"));
        assert_eq!(record.refresh_token(), Some("R1"));
        assert!(record.last_error().is_none());
    }

    #[test]
    fn test_errored_record_has_no_role_or_tokens() {
        let record = SessionRecord::Errored {
            error: SessionFailure::new(ErrorKind::NetworkError, "offline"),
        };

        assert_eq!(record.status(), SessionStatus::Errored);
        assert!(record.role().is_none());
        assert!(record.access_token().is_none());
        assert_eq!(record.last_error().unwrap().kind, ErrorKind::NetworkError);
    }

    #[test]
    fn test_credentials_debug_redacts_tokens() {
        let creds = Credentials::new("secret-access", Some("secret-refresh".into()));

        let debug = format!("{creds:?}");

        assert!(!debug.contains("secret"), "tokens leaked: {debug}");
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_principal_apply_merges_only_set_fields() {
        let mut principal = Principal {
            id: PrincipalId(7),
            email: "old@mess.io".into(),
            name: "Old".into(),
        };

        principal.apply(&ProfilePatch {
            email: None,
            name: Some("New".into()),
        });

        assert_eq!(principal.name, "New");
        assert_eq!(principal.email, "old@mess.io");
        assert_eq!(principal.id, PrincipalId(7));
    }

    #[test]
    fn test_record_serializes_with_status_tag() {
        let json = serde_json::to_value(signed_in(Role::User)).unwrap();

        assert_eq!(json["status"], "authenticated");
        assert_eq!(json["role"], "user");
        assert_eq!(json["principal"]["id"], 1);
    }
}
