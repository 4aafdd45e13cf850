//! Role routing for Messgate.
//!
//! Turns a session snapshot into the one top-level section of the app the
//! client is allowed to render. The mapping is a pure function with no
//! memory: ask it again after every session change, never cache the
//! answer. A cached `AdminArea` after a logout is exactly the bug this
//! crate exists to rule out.
//!
//! ```text
//! not authenticated        → Auth
//! authenticated, user      → UserArea
//! authenticated, admin     → AdminArea
//! authenticated, superadmin→ SuperAdminArea
//! anything else            → Auth
//! ```

use std::fmt;

use messgate_session::{Role, SessionRecord};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

/// A top-level navigation target. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    /// Sign-in, sign-up, and password reset screens.
    Auth,
    UserArea,
    AdminArea,
    SuperAdminArea,
}

impl Section {
    /// Returns `true` for every section that requires a signed-in session.
    pub fn is_privileged(&self) -> bool {
        !matches!(self, Self::Auth)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auth => write!(f, "Auth"),
            Self::UserArea => write!(f, "UserArea"),
            Self::AdminArea => write!(f, "AdminArea"),
            Self::SuperAdminArea => write!(f, "SuperAdminArea"),
        }
    }
}

// ---------------------------------------------------------------------------
// RoleRouter
// ---------------------------------------------------------------------------

/// Derives the active [`Section`] from a session record.
///
/// A unit struct with associated functions, because there's no state to
/// hold. It exists to give the mapping a name at call sites:
/// `RoleRouter::section(&record)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleRouter;

impl RoleRouter {
    /// The section for a session record.
    pub fn section(record: &SessionRecord) -> Section {
        match record {
            SessionRecord::Authenticated { role, .. } => Self::for_role(*role),
            _ => Section::Auth,
        }
    }

    /// The section for a role string that hasn't been through the typed
    /// boundary yet (straight off the wire, or out of storage).
    ///
    /// The raw role is only honored when `record` is authenticated and the
    /// string parses into a known [`Role`]. Everything else yields
    /// [`Section::Auth`]: an unknown role never falls through to some
    /// privileged section by accident.
    pub fn section_for_claim(record: &SessionRecord, raw_role: &str) -> Section {
        if !record.is_authenticated() {
            return Section::Auth;
        }
        match raw_role.parse::<Role>() {
            Ok(role) => Self::for_role(role),
            Err(_) => Section::Auth,
        }
    }

    fn for_role(role: Role) -> Section {
        match role {
            Role::User => Section::UserArea,
            Role::Admin => Section::AdminArea,
            Role::SuperAdmin => Section::SuperAdminArea,
        }
    }
}
