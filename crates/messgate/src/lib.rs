//! # Messgate
//!
//! The session and role gate of the Messgate mess-management client.
//!
//! The rest of the app (screens, forms, dashboards) asks Messgate one
//! question: *which section am I allowed to show right now?* Messgate
//! answers it from a single session record that only the
//! [`SessionController`] can change.
//!
//! ```text
//! UI ──login()──→ SessionController ──→ AuthGateway
//!                       │
//!                       ▼ events
//!                  SessionStore ──snapshots──→ RoleRouter ──→ Section
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use messgate::prelude::*;
//!
//! # async fn run() -> Result<(), MessgateError> {
//! let gateway = MemoryGateway::new().with_account(
//!     "user@gmail.com",
//!     "1234",
//!     GatewayUser { id: 1, email: "user@gmail.com".into(), name: "U".into(), role: "user".into() },
//! );
//! let controller = SessionController::new(gateway, ControllerConfig::default());
//!
//! let section = controller.login("user@gmail.com", "1234").await?;
//! assert_eq!(section, Section::UserArea);
//! # Ok(())
//! # }
//! ```

mod config;
mod controller;
mod error;
pub mod telemetry;
mod validate;

pub use config::ControllerConfig;
pub use controller::SessionController;
pub use error::MessgateError;

pub mod prelude {
    //! Everything a typical caller needs, in one import.

    pub use crate::{ControllerConfig, MessgateError, SessionController};
    pub use messgate_gateway::{
        AuthGateway, GatewayError, GatewayUser, LoginGrant, MemoryGateway,
        TokenPair,
    };
    pub use messgate_router::{RoleRouter, Section};
    pub use messgate_session::{
        ErrorKind, Principal, PrincipalId, ProfilePatch, Role, SessionError,
        SessionFailure, SessionReader, SessionRecord, SessionStatus, Snapshot,
    };
}
