//! Session state for Messgate.
//!
//! This crate owns the one piece of mutable state the client cares about:
//! whether someone is signed in, which role they hold, and which tokens
//! back their session.
//!
//! 1. **Record**: [`SessionRecord`], one enum variant per status, so a
//!    half-signed-in record can't even be written down
//! 2. **Events**: [`SessionEvent`] and the pure [`reduce`] function
//!    that turns `(record, event)` into the next record
//! 3. **Store**: [`SessionStore`] (the single writer) and
//!    [`SessionReader`] (cheap, cloneable snapshot handles)
//!
//! # How it fits in the stack
//!
//! ```text
//! Controller (above)  ← the only caller that emits events
//!     ↕
//! Session Layer (this crate)  ← record, reducer, store
//!     ↕
//! Router (beside)  ← reads snapshots, picks the app section
//! ```

mod error;
mod event;
mod record;
mod store;

pub use error::{ErrorKind, SessionError, SessionFailure};
pub use event::{SessionEvent, reduce};
pub use record::{
    Credentials, Principal, PrincipalId, ProfilePatch, Role, SessionRecord,
    SessionStatus,
};
pub use store::{SessionReader, SessionStore, Snapshot};
