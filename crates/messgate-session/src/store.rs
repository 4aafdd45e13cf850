//! The session store: sole owner and writer of the session record.
//!
//! # Single writer, many readers
//!
//! The store is split into two halves:
//!
//! - [`SessionStore`]: the writer. Not `Clone`, and [`apply`] takes
//!   `&mut self`, so the borrow checker refuses a second concurrent
//!   writer. Whoever owns the store (the controller) is the only thing
//!   that can change the session.
//! - [`SessionReader`]: the readers. `Clone` and cheap; each one sees
//!   point-in-time snapshots and can wait for the next change.
//!
//! Under the hood this is a `tokio::sync::watch` channel: the writer
//! replaces the whole value, readers clone out the latest one. There is
//! no way for a reader to get at the record mutably.
//!
//! [`apply`]: SessionStore::apply

use tokio::sync::watch;

use crate::{SessionError, SessionEvent, SessionRecord, reduce};

/// A record plus the version it was published at.
///
/// The version starts at 0 (the initial anonymous record) and goes up by
/// one for every accepted event. Rejected events don't bump it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub version: u64,
    pub record: SessionRecord,
}

/// The single writer of the session record.
#[derive(Debug)]
pub struct SessionStore {
    tx: watch::Sender<Snapshot>,
    version: u64,
}

impl SessionStore {
    /// Creates a store holding the initial anonymous record, plus a
    /// reader for it.
    pub fn new() -> (Self, SessionReader) {
        let (tx, rx) = watch::channel(Snapshot {
            version: 0,
            record: SessionRecord::default(),
        });
        (Self { tx, version: 0 }, SessionReader { rx })
    }

    /// Applies one event and publishes the resulting record.
    ///
    /// # Errors
    /// Returns [`SessionError::PreconditionViolation`] if the event isn't
    /// allowed in the current state. Nothing is published and the version
    /// stays the same.
    pub fn apply(
        &mut self,
        event: SessionEvent,
    ) -> Result<Snapshot, SessionError> {
        let name = event.name();

        // The borrow is scoped so the watch lock is released before we
        // publish below.
        let next = {
            let current = self.tx.borrow();
            reduce(&current.record, event)
        };

        let record = match next {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(event = name, error = %e, "session event rejected");
                return Err(e);
            }
        };

        self.version += 1;
        let snapshot = Snapshot {
            version: self.version,
            record,
        };
        // `send_replace` publishes even when no reader is alive.
        self.tx.send_replace(snapshot.clone());

        tracing::debug!(
            event = name,
            status = %snapshot.record.status(),
            version = snapshot.version,
            "session event applied"
        );
        Ok(snapshot)
    }

    /// The current record.
    pub fn record(&self) -> SessionRecord {
        self.tx.borrow().record.clone()
    }

    /// Number of events accepted so far.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Creates another reader.
    pub fn reader(&self) -> SessionReader {
        SessionReader {
            rx: self.tx.subscribe(),
        }
    }
}

/// A read-only handle to the session record.
#[derive(Debug, Clone)]
pub struct SessionReader {
    rx: watch::Receiver<Snapshot>,
}

impl SessionReader {
    /// The latest record.
    pub fn record(&self) -> SessionRecord {
        self.rx.borrow().record.clone()
    }

    /// The latest record together with its version.
    pub fn snapshot(&self) -> Snapshot {
        self.rx.borrow().clone()
    }

    /// Waits until a record newer than the last one this reader saw is
    /// published, and returns it.
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<Snapshot> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}
