//! Change notifications for the persistence collaborator.
//!
//! The engine calls [`ChangeSink::notify`] exactly once after every
//! successful mutating operation, once the bucket lock has been released.
//! Failed operations never notify, and the engine never waits on or inspects
//! what the sink does with the signal.

use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// What kind of change a mutating operation made to a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    /// A bucket, object version, delete marker or upload was created.
    Create,
    /// Existing state was modified (versioning, tagging, parts).
    Update,
    /// A bucket, version or upload was removed.
    Delete,
}

/// Receiver of change signals.
pub trait ChangeSink: Send + Sync + fmt::Debug {
    /// Record that `bucket` changed.
    fn notify(&self, bucket: &str, kind: ChangeKind);
}

/// Sink that discards every signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopChangeSink;

impl ChangeSink for NoopChangeSink {
    fn notify(&self, _bucket: &str, _kind: ChangeKind) {}
}

/// Sink that keeps every signal in memory, in arrival order.
///
/// # Examples
///
/// ```
/// use objstack_s3_core::notify::{ChangeKind, ChangeSink, RecordingChangeSink};
///
/// let sink = RecordingChangeSink::default();
/// sink.notify("photos", ChangeKind::Create);
/// assert_eq!(sink.events(), vec![("photos".to_owned(), ChangeKind::Create)]);
/// ```
#[derive(Debug, Default)]
pub struct RecordingChangeSink {
    events: Mutex<Vec<(String, ChangeKind)>>,
}

impl RecordingChangeSink {
    /// Snapshot of recorded signals.
    #[must_use]
    pub fn events(&self) -> Vec<(String, ChangeKind)> {
        self.events.lock().clone()
    }

    /// Drain recorded signals.
    pub fn take(&self) -> Vec<(String, ChangeKind)> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl ChangeSink for RecordingChangeSink {
    fn notify(&self, bucket: &str, kind: ChangeKind) {
        self.events.lock().push((bucket.to_owned(), kind));
    }
}
