//! The objstack S3 provider.
//!
//! [`ObjStackS3`] owns the service state and its collaborators (content
//! store, change sink, id generator). Individual S3 operations are
//! implemented in the `crate::ops` submodules as `handle_*` methods on it.

use std::sync::Arc;

use crate::config::S3Config;
use crate::ids::{DefaultIdGenerator, IdGenerator};
use crate::notify::{ChangeKind, ChangeSink, NoopChangeSink};
use crate::state::S3ServiceState;
use crate::storage::{ContentId, ContentStore, InMemoryContentStore};

/// The main S3 provider.
///
/// All fields are `Arc`-wrapped for cheap cloning and shared ownership
/// across request threads.
///
/// # Examples
///
/// ```
/// use objstack_s3_core::ObjStackS3;
/// use objstack_s3_core::config::S3Config;
///
/// let provider = ObjStackS3::new(S3Config::default());
/// assert_eq!(provider.config().max_keys_limit, 1000);
/// ```
#[derive(Debug, Clone)]
pub struct ObjStackS3 {
    /// Bucket, object and upload state.
    pub(crate) state: Arc<S3ServiceState>,
    /// Object and part bytes.
    pub(crate) store: Arc<dyn ContentStore>,
    /// Receiver of per-operation change signals.
    pub(crate) changes: Arc<dyn ChangeSink>,
    /// Version and upload id source.
    pub(crate) ids: Arc<dyn IdGenerator>,
    /// Provider configuration.
    pub(crate) config: Arc<S3Config>,
}

impl ObjStackS3 {
    /// Create a provider with the in-memory content store, no change sink
    /// and the default id generator.
    #[must_use]
    pub fn new(config: S3Config) -> Self {
        let store = InMemoryContentStore::from_config(&config);
        Self::with_collaborators(
            config,
            Arc::new(store),
            Arc::new(NoopChangeSink),
            Arc::new(DefaultIdGenerator),
        )
    }

    /// Create a provider around caller-supplied collaborators.
    #[must_use]
    pub fn with_collaborators(
        config: S3Config,
        store: Arc<dyn ContentStore>,
        changes: Arc<dyn ChangeSink>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            state: Arc::new(S3ServiceState::new()),
            store,
            changes,
            ids,
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the service state.
    #[must_use]
    pub fn state(&self) -> &S3ServiceState {
        &self.state
    }

    /// Returns a reference to the content store.
    #[must_use]
    pub fn store(&self) -> &dyn ContentStore {
        self.store.as_ref()
    }

    /// Returns a reference to the provider configuration.
    #[must_use]
    pub fn config(&self) -> &S3Config {
        &self.config
    }

    /// Drop every bucket and release all of their content.
    pub fn reset(&self) {
        let mut released = Vec::new();
        for (name, _) in self.state.list_buckets() {
            if let Ok(bucket) = self.state.bucket(&name) {
                released.extend(bucket.purge());
            }
        }
        self.state.reset();
        self.release(released);
    }

    /// Release content that no version or part references any more.
    pub(crate) fn release(&self, ids: impl IntoIterator<Item = ContentId>) {
        for id in ids {
            self.store.delete(&id);
        }
    }

    pub(crate) fn notify(&self, bucket: &str, kind: ChangeKind) {
        self.changes.notify(bucket, kind);
    }
}
