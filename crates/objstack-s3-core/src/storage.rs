//! Content store for object and part bytes.
//!
//! The engine never keeps bytes in its own model. Every version and part
//! holds a [`ContentId`] that points into a [`ContentStore`]. Each `put`
//! yields a fresh id, so releasing one reference never affects another.
//!
//! [`InMemoryContentStore`] is the default backend. Blobs below a
//! configurable threshold are kept in memory as [`Bytes`]; larger blobs are
//! spilled to temporary files that are removed when the entry is dropped.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use bytes::Bytes;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::config::S3Config;
use crate::error::{S3ServiceError, S3ServiceResult};

// ---------------------------------------------------------------------------
// ContentId / ContentStore
// ---------------------------------------------------------------------------

/// Opaque reference to a blob held by a [`ContentStore`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    /// Wrap an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Blob sink used by the engine for object and part bytes.
///
/// Implementations must be safe to call from any thread. The engine calls
/// `put` before taking a bucket lock and `delete` for every version or part
/// it retires.
pub trait ContentStore: Send + Sync + fmt::Debug {
    /// Store `data` and return a fresh reference to it.
    fn put(&self, data: Bytes) -> S3ServiceResult<ContentId>;

    /// Read back the full blob behind `id`.
    fn get(&self, id: &ContentId) -> S3ServiceResult<Bytes>;

    /// Release the blob behind `id`. Unknown ids are ignored.
    fn delete(&self, id: &ContentId);
}

// ---------------------------------------------------------------------------
// StoredData
// ---------------------------------------------------------------------------

/// Internal representation of a stored blob.
///
/// When a [`StoredData::OnDisk`] value is dropped, its file is removed.
enum StoredData {
    /// Small blobs kept entirely in memory.
    InMemory {
        /// The raw bytes.
        data: Bytes,
    },
    /// Large blobs spilled to a file.
    OnDisk {
        /// Path to the spill file.
        path: PathBuf,
        /// Size of the stored data in bytes.
        size: u64,
    },
}

impl fmt::Debug for StoredData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InMemory { data } => f
                .debug_struct("InMemory")
                .field("size", &data.len())
                .finish(),
            Self::OnDisk { path, size } => f
                .debug_struct("OnDisk")
                .field("path", path)
                .field("size", size)
                .finish(),
        }
    }
}

impl Drop for StoredData {
    fn drop(&mut self) {
        if let Self::OnDisk { path, .. } = self {
            if let Err(e) = std::fs::remove_file(path.as_path()) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %e, "failed to remove spill file");
                }
            } else {
                trace!(path = %path.display(), "removed spill file");
            }
        }
    }
}

impl StoredData {
    /// Read the full data from this stored entry.
    fn read_all(&self) -> S3ServiceResult<Bytes> {
        match self {
            Self::InMemory { data } => Ok(data.clone()),
            Self::OnDisk { path, .. } => std::fs::read(path).map(Bytes::from).map_err(|e| {
                S3ServiceError::Internal(anyhow::anyhow!(
                    "failed to read spill file {}: {e}",
                    path.display()
                ))
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// InMemoryContentStore
// ---------------------------------------------------------------------------

/// In-memory content store with spillover to temp files for large blobs.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use objstack_s3_core::storage::{ContentStore, InMemoryContentStore};
///
/// let store = InMemoryContentStore::new(1024, None);
/// let id = store.put(Bytes::from("hello")).unwrap();
/// assert_eq!(store.get(&id).unwrap().as_ref(), b"hello");
/// store.delete(&id);
/// assert!(store.is_empty());
/// ```
pub struct InMemoryContentStore {
    blobs: DashMap<ContentId, StoredData>,
    /// Max size in bytes for in-memory storage before spilling to disk.
    max_memory_size: usize,
    /// Where spill files go; `None` is the OS temp dir.
    spill_dir: Option<PathBuf>,
}

impl fmt::Debug for InMemoryContentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryContentStore")
            .field("blobs_count", &self.blobs.len())
            .field("max_memory_size", &self.max_memory_size)
            .field("spill_dir", &self.spill_dir)
            .finish()
    }
}

impl Default for InMemoryContentStore {
    fn default() -> Self {
        Self::from_config(&S3Config::default())
    }
}

impl InMemoryContentStore {
    /// Create a store that spills blobs above `max_memory_size` bytes.
    #[must_use]
    pub fn new(max_memory_size: usize, spill_dir: Option<PathBuf>) -> Self {
        debug!(max_memory_size, ?spill_dir, "creating InMemoryContentStore");
        Self {
            blobs: DashMap::new(),
            max_memory_size,
            spill_dir,
        }
    }

    /// Create a store from the engine configuration.
    #[must_use]
    pub fn from_config(config: &S3Config) -> Self {
        Self::new(config.max_memory_object_size, config.spill_dir.clone())
    }

    /// Number of live blobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Whether no blobs are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Drop every blob, removing spill files.
    pub fn reset(&self) {
        let count = self.blobs.len();
        self.blobs.clear();
        debug!(count, "reset content store");
    }

    fn store_data(&self, data: Bytes) -> S3ServiceResult<StoredData> {
        if data.len() > self.max_memory_size {
            self.spill_to_disk(&data)
        } else {
            Ok(StoredData::InMemory { data })
        }
    }

    /// Write data to a kept temp file and return a [`StoredData::OnDisk`].
    fn spill_to_disk(&self, data: &[u8]) -> S3ServiceResult<StoredData> {
        let size = data.len() as u64;

        let mut builder = tempfile::Builder::new();
        builder.prefix("objstack-");
        let temp = match &self.spill_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| S3ServiceError::Internal(anyhow::anyhow!("failed to create spill file: {e}")))?;

        let (mut file, path) = temp.keep().map_err(|e| {
            S3ServiceError::Internal(anyhow::anyhow!("failed to keep spill file: {e}"))
        })?;
        // From here on the file is removed by StoredData's Drop.
        let stored = StoredData::OnDisk { path, size };

        file.write_all(data).and_then(|()| file.flush()).map_err(|e| {
            S3ServiceError::Internal(anyhow::anyhow!("failed to write spill file: {e}"))
        })?;

        trace!(?stored, "spilled data to disk");
        Ok(stored)
    }
}

impl ContentStore for InMemoryContentStore {
    fn put(&self, data: Bytes) -> S3ServiceResult<ContentId> {
        let size = data.len();
        let stored = self.store_data(data)?;
        let id = ContentId(Uuid::new_v4().simple().to_string());
        trace!(content_id = %id, size, "stored content");
        self.blobs.insert(id.clone(), stored);
        Ok(id)
    }

    fn get(&self, id: &ContentId) -> S3ServiceResult<Bytes> {
        let entry = self.blobs.get(id).ok_or_else(|| {
            S3ServiceError::Internal(anyhow::anyhow!("content {id} is missing from the store"))
        })?;
        entry.value().read_all()
    }

    fn delete(&self, id: &ContentId) {
        if self.blobs.remove(id).is_some() {
            trace!(content_id = %id, "deleted content");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
