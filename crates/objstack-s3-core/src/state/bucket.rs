//! Per-bucket state.
//!
//! An [`S3Bucket`] wraps its mutable [`BucketState`] (versioning mode, the
//! key-sorted object map and the in-flight multipart uploads) in a single
//! `parking_lot::RwLock`. Mutations take the write lock for their whole
//! read-modify-write sequence; reads and listings take the read lock.
//!
//! The [`BucketState`] mutators are pure: they never touch the content store.
//! Whatever content they retire is handed back to the caller, which releases
//! it once the lock is dropped.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use objstack_s3_model::BucketVersioningStatus;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::multipart::MultipartUpload;
use super::object::{ObjectEntry, ObjectVersion};
use crate::error::{S3ServiceError, S3ServiceResult};
use crate::storage::ContentId;

// ---------------------------------------------------------------------------
// VersioningStatus
// ---------------------------------------------------------------------------

/// Bucket versioning mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersioningStatus {
    /// Versioning has never been configured on this bucket.
    #[default]
    Unset,
    /// Every write creates a new addressable version.
    Enabled,
    /// Writes rebind the virtual `"null"` version; history is kept.
    Suspended,
}

impl VersioningStatus {
    /// Whether writes get real, caller-visible version ids.
    #[must_use]
    pub fn is_enabled(self) -> bool {
        self == Self::Enabled
    }

    /// The status as reported by `GetBucketVersioning`.
    #[must_use]
    pub fn to_model(self) -> Option<BucketVersioningStatus> {
        match self {
            Self::Unset => None,
            Self::Enabled => Some(BucketVersioningStatus::Enabled),
            Self::Suspended => Some(BucketVersioningStatus::Suspended),
        }
    }
}

impl From<BucketVersioningStatus> for VersioningStatus {
    fn from(status: BucketVersioningStatus) -> Self {
        match status {
            BucketVersioningStatus::Enabled => Self::Enabled,
            BucketVersioningStatus::Suspended => Self::Suspended,
        }
    }
}

// ---------------------------------------------------------------------------
// BucketState
// ---------------------------------------------------------------------------

/// Everything in a bucket that can change after creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketState {
    /// Current versioning mode.
    pub versioning: VersioningStatus,
    /// Objects keyed and sorted by key.
    pub objects: BTreeMap<String, ObjectEntry>,
    /// In-flight uploads keyed by object key, then upload id.
    pub uploads: BTreeMap<String, BTreeMap<String, MultipartUpload>>,
    /// Set once the bucket has been dropped from the service.
    #[serde(skip)]
    deleted: bool,
}

/// Outcome of writing a version or delete marker.
#[derive(Debug)]
pub struct PutOutcome {
    /// Id the caller sees: `"null"` or the real id.
    pub version_id: String,
    /// Content of the virtual version this write replaced, if any.
    pub retired: Option<ContentId>,
}

impl BucketState {
    /// Whether the bucket still holds objects or in-flight uploads.
    ///
    /// Outside ENABLED mode every versionless delete leaves a marker behind,
    /// so keys whose history is made only of delete markers do not count there.
    #[must_use]
    pub fn has_live_data(&self) -> bool {
        if !self.uploads.is_empty() {
            return true;
        }
        if self.versioning.is_enabled() {
            !self.objects.is_empty()
        } else {
            self.objects.values().any(ObjectEntry::has_content)
        }
    }

    /// Look up the history of `key`.
    ///
    /// # Errors
    ///
    /// [`S3ServiceError::NoSuchKey`] when the key has no history.
    pub fn object(&self, key: &str) -> S3ServiceResult<&ObjectEntry> {
        self.objects.get(key).ok_or_else(|| S3ServiceError::NoSuchKey {
            key: key.to_owned(),
        })
    }

    /// Mutable variant of [`Self::object`].
    pub fn object_mut(&mut self, key: &str) -> S3ServiceResult<&mut ObjectEntry> {
        self.objects
            .get_mut(key)
            .ok_or_else(|| S3ServiceError::NoSuchKey {
                key: key.to_owned(),
            })
    }

    /// Resolve `(key, version_id?)` to a version and its display id.
    pub fn resolve(
        &self,
        key: &str,
        version_id: Option<&str>,
    ) -> S3ServiceResult<(String, &ObjectVersion)> {
        let entry = self.object(key)?;
        let version = entry.resolve(key, version_id)?;
        Ok((entry.display_id(version), version))
    }

    /// Append a version (content or delete marker) to `key`, creating the
    /// key if needed.
    ///
    /// Outside `Enabled` mode the new version becomes the virtual version and
    /// the one it replaces is dropped from history.
    pub fn put_version(&mut self, key: &str, version: ObjectVersion) -> PutOutcome {
        let bind_virtual = !self.versioning.is_enabled();
        let entry = self.objects.entry(key.to_owned()).or_default();
        let (version_id, retired) = entry.push(version, bind_virtual);
        PutOutcome {
            version_id,
            retired: retired.and_then(|v| v.content_id),
        }
    }

    /// Hard-delete one version of `key`.
    ///
    /// Returns the removed version. The key disappears with its last version.
    ///
    /// # Errors
    ///
    /// [`S3ServiceError::NoSuchKey`] when the key is unknown,
    /// [`S3ServiceError::NoSuchVersion`] when the id does not resolve.
    pub fn delete_version(&mut self, key: &str, version_id: &str) -> S3ServiceResult<ObjectVersion> {
        let entry = self.object_mut(key)?;
        let removed = entry.remove(key, version_id)?;
        if entry.is_empty() {
            self.objects.remove(key);
        }
        Ok(removed)
    }

    /// Register a new upload.
    pub fn insert_upload(&mut self, upload: MultipartUpload) {
        self.uploads
            .entry(upload.key.clone())
            .or_default()
            .insert(upload.upload_id.clone(), upload);
    }

    /// Look up an in-flight upload.
    ///
    /// # Errors
    ///
    /// [`S3ServiceError::NoSuchUpload`] when `(key, upload_id)` is unknown.
    pub fn upload(&self, key: &str, upload_id: &str) -> S3ServiceResult<&MultipartUpload> {
        self.uploads
            .get(key)
            .and_then(|m| m.get(upload_id))
            .ok_or_else(|| S3ServiceError::NoSuchUpload {
                upload_id: upload_id.to_owned(),
            })
    }

    /// Mutable variant of [`Self::upload`].
    pub fn upload_mut(&mut self, key: &str, upload_id: &str) -> S3ServiceResult<&mut MultipartUpload> {
        self.uploads
            .get_mut(key)
            .and_then(|m| m.get_mut(upload_id))
            .ok_or_else(|| S3ServiceError::NoSuchUpload {
                upload_id: upload_id.to_owned(),
            })
    }

    /// Remove an upload, dropping the per-key map with its last upload.
    pub fn remove_upload(&mut self, key: &str, upload_id: &str) -> Option<MultipartUpload> {
        let per_key = self.uploads.get_mut(key)?;
        let removed = per_key.remove(upload_id);
        if per_key.is_empty() {
            self.uploads.remove(key);
        }
        removed
    }
}

// ---------------------------------------------------------------------------
// S3Bucket
// ---------------------------------------------------------------------------

/// A bucket: immutable identity plus lock-guarded [`BucketState`].
pub struct S3Bucket {
    /// The bucket name.
    pub name: String,
    /// When the bucket was created.
    pub creation_date: DateTime<Utc>,
    state: RwLock<BucketState>,
}

impl std::fmt::Debug for S3Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("S3Bucket")
            .field("name", &self.name)
            .field("creation_date", &self.creation_date)
            .field("versioning", &state.versioning)
            .field("objects", &state.objects.len())
            .field("uploads", &state.uploads.len())
            .finish_non_exhaustive()
    }
}

impl S3Bucket {
    /// Create an empty bucket with versioning unset.
    #[must_use]
    pub fn new(name: String) -> Self {
        Self::with_state(name, Utc::now(), BucketState::default())
    }

    /// Re-create a bucket from previously captured state.
    #[must_use]
    pub fn with_state(name: String, creation_date: DateTime<Utc>, state: BucketState) -> Self {
        Self {
            name,
            creation_date,
            state: RwLock::new(BucketState {
                deleted: false,
                ..state
            }),
        }
    }

    /// Take the shared lock.
    ///
    /// # Errors
    ///
    /// [`S3ServiceError::NoSuchBucket`] if the bucket was deleted while the
    /// caller held a handle to it.
    pub fn read(&self) -> S3ServiceResult<RwLockReadGuard<'_, BucketState>> {
        let guard = self.state.read();
        if guard.deleted {
            return Err(self.gone());
        }
        Ok(guard)
    }

    /// Take the exclusive lock. Fails like [`Self::read`].
    pub fn write(&self) -> S3ServiceResult<RwLockWriteGuard<'_, BucketState>> {
        let guard = self.state.write();
        if guard.deleted {
            return Err(self.gone());
        }
        Ok(guard)
    }

    /// Current versioning mode.
    pub fn versioning(&self) -> S3ServiceResult<VersioningStatus> {
        Ok(self.read()?.versioning)
    }

    /// Change the versioning mode.
    ///
    /// Once configured a bucket never returns to [`VersioningStatus::Unset`].
    pub fn set_versioning(&self, status: VersioningStatus) -> S3ServiceResult<()> {
        let mut state = self.write()?;
        if state.versioning != status {
            debug!(bucket = %self.name, from = ?state.versioning, to = ?status, "changing versioning");
            state.versioning = status;
        }
        Ok(())
    }

    /// Mark the bucket deleted if it holds no live data.
    ///
    /// # Errors
    ///
    /// [`S3ServiceError::BucketNotEmpty`] when content or uploads remain.
    pub fn mark_deleted(&self) -> S3ServiceResult<()> {
        let mut state = self.write()?;
        if state.has_live_data() {
            return Err(S3ServiceError::BucketNotEmpty {
                bucket: self.name.clone(),
            });
        }
        state.deleted = true;
        state.objects.clear();
        Ok(())
    }

    /// Mark the bucket deleted regardless of its contents and hand back
    /// every content id it referenced.
    pub fn purge(&self) -> Vec<ContentId> {
        let mut state = self.state.write();
        state.deleted = true;
        let objects = std::mem::take(&mut state.objects);
        let uploads = std::mem::take(&mut state.uploads);
        objects
            .into_values()
            .flat_map(ObjectEntry::into_content_ids)
            .chain(
                uploads
                    .into_values()
                    .flat_map(BTreeMap::into_values)
                    .flat_map(|u| u.content_ids()),
            )
            .collect()
    }

    /// A consistent copy of the bucket state for persistence.
    pub fn snapshot(&self) -> S3ServiceResult<BucketState> {
        Ok(self.read()?.clone())
    }

    fn gone(&self) -> S3ServiceError {
        S3ServiceError::NoSuchBucket {
            bucket: self.name.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
