//! Top-level S3 service state.
//!
//! [`S3ServiceState`] owns the bucket table and enforces bucket-name
//! uniqueness. The table is a `DashMap` of `Arc<S3Bucket>`: callers clone the
//! handle out of the map and only then take the bucket lock, so no map shard
//! is ever held while a bucket is locked.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info};

use super::bucket::{BucketState, S3Bucket};
use crate::error::{S3ServiceError, S3ServiceResult};

/// Top-level S3 service state holding all buckets.
pub struct S3ServiceState {
    /// Bucket name to bucket mapping.
    buckets: DashMap<String, Arc<S3Bucket>>,
}

impl std::fmt::Debug for S3ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3ServiceState")
            .field("bucket_count", &self.buckets.len())
            .finish_non_exhaustive()
    }
}

impl Default for S3ServiceState {
    fn default() -> Self {
        Self::new()
    }
}

impl S3ServiceState {
    /// Create a new, empty service state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: DashMap::new(),
        }
    }

    /// Create a new bucket.
    ///
    /// # Errors
    ///
    /// [`S3ServiceError::BucketAlreadyExists`] if the name is taken.
    pub fn create_bucket(&self, name: &str) -> S3ServiceResult<Arc<S3Bucket>> {
        self.install(name, || S3Bucket::new(name.to_owned()))
    }

    /// Re-install a bucket from persisted state.
    ///
    /// # Errors
    ///
    /// [`S3ServiceError::BucketAlreadyExists`] if the name is taken.
    pub fn restore_bucket(
        &self,
        name: &str,
        creation_date: DateTime<Utc>,
        state: BucketState,
    ) -> S3ServiceResult<Arc<S3Bucket>> {
        self.install(name, || {
            S3Bucket::with_state(name.to_owned(), creation_date, state)
        })
    }

    fn install(
        &self,
        name: &str,
        make: impl FnOnce() -> S3Bucket,
    ) -> S3ServiceResult<Arc<S3Bucket>> {
        match self.buckets.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(S3ServiceError::BucketAlreadyExists {
                bucket: name.to_owned(),
            }),
            Entry::Vacant(slot) => {
                let bucket = Arc::new(make());
                slot.insert(Arc::clone(&bucket));
                info!(bucket = %name, "bucket created");
                Ok(bucket)
            }
        }
    }

    /// Delete a bucket that holds no live data.
    ///
    /// # Errors
    ///
    /// - [`S3ServiceError::NoSuchBucket`] if the bucket does not exist.
    /// - [`S3ServiceError::BucketNotEmpty`] if the bucket still holds content
    ///   or in-progress multipart uploads.
    pub fn delete_bucket(&self, name: &str) -> S3ServiceResult<()> {
        let bucket = self.bucket(name)?;
        bucket.mark_deleted()?;
        self.buckets
            .remove_if(name, |_, current| Arc::ptr_eq(current, &bucket));
        info!(bucket = %name, "bucket deleted");
        Ok(())
    }

    /// Get a handle to a bucket.
    ///
    /// # Errors
    ///
    /// Returns [`S3ServiceError::NoSuchBucket`] if the bucket does not exist.
    pub fn bucket(&self, name: &str) -> S3ServiceResult<Arc<S3Bucket>> {
        self.buckets
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| S3ServiceError::NoSuchBucket {
                bucket: name.to_owned(),
            })
    }

    /// List all buckets, returning `(name, creation_date)` pairs sorted by name.
    #[must_use]
    pub fn list_buckets(&self) -> Vec<(String, DateTime<Utc>)> {
        let mut buckets: Vec<(String, DateTime<Utc>)> = self
            .buckets
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().creation_date))
            .collect();
        buckets.sort_by(|a, b| a.0.cmp(&b.0));
        buckets
    }

    /// Check whether a bucket exists.
    #[must_use]
    pub fn bucket_exists(&self, name: &str) -> bool {
        self.buckets.contains_key(name)
    }

    /// Reset all state, removing all buckets.
    pub fn reset(&self) {
        debug!("resetting all S3 service state");
        self.buckets.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
