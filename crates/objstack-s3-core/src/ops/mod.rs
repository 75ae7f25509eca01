//! S3 operation handlers.
//!
//! Each submodule exposes `handle_*` methods on [`crate::provider::ObjStackS3`],
//! taking a model input and returning a model output. Handlers validate shape
//! first, then resolve the bucket handle, then take the bucket lock for the
//! read-modify-write sequence. Content no longer referenced is released and
//! the change sink is notified only after the lock is dropped.

pub mod bucket;
pub mod list;
pub mod multipart;
pub mod object;
pub mod tagging;

use std::collections::HashMap;

use anyhow::anyhow;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use objstack_s3_model::Tag;

use crate::error::S3ServiceResult;
use crate::provider::ObjStackS3;
use crate::state::{NewContent, ObjectVersion, S3Bucket};

/// Attributes a write records alongside the bytes.
#[derive(Debug, Clone, Default)]
pub(crate) struct ObjectAttributes {
    pub content_type: String,
    pub user_metadata: HashMap<String, String>,
    pub tagging: Vec<Tag>,
}

impl ObjectAttributes {
    fn of(version: &ObjectVersion) -> Self {
        Self {
            content_type: version.content_type.clone(),
            user_metadata: version.user_metadata.clone(),
            tagging: version.tagging.clone(),
        }
    }
}

/// What a committed write reports back.
#[derive(Debug)]
pub(crate) struct WrittenVersion {
    /// `"null"` outside enabled buckets.
    pub version_id: String,
    pub etag: String,
    pub last_modified: DateTime<Utc>,
}

impl ObjStackS3 {
    /// Store `body` and build the version that will reference it.
    ///
    /// Nothing is committed to a bucket; the caller owns the content until
    /// the version is pushed.
    pub(crate) fn stage_version(
        &self,
        body: Bytes,
        etag: String,
        attrs: ObjectAttributes,
    ) -> S3ServiceResult<ObjectVersion> {
        let size = body.len() as u64;
        let content_id = self.store.put(body)?;
        Ok(ObjectVersion::with_content(
            self.ids.version_id(),
            NewContent {
                content_id,
                size,
                etag,
                content_type: attrs.content_type,
                user_metadata: attrs.user_metadata,
                tagging: attrs.tagging,
            },
        ))
    }

    /// Store `body` and commit it as the new latest version of `key`.
    ///
    /// The bytes are written before the bucket lock is taken and released
    /// again if the commit fails.
    pub(crate) fn write_version(
        &self,
        bucket: &S3Bucket,
        key: &str,
        body: Bytes,
        etag: String,
        attrs: ObjectAttributes,
    ) -> S3ServiceResult<WrittenVersion> {
        let version = self.stage_version(body, etag, attrs)?;
        let etag = version.etag.clone();
        let last_modified = version.last_modified;
        let content_id = version.content_id.clone();

        let outcome = match bucket.write() {
            Ok(mut state) => state.put_version(key, version),
            Err(e) => {
                self.release(content_id);
                return Err(e);
            }
        };
        self.release(outcome.retired);

        Ok(WrittenVersion {
            version_id: outcome.version_id,
            etag,
            last_modified,
        })
    }

    /// Read the bytes of a content-bearing version.
    pub(crate) fn read_content(&self, version: &ObjectVersion) -> S3ServiceResult<Bytes> {
        let content_id = version
            .content_id
            .as_ref()
            .ok_or_else(|| anyhow!("version {} carries no content", version.version_id))?;
        self.store.get(content_id)
    }

    /// The content type to record for a write.
    pub(crate) fn content_type_or_default(&self, content_type: Option<String>) -> String {
        content_type
            .filter(|ct| !ct.is_empty())
            .unwrap_or_else(|| self.config.default_content_type.clone())
    }
}
