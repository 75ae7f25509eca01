//! Multipart upload state.
//!
//! Tracks in-progress multipart uploads and their constituent parts. Each
//! [`MultipartUpload`] captures the metadata provided at initiation time and
//! accumulates [`UploadPart`] entries as they are uploaded.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use objstack_s3_model::Tag;
use serde::{Deserialize, Serialize};

use crate::storage::ContentId;

/// An in-progress multipart upload.
///
/// Created by `CreateMultipartUpload` and consumed by either
/// `CompleteMultipartUpload` or `AbortMultipartUpload`. Metadata captured at
/// creation is applied to the final object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipartUpload {
    /// Unique identifier for this upload.
    pub upload_id: String,
    /// The object key that this upload will create.
    pub key: String,
    /// When the upload was initiated.
    pub initiated: DateTime<Utc>,
    /// MIME type of the final object.
    pub content_type: String,
    /// `x-amz-meta-*` pairs of the final object.
    #[serde(default)]
    pub user_metadata: HashMap<String, String>,
    /// Tags of the final object.
    #[serde(default)]
    pub tagging: Vec<Tag>,
    /// Parts uploaded so far, keyed by part number (1-based).
    pub parts: BTreeMap<u32, UploadPart>,
}

impl MultipartUpload {
    /// Create a new multipart upload with no parts.
    #[must_use]
    pub fn new(upload_id: String, key: String, content_type: String) -> Self {
        Self {
            upload_id,
            key,
            initiated: Utc::now(),
            content_type,
            user_metadata: HashMap::new(),
            tagging: Vec::new(),
            parts: BTreeMap::new(),
        }
    }

    /// Insert or replace a part, returning the replaced one.
    pub fn put_part(&mut self, part: UploadPart) -> Option<UploadPart> {
        self.parts.insert(part.part_number, part)
    }

    /// Get a part by its number.
    #[must_use]
    pub fn get_part(&self, part_number: u32) -> Option<&UploadPart> {
        self.parts.get(&part_number)
    }

    /// Return the total number of parts uploaded so far.
    #[must_use]
    pub fn parts_count(&self) -> usize {
        self.parts.len()
    }

    /// Compute the total size of all uploaded parts.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.parts.values().map(|p| p.size).sum()
    }

    /// Content references of every stored part.
    #[must_use]
    pub fn content_ids(&self) -> Vec<ContentId> {
        self.parts.values().map(|p| p.content_id.clone()).collect()
    }
}

/// A single part within a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPart {
    /// The part number (1-based, up to 10 000).
    pub part_number: u32,
    /// Reference into the content store.
    pub content_id: ContentId,
    /// Size of this part in bytes.
    pub size: u64,
    /// The entity tag for this part (quoted hex MD5).
    pub etag: String,
    /// When this part was last uploaded.
    pub last_modified: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
