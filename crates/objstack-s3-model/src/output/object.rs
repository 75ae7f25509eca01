//! Object operation outputs.

use std::collections::HashMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::types::{DeleteError, DeletedObject, Tag};

/// S3 PutObjectOutput.
#[derive(Debug, Clone, Default)]
pub struct PutObjectOutput {
    /// HTTP header: `ETag`.
    pub e_tag: String,
    /// HTTP header: `x-amz-version-id`. `"null"` outside enabled buckets.
    pub version_id: String,
    pub last_modified: DateTime<Utc>,
}

/// S3 GetObjectOutput.
///
/// When the resolved version is a delete marker, `delete_marker` is set and
/// `body` is `None`.
#[derive(Debug, Clone, Default)]
pub struct GetObjectOutput {
    pub body: Option<Bytes>,
    pub delete_marker: bool,
    pub version_id: String,
    pub e_tag: String,
    pub content_length: u64,
    pub content_type: String,
    pub last_modified: DateTime<Utc>,
    pub metadata: HashMap<String, String>,
    /// HTTP header: `x-amz-tagging-count`.
    pub tag_count: usize,
}

/// S3 HeadObjectOutput.
#[derive(Debug, Clone, Default)]
pub struct HeadObjectOutput {
    pub delete_marker: bool,
    pub version_id: String,
    pub e_tag: String,
    pub content_length: u64,
    pub content_type: String,
    pub last_modified: DateTime<Utc>,
    pub metadata: HashMap<String, String>,
}

/// S3 DeleteObjectOutput.
#[derive(Debug, Clone, Default)]
pub struct DeleteObjectOutput {
    /// HTTP header: `x-amz-delete-marker`.
    pub delete_marker: bool,
    /// HTTP header: `x-amz-version-id`.
    pub version_id: String,
}

/// S3 DeleteObjectsOutput.
#[derive(Debug, Clone, Default)]
pub struct DeleteObjectsOutput {
    /// Empty in quiet mode.
    pub deleted: Vec<DeletedObject>,
    pub errors: Vec<DeleteError>,
}

/// S3 CopyObjectOutput.
#[derive(Debug, Clone, Default)]
pub struct CopyObjectOutput {
    pub e_tag: String,
    pub last_modified: DateTime<Utc>,
    /// Version id of the new destination object.
    pub version_id: String,
    /// HTTP header: `x-amz-copy-source-version-id`.
    pub copy_source_version_id: String,
}

/// S3 GetObjectTaggingOutput.
#[derive(Debug, Clone, Default)]
pub struct GetObjectTaggingOutput {
    pub version_id: String,
    pub tag_set: Vec<Tag>,
}

/// S3 PutObjectTaggingOutput.
#[derive(Debug, Clone, Default)]
pub struct PutObjectTaggingOutput {
    pub version_id: String,
}

/// S3 DeleteObjectTaggingOutput.
#[derive(Debug, Clone, Default)]
pub struct DeleteObjectTaggingOutput {
    pub version_id: String,
}
