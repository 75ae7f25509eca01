//! Object operation inputs.

use std::collections::HashMap;

use bytes::Bytes;

use crate::types::{MetadataDirective, ObjectIdentifier, Tag};

/// S3 PutObjectInput.
#[derive(Debug, Clone, Default)]
pub struct PutObjectInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// HTTP payload.
    pub body: Bytes,
    /// HTTP header: `Content-Type`.
    pub content_type: Option<String>,
    /// HTTP header: `Content-MD5` (base64).
    pub content_md5: Option<String>,
    /// HTTP headers: `x-amz-meta-*`.
    pub metadata: HashMap<String, String>,
    /// HTTP header: `x-amz-tagging`, already parsed.
    pub tagging: Vec<Tag>,
}

/// S3 GetObjectInput.
#[derive(Debug, Clone, Default)]
pub struct GetObjectInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// HTTP query: `versionId`.
    pub version_id: Option<String>,
}

/// S3 HeadObjectInput.
#[derive(Debug, Clone, Default)]
pub struct HeadObjectInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// HTTP query: `versionId`.
    pub version_id: Option<String>,
}

/// S3 DeleteObjectInput.
#[derive(Debug, Clone, Default)]
pub struct DeleteObjectInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// HTTP query: `versionId`.
    pub version_id: Option<String>,
}

/// S3 DeleteObjectsInput.
#[derive(Debug, Clone, Default)]
pub struct DeleteObjectsInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// XML body: `Delete/Object`.
    pub objects: Vec<ObjectIdentifier>,
    /// XML body: `Delete/Quiet`.
    pub quiet: bool,
}

/// S3 CopyObjectInput.
#[derive(Debug, Clone, Default)]
pub struct CopyObjectInput {
    /// HTTP label (URI path): destination bucket.
    pub bucket: String,
    /// HTTP label (URI path): destination key.
    pub key: String,
    /// HTTP header: `x-amz-copy-source`, bucket part.
    pub source_bucket: String,
    /// HTTP header: `x-amz-copy-source`, key part.
    pub source_key: String,
    /// HTTP header: `x-amz-copy-source`, `versionId` part.
    pub source_version_id: Option<String>,
    /// HTTP header: `x-amz-metadata-directive`.
    pub metadata_directive: Option<MetadataDirective>,
    /// HTTP header: `Content-Type`, used with `REPLACE`.
    pub content_type: Option<String>,
    /// HTTP headers: `x-amz-meta-*`, used with `REPLACE`.
    pub metadata: HashMap<String, String>,
    /// HTTP header: `x-amz-tagging`, used with `REPLACE`.
    pub tagging: Vec<Tag>,
}

/// S3 GetObjectTaggingInput.
#[derive(Debug, Clone, Default)]
pub struct GetObjectTaggingInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// HTTP query: `versionId`.
    pub version_id: Option<String>,
}

/// S3 PutObjectTaggingInput.
#[derive(Debug, Clone, Default)]
pub struct PutObjectTaggingInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// HTTP query: `versionId`.
    pub version_id: Option<String>,
    /// XML body: `Tagging/TagSet`.
    pub tag_set: Vec<Tag>,
}

/// S3 DeleteObjectTaggingInput.
#[derive(Debug, Clone, Default)]
pub struct DeleteObjectTaggingInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// HTTP query: `versionId`.
    pub version_id: Option<String>,
}
