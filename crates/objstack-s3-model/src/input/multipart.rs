//! Multipart upload operation inputs.

use std::collections::HashMap;

use bytes::Bytes;

use crate::types::{CompletedPart, Tag};

/// S3 CreateMultipartUploadInput.
#[derive(Debug, Clone, Default)]
pub struct CreateMultipartUploadInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// HTTP header: `Content-Type`.
    pub content_type: Option<String>,
    /// HTTP headers: `x-amz-meta-*`.
    pub metadata: HashMap<String, String>,
    /// HTTP header: `x-amz-tagging`, already parsed.
    pub tagging: Vec<Tag>,
}

/// S3 UploadPartInput.
#[derive(Debug, Clone, Default)]
pub struct UploadPartInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// HTTP query: `uploadId`.
    pub upload_id: String,
    /// HTTP query: `partNumber`.
    pub part_number: i32,
    /// HTTP payload.
    pub body: Bytes,
}

/// S3 ListPartsInput.
#[derive(Debug, Clone, Default)]
pub struct ListPartsInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// HTTP query: `uploadId`.
    pub upload_id: String,
    /// HTTP query: `max-parts`.
    pub max_parts: Option<i32>,
    /// HTTP query: `part-number-marker`.
    pub part_number_marker: Option<i32>,
}

/// S3 CompleteMultipartUploadInput.
#[derive(Debug, Clone, Default)]
pub struct CompleteMultipartUploadInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// HTTP query: `uploadId`.
    pub upload_id: String,
    /// XML body: `CompleteMultipartUpload/Part`, in request order.
    pub parts: Vec<CompletedPart>,
}

/// S3 AbortMultipartUploadInput.
#[derive(Debug, Clone, Default)]
pub struct AbortMultipartUploadInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// HTTP label (URI path).
    pub key: String,
    /// HTTP query: `uploadId`.
    pub upload_id: String,
}
