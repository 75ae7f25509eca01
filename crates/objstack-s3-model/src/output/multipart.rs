//! Multipart upload operation outputs.

use crate::types::Part;

/// S3 CreateMultipartUploadOutput.
#[derive(Debug, Clone, Default)]
pub struct CreateMultipartUploadOutput {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
}

/// S3 UploadPartOutput.
#[derive(Debug, Clone, Default)]
pub struct UploadPartOutput {
    /// HTTP header: `ETag`.
    pub e_tag: String,
}

/// S3 ListPartsOutput.
#[derive(Debug, Clone, Default)]
pub struct ListPartsOutput {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
    pub part_number_marker: i32,
    pub next_part_number_marker: Option<i32>,
    pub max_parts: i32,
    pub is_truncated: bool,
    pub parts: Vec<Part>,
}

/// S3 CompleteMultipartUploadOutput.
#[derive(Debug, Clone, Default)]
pub struct CompleteMultipartUploadOutput {
    pub bucket: String,
    pub key: String,
    pub location: String,
    /// Composite ETag, `"<md5>-<part count>"`.
    pub e_tag: String,
    /// HTTP header: `x-amz-version-id`.
    pub version_id: String,
}
