//! Listing operation outputs.

use crate::types::{CommonPrefix, DeleteMarkerEntry, MultipartUploadEntry, Object, ObjectVersion};

/// S3 ListObjectsOutput.
#[derive(Debug, Clone, Default)]
pub struct ListObjectsOutput {
    pub name: String,
    pub prefix: Option<String>,
    pub delimiter: Option<String>,
    pub marker: Option<String>,
    /// Only set when the listing is truncated.
    pub next_marker: Option<String>,
    pub max_keys: i32,
    pub is_truncated: bool,
    pub encoding_type: Option<String>,
    pub contents: Vec<Object>,
    pub common_prefixes: Vec<CommonPrefix>,
}

/// S3 ListObjectsV2Output.
#[derive(Debug, Clone, Default)]
pub struct ListObjectsV2Output {
    pub name: String,
    pub prefix: Option<String>,
    pub delimiter: Option<String>,
    pub start_after: Option<String>,
    pub continuation_token: Option<String>,
    pub next_continuation_token: Option<String>,
    /// Objects plus common prefixes on this page.
    pub key_count: i32,
    pub max_keys: i32,
    pub is_truncated: bool,
    pub encoding_type: Option<String>,
    pub contents: Vec<Object>,
    pub common_prefixes: Vec<CommonPrefix>,
}

/// S3 ListObjectVersionsOutput.
#[derive(Debug, Clone, Default)]
pub struct ListObjectVersionsOutput {
    pub name: String,
    pub prefix: Option<String>,
    pub delimiter: Option<String>,
    pub key_marker: Option<String>,
    pub version_id_marker: Option<String>,
    pub next_key_marker: Option<String>,
    pub next_version_id_marker: Option<String>,
    pub max_keys: i32,
    pub is_truncated: bool,
    pub encoding_type: Option<String>,
    pub versions: Vec<ObjectVersion>,
    pub delete_markers: Vec<DeleteMarkerEntry>,
    pub common_prefixes: Vec<CommonPrefix>,
}

/// S3 ListMultipartUploadsOutput.
#[derive(Debug, Clone, Default)]
pub struct ListMultipartUploadsOutput {
    pub bucket: String,
    pub prefix: Option<String>,
    pub delimiter: Option<String>,
    pub key_marker: Option<String>,
    pub upload_id_marker: Option<String>,
    pub next_key_marker: Option<String>,
    pub next_upload_id_marker: Option<String>,
    pub max_uploads: i32,
    pub is_truncated: bool,
    pub encoding_type: Option<String>,
    pub uploads: Vec<MultipartUploadEntry>,
    pub common_prefixes: Vec<CommonPrefix>,
}
