//! Bucket operation inputs.

use crate::types::BucketVersioningStatus;

/// S3 CreateBucketInput.
#[derive(Debug, Clone, Default)]
pub struct CreateBucketInput {
    /// HTTP label (URI path).
    pub bucket: String,
}

/// S3 DeleteBucketInput.
#[derive(Debug, Clone, Default)]
pub struct DeleteBucketInput {
    /// HTTP label (URI path).
    pub bucket: String,
}

/// S3 HeadBucketInput.
#[derive(Debug, Clone, Default)]
pub struct HeadBucketInput {
    /// HTTP label (URI path).
    pub bucket: String,
}

/// S3 GetBucketVersioningInput.
#[derive(Debug, Clone, Default)]
pub struct GetBucketVersioningInput {
    /// HTTP label (URI path).
    pub bucket: String,
}

/// S3 PutBucketVersioningInput.
#[derive(Debug, Clone)]
pub struct PutBucketVersioningInput {
    /// HTTP label (URI path).
    pub bucket: String,
    /// XML body: `VersioningConfiguration/Status`.
    pub status: BucketVersioningStatus,
}
