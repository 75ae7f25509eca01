//! Bucket operation outputs.

use chrono::{DateTime, Utc};

use crate::types::{BucketSummary, BucketVersioningStatus};

/// S3 CreateBucketOutput.
#[derive(Debug, Clone, Default)]
pub struct CreateBucketOutput {
    /// HTTP header: `Location`.
    pub location: String,
}

/// S3 HeadBucketOutput.
#[derive(Debug, Clone, Default)]
pub struct HeadBucketOutput {
    pub creation_date: DateTime<Utc>,
}

/// S3 ListBucketsOutput.
#[derive(Debug, Clone, Default)]
pub struct ListBucketsOutput {
    /// Sorted by bucket name.
    pub buckets: Vec<BucketSummary>,
}

/// S3 GetBucketVersioningOutput.
///
/// `status` is `None` for a bucket that never had versioning configured.
#[derive(Debug, Clone, Default)]
pub struct GetBucketVersioningOutput {
    pub status: Option<BucketVersioningStatus>,
}
