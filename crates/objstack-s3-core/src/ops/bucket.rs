//! Bucket operation handlers.
//!
//! Implements `create_bucket`, `delete_bucket`, `head_bucket`, `list_buckets`,
//! `get_bucket_versioning`, and `put_bucket_versioning`.

use objstack_s3_model::BucketSummary;
use objstack_s3_model::input::{
    CreateBucketInput, DeleteBucketInput, GetBucketVersioningInput, HeadBucketInput,
    PutBucketVersioningInput,
};
use objstack_s3_model::output::{
    CreateBucketOutput, GetBucketVersioningOutput, HeadBucketOutput, ListBucketsOutput,
};
use tracing::debug;

use crate::error::S3ServiceResult;
use crate::notify::ChangeKind;
use crate::provider::ObjStackS3;
use crate::state::VersioningStatus;
use crate::validation::validate_bucket_name;

impl ObjStackS3 {
    /// Create a new bucket with versioning unset.
    ///
    /// # Errors
    ///
    /// - [`crate::S3ServiceError::InvalidBucketName`] for a malformed name.
    /// - [`crate::S3ServiceError::BucketAlreadyExists`] if the name is taken.
    pub fn handle_create_bucket(
        &self,
        input: CreateBucketInput,
    ) -> S3ServiceResult<CreateBucketOutput> {
        let bucket_name = input.bucket;
        validate_bucket_name(&bucket_name)?;

        self.state.create_bucket(&bucket_name)?;
        self.notify(&bucket_name, ChangeKind::Create);

        debug!(bucket = %bucket_name, "create_bucket completed");
        Ok(CreateBucketOutput {
            location: format!("/{bucket_name}"),
        })
    }

    /// Delete a bucket that holds no content and no in-flight uploads.
    ///
    /// Keys left with only delete markers are discarded along with it.
    pub fn handle_delete_bucket(&self, input: DeleteBucketInput) -> S3ServiceResult<()> {
        let bucket_name = input.bucket;
        self.state.delete_bucket(&bucket_name)?;
        self.notify(&bucket_name, ChangeKind::Delete);

        debug!(bucket = %bucket_name, "delete_bucket completed");
        Ok(())
    }

    /// Check that a bucket exists.
    pub fn handle_head_bucket(&self, input: HeadBucketInput) -> S3ServiceResult<HeadBucketOutput> {
        let bucket = self.state.bucket(&input.bucket)?;
        Ok(HeadBucketOutput {
            creation_date: bucket.creation_date,
        })
    }

    /// List every bucket, sorted by name.
    #[must_use]
    pub fn handle_list_buckets(&self) -> ListBucketsOutput {
        let buckets = self
            .state
            .list_buckets()
            .into_iter()
            .map(|(name, creation_date)| BucketSummary {
                name,
                creation_date,
            })
            .collect();
        ListBucketsOutput { buckets }
    }

    /// Report the bucket's versioning status; `None` if it was never set.
    pub fn handle_get_bucket_versioning(
        &self,
        input: GetBucketVersioningInput,
    ) -> S3ServiceResult<GetBucketVersioningOutput> {
        let bucket = self.state.bucket(&input.bucket)?;
        Ok(GetBucketVersioningOutput {
            status: bucket.versioning()?.to_model(),
        })
    }

    /// Enable or suspend versioning.
    ///
    /// A bucket never returns to the unset state.
    pub fn handle_put_bucket_versioning(
        &self,
        input: PutBucketVersioningInput,
    ) -> S3ServiceResult<()> {
        let bucket = self.state.bucket(&input.bucket)?;
        bucket.set_versioning(VersioningStatus::from(input.status))?;
        self.notify(&input.bucket, ChangeKind::Update);

        debug!(bucket = %input.bucket, status = input.status.as_str(), "put_bucket_versioning completed");
        Ok(())
    }
}
