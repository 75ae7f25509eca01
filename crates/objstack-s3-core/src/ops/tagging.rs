//! Object tagging handlers.
//!
//! Tags are the only part of a version that changes after it is written.

use objstack_s3_model::Tag;
use objstack_s3_model::input::{
    DeleteObjectTaggingInput, GetObjectTaggingInput, PutObjectTaggingInput,
};
use objstack_s3_model::output::{
    DeleteObjectTaggingOutput, GetObjectTaggingOutput, PutObjectTaggingOutput,
};
use tracing::debug;

use crate::error::{S3ServiceError, S3ServiceResult};
use crate::notify::ChangeKind;
use crate::provider::ObjStackS3;
use crate::validation::validate_tags;

impl ObjStackS3 {
    /// Return the tag set of the resolved version.
    ///
    /// # Errors
    ///
    /// [`S3ServiceError::MethodNotAllowed`] when the version is a delete marker.
    pub fn handle_get_object_tagging(
        &self,
        input: GetObjectTaggingInput,
    ) -> S3ServiceResult<GetObjectTaggingOutput> {
        let bucket = self.state.bucket(&input.bucket)?;
        let state = bucket.read()?;
        let (version_id, version) = state.resolve(&input.key, input.version_id.as_deref())?;
        if version.is_delete_marker {
            return Err(S3ServiceError::MethodNotAllowed);
        }
        Ok(GetObjectTaggingOutput {
            version_id,
            tag_set: version.tagging.clone(),
        })
    }

    /// Replace the tag set of the resolved version.
    pub fn handle_put_object_tagging(
        &self,
        input: PutObjectTaggingInput,
    ) -> S3ServiceResult<PutObjectTaggingOutput> {
        validate_tags(&input.tag_set)?;
        let version_id = self.replace_tags(
            &input.bucket,
            &input.key,
            input.version_id.as_deref(),
            input.tag_set,
        )?;
        Ok(PutObjectTaggingOutput { version_id })
    }

    /// Clear the tag set of the resolved version.
    pub fn handle_delete_object_tagging(
        &self,
        input: DeleteObjectTaggingInput,
    ) -> S3ServiceResult<DeleteObjectTaggingOutput> {
        let version_id = self.replace_tags(
            &input.bucket,
            &input.key,
            input.version_id.as_deref(),
            Vec::new(),
        )?;
        Ok(DeleteObjectTaggingOutput { version_id })
    }

    fn replace_tags(
        &self,
        bucket_name: &str,
        key: &str,
        version_id: Option<&str>,
        tags: Vec<Tag>,
    ) -> S3ServiceResult<String> {
        let bucket = self.state.bucket(bucket_name)?;
        let display_id = {
            let mut state = bucket.write()?;
            let entry = state.object_mut(key)?;
            let current = entry.resolve(key, version_id)?;
            if current.is_delete_marker {
                return Err(S3ServiceError::MethodNotAllowed);
            }
            let display_id = entry.display_id(current);
            entry.resolve_mut(key, version_id)?.tagging = tags;
            display_id
        };
        self.notify(bucket_name, ChangeKind::Update);

        debug!(bucket = %bucket_name, key = %key, version_id = %display_id, "object tagging updated");
        Ok(display_id)
    }
}
