//! Object operation handlers.
//!
//! Implements `put_object`, `get_object`, `head_object`, `delete_object`,
//! `delete_objects`, and `copy_object`.

use objstack_s3_model::input::{
    CopyObjectInput, DeleteObjectInput, DeleteObjectsInput, GetObjectInput, HeadObjectInput,
    PutObjectInput,
};
use objstack_s3_model::output::{
    CopyObjectOutput, DeleteObjectOutput, DeleteObjectsOutput, GetObjectOutput, HeadObjectOutput,
    PutObjectOutput,
};
use objstack_s3_model::{DeleteError, DeletedObject, MetadataDirective, ObjectIdentifier};
use tracing::debug;

use super::ObjectAttributes;
use crate::checksums::compute_etag;
use crate::error::{S3ServiceError, S3ServiceResult};
use crate::notify::ChangeKind;
use crate::provider::ObjStackS3;
use crate::state::{ObjectVersion, S3Bucket};
use crate::validation::{validate_content_md5, validate_metadata, validate_object_key, validate_tags};

/// Describe a resolved version without its body.
fn describe(version_id: String, version: &ObjectVersion) -> HeadObjectOutput {
    if version.is_delete_marker {
        return HeadObjectOutput {
            delete_marker: true,
            version_id,
            last_modified: version.last_modified,
            ..HeadObjectOutput::default()
        };
    }
    HeadObjectOutput {
        delete_marker: false,
        version_id,
        e_tag: version.etag.clone(),
        content_length: version.size,
        content_type: version.content_type.clone(),
        last_modified: version.last_modified,
        metadata: version.user_metadata.clone(),
    }
}

impl ObjStackS3 {
    /// Store an object as the new latest version of its key.
    ///
    /// In an enabled bucket the new version gets a fresh id. Otherwise it
    /// replaces the key's `"null"` version, whose content is released.
    ///
    /// # Errors
    ///
    /// Key, metadata, tag and `Content-MD5` validation errors, then
    /// [`S3ServiceError::NoSuchBucket`].
    pub fn handle_put_object(&self, input: PutObjectInput) -> S3ServiceResult<PutObjectOutput> {
        validate_object_key(&input.key)?;
        validate_metadata(&input.metadata)?;
        validate_tags(&input.tagging)?;
        validate_content_md5(input.content_md5.as_deref(), &input.body)?;

        let bucket = self.state.bucket(&input.bucket)?;
        let etag = compute_etag(&input.body);
        let attrs = ObjectAttributes {
            content_type: self.content_type_or_default(input.content_type),
            user_metadata: input.metadata,
            tagging: input.tagging,
        };
        let written = self.write_version(&bucket, &input.key, input.body, etag, attrs)?;
        self.notify(&input.bucket, ChangeKind::Create);

        debug!(
            bucket = %input.bucket,
            key = %input.key,
            version_id = %written.version_id,
            etag = %written.etag,
            "put_object completed"
        );
        Ok(PutObjectOutput {
            e_tag: written.etag,
            version_id: written.version_id,
            last_modified: written.last_modified,
        })
    }

    /// Read an object, its latest version or the one named by `version_id`.
    ///
    /// A delete marker resolves successfully with `delete_marker` set and no
    /// body; the transport decides how to render it.
    pub fn handle_get_object(&self, input: GetObjectInput) -> S3ServiceResult<GetObjectOutput> {
        let bucket = self.state.bucket(&input.bucket)?;
        let state = bucket.read()?;
        let (version_id, version) = state.resolve(&input.key, input.version_id.as_deref())?;

        let body = if version.is_delete_marker {
            None
        } else {
            Some(self.read_content(version)?)
        };
        let tag_count = version.tagging.len();
        let head = describe(version_id, version);
        drop(state);

        debug!(
            bucket = %input.bucket,
            key = %input.key,
            version_id = %head.version_id,
            delete_marker = head.delete_marker,
            "get_object completed"
        );
        Ok(GetObjectOutput {
            body,
            delete_marker: head.delete_marker,
            version_id: head.version_id,
            e_tag: head.e_tag,
            content_length: head.content_length,
            content_type: head.content_type,
            last_modified: head.last_modified,
            metadata: head.metadata,
            tag_count,
        })
    }

    /// Like [`Self::handle_get_object`] without opening the content store.
    pub fn handle_head_object(&self, input: HeadObjectInput) -> S3ServiceResult<HeadObjectOutput> {
        let bucket = self.state.bucket(&input.bucket)?;
        let state = bucket.read()?;
        let (version_id, version) = state.resolve(&input.key, input.version_id.as_deref())?;
        Ok(describe(version_id, version))
    }

    /// Delete an object.
    ///
    /// Without a version id a delete marker is added, even for a key that
    /// does not exist. With one the addressed version is removed outright and
    /// the key must exist.
    pub fn handle_delete_object(
        &self,
        input: DeleteObjectInput,
    ) -> S3ServiceResult<DeleteObjectOutput> {
        let bucket = self.state.bucket(&input.bucket)?;
        let output = self.delete_in_bucket(&bucket, &input.key, input.version_id.as_deref())?;
        self.notify(&input.bucket, ChangeKind::Delete);

        debug!(
            bucket = %input.bucket,
            key = %input.key,
            version_id = %output.version_id,
            delete_marker = output.delete_marker,
            "delete_object completed"
        );
        Ok(output)
    }

    /// Delete many objects, collecting a result per item.
    ///
    /// Only a missing bucket fails the whole call.
    pub fn handle_delete_objects(
        &self,
        input: DeleteObjectsInput,
    ) -> S3ServiceResult<DeleteObjectsOutput> {
        let bucket = self.state.bucket(&input.bucket)?;
        let mut output = DeleteObjectsOutput::default();
        let mut succeeded = 0usize;

        for ObjectIdentifier { key, version_id } in input.objects {
            match self.delete_in_bucket(&bucket, &key, version_id.as_deref()) {
                Ok(result) => {
                    succeeded += 1;
                    if !input.quiet {
                        output.deleted.push(DeletedObject {
                            key,
                            version_id,
                            delete_marker: result.delete_marker,
                            delete_marker_version_id: result
                                .delete_marker
                                .then_some(result.version_id),
                        });
                    }
                }
                Err(e) => {
                    debug!(bucket = %input.bucket, key = %key, error = %e, "delete_objects item failed");
                    output.errors.push(DeleteError {
                        key,
                        version_id,
                        code: e.code().to_owned(),
                        message: e.to_string(),
                    });
                }
            }
        }

        if succeeded > 0 {
            self.notify(&input.bucket, ChangeKind::Delete);
        }
        debug!(
            bucket = %input.bucket,
            deleted = succeeded,
            errors = output.errors.len(),
            "delete_objects completed"
        );
        Ok(output)
    }

    /// Copy a resolved source version into a destination key.
    ///
    /// The source is read under its bucket's shared lock, then written
    /// through the regular put path. The two steps are not atomic.
    pub fn handle_copy_object(&self, input: CopyObjectInput) -> S3ServiceResult<CopyObjectOutput> {
        validate_object_key(&input.key)?;
        let directive = input.metadata_directive.unwrap_or_default();
        if directive == MetadataDirective::Replace {
            validate_metadata(&input.metadata)?;
            validate_tags(&input.tagging)?;
        }

        let destination = self.state.bucket(&input.bucket)?;
        let source = self.state.bucket(&input.source_bucket)?;

        let (copy_source_version_id, body, source_attrs) = {
            let state = source.read()?;
            let source_version_id = input.source_version_id.as_deref();
            let (display_id, version) = state.resolve(&input.source_key, source_version_id)?;
            if version.is_delete_marker {
                return Err(match source_version_id {
                    Some(_) => S3ServiceError::MethodNotAllowed,
                    None => S3ServiceError::NoSuchKey {
                        key: input.source_key.clone(),
                    },
                });
            }
            (
                display_id,
                self.read_content(version)?,
                ObjectAttributes::of(version),
            )
        };

        let attrs = match directive {
            MetadataDirective::Copy => source_attrs,
            MetadataDirective::Replace => ObjectAttributes {
                content_type: self.content_type_or_default(input.content_type),
                user_metadata: input.metadata,
                tagging: input.tagging,
            },
        };
        let etag = compute_etag(&body);
        let written = self.write_version(&destination, &input.key, body, etag, attrs)?;
        self.notify(&input.bucket, ChangeKind::Create);

        debug!(
            source = %format!("{}/{}", input.source_bucket, input.source_key),
            bucket = %input.bucket,
            key = %input.key,
            version_id = %written.version_id,
            "copy_object completed"
        );
        Ok(CopyObjectOutput {
            e_tag: written.etag,
            last_modified: written.last_modified,
            version_id: written.version_id,
            copy_source_version_id,
        })
    }

    /// Shared body of the single and batch deletes. Does not notify.
    fn delete_in_bucket(
        &self,
        bucket: &S3Bucket,
        key: &str,
        version_id: Option<&str>,
    ) -> S3ServiceResult<DeleteObjectOutput> {
        validate_object_key(key)?;
        match version_id {
            None => {
                let marker = ObjectVersion::delete_marker(self.ids.version_id());
                let outcome = bucket.write()?.put_version(key, marker);
                self.release(outcome.retired);
                Ok(DeleteObjectOutput {
                    delete_marker: true,
                    version_id: outcome.version_id,
                })
            }
            Some(version_id) => {
                let removed = bucket.write()?.delete_version(key, version_id)?;
                let delete_marker = removed.is_delete_marker;
                self.release(removed.content_id);
                Ok(DeleteObjectOutput {
                    delete_marker,
                    version_id: version_id.to_owned(),
                })
            }
        }
    }
}
