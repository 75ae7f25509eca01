//! Multipart upload handlers.
//!
//! Implements `create_multipart_upload`, `upload_part`, `list_parts`,
//! `complete_multipart_upload`, and `abort_multipart_upload`.
//!
//! An upload lives in its bucket's upload map from creation until it is
//! completed or aborted. Both consume it and release every stored part.

use std::ops::Bound;

use bytes::Bytes;
use chrono::Utc;
use objstack_s3_model::Part;
use objstack_s3_model::input::{
    AbortMultipartUploadInput, CompleteMultipartUploadInput, CreateMultipartUploadInput,
    ListPartsInput, UploadPartInput,
};
use objstack_s3_model::output::{
    CompleteMultipartUploadOutput, CreateMultipartUploadOutput, ListPartsOutput, UploadPartOutput,
};
use tracing::{debug, info};

use super::ObjectAttributes;
use crate::checksums::{compute_etag, compute_multipart_etag, etags_match};
use crate::error::{S3ServiceError, S3ServiceResult};
use crate::notify::ChangeKind;
use crate::provider::ObjStackS3;
use crate::state::{MultipartUpload, UploadPart};
use crate::storage::ContentId;
use crate::validation::{
    resolve_page_size, validate_metadata, validate_object_key, validate_part_number,
    validate_part_order, validate_tags,
};

impl ObjStackS3 {
    /// Start a multipart upload and return its id.
    ///
    /// Content type, user metadata and tags are recorded now and applied to
    /// the object on completion.
    pub fn handle_create_multipart_upload(
        &self,
        input: CreateMultipartUploadInput,
    ) -> S3ServiceResult<CreateMultipartUploadOutput> {
        validate_object_key(&input.key)?;
        validate_metadata(&input.metadata)?;
        validate_tags(&input.tagging)?;

        let bucket = self.state.bucket(&input.bucket)?;
        let mut upload = MultipartUpload::new(
            self.ids.upload_id(),
            input.key.clone(),
            self.content_type_or_default(input.content_type),
        );
        upload.user_metadata = input.metadata;
        upload.tagging = input.tagging;
        let upload_id = upload.upload_id.clone();

        bucket.write()?.insert_upload(upload);
        self.notify(&input.bucket, ChangeKind::Create);

        debug!(bucket = %input.bucket, key = %input.key, upload_id = %upload_id, "create_multipart_upload completed");
        Ok(CreateMultipartUploadOutput {
            bucket: input.bucket,
            key: input.key,
            upload_id,
        })
    }

    /// Store one part. Re-uploading a part number replaces the old part.
    ///
    /// # Errors
    ///
    /// - [`S3ServiceError::InvalidArgument`] for a part number outside `1..=10000`.
    /// - [`S3ServiceError::NoSuchUpload`] if the upload is unknown.
    pub fn handle_upload_part(&self, input: UploadPartInput) -> S3ServiceResult<UploadPartOutput> {
        let part_number = validate_part_number(input.part_number)?;
        let bucket = self.state.bucket(&input.bucket)?;
        bucket.read()?.upload(&input.key, &input.upload_id)?;

        let etag = compute_etag(&input.body);
        let size = input.body.len() as u64;
        let content_id = self.store.put(input.body)?;
        let part = UploadPart {
            part_number,
            content_id: content_id.clone(),
            size,
            etag: etag.clone(),
            last_modified: Utc::now(),
        };

        // The upload may have been completed or aborted since the check above.
        let replaced = match bucket
            .write()
            .and_then(|mut state| Ok(state.upload_mut(&input.key, &input.upload_id)?.put_part(part)))
        {
            Ok(replaced) => replaced,
            Err(e) => {
                self.store.delete(&content_id);
                return Err(e);
            }
        };
        self.release(replaced.map(|old| old.content_id));
        self.notify(&input.bucket, ChangeKind::Update);

        debug!(
            bucket = %input.bucket,
            key = %input.key,
            upload_id = %input.upload_id,
            part_number,
            size,
            "upload_part completed"
        );
        Ok(UploadPartOutput { e_tag: etag })
    }

    /// List the parts of an upload in part-number order.
    ///
    /// The page covers part numbers in `(part_number_marker,
    /// part_number_marker + max_parts]`.
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn handle_list_parts(&self, input: ListPartsInput) -> S3ServiceResult<ListPartsOutput> {
        let marker = match input.part_number_marker {
            None => 0,
            Some(m) => u32::try_from(m).map_err(|_| {
                S3ServiceError::invalid_argument("part-number-marker must be a non-negative integer")
            })?,
        };
        let max_parts = resolve_page_size(input.max_parts, self.config.max_keys_limit, "max-parts")?;
        let upper = marker.saturating_add(u32::try_from(max_parts).unwrap_or(u32::MAX));

        let bucket = self.state.bucket(&input.bucket)?;
        let state = bucket.read()?;
        let upload = state.upload(&input.key, &input.upload_id)?;

        let window: Vec<&UploadPart> = if max_parts == 0 {
            Vec::new()
        } else {
            upload
                .parts
                .range((Bound::Excluded(marker), Bound::Included(upper)))
                .map(|(_, part)| part)
                .collect()
        };
        let last_stored = upload.parts.keys().next_back().copied();
        let (is_truncated, next_marker) = match window.last() {
            Some(last) => (
                last_stored.is_some_and(|n| n > last.part_number),
                Some(last.part_number),
            ),
            None if max_parts > 0 && last_stored.is_some_and(|n| n > upper) => (true, Some(upper)),
            None => (false, None),
        };

        let parts = window
            .into_iter()
            .map(|part| Part {
                part_number: part.part_number,
                e_tag: part.etag.clone(),
                size: part.size,
                last_modified: part.last_modified,
            })
            .collect();

        Ok(ListPartsOutput {
            bucket: input.bucket,
            key: input.key,
            upload_id: input.upload_id,
            part_number_marker: marker as i32,
            next_part_number_marker: next_marker.map(|n| n as i32),
            max_parts: max_parts as i32,
            is_truncated,
            parts,
        })
    }

    /// Assemble the listed parts into a new object version.
    ///
    /// Every part is checked before any bytes are read. On success the
    /// upload is removed and all of its parts are released, including those
    /// the request did not reference.
    ///
    /// # Errors
    ///
    /// - [`S3ServiceError::MalformedXml`] for an empty part list.
    /// - [`S3ServiceError::InvalidPartOrder`] unless part numbers strictly ascend.
    /// - [`S3ServiceError::NoSuchUpload`] if the upload is unknown.
    /// - [`S3ServiceError::InvalidPart`] for a missing part or an ETag mismatch.
    pub fn handle_complete_multipart_upload(
        &self,
        input: CompleteMultipartUploadInput,
    ) -> S3ServiceResult<CompleteMultipartUploadOutput> {
        validate_part_order(&input.parts)?;
        let bucket = self.state.bucket(&input.bucket)?;

        let (version_id, etag, released) = {
            let mut state = bucket.write()?;
            let upload = state.upload(&input.key, &input.upload_id)?;

            let mut etags = Vec::with_capacity(input.parts.len());
            let mut content_ids = Vec::with_capacity(input.parts.len());
            for requested in &input.parts {
                let part = upload
                    .get_part(requested.part_number)
                    .filter(|part| {
                        requested
                            .e_tag
                            .as_deref()
                            .is_none_or(|expected| etags_match(expected, &part.etag))
                    })
                    .ok_or(S3ServiceError::InvalidPart {
                        part_number: requested.part_number,
                    })?;
                etags.push(part.etag.as_str());
                content_ids.push(&part.content_id);
            }

            let chunks = content_ids
                .iter()
                .map(|id| self.store.get(id))
                .collect::<S3ServiceResult<Vec<Bytes>>>()?;
            let etag = compute_multipart_etag(&etags);
            let attrs = ObjectAttributes {
                content_type: upload.content_type.clone(),
                user_metadata: upload.user_metadata.clone(),
                tagging: upload.tagging.clone(),
            };
            let version = self.stage_version(Bytes::from(chunks.concat()), etag.clone(), attrs)?;

            let outcome = state.put_version(&input.key, version);
            let mut released: Vec<ContentId> = outcome.retired.into_iter().collect();
            if let Some(upload) = state.remove_upload(&input.key, &input.upload_id) {
                released.extend(upload.content_ids());
            }
            (outcome.version_id, etag, released)
        };
        self.release(released);
        self.notify(&input.bucket, ChangeKind::Create);

        info!(
            bucket = %input.bucket,
            key = %input.key,
            upload_id = %input.upload_id,
            parts = input.parts.len(),
            version_id = %version_id,
            "multipart upload completed"
        );
        Ok(CompleteMultipartUploadOutput {
            location: format!("/{}/{}", input.bucket, input.key),
            bucket: input.bucket,
            key: input.key,
            e_tag: etag,
            version_id,
        })
    }

    /// Abort an upload and release its parts. Unknown uploads are ignored.
    pub fn handle_abort_multipart_upload(
        &self,
        input: AbortMultipartUploadInput,
    ) -> S3ServiceResult<()> {
        let bucket = self.state.bucket(&input.bucket)?;
        let removed = bucket.write()?.remove_upload(&input.key, &input.upload_id);

        match removed {
            Some(upload) => {
                self.release(upload.content_ids());
                self.notify(&input.bucket, ChangeKind::Delete);
                debug!(bucket = %input.bucket, key = %input.key, upload_id = %input.upload_id, "abort_multipart_upload completed");
            }
            None => {
                debug!(bucket = %input.bucket, key = %input.key, upload_id = %input.upload_id, "abort of unknown upload ignored");
            }
        }
        Ok(())
    }
}
