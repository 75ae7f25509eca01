//! List operation handlers.
//!
//! Implements `list_objects` (v1), `list_objects_v2`, `list_object_versions`,
//! and `list_multipart_uploads`. All four walk a key-sorted map with
//! [`KeyScan`] and cut the folded stream with [`paginate`]; they differ in
//! what a key expands to and how the next markers are reported.

use std::collections::BTreeMap;
use std::iter;
use std::ops::Bound;

use objstack_s3_model::input::{
    ListMultipartUploadsInput, ListObjectVersionsInput, ListObjectsInput, ListObjectsV2Input,
};
use objstack_s3_model::output::{
    ListMultipartUploadsOutput, ListObjectVersionsOutput, ListObjectsOutput, ListObjectsV2Output,
};
use objstack_s3_model::{
    CommonPrefix, DeleteMarkerEntry, EncodingType, MultipartUploadEntry, Object,
    ObjectVersion as VersionSummary,
};
use tracing::debug;

use crate::error::{S3ServiceError, S3ServiceResult};
use crate::provider::ObjStackS3;
use crate::state::{
    BucketState, KeyScan, ListEntry, MultipartUpload, ObjectEntry, ObjectVersion, common_prefix,
    paginate,
};
use crate::utils::{decode_continuation_token, encode_continuation_token, maybe_encode};
use crate::validation::{parse_encoding_type, resolve_page_size};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// The delimiter to fold on for `ListObjects`.
///
/// A delimiter that already occurs in the prefix is ignored, matching S3.
fn object_delimiter<'a>(prefix: &str, delimiter: Option<&'a str>) -> Option<&'a str> {
    delimiter.filter(|d| !d.is_empty() && !prefix.contains(d))
}

/// Whether `key` is listed on its own rather than folded into a prefix.
fn is_unfolded(key: &str, prefix: &str, delimiter: Option<&str>) -> bool {
    key.starts_with(prefix) && delimiter.is_none_or(|d| common_prefix(key, prefix, d).is_none())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Applies the requested `encoding-type` to response strings.
#[derive(Debug, Clone, Copy)]
struct Encoder(Option<EncodingType>);

impl Encoder {
    fn encode(self, value: &str) -> String {
        maybe_encode(value, self.0 == Some(EncodingType::Url))
    }

    fn encode_opt(self, value: Option<&str>) -> Option<String> {
        value.map(|v| self.encode(v))
    }

    fn prefixes(self, prefixes: Vec<String>) -> Vec<CommonPrefix> {
        prefixes
            .into_iter()
            .map(|p| CommonPrefix {
                prefix: self.encode(&p),
            })
            .collect()
    }

    fn wire_name(self) -> Option<String> {
        self.0.map(|e| e.as_str().to_owned())
    }
}

/// One page of live objects.
#[derive(Debug, Default)]
struct ObjectListing {
    contents: Vec<Object>,
    common_prefixes: Vec<String>,
    is_truncated: bool,
    /// Last key or common prefix of a truncated page.
    next_marker: Option<String>,
}

/// List the keys whose latest version carries content.
///
/// Keys are folded before delete markers are filtered, so a group made only
/// of deleted keys still reports its common prefix.
fn scan_objects(
    state: &BucketState,
    prefix: &str,
    delimiter: Option<&str>,
    marker: Option<&str>,
    max_keys: usize,
) -> ObjectListing {
    let entries = KeyScan::new(&state.objects, prefix, delimiter, marker).filter_map(|entry| {
        match entry {
            ListEntry::Item { key, value } => value
                .latest()
                .filter(|v| !v.is_delete_marker)
                .map(|value| ListEntry::Item { key, value }),
            ListEntry::CommonPrefix(cp) => Some(ListEntry::CommonPrefix(cp)),
        }
    });
    let page = paginate(entries, max_keys);

    let mut listing = ObjectListing {
        is_truncated: page.is_truncated,
        ..ObjectListing::default()
    };
    for entry in page.entries {
        match entry {
            ListEntry::Item { key, value } => {
                listing.next_marker = Some(key.to_owned());
                listing.contents.push(Object {
                    key: key.to_owned(),
                    last_modified: value.last_modified,
                    e_tag: value.etag.clone(),
                    size: value.size,
                });
            }
            ListEntry::CommonPrefix(cp) => {
                listing.next_marker = Some(cp.clone());
                listing.common_prefixes.push(cp);
            }
        }
    }
    if !listing.is_truncated {
        listing.next_marker = None;
    }
    listing
}

/// A row of the versions listing.
#[derive(Debug)]
enum VersionRow<'a> {
    Version {
        key: &'a str,
        entry: &'a ObjectEntry,
        version: &'a ObjectVersion,
    },
    CommonPrefix(String),
}

/// Every version of `entry`, newest first, as listing rows.
fn version_rows<'a>(
    key: &'a str,
    entry: &'a ObjectEntry,
    versions: impl Iterator<Item = &'a ObjectVersion> + 'a,
) -> impl Iterator<Item = VersionRow<'a>> + 'a {
    versions.map(move |version| VersionRow::Version {
        key,
        entry,
        version,
    })
}

/// Expand a scanned key into its whole history.
fn expand_versions(entry: ListEntry<'_, ObjectEntry>) -> Box<dyn Iterator<Item = VersionRow<'_>> + '_> {
    match entry {
        ListEntry::Item { key, value } => {
            Box::new(version_rows(key, value, value.iter_newest_first()))
        }
        ListEntry::CommonPrefix(cp) => Box::new(iter::once(VersionRow::CommonPrefix(cp))),
    }
}

/// A row of the uploads listing.
#[derive(Debug)]
enum UploadRow<'a> {
    Upload(&'a MultipartUpload),
    CommonPrefix(String),
}

/// Expand a scanned key into its uploads.
fn expand_uploads(
    entry: ListEntry<'_, BTreeMap<String, MultipartUpload>>,
) -> Box<dyn Iterator<Item = UploadRow<'_>> + '_> {
    match entry {
        ListEntry::Item { value, .. } => Box::new(value.values().map(UploadRow::Upload)),
        ListEntry::CommonPrefix(cp) => Box::new(iter::once(UploadRow::CommonPrefix(cp))),
    }
}

impl ObjStackS3 {
    /// List the live objects of a bucket (v1, marker based).
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn handle_list_objects(&self, input: ListObjectsInput) -> S3ServiceResult<ListObjectsOutput> {
        let encoder = Encoder(parse_encoding_type(input.encoding_type.as_deref())?);
        let max_keys = resolve_page_size(input.max_keys, self.config.max_keys_limit, "max-keys")?;
        let prefix = input.prefix.as_deref().unwrap_or_default();
        let delimiter = object_delimiter(prefix, input.delimiter.as_deref());
        let marker = non_empty(input.marker.as_deref());

        let bucket = self.state.bucket(&input.bucket)?;
        let state = bucket.read()?;
        let listing = scan_objects(&state, prefix, delimiter, marker, max_keys);
        drop(state);

        debug!(
            bucket = %input.bucket,
            prefix,
            count = listing.contents.len() + listing.common_prefixes.len(),
            is_truncated = listing.is_truncated,
            "list_objects completed"
        );
        Ok(ListObjectsOutput {
            name: input.bucket,
            prefix: encoder.encode_opt(input.prefix.as_deref()),
            delimiter: encoder.encode_opt(input.delimiter.as_deref()),
            marker: encoder.encode_opt(input.marker.as_deref()),
            next_marker: encoder.encode_opt(listing.next_marker.as_deref()),
            max_keys: max_keys as i32,
            is_truncated: listing.is_truncated,
            encoding_type: encoder.wire_name(),
            contents: listing
                .contents
                .into_iter()
                .map(|o| Object {
                    key: encoder.encode(&o.key),
                    ..o
                })
                .collect(),
            common_prefixes: encoder.prefixes(listing.common_prefixes),
        })
    }

    /// List the live objects of a bucket (v2, continuation-token based).
    ///
    /// A continuation token takes precedence over `start_after`.
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn handle_list_objects_v2(
        &self,
        input: ListObjectsV2Input,
    ) -> S3ServiceResult<ListObjectsV2Output> {
        let encoder = Encoder(parse_encoding_type(input.encoding_type.as_deref())?);
        let max_keys = resolve_page_size(input.max_keys, self.config.max_keys_limit, "max-keys")?;
        let prefix = input.prefix.as_deref().unwrap_or_default();
        let delimiter = object_delimiter(prefix, input.delimiter.as_deref());
        let resume_at = match non_empty(input.continuation_token.as_deref()) {
            Some(token) => Some(decode_continuation_token(token)?),
            None => non_empty(input.start_after.as_deref()).map(str::to_owned),
        };

        let bucket = self.state.bucket(&input.bucket)?;
        let state = bucket.read()?;
        let listing = scan_objects(&state, prefix, delimiter, resume_at.as_deref(), max_keys);
        drop(state);
        let key_count = listing.contents.len() + listing.common_prefixes.len();

        debug!(
            bucket = %input.bucket,
            prefix,
            key_count,
            is_truncated = listing.is_truncated,
            "list_objects_v2 completed"
        );
        Ok(ListObjectsV2Output {
            name: input.bucket,
            prefix: encoder.encode_opt(input.prefix.as_deref()),
            delimiter: encoder.encode_opt(input.delimiter.as_deref()),
            start_after: encoder.encode_opt(input.start_after.as_deref()),
            continuation_token: input.continuation_token,
            next_continuation_token: listing
                .next_marker
                .as_deref()
                .map(encode_continuation_token),
            key_count: key_count as i32,
            max_keys: max_keys as i32,
            is_truncated: listing.is_truncated,
            encoding_type: encoder.wire_name(),
            contents: listing
                .contents
                .into_iter()
                .map(|o| Object {
                    key: encoder.encode(&o.key),
                    ..o
                })
                .collect(),
            common_prefixes: encoder.prefixes(listing.common_prefixes),
        })
    }

    /// List every version and delete marker, keys ascending and each key's
    /// history newest first.
    ///
    /// # Errors
    ///
    /// [`S3ServiceError::InvalidArgument`] for a `version_id_marker` without a
    /// `key_marker`, or one that does not name a version of that key.
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn handle_list_object_versions(
        &self,
        input: ListObjectVersionsInput,
    ) -> S3ServiceResult<ListObjectVersionsOutput> {
        let encoder = Encoder(parse_encoding_type(input.encoding_type.as_deref())?);
        let max_keys = resolve_page_size(input.max_keys, self.config.max_keys_limit, "max-keys")?;
        let prefix = input.prefix.as_deref().unwrap_or_default();
        let delimiter = non_empty(input.delimiter.as_deref());
        let key_marker = non_empty(input.key_marker.as_deref());
        let version_id_marker = non_empty(input.version_id_marker.as_deref());
        if version_id_marker.is_some() && key_marker.is_none() {
            return Err(S3ServiceError::invalid_argument(
                "A version-id marker cannot be specified without a key marker.",
            ));
        }

        let bucket = self.state.bucket(&input.bucket)?;
        let state = bucket.read()?;

        // The rest of the marker key's history precedes the keys after it.
        let resumed: Vec<VersionRow<'_>> = match (key_marker, version_id_marker) {
            (Some(key), Some(version_id)) if is_unfolded(key, prefix, delimiter) => {
                match state.objects.get_key_value(key) {
                    Some((key, entry)) => {
                        let older = entry.iter_older_than(version_id).ok_or_else(|| {
                            S3ServiceError::invalid_argument(format!(
                                "Invalid version id specified: {version_id}"
                            ))
                        })?;
                        version_rows(key, entry, older).collect()
                    }
                    None => Vec::new(),
                }
            }
            _ => Vec::new(),
        };
        let rows = resumed.into_iter().chain(
            KeyScan::new(&state.objects, prefix, delimiter, key_marker).flat_map(expand_versions),
        );
        let page = paginate(rows, max_keys);

        let mut output = ListObjectVersionsOutput {
            name: input.bucket.clone(),
            prefix: encoder.encode_opt(input.prefix.as_deref()),
            delimiter: encoder.encode_opt(input.delimiter.as_deref()),
            key_marker: encoder.encode_opt(input.key_marker.as_deref()),
            version_id_marker: input.version_id_marker.clone(),
            max_keys: max_keys as i32,
            is_truncated: page.is_truncated,
            encoding_type: encoder.wire_name(),
            ..ListObjectVersionsOutput::default()
        };
        let mut last: Option<(String, Option<String>)> = None;
        let mut common_prefixes = Vec::new();
        for row in page.entries {
            match row {
                VersionRow::Version {
                    key,
                    entry,
                    version,
                } => {
                    let version_id = entry.display_id(version);
                    let is_latest = entry
                        .latest()
                        .is_some_and(|latest| latest.version_id == version.version_id);
                    last = Some((key.to_owned(), Some(version_id.clone())));
                    if version.is_delete_marker {
                        output.delete_markers.push(DeleteMarkerEntry {
                            key: encoder.encode(key),
                            version_id,
                            is_latest,
                            last_modified: version.last_modified,
                        });
                    } else {
                        output.versions.push(VersionSummary {
                            key: encoder.encode(key),
                            version_id,
                            is_latest,
                            last_modified: version.last_modified,
                            e_tag: version.etag.clone(),
                            size: version.size,
                        });
                    }
                }
                VersionRow::CommonPrefix(cp) => {
                    last = Some((cp.clone(), None));
                    common_prefixes.push(cp);
                }
            }
        }
        drop(state);

        output.common_prefixes = encoder.prefixes(common_prefixes);
        if let Some((key, version_id)) = last.filter(|_| output.is_truncated) {
            output.next_key_marker = Some(encoder.encode(&key));
            output.next_version_id_marker = version_id;
        }

        debug!(
            bucket = %input.bucket,
            prefix,
            versions = output.versions.len(),
            delete_markers = output.delete_markers.len(),
            is_truncated = output.is_truncated,
            "list_object_versions completed"
        );
        Ok(output)
    }

    /// List in-flight multipart uploads, keys ascending and upload ids
    /// ascending within a key.
    ///
    /// `upload_id_marker` only applies together with `key_marker`.
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn handle_list_multipart_uploads(
        &self,
        input: ListMultipartUploadsInput,
    ) -> S3ServiceResult<ListMultipartUploadsOutput> {
        let encoder = Encoder(parse_encoding_type(input.encoding_type.as_deref())?);
        let max_uploads =
            resolve_page_size(input.max_uploads, self.config.max_keys_limit, "max-uploads")?;
        let prefix = input.prefix.as_deref().unwrap_or_default();
        let delimiter = non_empty(input.delimiter.as_deref());
        let key_marker = non_empty(input.key_marker.as_deref());
        let upload_id_marker = key_marker.and(non_empty(input.upload_id_marker.as_deref()));

        let bucket = self.state.bucket(&input.bucket)?;
        let state = bucket.read()?;

        let resumed: Vec<UploadRow<'_>> = match (key_marker, upload_id_marker) {
            (Some(key), Some(upload_id)) if is_unfolded(key, prefix, delimiter) => state
                .uploads
                .get(key)
                .map(|uploads| {
                    uploads
                        .range::<str, _>((Bound::Excluded(upload_id), Bound::Unbounded))
                        .map(|(_, upload)| UploadRow::Upload(upload))
                        .collect()
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        let rows = resumed.into_iter().chain(
            KeyScan::new(&state.uploads, prefix, delimiter, key_marker).flat_map(expand_uploads),
        );
        let page = paginate(rows, max_uploads);

        let mut output = ListMultipartUploadsOutput {
            bucket: input.bucket.clone(),
            prefix: encoder.encode_opt(input.prefix.as_deref()),
            delimiter: encoder.encode_opt(input.delimiter.as_deref()),
            key_marker: encoder.encode_opt(input.key_marker.as_deref()),
            upload_id_marker: input.upload_id_marker.clone(),
            max_uploads: max_uploads as i32,
            is_truncated: page.is_truncated,
            encoding_type: encoder.wire_name(),
            ..ListMultipartUploadsOutput::default()
        };
        let mut last: Option<(String, Option<String>)> = None;
        let mut common_prefixes = Vec::new();
        for row in page.entries {
            match row {
                UploadRow::Upload(upload) => {
                    last = Some((upload.key.clone(), Some(upload.upload_id.clone())));
                    output.uploads.push(MultipartUploadEntry {
                        key: encoder.encode(&upload.key),
                        upload_id: upload.upload_id.clone(),
                        initiated: upload.initiated,
                    });
                }
                UploadRow::CommonPrefix(cp) => {
                    last = Some((cp.clone(), None));
                    common_prefixes.push(cp);
                }
            }
        }
        drop(state);

        output.common_prefixes = encoder.prefixes(common_prefixes);
        if let Some((key, upload_id)) = last.filter(|_| output.is_truncated) {
            output.next_key_marker = Some(encoder.encode(&key));
            output.next_upload_id_marker = upload_id;
        }

        debug!(
            bucket = %input.bucket,
            prefix,
            uploads = output.uploads.len(),
            is_truncated = output.is_truncated,
            "list_multipart_uploads completed"
        );
        Ok(output)
    }
}
