//! Validation for S3 requests.
//!
//! Shape checks that run before any state is touched: bucket names, object
//! keys, tags, user metadata, `Content-MD5`, part numbers and ordering, and
//! listing parameters. Existence checks live with the state they guard.
//!
//! Naming rules follow the
//! [Amazon S3 documentation](https://docs.aws.amazon.com/AmazonS3/latest/userguide/bucketnamingrules.html).

use std::collections::{HashMap, HashSet};
use std::hash::BuildHasher;
use std::net::Ipv4Addr;

use base64::Engine;
use md5::{Digest, Md5};
use objstack_s3_model::{CompletedPart, EncodingType, Tag};

use crate::error::S3ServiceError;

/// Maximum number of tags allowed on a single S3 object.
const MAX_TAGS: usize = 10;

/// Maximum length of a tag key in characters.
const MAX_TAG_KEY_LEN: usize = 128;

/// Maximum length of a tag value in characters.
const MAX_TAG_VALUE_LEN: usize = 256;

/// Maximum total size (in bytes) of all user-defined metadata keys and values.
const MAX_METADATA_SIZE: usize = 2048;

/// Maximum object key length in bytes.
const MAX_KEY_BYTES: usize = 1024;

/// Minimum bucket name length.
const MIN_BUCKET_NAME_LEN: usize = 3;

/// Maximum bucket name length.
const MAX_BUCKET_NAME_LEN: usize = 63;

/// Highest part number a multipart upload accepts.
pub const MAX_PART_NUMBER: u32 = 10_000;

/// Validate an S3 bucket name.
///
/// Rules:
/// - 3-63 characters long
/// - Only lowercase letters, numbers, hyphens, and dots
/// - Must start and end with a letter or number
/// - No consecutive dots (`..`)
/// - Not formatted as an IPv4 address (e.g. `192.168.0.1`)
/// - Must not start with `xn--`
/// - Must not end with `-s3alias`
///
/// # Errors
///
/// Returns [`S3ServiceError::InvalidBucketName`] if any rule is violated.
///
/// # Examples
///
/// ```
/// use objstack_s3_core::validation::validate_bucket_name;
///
/// assert!(validate_bucket_name("my-valid-bucket").is_ok());
/// assert!(validate_bucket_name("AB").is_err());
/// ```
pub fn validate_bucket_name(name: &str) -> Result<(), S3ServiceError> {
    let invalid = |reason: &str| S3ServiceError::InvalidBucketName {
        name: name.to_owned(),
        reason: reason.to_owned(),
    };
    let len = name.len();

    if !(MIN_BUCKET_NAME_LEN..=MAX_BUCKET_NAME_LEN).contains(&len) {
        return Err(invalid(&format!(
            "Bucket name must be between {MIN_BUCKET_NAME_LEN} and {MAX_BUCKET_NAME_LEN} characters long"
        )));
    }

    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'.')
    {
        return Err(invalid(
            "Bucket name must only contain lowercase letters, numbers, hyphens, and dots",
        ));
    }

    let is_alnum = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
    let bytes = name.as_bytes();
    if !is_alnum(bytes[0]) || !is_alnum(bytes[len - 1]) {
        return Err(invalid("Bucket name must start and end with a letter or number"));
    }

    if name.contains("..") {
        return Err(invalid("Bucket name must not contain consecutive dots"));
    }

    if name.parse::<Ipv4Addr>().is_ok() {
        return Err(invalid("Bucket name must not be formatted as an IP address"));
    }

    if name.starts_with("xn--") {
        return Err(invalid("Bucket name must not start with 'xn--'"));
    }

    if name.ends_with("-s3alias") {
        return Err(invalid("Bucket name must not end with '-s3alias'"));
    }

    Ok(())
}

/// Validate an S3 object key.
///
/// Keys must be 1-1024 bytes of UTF-8 (the latter enforced by `&str`).
///
/// # Errors
///
/// Returns [`S3ServiceError::InvalidArgument`] if the key is empty, or
/// [`S3ServiceError::KeyTooLong`] if it exceeds 1024 bytes.
///
/// # Examples
///
/// ```
/// use objstack_s3_core::validation::validate_object_key;
///
/// assert!(validate_object_key("photos/2024/image.jpg").is_ok());
/// assert!(validate_object_key("").is_err());
/// ```
pub fn validate_object_key(key: &str) -> Result<(), S3ServiceError> {
    if key.is_empty() {
        return Err(S3ServiceError::invalid_argument(
            "Object key must not be empty",
        ));
    }

    if key.len() > MAX_KEY_BYTES {
        return Err(S3ServiceError::KeyTooLong);
    }

    Ok(())
}

/// Validate a set of object tags.
///
/// Rules:
/// - Maximum of 10 tags
/// - Each key must be 1-128 characters and unique within the set
/// - Each value must be 0-256 characters
///
/// # Errors
///
/// Returns [`S3ServiceError::InvalidTag`] if any rule is violated.
///
/// # Examples
///
/// ```
/// use objstack_s3_core::validation::validate_tags;
/// use objstack_s3_model::Tag;
///
/// let tags = vec![Tag::new("env", "prod"), Tag::new("team", "backend")];
/// assert!(validate_tags(&tags).is_ok());
/// ```
pub fn validate_tags(tags: &[Tag]) -> Result<(), S3ServiceError> {
    let invalid = |message: String| S3ServiceError::InvalidTag { message };

    if tags.len() > MAX_TAGS {
        return Err(invalid(format!(
            "Object tags cannot be greater than {MAX_TAGS}, got {}",
            tags.len()
        )));
    }

    let mut seen = HashSet::with_capacity(tags.len());
    for tag in tags {
        let key_len = tag.key.chars().count();
        if key_len == 0 {
            return Err(invalid("Tag key must not be empty".to_owned()));
        }
        if key_len > MAX_TAG_KEY_LEN {
            return Err(invalid(format!(
                "Tag key must not exceed {MAX_TAG_KEY_LEN} characters, got {key_len}"
            )));
        }
        let value_len = tag.value.chars().count();
        if value_len > MAX_TAG_VALUE_LEN {
            return Err(invalid(format!(
                "Tag value must not exceed {MAX_TAG_VALUE_LEN} characters, got {value_len}"
            )));
        }
        if !seen.insert(tag.key.as_str()) {
            return Err(invalid(format!("Duplicate tag key: {}", tag.key)));
        }
    }

    Ok(())
}

/// Validate user-defined metadata.
///
/// The total size of all keys plus all values must not exceed 2 KB.
///
/// # Errors
///
/// Returns [`S3ServiceError::InvalidArgument`] if the total metadata size
/// exceeds the limit.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use objstack_s3_core::validation::validate_metadata;
///
/// let mut meta = HashMap::new();
/// meta.insert("color".to_owned(), "blue".to_owned());
/// assert!(validate_metadata(&meta).is_ok());
/// ```
pub fn validate_metadata<S: BuildHasher>(
    metadata: &HashMap<String, String, S>,
) -> Result<(), S3ServiceError> {
    let total_size: usize = metadata.iter().map(|(k, v)| k.len() + v.len()).sum();

    if total_size > MAX_METADATA_SIZE {
        return Err(S3ServiceError::invalid_argument(format!(
            "User-defined metadata must not exceed {MAX_METADATA_SIZE} bytes, got {total_size}"
        )));
    }

    Ok(())
}

/// Validate the `Content-MD5` header against the request body.
///
/// An absent header always passes.
///
/// # Errors
///
/// Returns [`S3ServiceError::InvalidDigest`] if the header value is not
/// a base64-encoded 16-byte digest, or [`S3ServiceError::BadDigest`] if the
/// digest does not match the body.
///
/// # Examples
///
/// ```
/// use objstack_s3_core::validation::validate_content_md5;
///
/// assert!(validate_content_md5(None, b"hello").is_ok());
/// assert!(validate_content_md5(Some("XUFAKrxLKna5cZ2REBfFkg=="), b"hello").is_ok());
/// ```
pub fn validate_content_md5(content_md5: Option<&str>, body: &[u8]) -> Result<(), S3ServiceError> {
    let Some(expected_b64) = content_md5 else {
        return Ok(());
    };

    let expected_bytes = base64::engine::general_purpose::STANDARD
        .decode(expected_b64)
        .map_err(|_| S3ServiceError::InvalidDigest)?;
    if expected_bytes.len() != 16 {
        return Err(S3ServiceError::InvalidDigest);
    }

    let actual = Md5::digest(body);
    if actual.as_slice() != expected_bytes.as_slice() {
        return Err(S3ServiceError::BadDigest);
    }

    Ok(())
}

/// Validate a part number and convert it to its stored form.
///
/// # Errors
///
/// Returns [`S3ServiceError::InvalidArgument`] outside `1..=10000`.
pub fn validate_part_number(part_number: i32) -> Result<u32, S3ServiceError> {
    u32::try_from(part_number)
        .ok()
        .filter(|n| (1..=MAX_PART_NUMBER).contains(n))
        .ok_or_else(|| {
            S3ServiceError::invalid_argument(format!(
                "Part number must be an integer between 1 and {MAX_PART_NUMBER}, inclusive"
            ))
        })
}

/// Validate the part list of a `CompleteMultipartUpload` request.
///
/// # Errors
///
/// Returns [`S3ServiceError::MalformedXml`] for an empty list and
/// [`S3ServiceError::InvalidPartOrder`] unless part numbers are strictly
/// ascending.
pub fn validate_part_order(parts: &[CompletedPart]) -> Result<(), S3ServiceError> {
    if parts.is_empty() {
        return Err(S3ServiceError::MalformedXml);
    }
    if parts
        .windows(2)
        .any(|w| w[0].part_number >= w[1].part_number)
    {
        return Err(S3ServiceError::InvalidPartOrder);
    }
    Ok(())
}

/// Resolve a `max-keys`-style page size.
///
/// `None` means `limit`; values above `limit` are clamped to it.
///
/// # Errors
///
/// Returns [`S3ServiceError::InvalidArgument`] for negative values.
pub fn resolve_page_size(
    value: Option<i32>,
    limit: usize,
    param: &str,
) -> Result<usize, S3ServiceError> {
    match value {
        None => Ok(limit),
        Some(v) => usize::try_from(v)
            .map(|v| v.min(limit))
            .map_err(|_| {
                S3ServiceError::invalid_argument(format!("{param} must be a non-negative integer"))
            }),
    }
}

/// Parse the `encoding-type` listing parameter.
///
/// # Errors
///
/// Returns [`S3ServiceError::InvalidArgument`] for anything but `url`.
pub fn parse_encoding_type(value: Option<&str>) -> Result<Option<EncodingType>, S3ServiceError> {
    value
        .map(|v| {
            v.parse::<EncodingType>()
                .map_err(|_| S3ServiceError::invalid_argument(format!("Invalid Encoding Method specified in Request: {v}")))
        })
        .transpose()
}
