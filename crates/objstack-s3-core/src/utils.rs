//! Shared utilities for the S3 engine.
//!
//! Continuation-token encoding for `ListObjectsV2` and the `url` encoding
//! applied to listing responses.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::S3ServiceError;

/// Characters left untouched by the `url` listing encoding.
///
/// Matches the unreserved set of RFC 3986 plus `/`, which S3 keeps readable.
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

// ---------------------------------------------------------------------------
// Continuation tokens
// ---------------------------------------------------------------------------

/// Encode an object key as an opaque continuation token.
///
/// # Examples
///
/// ```
/// use objstack_s3_core::utils::{decode_continuation_token, encode_continuation_token};
///
/// let token = encode_continuation_token("photos/2024/img.jpg");
/// let key = decode_continuation_token(&token).unwrap();
/// assert_eq!(key, "photos/2024/img.jpg");
/// ```
#[must_use]
pub fn encode_continuation_token(key: &str) -> String {
    BASE64_STANDARD.encode(key.as_bytes())
}

/// Decode a base64 continuation token back to an object key.
///
/// # Errors
///
/// Returns [`S3ServiceError::InvalidArgument`] if the token is not valid
/// base64 or does not decode to valid UTF-8.
pub fn decode_continuation_token(token: &str) -> Result<String, S3ServiceError> {
    let bytes = BASE64_STANDARD
        .decode(token)
        .map_err(|_| S3ServiceError::invalid_argument("Invalid continuation token"))?;
    String::from_utf8(bytes)
        .map_err(|_| S3ServiceError::invalid_argument("Continuation token contains invalid UTF-8"))
}

// ---------------------------------------------------------------------------
// Listing encoding
// ---------------------------------------------------------------------------

/// Percent-encode a key or prefix for a listing requested with
/// `encoding-type=url`.
///
/// # Examples
///
/// ```
/// use objstack_s3_core::utils::url_encode_key;
///
/// assert_eq!(url_encode_key("a b/c+d"), "a%20b/c%2Bd");
/// ```
#[must_use]
pub fn url_encode_key(key: &str) -> String {
    utf8_percent_encode(key, KEY_ENCODE_SET).to_string()
}

/// Apply [`url_encode_key`] when `encode` is set.
#[must_use]
pub fn maybe_encode(value: &str, encode: bool) -> String {
    if encode {
        url_encode_key(value)
    } else {
        value.to_owned()
    }
}
