//! ETag computation.
//!
//! Object ETags are the quoted hex MD5 of the body. Objects assembled by a
//! multipart completion carry the composite form `"<md5-of-md5s>-<n>"`.

use md5::{Digest, Md5};

/// Compute the hex-encoded MD5 digest of `data`.
///
/// For an S3-formatted ETag (quoted), use [`compute_etag`].
///
/// # Examples
///
/// ```
/// use objstack_s3_core::checksums::compute_md5;
///
/// let digest = compute_md5(b"hello");
/// assert_eq!(digest, "5d41402abc4b2a76b9719d911017c592");
/// ```
#[must_use]
pub fn compute_md5(data: &[u8]) -> String {
    hex::encode(Md5::digest(data))
}

/// Compute the quoted hex-encoded MD5 digest of `data`, suitable for use as
/// an S3 ETag.
///
/// # Examples
///
/// ```
/// use objstack_s3_core::checksums::compute_etag;
///
/// let etag = compute_etag(b"");
/// assert_eq!(etag, "\"d41d8cd98f00b204e9800998ecf8427e\"");
/// ```
#[must_use]
pub fn compute_etag(data: &[u8]) -> String {
    let md5_hex = compute_md5(data);
    format!("\"{md5_hex}\"")
}

/// Compute a composite ETag for a multipart upload.
///
/// The composite ETag is the MD5 of the concatenated binary MD5 digests of
/// each part, formatted as `"<hex>-<part_count>"`. Part digests may be given
/// quoted or unquoted.
///
/// # Examples
///
/// ```
/// use objstack_s3_core::checksums::compute_multipart_etag;
///
/// let etag = compute_multipart_etag(&["\"5d41402abc4b2a76b9719d911017c592\""]);
/// assert!(etag.ends_with("-1\""));
/// ```
#[must_use]
pub fn compute_multipart_etag(part_etags: &[impl AsRef<str>]) -> String {
    let mut combined = Vec::with_capacity(part_etags.len() * 16);
    for etag in part_etags {
        let hex_str = etag.as_ref().trim_matches('"');
        if let Ok(bytes) = hex::decode(hex_str) {
            combined.extend_from_slice(&bytes);
        }
    }
    let final_md5 = hex::encode(Md5::digest(&combined));
    format!("\"{final_md5}-{}\"", part_etags.len())
}

/// Compare two ETags ignoring surrounding quotes.
#[must_use]
pub fn etags_match(a: &str, b: &str) -> bool {
    a.trim_matches('"') == b.trim_matches('"')
}
