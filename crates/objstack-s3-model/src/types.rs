//! Shared S3 types used by both inputs and outputs.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Requested encoding for keys in listing responses.
///
/// S3 only defines `url`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncodingType {
    /// Percent-encode keys, prefixes, delimiters and markers.
    Url,
}

impl EncodingType {
    /// Wire value of the encoding type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "url",
        }
    }
}

impl fmt::Display for EncodingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing one of the enums in this module fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl FromStr for EncodingType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "url" => Ok(Self::Url),
            _ => Err(ParseEnumError {
                kind: "encoding type",
                value: s.to_owned(),
            }),
        }
    }
}

/// Versioning status a client may set on a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BucketVersioningStatus {
    /// Every write creates a new, addressable version.
    Enabled,
    /// Writes replace the `"null"` version; history is kept.
    Suspended,
}

impl BucketVersioningStatus {
    /// Wire value of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "Enabled",
            Self::Suspended => "Suspended",
        }
    }
}

impl FromStr for BucketVersioningStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Enabled" => Ok(Self::Enabled),
            "Suspended" => Ok(Self::Suspended),
            _ => Err(ParseEnumError {
                kind: "versioning status",
                value: s.to_owned(),
            }),
        }
    }
}

/// Whether `CopyObject` keeps the source metadata or takes it from the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetadataDirective {
    /// Copy content type, user metadata and tags from the source.
    #[default]
    Copy,
    /// Use the content type, user metadata and tags supplied with the request.
    Replace,
}

impl FromStr for MetadataDirective {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COPY" => Ok(Self::Copy),
            "REPLACE" => Ok(Self::Replace),
            _ => Err(ParseEnumError {
                kind: "metadata directive",
                value: s.to_owned(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Structs
// ---------------------------------------------------------------------------

/// A single object tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    /// Build a tag from anything string-like.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A bucket as reported by `ListBuckets`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSummary {
    pub name: String,
    pub creation_date: DateTime<Utc>,
}

/// A folded group of keys in a delimiter listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonPrefix {
    pub prefix: String,
}

/// An entry of `ListObjects` / `ListObjectsV2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    pub key: String,
    pub last_modified: DateTime<Utc>,
    pub e_tag: String,
    pub size: u64,
}

/// A content-bearing entry of `ListObjectVersions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectVersion {
    pub key: String,
    /// `"null"` when this is the key's virtual version.
    pub version_id: String,
    pub is_latest: bool,
    pub last_modified: DateTime<Utc>,
    pub e_tag: String,
    pub size: u64,
}

/// A delete-marker entry of `ListObjectVersions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteMarkerEntry {
    pub key: String,
    pub version_id: String,
    pub is_latest: bool,
    pub last_modified: DateTime<Utc>,
}

/// An in-flight upload as reported by `ListMultipartUploads`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartUploadEntry {
    pub key: String,
    pub upload_id: String,
    pub initiated: DateTime<Utc>,
}

/// A stored part as reported by `ListParts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub part_number: u32,
    pub e_tag: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// A part referenced by `CompleteMultipartUpload`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletedPart {
    pub part_number: u32,
    /// When present, must equal the stored part's ETag.
    pub e_tag: Option<String>,
}

impl CompletedPart {
    /// Reference a part by number only.
    #[must_use]
    pub fn new(part_number: u32) -> Self {
        Self {
            part_number,
            e_tag: None,
        }
    }
}

/// A key (and optional version) addressed by `DeleteObjects`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectIdentifier {
    pub key: String,
    pub version_id: Option<String>,
}

/// A successful item of `DeleteObjects`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletedObject {
    pub key: String,
    /// The version id the client sent, if any.
    pub version_id: Option<String>,
    pub delete_marker: bool,
    /// Id of the marker that was created or removed.
    pub delete_marker_version_id: Option<String>,
}

/// A failed item of `DeleteObjects`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteError {
    pub key: String,
    pub version_id: Option<String>,
    pub code: String,
    pub message: String,
}
