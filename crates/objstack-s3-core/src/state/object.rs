//! Object versions and per-key version history.
//!
//! An [`ObjectEntry`] holds every [`ObjectVersion`] of one key in creation
//! order, plus an optional *virtual version*: the version that non-enabled
//! buckets expose under the alias `"null"`. The virtual version is stored
//! under its real generated id, but that id is never accepted from callers.
//! Only `"null"` addresses it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use objstack_s3_model::Tag;
use serde::{Deserialize, Serialize};

use crate::error::{S3ServiceError, S3ServiceResult};
use crate::storage::ContentId;

/// Display id of a key's virtual version.
pub const NULL_VERSION_ID: &str = "null";

// ---------------------------------------------------------------------------
// ObjectVersion
// ---------------------------------------------------------------------------

/// Everything a write needs to create a content-bearing version.
#[derive(Debug, Clone)]
pub struct NewContent {
    /// Reference into the content store.
    pub content_id: ContentId,
    /// Size in bytes.
    pub size: u64,
    /// Quoted ETag.
    pub etag: String,
    /// MIME type.
    pub content_type: String,
    /// `x-amz-meta-*` pairs.
    pub user_metadata: HashMap<String, String>,
    /// Object tags.
    pub tagging: Vec<Tag>,
}

/// One immutable version of a key, or a delete marker.
///
/// Only `tagging` may change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectVersion {
    /// The real, generated version id.
    pub version_id: String,
    /// When this version was written.
    pub last_modified: DateTime<Utc>,
    /// MIME type; empty for delete markers.
    pub content_type: String,
    /// Size in bytes.
    pub size: u64,
    /// Quoted ETag; empty for delete markers.
    pub etag: String,
    /// Reference into the content store; `None` for delete markers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_id: Option<ContentId>,
    /// Whether this version is a delete marker.
    pub is_delete_marker: bool,
    /// Object tags.
    #[serde(default)]
    pub tagging: Vec<Tag>,
    /// `x-amz-meta-*` pairs.
    #[serde(default)]
    pub user_metadata: HashMap<String, String>,
}

impl ObjectVersion {
    /// Create a content-bearing version.
    #[must_use]
    pub fn with_content(version_id: String, content: NewContent) -> Self {
        Self {
            version_id,
            last_modified: Utc::now(),
            content_type: content.content_type,
            size: content.size,
            etag: content.etag,
            content_id: Some(content.content_id),
            is_delete_marker: false,
            tagging: content.tagging,
            user_metadata: content.user_metadata,
        }
    }

    /// Create a delete marker.
    #[must_use]
    pub fn delete_marker(version_id: String) -> Self {
        Self {
            version_id,
            last_modified: Utc::now(),
            content_type: String::new(),
            size: 0,
            etag: String::new(),
            content_id: None,
            is_delete_marker: true,
            tagging: Vec::new(),
            user_metadata: HashMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// ObjectEntry
// ---------------------------------------------------------------------------

/// The version history of one key.
///
/// Invariants:
/// - `versions` is never empty while the entry is stored in a bucket.
/// - `virtual_version`, when set, names an element of `versions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectEntry {
    /// Oldest first; the last element is the latest version.
    versions: Vec<ObjectVersion>,
    /// Real id of the version exposed as `"null"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    virtual_version: Option<String>,
}

impl ObjectEntry {
    /// The most recently written version, delete markers included.
    #[must_use]
    pub fn latest(&self) -> Option<&ObjectVersion> {
        self.versions.last()
    }

    /// Whether the latest version carries content.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.latest().is_some_and(|v| !v.is_delete_marker)
    }

    /// Whether any version (latest or not) carries content.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.versions.iter().any(|v| !v.is_delete_marker)
    }

    /// Whether no versions remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Number of stored versions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Real id of the virtual version, if any.
    #[must_use]
    pub fn virtual_version(&self) -> Option<&str> {
        self.virtual_version.as_deref()
    }

    /// The id callers see for `version`: `"null"` for the virtual version,
    /// the real id otherwise.
    #[must_use]
    pub fn display_id(&self, version: &ObjectVersion) -> String {
        if self.virtual_version.as_deref() == Some(version.version_id.as_str()) {
            NULL_VERSION_ID.to_owned()
        } else {
            version.version_id.clone()
        }
    }

    /// Versions newest first.
    pub fn iter_newest_first(&self) -> impl Iterator<Item = &ObjectVersion> {
        self.versions.iter().rev()
    }

    /// Versions strictly older than the one addressed by `version_id`,
    /// newest first. `None` when the id does not resolve.
    pub fn iter_older_than(
        &self,
        version_id: &str,
    ) -> Option<impl Iterator<Item = &ObjectVersion>> {
        let pos = self.position(version_id)?;
        Some(self.versions[..pos].iter().rev())
    }

    /// Index of the version addressed by a caller-supplied id.
    ///
    /// `"null"` resolves to the virtual version. The virtual version's real
    /// id never resolves.
    fn position(&self, version_id: &str) -> Option<usize> {
        let real = if version_id == NULL_VERSION_ID {
            self.virtual_version.as_deref()?
        } else if self.virtual_version.as_deref() == Some(version_id) {
            return None;
        } else {
            version_id
        };
        self.versions.iter().position(|v| v.version_id == real)
    }

    /// Resolve a caller-supplied version id, or the latest version for `None`.
    ///
    /// # Errors
    ///
    /// [`S3ServiceError::NoSuchVersion`] when the id does not resolve.
    pub fn resolve(&self, key: &str, version_id: Option<&str>) -> S3ServiceResult<&ObjectVersion> {
        let pos = self.resolve_position(key, version_id)?;
        Ok(&self.versions[pos])
    }

    /// Mutable variant of [`Self::resolve`], for tag updates.
    pub fn resolve_mut(
        &mut self,
        key: &str,
        version_id: Option<&str>,
    ) -> S3ServiceResult<&mut ObjectVersion> {
        let pos = self.resolve_position(key, version_id)?;
        Ok(&mut self.versions[pos])
    }

    fn resolve_position(&self, key: &str, version_id: Option<&str>) -> S3ServiceResult<usize> {
        match version_id {
            None => self.versions.len().checked_sub(1).ok_or_else(|| S3ServiceError::NoSuchKey {
                key: key.to_owned(),
            }),
            Some(id) => self.position(id).ok_or_else(|| S3ServiceError::NoSuchVersion {
                key: key.to_owned(),
                version_id: id.to_owned(),
            }),
        }
    }

    /// Append `version` as the new latest.
    ///
    /// With `bind_virtual` (any bucket not in `Enabled` mode) the previous
    /// virtual version is retired and returned, and the new version becomes
    /// the virtual one. Returns the display id of the new version alongside.
    pub fn push(
        &mut self,
        version: ObjectVersion,
        bind_virtual: bool,
    ) -> (String, Option<ObjectVersion>) {
        let new_id = version.version_id.clone();
        self.versions.push(version);
        if !bind_virtual {
            return (new_id, None);
        }

        let retired = self
            .virtual_version
            .replace(new_id)
            .and_then(|old| self.versions.iter().position(|v| v.version_id == old))
            .map(|pos| self.versions.remove(pos));
        (NULL_VERSION_ID.to_owned(), retired)
    }

    /// Consume the entry, yielding the content ids of its versions.
    pub fn into_content_ids(self) -> impl Iterator<Item = ContentId> {
        self.versions.into_iter().filter_map(|v| v.content_id)
    }

    /// Hard-delete the version addressed by a caller-supplied id.
    ///
    /// Clears the virtual binding when it pointed at the removed version.
    ///
    /// # Errors
    ///
    /// [`S3ServiceError::NoSuchVersion`] when the id does not resolve.
    pub fn remove(&mut self, key: &str, version_id: &str) -> S3ServiceResult<ObjectVersion> {
        let pos = self.resolve_position(key, Some(version_id))?;
        let removed = self.versions.remove(pos);
        if self.virtual_version.as_deref() == Some(removed.version_id.as_str()) {
            self.virtual_version = None;
        }
        Ok(removed)
    }
}
