//! Identifier generation for versions and multipart uploads.

use std::fmt;

use uuid::Uuid;

/// Source of opaque version and upload identifiers.
///
/// Version ids must be unique within a key's history. Upload ids must be
/// unique within a key's in-flight uploads.
pub trait IdGenerator: Send + Sync + fmt::Debug {
    /// A fresh version id.
    fn version_id(&self) -> String;

    /// A fresh multipart upload id.
    fn upload_id(&self) -> String;
}

/// Default generator.
///
/// Version ids are UUIDv7 (time-ordered, so later versions sort after earlier
/// ones), upload ids are random UUIDv4. Both use the 32-character hex form.
///
/// # Examples
///
/// ```
/// use objstack_s3_core::ids::{DefaultIdGenerator, IdGenerator};
///
/// let ids = DefaultIdGenerator;
/// let v = ids.version_id();
/// assert_eq!(v.len(), 32);
/// assert_ne!(v, ids.version_id());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultIdGenerator;

impl IdGenerator for DefaultIdGenerator {
    fn version_id(&self) -> String {
        Uuid::now_v7().simple().to_string()
    }

    fn upload_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}
