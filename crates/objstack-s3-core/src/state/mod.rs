//! S3 engine state.
//!
//! This module provides the in-memory object-version model:
//!
//! - [`S3ServiceState`] -- top-level table owning all buckets
//! - [`S3Bucket`] / [`BucketState`] -- per-bucket lock and its contents
//! - [`ObjectEntry`] / [`ObjectVersion`] -- per-key version history
//! - [`MultipartUpload`] / [`UploadPart`] -- multipart upload tracking
//! - [`KeyScan`] -- the sorted key-space scan behind every listing
//!
//! # Thread Safety
//!
//! All types are `Send + Sync`. Concurrent access is handled via:
//!
//! - `DashMap` for the bucket table
//! - one `parking_lot::RwLock` per bucket around everything that changes

pub(crate) mod bucket;
pub(crate) mod listing;
pub(crate) mod multipart;
pub(crate) mod object;
pub(crate) mod service;

pub use bucket::{BucketState, PutOutcome, S3Bucket, VersioningStatus};
pub use listing::{KeyScan, ListEntry, Page, common_prefix, paginate, prefix_successor};
pub use multipart::{MultipartUpload, UploadPart};
pub use object::{NULL_VERSION_ID, NewContent, ObjectEntry, ObjectVersion};
pub use service::S3ServiceState;
