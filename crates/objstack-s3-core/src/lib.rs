//! Versioned, S3-compatible object store core for objstack.
//!
//! This crate holds the protocol-independent engine behind an S3 endpoint:
//! buckets, object versions with the `"null"` virtual version and delete
//! markers, the multipart upload lifecycle, and the marker/prefix/delimiter
//! listings. Transports decode requests into `objstack-s3-model` inputs and
//! call the `handle_*` methods on [`ObjStackS3`].
//!
//! # Architecture
//!
//! ```text
//! transport (HTTP, XML, auth; out of tree)
//!        |
//!        v
//! ObjStackS3 (handle_* operations)
//!        |                     \
//!        v                      v
//!   S3ServiceState         ContentStore (in-memory + spillover)
//!   (buckets, per-bucket
//!    RwLock<BucketState>)
//! ```

pub mod checksums;
pub mod config;
pub mod error;
pub mod ids;
pub mod notify;
mod ops;
pub mod provider;
pub mod state;
pub mod storage;
pub mod utils;
pub mod validation;

pub use config::S3Config;
pub use error::{S3ServiceError, S3ServiceResult};
pub use provider::ObjStackS3;
