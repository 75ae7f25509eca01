//! Request and response types for the objstack S3 engine.
//!
//! Inputs mirror the parameters a transport layer extracts from an S3 request
//! (path labels, query parameters, headers, body). Outputs carry everything a
//! transport layer needs to render the provider's wire format. Neither side
//! has behavior beyond small parsing helpers on the shared [`types`].

// Field names follow the S3 wire names.
#![allow(missing_docs)]

pub mod input;
pub mod output;
pub mod types;

pub use types::{
    BucketSummary, BucketVersioningStatus, CommonPrefix, CompletedPart, DeleteError,
    DeleteMarkerEntry, DeletedObject, EncodingType, MetadataDirective, MultipartUploadEntry,
    Object, ObjectIdentifier, ObjectVersion, Part, Tag,
};
