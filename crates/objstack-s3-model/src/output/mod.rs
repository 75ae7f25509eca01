//! Operation outputs, grouped by resource.

mod bucket;
mod list;
mod multipart;
mod object;

pub use bucket::{
    CreateBucketOutput, GetBucketVersioningOutput, HeadBucketOutput, ListBucketsOutput,
};
pub use list::{
    ListMultipartUploadsOutput, ListObjectVersionsOutput, ListObjectsOutput,
    ListObjectsV2Output,
};
pub use multipart::{
    CompleteMultipartUploadOutput, CreateMultipartUploadOutput, ListPartsOutput,
    UploadPartOutput,
};
pub use object::{
    CopyObjectOutput, DeleteObjectOutput, DeleteObjectTaggingOutput, DeleteObjectsOutput,
    GetObjectOutput, GetObjectTaggingOutput, HeadObjectOutput, PutObjectOutput,
    PutObjectTaggingOutput,
};
