//! Operation inputs, grouped by resource.

mod bucket;
mod list;
mod multipart;
mod object;

pub use bucket::{
    CreateBucketInput, DeleteBucketInput, GetBucketVersioningInput, HeadBucketInput,
    PutBucketVersioningInput,
};
pub use list::{
    ListMultipartUploadsInput, ListObjectVersionsInput, ListObjectsInput, ListObjectsV2Input,
};
pub use multipart::{
    AbortMultipartUploadInput, CompleteMultipartUploadInput, CreateMultipartUploadInput,
    ListPartsInput, UploadPartInput,
};
pub use object::{
    CopyObjectInput, DeleteObjectInput, DeleteObjectTaggingInput, DeleteObjectsInput,
    GetObjectInput, GetObjectTaggingInput, HeadObjectInput, PutObjectInput,
    PutObjectTaggingInput,
};
