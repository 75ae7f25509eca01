//! S3-specific error types.
//!
//! Defines [`S3ServiceError`], a domain-specific error enum covering every
//! S3 error code the engine may produce. Each variant knows its S3 wire code
//! and HTTP status so a transport layer can render it without a lookup table
//! of its own.
//!
//! # Usage
//!
//! ```
//! use objstack_s3_core::error::S3ServiceError;
//!
//! let err = S3ServiceError::NoSuchBucket {
//!     bucket: "my-bucket".to_owned(),
//! };
//! assert_eq!(err.code(), "NoSuchBucket");
//! assert_eq!(err.status_code(), 404);
//! ```

/// S3 service error type.
///
/// Every variant except [`S3ServiceError::Internal`] is a client error: it is
/// detected before any state is mutated and surfaced to the caller as-is.
#[derive(Debug, thiserror::Error)]
pub enum S3ServiceError {
    // -----------------------------------------------------------------------
    // Bucket errors
    // -----------------------------------------------------------------------
    /// The specified bucket does not exist.
    #[error("The specified bucket does not exist: {bucket}")]
    NoSuchBucket {
        /// The bucket name that was not found.
        bucket: String,
    },

    /// The requested bucket name is not available.
    #[error("The requested bucket name is not available: {bucket}")]
    BucketAlreadyExists {
        /// The bucket name that already exists.
        bucket: String,
    },

    /// The bucket still holds objects or in-flight uploads.
    #[error("The bucket you tried to delete is not empty: {bucket}")]
    BucketNotEmpty {
        /// The bucket name that is not empty.
        bucket: String,
    },

    // -----------------------------------------------------------------------
    // Object / key errors
    // -----------------------------------------------------------------------
    /// The specified key does not exist.
    #[error("The specified key does not exist: {key}")]
    NoSuchKey {
        /// The key that was not found.
        key: String,
    },

    /// The specified version does not exist.
    #[error("The specified version does not exist: key={key}, version_id={version_id}")]
    NoSuchVersion {
        /// The key for the version.
        key: String,
        /// The version ID that was not found.
        version_id: String,
    },

    // -----------------------------------------------------------------------
    // Multipart upload errors
    // -----------------------------------------------------------------------
    /// The specified multipart upload does not exist.
    #[error("The specified upload does not exist: {upload_id}")]
    NoSuchUpload {
        /// The upload ID that was not found.
        upload_id: String,
    },

    /// The list of parts was not in ascending order.
    #[error("The list of parts was not in ascending order")]
    InvalidPartOrder,

    /// One or more of the specified parts could not be found.
    #[error("One or more of the specified parts could not be found: part {part_number}")]
    InvalidPart {
        /// The first part number that failed to resolve.
        part_number: u32,
    },

    // -----------------------------------------------------------------------
    // Validation errors
    // -----------------------------------------------------------------------
    /// The specified bucket name is not valid.
    #[error("Invalid bucket name: {name}: {reason}")]
    InvalidBucketName {
        /// The invalid bucket name.
        name: String,
        /// The reason for the error.
        reason: String,
    },

    /// An argument provided is invalid.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    /// A tag key or value is invalid.
    #[error("Invalid tag: {message}")]
    InvalidTag {
        /// Description of the tag error.
        message: String,
    },

    /// The XML body is malformed.
    #[error("The XML you provided was not well-formed")]
    MalformedXml,

    /// The key is too long.
    #[error("Your key is too long")]
    KeyTooLong,

    /// The HTTP method is not allowed against this resource.
    #[error("The specified method is not allowed against this resource")]
    MethodNotAllowed,

    // -----------------------------------------------------------------------
    // Digest / content errors
    // -----------------------------------------------------------------------
    /// The Content-MD5 you specified is invalid.
    #[error("The Content-MD5 you specified is not valid")]
    InvalidDigest,

    /// The Content-MD5 you specified did not match what we received.
    #[error("The Content-MD5 you specified did not match what we received")]
    BadDigest,

    // -----------------------------------------------------------------------
    // Internal / catch-all
    // -----------------------------------------------------------------------
    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl S3ServiceError {
    /// Shorthand for [`S3ServiceError::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// The S3 wire error code (`<Code>` element of an error response).
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoSuchBucket { .. } => "NoSuchBucket",
            Self::BucketAlreadyExists { .. } => "BucketAlreadyExists",
            Self::BucketNotEmpty { .. } => "BucketNotEmpty",
            Self::NoSuchKey { .. } => "NoSuchKey",
            Self::NoSuchVersion { .. } => "NoSuchVersion",
            Self::NoSuchUpload { .. } => "NoSuchUpload",
            Self::InvalidPartOrder => "InvalidPartOrder",
            Self::InvalidPart { .. } => "InvalidPart",
            Self::InvalidBucketName { .. } => "InvalidBucketName",
            Self::InvalidArgument { .. } => "InvalidArgument",
            Self::InvalidTag { .. } => "InvalidTag",
            Self::MalformedXml => "MalformedXML",
            Self::KeyTooLong => "KeyTooLongError",
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::InvalidDigest => "InvalidDigest",
            Self::BadDigest => "BadDigest",
            Self::Internal(_) => "InternalError",
        }
    }

    /// The HTTP status S3 pairs with [`Self::code`].
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NoSuchBucket { .. }
            | Self::NoSuchKey { .. }
            | Self::NoSuchVersion { .. }
            | Self::NoSuchUpload { .. } => 404,
            Self::BucketAlreadyExists { .. } | Self::BucketNotEmpty { .. } => 409,
            Self::MethodNotAllowed => 405,
            Self::Internal(_) => 500,
            _ => 400,
        }
    }

    /// Whether the caller is at fault.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }
}

/// Convenience result type for S3 service operations.
pub type S3ServiceResult<T> = Result<T, S3ServiceError>;
