//! End-to-end tests for the objstack S3 engine.
//!
//! Each test drives an in-process [`ObjStackS3`] through its public
//! `handle_*` surface, with a recording change sink and a directly
//! inspectable content store so leaks and notifications can be asserted.
//!
//! Set `RUST_LOG=debug` to see the engine's tracing output:
//! ```text
//! RUST_LOG=objstack_s3_core=debug cargo test -p objstack-integration
//! ```

use std::sync::{Arc, Once};

use bytes::Bytes;
use objstack_s3_core::ObjStackS3;
use objstack_s3_core::config::S3Config;
use objstack_s3_core::ids::DefaultIdGenerator;
use objstack_s3_core::notify::RecordingChangeSink;
use objstack_s3_core::storage::InMemoryContentStore;
use objstack_s3_model::BucketVersioningStatus;
use objstack_s3_model::input::{
    CreateBucketInput, GetObjectInput, PutBucketVersioningInput, PutObjectInput,
};
use objstack_s3_model::output::{GetObjectOutput, PutObjectOutput};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// A provider together with handles on its collaborators.
#[derive(Debug, Clone)]
pub struct Fixture {
    /// The engine under test.
    pub provider: ObjStackS3,
    /// The content store backing `provider`.
    pub store: Arc<InMemoryContentStore>,
    /// Every change notification `provider` emitted.
    pub sink: Arc<RecordingChangeSink>,
}

/// Build a fresh provider with default configuration.
#[must_use]
pub fn fixture() -> Fixture {
    fixture_with_config(S3Config::default())
}

/// Build a fresh provider with the given configuration.
#[must_use]
pub fn fixture_with_config(config: S3Config) -> Fixture {
    init_tracing();

    let store = Arc::new(InMemoryContentStore::from_config(&config));
    let sink = Arc::new(RecordingChangeSink::default());
    let provider = ObjStackS3::with_collaborators(
        config,
        store.clone(),
        sink.clone(),
        Arc::new(DefaultIdGenerator),
    );
    Fixture {
        provider,
        store,
        sink,
    }
}

/// Generate a unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

impl Fixture {
    /// Create a bucket and return its name.
    #[must_use]
    pub fn create_test_bucket(&self, prefix: &str) -> String {
        let name = test_bucket_name(prefix);
        self.provider
            .handle_create_bucket(CreateBucketInput {
                bucket: name.clone(),
            })
            .unwrap_or_else(|e| panic!("failed to create bucket {name}: {e}"));
        name
    }

    /// Set a bucket's versioning status.
    pub fn set_versioning(&self, bucket: &str, status: BucketVersioningStatus) {
        self.provider
            .handle_put_bucket_versioning(PutBucketVersioningInput {
                bucket: bucket.to_owned(),
                status,
            })
            .unwrap_or_else(|e| panic!("failed to set versioning on {bucket}: {e}"));
    }

    /// Put a text object.
    pub fn put_text(&self, bucket: &str, key: &str, body: &str) -> PutObjectOutput {
        self.provider
            .handle_put_object(PutObjectInput {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
                body: Bytes::from(body.to_owned()),
                ..PutObjectInput::default()
            })
            .unwrap_or_else(|e| panic!("put {bucket}/{key}: {e}"))
    }

    /// Get an object, panicking on error.
    #[must_use]
    pub fn get(&self, bucket: &str, key: &str, version_id: Option<&str>) -> GetObjectOutput {
        self.provider
            .handle_get_object(GetObjectInput {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
                version_id: version_id.map(str::to_owned),
            })
            .unwrap_or_else(|e| panic!("get {bucket}/{key}: {e}"))
    }

    /// Get an object's body as text, panicking if it has none.
    #[must_use]
    pub fn get_text(&self, bucket: &str, key: &str, version_id: Option<&str>) -> String {
        let body = self
            .get(bucket, key, version_id)
            .body
            .unwrap_or_else(|| panic!("{bucket}/{key} has no body"));
        String::from_utf8(body.to_vec()).unwrap_or_else(|e| panic!("non-utf8 body: {e}"))
    }
}

mod test_bucket;
mod test_concurrency;
mod test_multipart;
mod test_object;
mod test_persistence;
mod test_versioning;
