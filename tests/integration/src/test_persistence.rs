//! Snapshot and restore integration tests.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use objstack_s3_core::ObjStackS3;
    use objstack_s3_core::config::S3Config;
    use objstack_s3_core::ids::DefaultIdGenerator;
    use objstack_s3_core::notify::NoopChangeSink;
    use objstack_s3_core::state::BucketState;
    use objstack_s3_model::BucketVersioningStatus;
    use objstack_s3_model::input::{GetObjectInput, ListObjectsV2Input};

    use crate::fixture;

    #[test]
    fn test_should_restore_bucket_over_shared_store() {
        let fx = fixture();
        let bucket = fx.create_test_bucket("persist");
        fx.put_text(&bucket, "plain", "before versioning");
        fx.set_versioning(&bucket, BucketVersioningStatus::Enabled);
        let v1 = fx.put_text(&bucket, "docs/a", "first");
        fx.put_text(&bucket, "docs/a", "second");

        let handle = fx
            .provider
            .state()
            .bucket(&bucket)
            .unwrap_or_else(|e| panic!("bucket: {e}"));
        let snapshot = handle
            .snapshot()
            .unwrap_or_else(|e| panic!("snapshot: {e}"));
        let json = serde_json::to_string(&snapshot).unwrap_or_else(|e| panic!("serialize: {e}"));
        let state: BucketState =
            serde_json::from_str(&json).unwrap_or_else(|e| panic!("deserialize: {e}"));
        assert_eq!(state, snapshot);

        let restored = ObjStackS3::with_collaborators(
            S3Config::default(),
            fx.store.clone(),
            Arc::new(NoopChangeSink),
            Arc::new(DefaultIdGenerator),
        );
        restored
            .state()
            .restore_bucket(&bucket, handle.creation_date, state)
            .unwrap_or_else(|e| panic!("restore: {e}"));

        let get = |key: &str, version_id: Option<&str>| {
            let body = restored
                .handle_get_object(GetObjectInput {
                    bucket: bucket.clone(),
                    key: key.to_owned(),
                    version_id: version_id.map(str::to_owned),
                })
                .unwrap_or_else(|e| panic!("get {key}: {e}"))
                .body
                .unwrap_or_else(|| panic!("{key} has no body"));
            String::from_utf8(body.to_vec()).unwrap_or_else(|e| panic!("non-utf8 body: {e}"))
        };
        assert_eq!(get("docs/a", None), "second");
        assert_eq!(get("docs/a", Some(&v1.version_id)), "first");
        assert_eq!(get("plain", Some("null")), "before versioning");

        let listed = restored
            .handle_list_objects_v2(ListObjectsV2Input {
                bucket: bucket.clone(),
                ..ListObjectsV2Input::default()
            })
            .unwrap_or_else(|e| panic!("list: {e}"));
        assert_eq!(listed.key_count, 2);

        // Versioning carries over: a new write still gets a fresh id.
        let put = restored
            .handle_put_object(objstack_s3_model::input::PutObjectInput {
                bucket: bucket.clone(),
                key: "docs/a".to_owned(),
                body: bytes::Bytes::from_static(b"third"),
                ..objstack_s3_model::input::PutObjectInput::default()
            })
            .unwrap_or_else(|e| panic!("put: {e}"));
        assert_ne!(put.version_id, "null");
        assert_eq!(fx.store.len(), 4);
    }

    #[test]
    fn test_should_reset_everything() {
        let fx = fixture();
        let bucket = fx.create_test_bucket("reset");
        fx.put_text(&bucket, "k", "x");
        fx.provider.reset();

        assert!(fx.provider.handle_list_buckets().buckets.is_empty());
        assert!(fx.store.is_empty());
        assert!(!fx.provider.state().bucket_exists(&bucket));
    }
}
