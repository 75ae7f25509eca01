//! Bucket lifecycle integration tests.

#[cfg(test)]
mod tests {
    use objstack_s3_core::notify::ChangeKind;
    use objstack_s3_model::BucketVersioningStatus;
    use objstack_s3_model::input::{
        CreateBucketInput, DeleteBucketInput, DeleteObjectInput, GetBucketVersioningInput,
        HeadBucketInput, ListObjectVersionsInput,
    };

    use crate::fixture;

    #[test]
    fn test_should_refuse_to_delete_bucket_with_content() {
        let fx = fixture();
        let bucket = fx.create_test_bucket("nonempty");
        fx.set_versioning(&bucket, BucketVersioningStatus::Enabled);
        let put = fx.put_text(&bucket, "k", "data");

        // A delete marker on top still leaves the content behind it.
        let marker = fx
            .provider
            .handle_delete_object(DeleteObjectInput {
                bucket: bucket.clone(),
                key: "k".to_owned(),
                version_id: None,
            })
            .unwrap_or_else(|e| panic!("delete: {e}"));
        let err = fx
            .provider
            .handle_delete_bucket(DeleteBucketInput {
                bucket: bucket.clone(),
            })
            .err()
            .unwrap_or_else(|| panic!("expected BucketNotEmpty"));
        assert_eq!(err.code(), "BucketNotEmpty");
        assert_eq!(err.status_code(), 409);

        fx.provider
            .handle_delete_object(DeleteObjectInput {
                bucket: bucket.clone(),
                key: "k".to_owned(),
                version_id: Some(put.version_id),
            })
            .unwrap_or_else(|e| panic!("delete version: {e}"));

        // With versioning enabled the remaining marker still counts.
        let err = fx
            .provider
            .handle_delete_bucket(DeleteBucketInput {
                bucket: bucket.clone(),
            })
            .err()
            .unwrap_or_else(|| panic!("expected BucketNotEmpty"));
        assert_eq!(err.code(), "BucketNotEmpty");

        fx.provider
            .handle_delete_object(DeleteObjectInput {
                bucket: bucket.clone(),
                key: "k".to_owned(),
                version_id: Some(marker.version_id),
            })
            .unwrap_or_else(|e| panic!("delete marker: {e}"));
        fx.provider
            .handle_delete_bucket(DeleteBucketInput {
                bucket: bucket.clone(),
            })
            .unwrap_or_else(|e| panic!("delete bucket: {e}"));
        assert!(fx.store.is_empty());

        let err = fx
            .provider
            .handle_head_bucket(HeadBucketInput { bucket })
            .err()
            .unwrap_or_else(|| panic!("expected NoSuchBucket"));
        assert_eq!(err.code(), "NoSuchBucket");
    }

    #[test]
    fn test_should_start_recreated_bucket_empty() {
        let fx = fixture();
        let bucket = fx.create_test_bucket("recreate");
        fx.set_versioning(&bucket, BucketVersioningStatus::Enabled);
        fx.put_text(&bucket, "k", "x");
        fx.provider
            .handle_delete_object(DeleteObjectInput {
                bucket: bucket.clone(),
                key: "k".to_owned(),
                version_id: Some("null".to_owned()),
            })
            .err()
            .unwrap_or_else(|| panic!("no null version exists"));

        let versions = fx
            .provider
            .handle_list_object_versions(ListObjectVersionsInput {
                bucket: bucket.clone(),
                ..ListObjectVersionsInput::default()
            })
            .unwrap_or_else(|e| panic!("list versions: {e}"));
        let version_id = versions.versions[0].version_id.clone();
        fx.provider
            .handle_delete_object(DeleteObjectInput {
                bucket: bucket.clone(),
                key: "k".to_owned(),
                version_id: Some(version_id),
            })
            .unwrap_or_else(|e| panic!("delete version: {e}"));
        fx.provider
            .handle_delete_bucket(DeleteBucketInput {
                bucket: bucket.clone(),
            })
            .unwrap_or_else(|e| panic!("delete bucket: {e}"));

        fx.provider
            .handle_create_bucket(CreateBucketInput {
                bucket: bucket.clone(),
            })
            .unwrap_or_else(|e| panic!("recreate: {e}"));
        let status = fx
            .provider
            .handle_get_bucket_versioning(GetBucketVersioningInput {
                bucket: bucket.clone(),
            })
            .unwrap_or_else(|e| panic!("get versioning: {e}"));
        assert_eq!(status.status, None);

        let versions = fx
            .provider
            .handle_list_object_versions(ListObjectVersionsInput {
                bucket,
                ..ListObjectVersionsInput::default()
            })
            .unwrap_or_else(|e| panic!("list versions: {e}"));
        assert!(versions.versions.is_empty());
        assert!(versions.delete_markers.is_empty());
    }

    #[test]
    fn test_should_list_buckets_sorted() {
        let fx = fixture();
        for name in ["zulu-bucket", "alpha-bucket", "mike-bucket"] {
            fx.provider
                .handle_create_bucket(CreateBucketInput {
                    bucket: name.to_owned(),
                })
                .unwrap_or_else(|e| panic!("create {name}: {e}"));
        }
        let names: Vec<String> = fx
            .provider
            .handle_list_buckets()
            .buckets
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["alpha-bucket", "mike-bucket", "zulu-bucket"]);

        let err = fx
            .provider
            .handle_create_bucket(CreateBucketInput {
                bucket: "mike-bucket".to_owned(),
            })
            .err()
            .unwrap_or_else(|| panic!("expected BucketAlreadyExists"));
        assert_eq!(err.code(), "BucketAlreadyExists");
    }

    #[test]
    fn test_should_notify_each_mutation() {
        let fx = fixture();
        let bucket = fx.create_test_bucket("events");
        fx.set_versioning(&bucket, BucketVersioningStatus::Enabled);
        fx.put_text(&bucket, "k", "x");
        fx.provider
            .handle_delete_object(DeleteObjectInput {
                bucket: bucket.clone(),
                key: "k".to_owned(),
                version_id: None,
            })
            .unwrap_or_else(|e| panic!("delete: {e}"));

        // Reads do not notify.
        let _ = fx
            .provider
            .handle_head_bucket(HeadBucketInput {
                bucket: bucket.clone(),
            })
            .unwrap_or_else(|e| panic!("head: {e}"));

        let kinds: Vec<ChangeKind> = fx
            .sink
            .take()
            .into_iter()
            .map(|(name, kind)| {
                assert_eq!(name, bucket);
                kind
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                ChangeKind::Create,
                ChangeKind::Update,
                ChangeKind::Create,
                ChangeKind::Delete,
            ]
        );
    }
}
