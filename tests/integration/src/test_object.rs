//! Object integration tests.

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use objstack_s3_model::input::{
        CopyObjectInput, DeleteObjectInput, DeleteObjectsInput, HeadObjectInput, PutObjectInput,
    };
    use objstack_s3_model::{BucketVersioningStatus, ObjectIdentifier, Tag};

    use crate::fixture;

    fn delete_input(bucket: &str, key: &str, version_id: Option<&str>) -> DeleteObjectInput {
        DeleteObjectInput {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            version_id: version_id.map(str::to_owned),
        }
    }

    #[test]
    fn test_should_add_exactly_one_marker_per_repeated_delete() {
        let fx = fixture();
        let bucket = fx.create_test_bucket("markers");
        fx.set_versioning(&bucket, BucketVersioningStatus::Enabled);
        fx.put_text(&bucket, "k", "data");

        let mut marker_ids = Vec::new();
        for _ in 0..3 {
            let out = fx
                .provider
                .handle_delete_object(delete_input(&bucket, "k", None))
                .unwrap_or_else(|e| panic!("delete: {e}"));
            assert!(out.delete_marker);
            marker_ids.push(out.version_id);
        }
        marker_ids.dedup();
        assert_eq!(marker_ids.len(), 3);

        let handle = fx
            .provider
            .state()
            .bucket(&bucket)
            .unwrap_or_else(|e| panic!("bucket: {e}"));
        let versions = handle
            .read()
            .unwrap_or_else(|e| panic!("read: {e}"))
            .objects
            .get("k")
            .map_or(0, |entry| entry.len());
        assert_eq!(versions, 4);
        assert_eq!(fx.store.len(), 1);
    }

    /// Deleting without a version id auto-creates a marker on a missing key,
    /// while deleting with one requires the key to exist. Both are intended.
    #[test]
    fn test_should_keep_asymmetric_delete_semantics() {
        let fx = fixture();
        let bucket = fx.create_test_bucket("asym");

        let out = fx
            .provider
            .handle_delete_object(delete_input(&bucket, "ghost", None))
            .unwrap_or_else(|e| panic!("delete: {e}"));
        assert!(out.delete_marker);

        let err = fx
            .provider
            .handle_delete_object(delete_input(&bucket, "phantom", Some("null")))
            .err()
            .unwrap_or_else(|| panic!("expected an error"));
        assert_eq!(err.code(), "NoSuchKey");
    }

    #[test]
    fn test_should_remove_key_with_its_last_version() {
        let fx = fixture();
        let bucket = fx.create_test_bucket("last");
        fx.put_text(&bucket, "k", "data");
        fx.provider
            .handle_delete_object(delete_input(&bucket, "k", Some("null")))
            .unwrap_or_else(|e| panic!("delete: {e}"));

        let err = fx
            .provider
            .handle_head_object(HeadObjectInput {
                bucket: bucket.clone(),
                key: "k".to_owned(),
                version_id: None,
            })
            .err()
            .unwrap_or_else(|| panic!("expected an error"));
        assert_eq!(err.code(), "NoSuchKey");
        assert!(fx.store.is_empty());
    }

    #[test]
    fn test_should_copy_between_buckets() {
        let fx = fixture();
        let src = fx.create_test_bucket("src");
        let dst = fx.create_test_bucket("dst");
        fx.set_versioning(&dst, BucketVersioningStatus::Enabled);
        fx.provider
            .handle_put_object(PutObjectInput {
                bucket: src.clone(),
                key: "report.csv".to_owned(),
                body: Bytes::from_static(b"a,b\n1,2\n"),
                content_type: Some("text/csv".to_owned()),
                tagging: vec![Tag::new("kind", "report")],
                ..PutObjectInput::default()
            })
            .unwrap_or_else(|e| panic!("put: {e}"));

        let out = fx
            .provider
            .handle_copy_object(CopyObjectInput {
                bucket: dst.clone(),
                key: "archive/report.csv".to_owned(),
                source_bucket: src.clone(),
                source_key: "report.csv".to_owned(),
                ..CopyObjectInput::default()
            })
            .unwrap_or_else(|e| panic!("copy: {e}"));
        assert_ne!(out.version_id, "null");
        assert_eq!(out.copy_source_version_id, "null");

        let got = fx.get(&dst, "archive/report.csv", None);
        assert_eq!(got.body, Some(Bytes::from_static(b"a,b\n1,2\n")));
        assert_eq!(got.content_type, "text/csv");
        assert_eq!(got.tag_count, 1);
    }

    #[test]
    fn test_should_delete_batch_despite_failing_items() {
        let fx = fixture();
        let bucket = fx.create_test_bucket("batch");
        for key in ["a", "b", "c"] {
            fx.put_text(&bucket, key, key);
        }

        let out = fx
            .provider
            .handle_delete_objects(DeleteObjectsInput {
                bucket: bucket.clone(),
                objects: vec![
                    ObjectIdentifier {
                        key: "a".to_owned(),
                        version_id: Some("null".to_owned()),
                    },
                    ObjectIdentifier {
                        key: "b".to_owned(),
                        version_id: Some("not-a-version".to_owned()),
                    },
                    ObjectIdentifier {
                        key: "c".to_owned(),
                        version_id: Some("null".to_owned()),
                    },
                ],
                quiet: false,
            })
            .unwrap_or_else(|e| panic!("delete_objects: {e}"));

        let deleted: Vec<&str> = out.deleted.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(deleted, vec!["a", "c"]);
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].code, "NoSuchVersion");
        assert_eq!(fx.store.len(), 1);
        assert_eq!(fx.get_text(&bucket, "b", None), "b");
    }
}
