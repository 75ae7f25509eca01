//! Versioning integration tests.

#[cfg(test)]
mod tests {
    use objstack_s3_model::BucketVersioningStatus;
    use objstack_s3_model::input::{DeleteObjectInput, GetObjectInput};

    use crate::fixture;

    #[test]
    fn test_should_run_null_version_scenario_end_to_end() {
        let fx = fixture();
        let bucket = fx.create_test_bucket("e2e");

        fx.put_text(&bucket, "a.txt", "Text1");
        fx.put_text(&bucket, "a.txt", "Text2");
        let got = fx.get(&bucket, "a.txt", None);
        assert_eq!(got.version_id, "null");
        assert_eq!(fx.get_text(&bucket, "a.txt", None), "Text2");

        fx.set_versioning(&bucket, BucketVersioningStatus::Enabled);
        let v3 = fx.put_text(&bucket, "a.txt", "Text3").version_id;
        assert_ne!(v3, "null");

        assert_eq!(fx.get_text(&bucket, "a.txt", Some("null")), "Text2");
        assert_eq!(fx.get_text(&bucket, "a.txt", None), "Text3");
        assert_eq!(fx.get_text(&bucket, "a.txt", Some(&v3)), "Text3");
        // Text1 was retired by the second unversioned put.
        assert_eq!(fx.store.len(), 2);
    }

    #[test]
    fn test_should_always_return_most_recent_put() {
        let fx = fixture();
        let bucket = fx.create_test_bucket("latest");
        let statuses = [
            None,
            Some(BucketVersioningStatus::Enabled),
            Some(BucketVersioningStatus::Suspended),
        ];
        for (round, status) in statuses.into_iter().enumerate() {
            if let Some(status) = status {
                fx.set_versioning(&bucket, status);
            }
            for i in 0..3 {
                let body = format!("round-{round}-put-{i}");
                fx.put_text(&bucket, "k", &body);
                assert_eq!(fx.get_text(&bucket, "k", None), body);
            }
        }
    }

    #[test]
    fn test_should_keep_one_null_version_when_suspended() {
        let fx = fixture();
        let bucket = fx.create_test_bucket("suspend");
        fx.set_versioning(&bucket, BucketVersioningStatus::Enabled);
        let v1 = fx.put_text(&bucket, "k", "enabled").version_id;

        fx.set_versioning(&bucket, BucketVersioningStatus::Suspended);
        assert_eq!(fx.put_text(&bucket, "k", "s1").version_id, "null");
        assert_eq!(fx.put_text(&bucket, "k", "s2").version_id, "null");

        assert_eq!(fx.get_text(&bucket, "k", Some("null")), "s2");
        assert_eq!(fx.get_text(&bucket, "k", Some(&v1)), "enabled");
        assert_eq!(fx.store.len(), 2);

        // A delete in suspended mode replaces the null version with a marker.
        let out = fx
            .provider
            .handle_delete_object(DeleteObjectInput {
                bucket: bucket.clone(),
                key: "k".to_owned(),
                version_id: None,
            })
            .unwrap_or_else(|e| panic!("delete: {e}"));
        assert!(out.delete_marker);
        assert_eq!(out.version_id, "null");
        assert_eq!(fx.store.len(), 1);
        assert!(fx.get(&bucket, "k", Some("null")).delete_marker);
        assert_eq!(fx.get_text(&bucket, "k", Some(&v1)), "enabled");
    }

    #[test]
    fn test_should_reach_at_most_one_version_through_null() {
        let fx = fixture();
        let bucket = fx.create_test_bucket("unique");
        for i in 0..5 {
            fx.put_text(&bucket, "k", &format!("body-{i}"));
            if i % 2 == 1 {
                fx.provider
                    .handle_delete_object(DeleteObjectInput {
                        bucket: bucket.clone(),
                        key: "k".to_owned(),
                        version_id: None,
                    })
                    .unwrap_or_else(|e| panic!("delete: {e}"));
            }
            let handle = fx
                .provider
                .state()
                .bucket(&bucket)
                .unwrap_or_else(|e| panic!("bucket: {e}"));
            let state = handle.read().unwrap_or_else(|e| panic!("read: {e}"));
            let entry = state
                .objects
                .get("k")
                .unwrap_or_else(|| panic!("key vanished"));
            assert_eq!(entry.len(), 1, "a non-versioned key keeps a single version");
        }
        assert!(fx.store.len() <= 1);
    }

    #[test]
    fn test_should_reject_null_without_virtual_version() {
        let fx = fixture();
        let bucket = fx.create_test_bucket("nonull");
        fx.set_versioning(&bucket, BucketVersioningStatus::Enabled);
        fx.put_text(&bucket, "k", "data");

        let err = fx
            .provider
            .handle_get_object(GetObjectInput {
                bucket,
                key: "k".to_owned(),
                version_id: Some("null".to_owned()),
            })
            .err()
            .unwrap_or_else(|| panic!("expected an error"));
        assert_eq!(err.code(), "NoSuchVersion");
        assert_eq!(err.status_code(), 404);
    }
}
