//! Concurrent access integration tests.

#[cfg(test)]
mod tests {
    use std::thread;

    use objstack_s3_model::BucketVersioningStatus;
    use objstack_s3_model::input::{DeleteObjectInput, ListObjectVersionsInput, ListObjectsInput};

    use crate::fixture;

    const THREADS: usize = 8;
    const WRITES: usize = 25;

    #[test]
    fn test_should_keep_every_concurrent_version() {
        let fx = fixture();
        let bucket = fx.create_test_bucket("race");
        fx.set_versioning(&bucket, BucketVersioningStatus::Enabled);

        thread::scope(|s| {
            for t in 0..THREADS {
                let fx = &fx;
                let bucket = &bucket;
                s.spawn(move || {
                    for i in 0..WRITES {
                        fx.put_text(bucket, "hot", &format!("{t}-{i}"));
                    }
                });
            }
        });

        let versions = fx
            .provider
            .handle_list_object_versions(ListObjectVersionsInput {
                bucket: bucket.clone(),
                ..ListObjectVersionsInput::default()
            })
            .unwrap_or_else(|e| panic!("list versions: {e}"));
        assert_eq!(versions.versions.len(), THREADS * WRITES);
        assert_eq!(versions.versions.iter().filter(|v| v.is_latest).count(), 1);
        assert_eq!(fx.store.len(), THREADS * WRITES);
    }

    #[test]
    fn test_should_keep_single_version_when_unversioned() {
        let fx = fixture();
        let bucket = fx.create_test_bucket("overwrite");

        thread::scope(|s| {
            for t in 0..THREADS {
                let fx = &fx;
                let bucket = &bucket;
                s.spawn(move || {
                    for i in 0..WRITES {
                        fx.put_text(bucket, "hot", &format!("{t}-{i}"));
                    }
                });
            }
        });

        let versions = fx
            .provider
            .handle_list_object_versions(ListObjectVersionsInput {
                bucket: bucket.clone(),
                ..ListObjectVersionsInput::default()
            })
            .unwrap_or_else(|e| panic!("list versions: {e}"));
        assert_eq!(versions.versions.len(), 1);
        assert_eq!(versions.versions[0].version_id, "null");
        assert_eq!(fx.store.len(), 1);
    }

    #[test]
    fn test_should_list_while_writers_run() {
        let fx = fixture();
        let bucket = fx.create_test_bucket("mixed");
        fx.set_versioning(&bucket, BucketVersioningStatus::Enabled);
        for i in 0..WRITES {
            fx.put_text(&bucket, &format!("key-{i:03}"), "seed");
        }

        thread::scope(|s| {
            for t in 0..THREADS {
                let fx = &fx;
                let bucket = &bucket;
                s.spawn(move || {
                    for i in 0..WRITES {
                        let key = format!("key-{i:03}");
                        if t % 2 == 0 {
                            fx.put_text(bucket, &key, "again");
                        } else {
                            fx.provider
                                .handle_delete_object(DeleteObjectInput {
                                    bucket: bucket.clone(),
                                    key,
                                    version_id: None,
                                })
                                .unwrap_or_else(|e| panic!("delete: {e}"));
                        }
                    }
                });
            }
            let fx = &fx;
            let bucket = &bucket;
            s.spawn(move || {
                for _ in 0..WRITES {
                    let out = fx
                        .provider
                        .handle_list_objects(ListObjectsInput {
                            bucket: bucket.clone(),
                            ..ListObjectsInput::default()
                        })
                        .unwrap_or_else(|e| panic!("list: {e}"));
                    assert!(out.contents.len() <= WRITES);
                    assert!(out.contents.windows(2).all(|w| w[0].key < w[1].key));
                }
            });
        });

        // Nothing is ever removed, only shadowed.
        let versions = fx
            .provider
            .handle_list_object_versions(ListObjectVersionsInput {
                bucket,
                ..ListObjectVersionsInput::default()
            })
            .unwrap_or_else(|e| panic!("list versions: {e}"));
        let half = THREADS / 2;
        assert_eq!(versions.versions.len(), WRITES * (1 + half));
        assert_eq!(versions.delete_markers.len(), WRITES * half);
        assert_eq!(fx.store.len(), WRITES * (1 + half));
    }
}
