//! Multipart upload integration tests.

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use objstack_s3_model::CompletedPart;
    use objstack_s3_model::input::{
        CompleteMultipartUploadInput, CreateMultipartUploadInput, ListMultipartUploadsInput,
        ListPartsInput, UploadPartInput,
    };

    use crate::{Fixture, fixture};

    fn start(fx: &Fixture, bucket: &str, key: &str) -> String {
        fx.provider
            .handle_create_multipart_upload(CreateMultipartUploadInput {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
                content_type: Some("application/zip".to_owned()),
                ..CreateMultipartUploadInput::default()
            })
            .unwrap_or_else(|e| panic!("create upload: {e}"))
            .upload_id
    }

    fn upload_part(fx: &Fixture, bucket: &str, key: &str, upload_id: &str, n: i32, body: Bytes) {
        fx.provider
            .handle_upload_part(UploadPartInput {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
                upload_id: upload_id.to_owned(),
                part_number: n,
                body,
            })
            .unwrap_or_else(|e| panic!("upload part {n}: {e}"));
    }

    fn complete_input(bucket: &str, key: &str, upload_id: &str, parts: &[u32]) -> CompleteMultipartUploadInput {
        CompleteMultipartUploadInput {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            upload_id: upload_id.to_owned(),
            parts: parts.iter().copied().map(CompletedPart::new).collect(),
        }
    }

    #[test]
    fn test_should_run_multipart_lifecycle() {
        let fx = fixture();
        let bucket = fx.create_test_bucket("mpu");
        let upload_id = start(&fx, &bucket, "archive.zip");

        let chunk = Bytes::from(vec![b'a'; 64 * 1024]);
        for n in 1..=3 {
            upload_part(&fx, &bucket, "archive.zip", &upload_id, n, chunk.clone());
        }

        let uploads = fx
            .provider
            .handle_list_multipart_uploads(ListMultipartUploadsInput {
                bucket: bucket.clone(),
                ..ListMultipartUploadsInput::default()
            })
            .unwrap_or_else(|e| panic!("list uploads: {e}"));
        assert_eq!(uploads.uploads.len(), 1);
        assert_eq!(uploads.uploads[0].upload_id, upload_id);

        let parts = fx
            .provider
            .handle_list_parts(ListPartsInput {
                bucket: bucket.clone(),
                key: "archive.zip".to_owned(),
                upload_id: upload_id.clone(),
                ..ListPartsInput::default()
            })
            .unwrap_or_else(|e| panic!("list parts: {e}"));
        assert_eq!(parts.parts.len(), 3);
        assert!(!parts.is_truncated);

        let out = fx
            .provider
            .handle_complete_multipart_upload(complete_input(&bucket, "archive.zip", &upload_id, &[1, 2, 3]))
            .unwrap_or_else(|e| panic!("complete: {e}"));
        assert!(out.e_tag.ends_with("-3\""));

        let got = fx.get(&bucket, "archive.zip", None);
        assert_eq!(got.content_length, 3 * 64 * 1024);
        assert_eq!(got.content_type, "application/zip");
        assert_eq!(fx.store.len(), 1);

        let uploads = fx
            .provider
            .handle_list_multipart_uploads(ListMultipartUploadsInput {
                bucket,
                ..ListMultipartUploadsInput::default()
            })
            .unwrap_or_else(|e| panic!("list uploads: {e}"));
        assert!(uploads.uploads.is_empty());
    }

    #[test]
    fn test_should_never_reorder_parts() {
        let fx = fixture();
        let bucket = fx.create_test_bucket("order");
        let upload_id = start(&fx, &bucket, "k");
        upload_part(&fx, &bucket, "k", &upload_id, 1, Bytes::from_static(b"one"));
        upload_part(&fx, &bucket, "k", &upload_id, 2, Bytes::from_static(b"two"));

        for order in [[2, 1], [1, 1]] {
            let err = fx
                .provider
                .handle_complete_multipart_upload(complete_input(&bucket, "k", &upload_id, &order))
                .err()
                .unwrap_or_else(|| panic!("expected an error"));
            assert_eq!(err.code(), "InvalidPartOrder");
        }

        // The failed attempts left the upload intact.
        fx.provider
            .handle_complete_multipart_upload(complete_input(&bucket, "k", &upload_id, &[1, 2]))
            .unwrap_or_else(|e| panic!("complete: {e}"));
        assert_eq!(fx.get_text(&bucket, "k", None), "onetwo");
    }

    #[test]
    fn test_should_block_bucket_deletion_while_upload_in_flight() {
        let fx = fixture();
        let bucket = fx.create_test_bucket("inflight");
        let upload_id = start(&fx, &bucket, "k");

        let err = fx
            .provider
            .handle_delete_bucket(objstack_s3_model::input::DeleteBucketInput {
                bucket: bucket.clone(),
            })
            .err()
            .unwrap_or_else(|| panic!("expected an error"));
        assert_eq!(err.code(), "BucketNotEmpty");

        fx.provider
            .handle_abort_multipart_upload(objstack_s3_model::input::AbortMultipartUploadInput {
                bucket: bucket.clone(),
                key: "k".to_owned(),
                upload_id,
            })
            .unwrap_or_else(|e| panic!("abort: {e}"));
        fx.provider
            .handle_delete_bucket(objstack_s3_model::input::DeleteBucketInput { bucket })
            .unwrap_or_else(|e| panic!("delete bucket: {e}"));
    }
}
