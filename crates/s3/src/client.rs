//! S3 client implementation.
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from sctl-core.
//! The SDK speaks the standard S3 wire protocol (signed requests, XML);
//! nothing of that protocol is reimplemented here.

use async_trait::async_trait;
use jiff::Timestamp;

use sctl_core::{
    BucketEntry, BucketListing, BucketOwner, CompletedUpload, Credentials, Error, FetchedObject,
    ListObjectsQuery, ObjectEntry, ObjectListing, ObjectStore, PartEntry, PartSpec, PartsListing,
    Result, UploadEntry, WebsiteConfig, normalize_endpoint,
};

/// Region the service pretends to live in; it accepts any but the SDK
/// requires one.
pub(crate) const REGION: &str = "us-east-1";

/// S3 client wrapper.
pub struct S3Client {
    inner: aws_sdk_s3::Client,
}

impl S3Client {
    /// Create a new S3 client from resolved credentials.
    ///
    /// Missing credential fields become empty strings; they are not
    /// validated here and fail at call time instead.
    pub async fn new(creds: &Credentials) -> Self {
        let access_key = creds.access_key_id.clone().unwrap_or_default();
        let secret_key = creds.secret_key.clone().unwrap_or_default();
        let endpoint = normalize_endpoint(creds.endpoint_url.as_deref().unwrap_or_default());

        tracing::debug!(endpoint = %endpoint, access_key = %access_key, "connecting to s3 endpoint");

        let credentials = aws_credential_types::Credentials::new(
            access_key,
            secret_key,
            None, // session token
            None, // expiry
            "s3ctl-static-credentials",
        );

        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(REGION))
            .endpoint_url(&endpoint)
            .load()
            .await;

        // Path-style addressing: the service does not resolve
        // bucket-as-hostname.
        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(true)
            .build();

        Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
        }
    }

    /// Format AWS SDK error into a detailed error message.
    fn format_sdk_error<E: std::fmt::Display>(error: &aws_sdk_s3::error::SdkError<E>) -> String {
        match error {
            aws_sdk_s3::error::SdkError::ServiceError(service_err) => {
                let err = service_err.err();
                let meta = service_err.raw();
                let mut msg = format!("Service error: {}", err);
                if let Some(code) = meta.headers().get("x-amz-error-code")
                    && let Ok(code_str) = std::str::from_utf8(code.as_bytes())
                {
                    msg.push_str(&format!(" (code: {})", code_str));
                }
                msg
            }
            aws_sdk_s3::error::SdkError::ConstructionFailure(err) => {
                format!("Request construction failed: {:?}", err)
            }
            aws_sdk_s3::error::SdkError::TimeoutError(_) => "Request timeout".to_string(),
            aws_sdk_s3::error::SdkError::DispatchFailure(err) => {
                format!("Network dispatch error: {:?}", err)
            }
            aws_sdk_s3::error::SdkError::ResponseError(err) => {
                format!("Response error: {:?}", err)
            }
            _ => error.to_string(),
        }
    }

    /// Classify an SDK error as NotFound or Network.
    fn classify<E: std::fmt::Display>(
        what: impl Into<String>,
        error: &aws_sdk_s3::error::SdkError<E>,
    ) -> Error {
        let msg = Self::format_sdk_error(error);
        if msg.contains("NotFound")
            || msg.contains("NoSuchBucket")
            || msg.contains("NoSuchKey")
            || msg.contains("NoSuchUpload")
        {
            Error::NotFound(what.into())
        } else {
            Error::Network(msg)
        }
    }
}

/// `display_name/id` owner label; the service reports an empty display
/// name for anonymous listings, which renders as no owner at all.
fn owner_label(display_name: Option<&str>, id: Option<&str>) -> Option<String> {
    let name = display_name.unwrap_or_default();
    if name.is_empty() {
        return None;
    }
    Some(format!("{}/{}", name, id.unwrap_or_default()))
}

fn to_timestamp(dt: Option<&aws_sdk_s3::primitives::DateTime>) -> Option<Timestamp> {
    dt.and_then(|d| Timestamp::from_second(d.secs()).ok())
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn list_buckets(&self) -> Result<BucketListing> {
        let response = self
            .inner
            .list_buckets()
            .send()
            .await
            .map_err(|e| Error::Network(Self::format_sdk_error(&e)))?;

        let owner = response.owner().map(|o| BucketOwner {
            display_name: o.display_name().unwrap_or_default().to_string(),
            id: o.id().unwrap_or_default().to_string(),
        });

        let buckets = response
            .buckets()
            .iter()
            .map(|b| BucketEntry {
                name: b.name().unwrap_or_default().to_string(),
                created: to_timestamp(b.creation_date()),
            })
            .collect();

        Ok(BucketListing { owner, buckets })
    }

    async fn list_objects(&self, bucket: &str, query: ListObjectsQuery) -> Result<ObjectListing> {
        let mut request = self
            .inner
            .list_objects_v2()
            .bucket(bucket)
            .max_keys(query.max_keys)
            .fetch_owner(query.fetch_owner);

        // Empty optional strings never reach the wire.
        if let Some(d) = query.delimiter.filter(|d| !d.is_empty()) {
            request = request.delimiter(d);
        }
        if let Some(p) = query.prefix.filter(|p| !p.is_empty()) {
            request = request.prefix(p);
        }
        if let Some(t) = query.continuation_token.filter(|t| !t.is_empty()) {
            request = request.continuation_token(t);
        }
        if let Some(s) = query.start_after.filter(|s| !s.is_empty()) {
            request = request.start_after(s);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Self::classify(format!("bucket {bucket}"), &e))?;

        let objects = response
            .contents()
            .iter()
            .map(|o| ObjectEntry {
                key: o.key().unwrap_or_default().to_string(),
                size: o.size().unwrap_or(0),
                etag: o.e_tag().map(String::from),
                owner: o
                    .owner()
                    .and_then(|ow| owner_label(ow.display_name(), ow.id())),
            })
            .collect();

        let common_prefixes = response
            .common_prefixes()
            .iter()
            .filter_map(|p| p.prefix().map(String::from))
            .collect();

        Ok(ObjectListing {
            key_count: response.key_count().unwrap_or(0),
            objects,
            common_prefixes,
            next_token: response
                .next_continuation_token()
                .filter(|t| !t.is_empty())
                .map(String::from),
            start_after: response
                .start_after()
                .filter(|s| !s.is_empty())
                .map(String::from),
        })
    }

    async fn list_uploads(&self, bucket: &str) -> Result<Vec<UploadEntry>> {
        let response = self
            .inner
            .list_multipart_uploads()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| Self::classify(format!("bucket {bucket}"), &e))?;

        Ok(response
            .uploads()
            .iter()
            .map(|u| UploadEntry {
                key: u.key().unwrap_or_default().to_string(),
                upload_id: u.upload_id().unwrap_or_default().to_string(),
                initiated: to_timestamp(u.initiated()),
            })
            .collect())
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        self.inner
            .create_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| Error::Network(Self::format_sdk_error(&e)))?;

        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        self.inner
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| Self::classify(format!("bucket {bucket}"), &e))?;

        Ok(())
    }

    async fn get_website(&self, bucket: &str) -> Result<WebsiteConfig> {
        let response = self
            .inner
            .get_bucket_website()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| Self::classify(format!("bucket {bucket}"), &e))?;

        Ok(WebsiteConfig {
            index_document: response
                .index_document()
                .map(|d| d.suffix().to_string()),
            error_document: response.error_document().map(|d| d.key().to_string()),
            redirect_all_to: response
                .redirect_all_requests_to()
                .map(|r| r.host_name().to_string()),
        })
    }

    async fn put_website(&self, bucket: &str) -> Result<()> {
        use aws_sdk_s3::types::{ErrorDocument, WebsiteConfiguration};

        let error_document = ErrorDocument::builder()
            .key("my404.html")
            .build()
            .map_err(|e| Error::General(e.to_string()))?;

        let config = WebsiteConfiguration::builder()
            .error_document(error_document)
            .build();

        self.inner
            .put_bucket_website()
            .bucket(bucket)
            .website_configuration(config)
            .send()
            .await
            .map_err(|e| Self::classify(format!("bucket {bucket}"), &e))?;

        Ok(())
    }

    async fn delete_website(&self, bucket: &str) -> Result<()> {
        self.inner
            .delete_bucket_website()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| Self::classify(format!("bucket {bucket}"), &e))?;

        Ok(())
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<Option<String>> {
        let body = aws_sdk_s3::primitives::ByteStream::from(body);

        let response = self
            .inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Network(Self::format_sdk_error(&e)))?;

        Ok(response.e_tag().map(String::from))
    }

    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        range: Option<&str>,
    ) -> Result<FetchedObject> {
        let mut request = self.inner.get_object().bucket(bucket).key(key);

        if let Some(range) = range {
            request = request.range(range);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Self::classify(format!("{bucket}/{key}"), &e))?;

        let etag = response.e_tag().map(String::from);
        let body = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Network(e.to_string()))?
            .into_bytes()
            .to_vec();

        Ok(FetchedObject { body, etag })
    }

    async fn copy_object(
        &self,
        src_bucket: &str,
        src_key: &str,
        dst_bucket: &str,
        dst_key: &str,
    ) -> Result<()> {
        let copy_source = format!("{}/{}", src_bucket, src_key);

        self.inner
            .copy_object()
            .copy_source(&copy_source)
            .bucket(dst_bucket)
            .key(dst_key)
            .send()
            .await
            .map_err(|e| Self::classify(copy_source.clone(), &e))?;

        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.inner
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Self::classify(format!("{bucket}/{key}"), &e))?;

        Ok(())
    }

    async fn create_upload(&self, bucket: &str, key: &str) -> Result<String> {
        let response = self
            .inner
            .create_multipart_upload()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Self::classify(format!("{bucket}/{key}"), &e))?;

        response
            .upload_id()
            .map(String::from)
            .ok_or_else(|| Error::General("no upload id in response".to_string()))
    }

    async fn upload_part(
        &self,
        bucket: &str,
        key: &str,
        part_number: i32,
        upload_id: &str,
        body: Vec<u8>,
    ) -> Result<Option<String>> {
        let body = aws_sdk_s3::primitives::ByteStream::from(body);

        let response = self
            .inner
            .upload_part()
            .bucket(bucket)
            .key(key)
            .part_number(part_number)
            .upload_id(upload_id)
            .body(body)
            .send()
            .await
            .map_err(|e| Self::classify(format!("upload {upload_id}"), &e))?;

        Ok(response.e_tag().map(String::from))
    }

    async fn complete_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        parts: Vec<PartSpec>,
    ) -> Result<CompletedUpload> {
        use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};

        let completed: Vec<CompletedPart> = parts
            .into_iter()
            .map(|p| {
                CompletedPart::builder()
                    .part_number(p.number)
                    .e_tag(p.etag)
                    .build()
            })
            .collect();

        let upload = CompletedMultipartUpload::builder()
            .set_parts(Some(completed))
            .build();

        let response = self
            .inner
            .complete_multipart_upload()
            .bucket(bucket)
            .key(key)
            .upload_id(upload_id)
            .multipart_upload(upload)
            .send()
            .await
            .map_err(|e| Self::classify(format!("upload {upload_id}"), &e))?;

        Ok(CompletedUpload {
            bucket: response.bucket().map(String::from),
            key: response.key().map(String::from),
            etag: response.e_tag().map(String::from),
        })
    }

    async fn abort_upload(&self, bucket: &str, key: &str, upload_id: &str) -> Result<()> {
        self.inner
            .abort_multipart_upload()
            .bucket(bucket)
            .key(key)
            .upload_id(upload_id)
            .send()
            .await
            .map_err(|e| Self::classify(format!("upload {upload_id}"), &e))?;

        Ok(())
    }

    async fn list_parts(&self, bucket: &str, key: &str, upload_id: &str) -> Result<PartsListing> {
        let response = self
            .inner
            .list_parts()
            .bucket(bucket)
            .key(key)
            .upload_id(upload_id)
            .send()
            .await
            .map_err(|e| Self::classify(format!("upload {upload_id}"), &e))?;

        let parts = response
            .parts()
            .iter()
            .map(|p| PartEntry {
                number: p.part_number().unwrap_or(0),
                size: p.size().unwrap_or(0),
                etag: p.e_tag().map(String::from),
                last_modified: to_timestamp(p.last_modified()),
            })
            .collect();

        Ok(PartsListing {
            bucket: response.bucket().unwrap_or(bucket).to_string(),
            key: response.key().unwrap_or(key).to_string(),
            upload_id: response.upload_id().unwrap_or(upload_id).to_string(),
            parts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_label() {
        assert_eq!(
            owner_label(Some("alice"), Some("id1")).as_deref(),
            Some("alice/id1")
        );
        assert_eq!(owner_label(Some(""), Some("id1")), None);
        assert_eq!(owner_label(None, Some("id1")), None);
    }

    #[test]
    fn test_to_timestamp() {
        let dt = aws_sdk_s3::primitives::DateTime::from_secs(0);
        let ts = to_timestamp(Some(&dt)).unwrap();
        assert_eq!(ts.as_second(), 0);
        assert!(to_timestamp(None).is_none());
    }
}
