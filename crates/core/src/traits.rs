//! ObjectStore trait: the narrow interface every storage operation of the
//! CLI goes through. The SDK-backed implementation lives in `sctl-s3`;
//! keeping the trait here keeps the CLI layer a pure
//! parse -> validate -> dispatch -> format pipeline.

use async_trait::async_trait;
use jiff::Timestamp;

use crate::error::{Error, Result};

/// Account owner as reported by ListBuckets.
#[derive(Debug, Clone, Default)]
pub struct BucketOwner {
    pub display_name: String,
    pub id: String,
}

/// One bucket entry from ListBuckets.
#[derive(Debug, Clone)]
pub struct BucketEntry {
    pub name: String,
    pub created: Option<Timestamp>,
}

/// ListBuckets result: owner plus bucket entries.
#[derive(Debug, Clone, Default)]
pub struct BucketListing {
    pub owner: Option<BucketOwner>,
    pub buckets: Vec<BucketEntry>,
}

/// Query parameters for a paginated object listing.
#[derive(Debug, Clone)]
pub struct ListObjectsQuery {
    pub delimiter: Option<String>,
    pub max_keys: i32,
    pub prefix: Option<String>,
    pub continuation_token: Option<String>,
    pub fetch_owner: bool,
    pub start_after: Option<String>,
}

impl Default for ListObjectsQuery {
    fn default() -> Self {
        Self {
            delimiter: None,
            max_keys: 1000,
            prefix: None,
            continuation_token: None,
            fetch_owner: false,
            start_after: None,
        }
    }
}

/// One object entry from ListObjectsV2.
#[derive(Debug, Clone)]
pub struct ObjectEntry {
    pub key: String,
    pub size: i64,
    pub etag: Option<String>,
    /// `display_name/id`, present only when the owner was fetched
    pub owner: Option<String>,
}

/// ListObjectsV2 result.
#[derive(Debug, Clone, Default)]
pub struct ObjectListing {
    pub key_count: i32,
    pub objects: Vec<ObjectEntry>,
    pub common_prefixes: Vec<String>,
    /// Set only when the server returned a non-empty continuation token
    pub next_token: Option<String>,
    /// Echo of the StartAfter marker, when non-empty
    pub start_after: Option<String>,
}

/// One in-progress multipart upload.
#[derive(Debug, Clone)]
pub struct UploadEntry {
    pub key: String,
    pub upload_id: String,
    pub initiated: Option<Timestamp>,
}

/// Static-website configuration of a bucket.
#[derive(Debug, Clone, Default)]
pub struct WebsiteConfig {
    pub index_document: Option<String>,
    pub error_document: Option<String>,
    pub redirect_all_to: Option<String>,
}

impl std::fmt::Display for WebsiteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "index {} error {} redirect-all {}",
            self.index_document.as_deref().unwrap_or("-"),
            self.error_document.as_deref().unwrap_or("-"),
            self.redirect_all_to.as_deref().unwrap_or("-"),
        )
    }
}

/// A downloaded object: buffered body plus the response ETag, if any.
#[derive(Debug, Clone)]
pub struct FetchedObject {
    pub body: Vec<u8>,
    pub etag: Option<String>,
}

/// One `part:etag` pair for completing a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartSpec {
    pub number: i32,
    pub etag: String,
}

impl PartSpec {
    /// Parse a `part:etag,part:etag,...` list, preserving order.
    pub fn parse_list(list: &str) -> Result<Vec<Self>> {
        list.split(',')
            .map(|item| {
                let (number, etag) = item.split_once(':').ok_or_else(|| {
                    Error::InvalidArgument(format!("part list entry '{item}' is not part:etag"))
                })?;
                let number: i32 = number.trim().parse().map_err(|_| {
                    Error::InvalidArgument(format!("part number '{number}' is not a number"))
                })?;
                Ok(Self {
                    number,
                    etag: etag.to_string(),
                })
            })
            .collect()
    }
}

/// Result of completing a multipart upload.
#[derive(Debug, Clone)]
pub struct CompletedUpload {
    pub bucket: Option<String>,
    pub key: Option<String>,
    pub etag: Option<String>,
}

/// One already-uploaded part of a multipart upload.
#[derive(Debug, Clone)]
pub struct PartEntry {
    pub number: i32,
    pub size: i64,
    pub etag: Option<String>,
    pub last_modified: Option<Timestamp>,
}

/// ListParts result.
#[derive(Debug, Clone)]
pub struct PartsListing {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
    pub parts: Vec<PartEntry>,
}

/// Object-storage capability consumed by the CLI.
///
/// One method per remote operation; no retry, no caching, no state.
#[async_trait]
pub trait ObjectStore {
    async fn list_buckets(&self) -> Result<BucketListing>;

    async fn list_objects(&self, bucket: &str, query: ListObjectsQuery) -> Result<ObjectListing>;

    async fn list_uploads(&self, bucket: &str) -> Result<Vec<UploadEntry>>;

    async fn create_bucket(&self, bucket: &str) -> Result<()>;

    async fn delete_bucket(&self, bucket: &str) -> Result<()>;

    async fn get_website(&self, bucket: &str) -> Result<WebsiteConfig>;

    async fn put_website(&self, bucket: &str) -> Result<()>;

    async fn delete_website(&self, bucket: &str) -> Result<()>;

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<Option<String>>;

    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        range: Option<&str>,
    ) -> Result<FetchedObject>;

    async fn copy_object(
        &self,
        src_bucket: &str,
        src_key: &str,
        dst_bucket: &str,
        dst_key: &str,
    ) -> Result<()>;

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;

    async fn create_upload(&self, bucket: &str, key: &str) -> Result<String>;

    async fn upload_part(
        &self,
        bucket: &str,
        key: &str,
        part_number: i32,
        upload_id: &str,
        body: Vec<u8>,
    ) -> Result<Option<String>>;

    async fn complete_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        parts: Vec<PartSpec>,
    ) -> Result<CompletedUpload>;

    async fn abort_upload(&self, bucket: &str, key: &str, upload_id: &str) -> Result<()>;

    async fn list_parts(&self, bucket: &str, key: &str, upload_id: &str) -> Result<PartsListing>;
}
