//! sctl-core: Core library for the s3ctl CLI client
//!
//! This crate provides the core functionality for the s3ctl CLI, including:
//! - Credential resolution and the persisted credentials file
//! - Random bucket/object/payload generation
//! - ObjectStore trait for storage operations
//! - AdminApi trait and wire types for the admin side channel
//!
//! This crate is designed to be independent of any specific S3 SDK or HTTP
//! client, allowing for easy testing and potential future support for other
//! backends.

pub mod admin;
pub mod creds;
pub mod error;
pub mod random;
pub mod traits;

pub use creds::{CredSources, Credentials, normalize_endpoint};
pub use error::{Error, Result};
pub use traits::{
    BucketEntry, BucketListing, BucketOwner, CompletedUpload, FetchedObject, ListObjectsQuery,
    ObjectEntry, ObjectListing, ObjectStore, PartEntry, PartSpec, PartsListing, UploadEntry,
    WebsiteConfig,
};
