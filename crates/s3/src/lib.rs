//! sctl-s3: outbound adapters for the s3ctl CLI.
//!
//! Three clients, one per remote surface:
//! - [`S3Client`] wraps aws-sdk-s3 and implements the `ObjectStore` trait
//!   from sctl-core,
//! - [`AdminClient`] speaks the JSON-over-HTTP admin channel and implements
//!   `AdminApi`,
//! - [`StatsClient`] wraps aws-sdk-cloudwatch for bucket metrics.

pub mod admin;
pub mod client;
pub mod stats;

pub use admin::AdminClient;
pub use client::S3Client;
pub use stats::{BucketStats, StatsClient};
