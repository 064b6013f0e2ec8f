//! Bucket metrics client.
//!
//! The service exposes aggregate bucket statistics through the CloudWatch
//! metric API on the same endpoint. `bucket_stats` issues the two metric
//! queries the statistics command needs: total size in bytes and object
//! count.

use aws_sdk_cloudwatch::primitives::DateTime;
use aws_sdk_cloudwatch::types::{Dimension, StandardUnit, Statistic};

use sctl_core::{Credentials, Error, Result, normalize_endpoint};

use crate::client::REGION;

const METRIC_NAMESPACE: &str = "AWS/S3";
const METRIC_PERIOD: i32 = 86400;

/// Aggregate statistics for one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketStats {
    pub size_bytes: i64,
    pub object_count: i64,
}

/// CloudWatch client wrapper for bucket statistics.
pub struct StatsClient {
    inner: aws_sdk_cloudwatch::Client,
}

impl StatsClient {
    /// Create a metrics client from resolved credentials.
    pub async fn new(creds: &Credentials) -> Self {
        let access_key = creds.access_key_id.clone().unwrap_or_default();
        let secret_key = creds.secret_key.clone().unwrap_or_default();
        let endpoint = normalize_endpoint(creds.endpoint_url.as_deref().unwrap_or_default());

        tracing::debug!(endpoint = %endpoint, access_key = %access_key, "connecting to metrics endpoint");

        let credentials = aws_credential_types::Credentials::new(
            access_key,
            secret_key,
            None,
            None,
            "s3ctl-static-credentials",
        );

        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(REGION))
            .endpoint_url(&endpoint)
            .load()
            .await;

        Self {
            inner: aws_sdk_cloudwatch::Client::new(&config),
        }
    }

    /// Fetch aggregate size and object count for one bucket.
    ///
    /// Two GetMetricStatistics calls, both over the whole retention window
    /// (the service ignores the epoch time range and reports its current
    /// aggregates).
    pub async fn bucket_stats(&self, bucket: &str) -> Result<BucketStats> {
        let size_bytes = self
            .metric_average(
                bucket,
                "BucketSizeBytes",
                StandardUnit::Bytes,
                "StandardStorage",
            )
            .await?;

        let object_count = self
            .metric_average(
                bucket,
                "NumberOfObjects",
                StandardUnit::Count,
                "AllStorageTypes",
            )
            .await?;

        Ok(BucketStats {
            size_bytes,
            object_count,
        })
    }

    async fn metric_average(
        &self,
        bucket: &str,
        metric: &str,
        unit: StandardUnit,
        storage_type: &str,
    ) -> Result<i64> {
        let bucket_dim = Dimension::builder()
            .name("BucketName")
            .value(bucket)
            .build();
        let storage_dim = Dimension::builder()
            .name("StorageType")
            .value(storage_type)
            .build();

        let response = self
            .inner
            .get_metric_statistics()
            .namespace(METRIC_NAMESPACE)
            .metric_name(metric)
            .start_time(DateTime::from_secs(0))
            .end_time(DateTime::from_secs(0))
            .period(METRIC_PERIOD)
            .statistics(Statistic::Average)
            .unit(unit)
            .dimensions(bucket_dim)
            .dimensions(storage_dim)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let average = response
            .datapoints()
            .first()
            .and_then(|d| d.average())
            .ok_or_else(|| Error::NotFound(format!("no {metric} datapoints for {bucket}")))?;

        Ok(average as i64)
    }
}
