//! Bucket operations: listing, creation, deletion, website config and
//! statistics.

use sctl_core::{Credentials, ObjectStore as _, random};
use sctl_s3::{S3Client, StatsClient};

use super::storage_failure;
use crate::cli::{BucketAddArgs, BucketArgs, BucketWebArgs, WebAction};
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Enumerate buckets owned by the account.
pub async fn list(creds: &Credentials, formatter: &Formatter) -> ExitCode {
    let client = S3Client::new(creds).await;

    match client.list_buckets().await {
        Ok(listing) => {
            formatter.println("Buckets list");
            if let Some(owner) = &listing.owner {
                formatter.println(&format!(
                    "  Owner: DisplayName '{}' ID '{}'",
                    owner.display_name, owner.id
                ));
            }
            for bucket in &listing.buckets {
                let created = bucket
                    .created
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "-".to_string());
                formatter.println(&format!(
                    "  Bucket: Name {} CreationDate {}",
                    formatter.style_name(&bucket.name),
                    formatter.style_date(&created)
                ));
            }
            ExitCode::Success
        }
        Err(e) => storage_failure(formatter, "list buckets", &e),
    }
}

/// Create a bucket, generating a name when none was given.
pub async fn add(args: BucketAddArgs, creds: &Credentials, formatter: &Formatter) -> ExitCode {
    let name = args.name.unwrap_or_else(random::bucket_name);
    let client = S3Client::new(creds).await;

    formatter.println(&format!("Creating bucket {}", formatter.style_name(&name)));
    match client.create_bucket(&name).await {
        Ok(()) => {
            formatter.success("done");
            ExitCode::Success
        }
        Err(e) => storage_failure(formatter, "create bucket", &e),
    }
}

/// Delete a bucket.
pub async fn del(args: BucketArgs, creds: &Credentials, formatter: &Formatter) -> ExitCode {
    let client = S3Client::new(creds).await;

    formatter.println(&format!(
        "Deleting bucket {}",
        formatter.style_name(&args.name)
    ));
    match client.delete_bucket(&args.name).await {
        Ok(()) => {
            formatter.success("done");
            ExitCode::Success
        }
        Err(e) => storage_failure(formatter, "delete bucket", &e),
    }
}

/// Get, install or remove the static-website configuration.
pub async fn web(args: BucketWebArgs, creds: &Credentials, formatter: &Formatter) -> ExitCode {
    let client = S3Client::new(creds).await;

    match args.action {
        WebAction::Get => match client.get_website(&args.name).await {
            Ok(config) => {
                formatter.println(&config.to_string());
                ExitCode::Success
            }
            Err(e) => storage_failure(formatter, "get website", &e),
        },
        WebAction::Put => match client.put_website(&args.name).await {
            Ok(()) => {
                formatter.success("done");
                ExitCode::Success
            }
            Err(e) => storage_failure(formatter, "put website", &e),
        },
        WebAction::Del => match client.delete_website(&args.name).await {
            Ok(()) => {
                formatter.success("done");
                ExitCode::Success
            }
            Err(e) => storage_failure(formatter, "del website", &e),
        },
    }
}

/// Print aggregate size and object-count metrics for a bucket.
pub async fn stat(args: BucketArgs, creds: &Credentials, formatter: &Formatter) -> ExitCode {
    let client = StatsClient::new(creds).await;

    match client.bucket_stats(&args.name).await {
        Ok(stats) => {
            formatter.println(&format!(
                "  {}: {} bytes {} objects",
                formatter.style_name(&args.name),
                stats.size_bytes,
                stats.object_count
            ));
            ExitCode::Success
        }
        Err(e) => storage_failure(formatter, "fetch statistics", &e),
    }
}
