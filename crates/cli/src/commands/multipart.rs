//! Multipart upload lifecycle: init, part upload, listing, completion,
//! abort.

use sctl_core::{Credentials, ObjectStore as _, PartSpec, random};
use sctl_s3::S3Client;

use super::{read_body, storage_failure};
use crate::cli::{BucketArgs, PartAddArgs, PartFiniArgs, PartInitArgs, PartRefArgs};
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// List in-progress multipart uploads in a bucket.
pub async fn list_uploads(
    args: BucketArgs,
    creds: &Credentials,
    formatter: &Formatter,
) -> ExitCode {
    let client = S3Client::new(creds).await;

    match client.list_uploads(&args.name).await {
        Ok(uploads) => {
            formatter.println(&format!(
                "Bucket {} uploads list",
                formatter.style_name(&args.name)
            ));
            for upload in &uploads {
                let initiated = upload
                    .initiated
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "-".to_string());
                formatter.println(&format!(
                    "  Key {} Initiated {} UploadId {}",
                    upload.key,
                    formatter.style_date(&initiated),
                    upload.upload_id
                ));
            }
            ExitCode::Success
        }
        Err(e) => storage_failure(formatter, "list uploads", &e),
    }
}

/// Start a multipart upload and print the upload id.
pub async fn init(args: PartInitArgs, creds: &Credentials, formatter: &Formatter) -> ExitCode {
    let key = args.key.unwrap_or_else(random::object_key);
    let client = S3Client::new(creds).await;

    formatter.println(&format!(
        "Initiating multipart upload {}/{}",
        formatter.style_name(&args.name),
        formatter.style_name(&key)
    ));
    match client.create_upload(&args.name, &key).await {
        Ok(upload_id) => {
            formatter.println(&format!("  UploadID: {upload_id}"));
            ExitCode::Success
        }
        Err(e) => storage_failure(formatter, "initiate multipart upload", &e),
    }
}

/// Upload one part.
pub async fn add(args: PartAddArgs, creds: &Credentials, formatter: &Formatter) -> ExitCode {
    let body = match read_body(args.file.as_deref(), None, formatter) {
        Ok(body) => body,
        Err(code) => return code,
    };

    let client = S3Client::new(creds).await;

    formatter.println(&format!(
        "Upload part {}/{}/{}/{}",
        args.name, args.key, args.id, args.part
    ));
    match client
        .upload_part(&args.name, &args.key, args.part, &args.id, body)
        .await
    {
        Ok(etag) => {
            formatter.println(&format!("  ETag: {}", etag.as_deref().unwrap_or("-")));
            ExitCode::Success
        }
        Err(e) => storage_failure(formatter, "upload part", &e),
    }
}

/// Complete a multipart upload from a `part:etag,...` list.
pub async fn fini(args: PartFiniArgs, creds: &Credentials, formatter: &Formatter) -> ExitCode {
    // Malformed lists are a usage error before any remote call.
    let parts = match PartSpec::parse_list(&args.list) {
        Ok(parts) => parts,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::UsageError;
        }
    };

    let client = S3Client::new(creds).await;

    formatter.println(&format!(
        "Finalizing multipart upload {}/{}",
        formatter.style_name(&args.name),
        formatter.style_name(&args.key)
    ));
    match client
        .complete_upload(&args.name, &args.key, &args.id, parts)
        .await
    {
        Ok(completed) => {
            formatter.println(&format!(
                "  Bucket {} Key {} ETag {}",
                completed.bucket.as_deref().unwrap_or("-"),
                completed.key.as_deref().unwrap_or("-"),
                completed.etag.as_deref().unwrap_or("-")
            ));
            ExitCode::Success
        }
        Err(e) => storage_failure(formatter, "finalize multipart upload", &e),
    }
}

/// Abort a multipart upload. Already-uploaded parts are discarded by the
/// server; nothing is tracked locally.
pub async fn abort(args: PartRefArgs, creds: &Credentials, formatter: &Formatter) -> ExitCode {
    let client = S3Client::new(creds).await;

    formatter.println(&format!(
        "Aborting multipart upload {}/{}/{}",
        args.name, args.key, args.id
    ));
    match client.abort_upload(&args.name, &args.key, &args.id).await {
        Ok(()) => {
            formatter.success("done");
            ExitCode::Success
        }
        Err(e) => storage_failure(formatter, "abort multipart upload", &e),
    }
}

/// List already-uploaded parts of a multipart upload.
pub async fn list_parts(args: PartRefArgs, creds: &Credentials, formatter: &Formatter) -> ExitCode {
    let client = S3Client::new(creds).await;

    formatter.println(&format!(
        "List uploading parts {}",
        formatter.style_name(&args.name)
    ));
    match client.list_parts(&args.name, &args.key, &args.id).await {
        Ok(listing) => {
            formatter.println(&format!(
                "  Parts {}/{}/{}",
                listing.bucket, listing.key, listing.upload_id
            ));
            for part in &listing.parts {
                let modified = part
                    .last_modified
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "-".to_string());
                formatter.println(&format!(
                    "    PartNumber {:4} Size {:6} ETag {} LastModified {}",
                    part.number,
                    part.size,
                    part.etag.as_deref().unwrap_or("-"),
                    formatter.style_date(&modified)
                ));
            }
            ExitCode::Success
        }
        Err(e) => storage_failure(formatter, "list parts", &e),
    }
}
