//! Object operations: listing, upload, download, copy, deletion.

use std::io::Write;

use sctl_core::{Credentials, ListObjectsQuery, ObjectStore as _, random};
use sctl_s3::S3Client;

use super::{read_body, storage_failure};
use crate::cli::{ListObjectsArgs, ObjectAddArgs, ObjectCopyArgs, ObjectGetArgs, ObjectRefArgs};
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Paginated object listing.
pub async fn list(args: ListObjectsArgs, creds: &Credentials, formatter: &Formatter) -> ExitCode {
    let client = S3Client::new(creds).await;

    let query = ListObjectsQuery {
        delimiter: args.delimiter,
        max_keys: args.maxkeys,
        prefix: args.prefix,
        continuation_token: args.token,
        fetch_owner: args.owner,
        start_after: args.after,
    };

    match client.list_objects(&args.name, query).await {
        Ok(listing) => {
            formatter.println(&format!(
                "Objects list (bucket {} count {})",
                formatter.style_name(&args.name),
                listing.key_count
            ));
            for object in &listing.objects {
                formatter.println(&format!(
                    "  Object: Key {} Size {} ETag {} Owner {}",
                    object.key,
                    object.size,
                    object.etag.as_deref().unwrap_or("-"),
                    object.owner.as_deref().unwrap_or("None")
                ));
            }
            for prefix in &listing.common_prefixes {
                formatter.println(&format!("    Prefix: {prefix}"));
            }
            if let Some(token) = &listing.next_token {
                formatter.println(&format!("    NextContinuationToken: {token}"));
            }
            if let Some(start_after) = &listing.start_after {
                formatter.println(&format!("    StartAfter: {start_after}"));
            }
            ExitCode::Success
        }
        Err(e) => storage_failure(formatter, "list objects", &e),
    }
}

/// Upload an object, generating key and body when not given.
pub async fn add(args: ObjectAddArgs, creds: &Credentials, formatter: &Formatter) -> ExitCode {
    let key = args.key.unwrap_or_else(random::object_key);

    let body = match read_body(args.file.as_deref(), args.size, formatter) {
        Ok(body) => body,
        Err(code) => return code,
    };

    let client = S3Client::new(creds).await;

    formatter.println(&format!(
        "Creating object {}/{}",
        formatter.style_name(&args.name),
        formatter.style_name(&key)
    ));
    match client.put_object(&args.name, &key, body).await {
        Ok(_) => {
            formatter.success("done");
            ExitCode::Success
        }
        Err(e) => storage_failure(formatter, "create object", &e),
    }
}

/// Download an object to a file or stdout.
pub async fn get(args: ObjectGetArgs, creds: &Credentials, formatter: &Formatter) -> ExitCode {
    // A missing key is not rejected here; it surfaces as a remote-call
    // failure, like any other unresolved field.
    let key = args.key.unwrap_or_default();
    let client = S3Client::new(creds).await;

    formatter.println(&format!(
        "Getting object {}/{}",
        formatter.style_name(&args.name),
        formatter.style_name(&key)
    ));
    match client
        .get_object(&args.name, &key, args.range.as_deref())
        .await
    {
        Ok(object) => {
            formatter.success("done");
            if let Some(etag) = &object.etag {
                formatter.println(&format!("ETag: {etag}"));
            }
            match &args.file {
                Some(path) => {
                    if let Err(e) = std::fs::write(path, &object.body) {
                        formatter.error(&format!("Can't write {}: {e}", path.display()));
                        return ExitCode::GeneralError;
                    }
                }
                None => {
                    // Raw bytes, unconditionally: the body is the result,
                    // not a status line.
                    if let Err(e) = std::io::stdout().write_all(&object.body) {
                        formatter.error(&format!("Can't write object body: {e}"));
                        return ExitCode::GeneralError;
                    }
                }
            }
            ExitCode::Success
        }
        Err(e) => storage_failure(formatter, "get object", &e),
    }
}

/// Server-side copy.
pub async fn copy(args: ObjectCopyArgs, creds: &Credentials, formatter: &Formatter) -> ExitCode {
    let client = S3Client::new(creds).await;

    formatter.println(&format!(
        "Copying object {}/{} -> {}/{}",
        args.src_name, args.src_key, args.name, args.key
    ));
    match client
        .copy_object(&args.src_name, &args.src_key, &args.name, &args.key)
        .await
    {
        Ok(()) => {
            formatter.success("done");
            ExitCode::Success
        }
        Err(e) => storage_failure(formatter, "copy object", &e),
    }
}

/// Delete an object.
pub async fn del(args: ObjectRefArgs, creds: &Credentials, formatter: &Formatter) -> ExitCode {
    let client = S3Client::new(creds).await;

    formatter.println(&format!(
        "Deleting object {}/{}",
        formatter.style_name(&args.name),
        formatter.style_name(&args.key)
    ));
    match client.delete_object(&args.name, &args.key).await {
        Ok(()) => {
            formatter.success("done");
            ExitCode::Success
        }
        Err(e) => storage_failure(formatter, "delete object", &e),
    }
}
