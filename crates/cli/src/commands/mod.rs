//! Command dispatch.
//!
//! Exactly one operation executes per invocation: resolve credentials,
//! build the one client the operation needs, perform the call, print,
//! return an exit code. Nothing is retried and no state survives the
//! invocation beyond the credentials file.

mod bucket;
mod keys;
mod multipart;
mod notify;
mod object;
mod sysctl;

use std::path::Path;

use sctl_core::{CredSources, Credentials, Error, random};
use sctl_s3::AdminClient;

use crate::cli::{Cli, Command};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Resolve credentials and dispatch the selected subcommand.
pub async fn run(cli: Cli) -> ExitCode {
    let formatter = Formatter::new(OutputConfig {
        quiet: cli.quiet,
        no_color: cli.no_color,
    });

    let sources = CredSources {
        access_key_id: cli.access_key_id,
        secret_key: cli.secret_key_id,
        endpoint_url: cli.endpoint_url,
        admin_secret: cli.admin_secret,
        conf: cli.conf,
    };

    let mut creds = match Credentials::resolve(&sources) {
        Ok(creds) => creds,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::GeneralError;
        }
    };

    tracing::debug!(
        endpoint = creds.endpoint_url.as_deref().unwrap_or("-"),
        access_key = creds.access_key_id.as_deref().unwrap_or("-"),
        "resolved credentials"
    );

    // Admin commands fall back to the locally installed service token.
    if matches!(
        &cli.command,
        Command::Keygen(_) | Command::Keydel | Command::Sysctl(_) | Command::Notify(_)
    ) {
        creds.guess_admin_token();
    }

    match cli.command {
        Command::Keygen(args) => keys::keygen(args, &mut creds, &formatter).await,
        Command::Keydel => keys::keydel(&creds, &formatter).await,
        Command::Sysctl(args) => sysctl::execute(args, &creds, &formatter).await,
        Command::Notify(args) => notify::execute(args, &creds, &formatter).await,
        Command::ListBuckets => bucket::list(&creds, &formatter).await,
        Command::ListObjects(args) => object::list(args, &creds, &formatter).await,
        Command::ListUploads(args) => multipart::list_uploads(args, &creds, &formatter).await,
        Command::BucketAdd(args) => bucket::add(args, &creds, &formatter).await,
        Command::BucketDel(args) => bucket::del(args, &creds, &formatter).await,
        Command::BucketWeb(args) => bucket::web(args, &creds, &formatter).await,
        Command::BucketStat(args) => bucket::stat(args, &creds, &formatter).await,
        Command::ObjectAdd(args) => object::add(args, &creds, &formatter).await,
        Command::ObjectGet(args) => object::get(args, &creds, &formatter).await,
        Command::ObjectCopy(args) => object::copy(args, &creds, &formatter).await,
        Command::ObjectDel(args) => object::del(args, &creds, &formatter).await,
        Command::ObjectPartInit(args) => multipart::init(args, &creds, &formatter).await,
        Command::ObjectPartFini(args) => multipart::fini(args, &creds, &formatter).await,
        Command::ObjectPartAbort(args) => multipart::abort(args, &creds, &formatter).await,
        Command::ObjectPartAdd(args) => multipart::add(args, &creds, &formatter).await,
        Command::ObjectPartList(args) => multipart::list_parts(args, &creds, &formatter).await,
    }
}

/// Build the admin client, reporting construction trouble as a failure of
/// the invocation.
pub(crate) fn admin_client(
    creds: &Credentials,
    formatter: &Formatter,
) -> Result<AdminClient, ExitCode> {
    match AdminClient::new(creds.endpoint_url.as_deref(), creds.admin_secret.as_deref()) {
        Ok(client) => Ok(client),
        Err(e) => {
            formatter.error(&format!("Failed to create admin client: {e}"));
            Err(ExitCode::GeneralError)
        }
    }
}

/// Report an admin-channel failure. A response with a non-success status
/// prints the status code and body; no response at all prints a generic
/// line referencing the command name. Both exit 1.
pub(crate) fn admin_failure(formatter: &Formatter, cmd: &str, err: &Error) -> ExitCode {
    match err {
        Error::AdminStatus { status, body } => {
            formatter.error(&format!("Command '{cmd}' failed {status} with: {body}"));
        }
        _ => {
            formatter.error(&format!("Command '{cmd}' failed: {err}"));
        }
    }
    ExitCode::GeneralError
}

/// Report a storage-path failure and map it to an exit code.
pub(crate) fn storage_failure(formatter: &Formatter, what: &str, err: &Error) -> ExitCode {
    formatter.error(&format!("Can't {what}: {err}"));
    ExitCode::from_error(err)
}

/// Object/part body: file contents when a file was given, otherwise
/// `size` (default 64) bytes of random alphanumeric content.
pub(crate) fn read_body(
    file: Option<&Path>,
    size: Option<usize>,
    formatter: &Formatter,
) -> Result<Vec<u8>, ExitCode> {
    match file {
        Some(path) => std::fs::read(path).map_err(|e| {
            formatter.error(&format!("Can't read {}: {e}", path.display()));
            ExitCode::GeneralError
        }),
        None => Ok(random::payload(size.unwrap_or(random::DEFAULT_PAYLOAD_LEN))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_body_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"payload bytes").unwrap();

        let body = read_body(Some(file.path()), None, &Formatter::default()).unwrap();
        assert_eq!(body, b"payload bytes");
    }

    #[test]
    fn test_read_body_generated() {
        let body = read_body(None, None, &Formatter::default()).unwrap();
        assert_eq!(body.len(), 64);

        let body = read_body(None, Some(100), &Formatter::default()).unwrap();
        assert_eq!(body.len(), 100);
    }

    #[test]
    fn test_read_body_missing_file() {
        let err = read_body(
            Some(Path::new("/nonexistent/body.bin")),
            None,
            &Formatter::default(),
        )
        .unwrap_err();
        assert_eq!(err, ExitCode::GeneralError);
    }

    #[test]
    fn test_admin_failure_exit_code() {
        let formatter = Formatter::default();
        let code = admin_failure(
            &formatter,
            "keygen",
            &Error::Network("connection refused".to_string()),
        );
        assert_eq!(code, ExitCode::GeneralError);

        let code = admin_failure(
            &formatter,
            "keygen",
            &Error::AdminStatus {
                status: 403,
                body: "denied".to_string(),
            },
        );
        assert_eq!(code, ExitCode::GeneralError);
    }

    #[test]
    fn test_storage_failure_exit_code() {
        let formatter = Formatter::default();
        let code = storage_failure(
            &formatter,
            "delete bucket",
            &Error::NotFound("bucket b".to_string()),
        );
        assert_eq!(code, ExitCode::NotFound);
    }
}
