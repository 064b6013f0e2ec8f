//! Access key issuance and revocation.

use sctl_core::Credentials;
use sctl_core::admin::{AdminApi, KeygenRequest};

use super::{admin_client, admin_failure};
use crate::cli::KeygenArgs;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Issue an access key scoped to a namespace and optionally one bucket.
pub async fn keygen(args: KeygenArgs, creds: &mut Credentials, formatter: &Formatter) -> ExitCode {
    let client = match admin_client(creds, formatter) {
        Ok(client) => client,
        Err(code) => return code,
    };

    let req = KeygenRequest {
        namespace: args.namespace,
        lifetime: args.lifetime,
        bucket: args.name,
    };

    match client.keygen(&req).await {
        Ok(pair) => {
            formatter.println(&format!("Access Key {}", pair.access_key_id));
            formatter.println(&format!("Secret Key {}", pair.access_key_secret));

            if args.save {
                creds.access_key_id = Some(pair.access_key_id);
                creds.secret_key = Some(pair.access_key_secret);
                match creds.save() {
                    Ok(()) => formatter.success("Credentials saved"),
                    Err(e) => formatter.warning(&format!("Can't save credentials: {e}")),
                }
            }

            ExitCode::Success
        }
        Err(e) => admin_failure(formatter, "keygen", &e),
    }
}

/// Revoke the currently configured access key.
pub async fn keydel(creds: &Credentials, formatter: &Formatter) -> ExitCode {
    let client = match admin_client(creds, formatter) {
        Ok(client) => client,
        Err(code) => return code,
    };

    let key = creds.access_key_id.clone().unwrap_or_default();

    match client.keydel(&key).await {
        Ok(()) => {
            formatter.success(&format!("Access Key {key} deleted"));
            ExitCode::Success
        }
        Err(e) => admin_failure(formatter, "keydel", &e),
    }
}
