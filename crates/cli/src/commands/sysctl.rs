//! Runtime parameter inspection and modification.

use sctl_core::Credentials;
use sctl_core::admin::AdminApi;

use super::{admin_client, admin_failure};
use crate::cli::SysctlArgs;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Get all parameters, get one, or set one, depending on the flags given.
pub async fn execute(args: SysctlArgs, creds: &Credentials, formatter: &Formatter) -> ExitCode {
    let client = match admin_client(creds, formatter) {
        Ok(client) => client,
        Err(code) => return code,
    };

    match (args.name, args.value) {
        (None, _) => match client.sysctl_all().await {
            Ok(entries) => {
                // Server-returned order, one `name = value` line each.
                for entry in entries {
                    formatter.println(&entry.to_string());
                }
                ExitCode::Success
            }
            Err(e) => admin_failure(formatter, "sysctl", &e),
        },
        (Some(name), None) => match client.sysctl_get(&name).await {
            Ok(entry) => {
                formatter.println(&entry.to_string());
                ExitCode::Success
            }
            Err(e) => admin_failure(formatter, "sysctl", &e),
        },
        (Some(name), Some(value)) => match client.sysctl_set(&name, &value).await {
            Ok(()) => {
                formatter.success(&format!("{name} = {value}"));
                ExitCode::Success
            }
            Err(e) => admin_failure(formatter, "sysctl", &e),
        },
    }
}
