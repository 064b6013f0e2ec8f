//! Event notification subscription.

use sctl_core::Credentials;
use sctl_core::admin::{AdminApi, SubscribeRequest};

use super::{admin_client, admin_failure};
use crate::cli::NotifyArgs;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Subscribe a queue to bucket put events.
pub async fn execute(args: NotifyArgs, creds: &Credentials, formatter: &Formatter) -> ExitCode {
    let client = match admin_client(creds, formatter) {
        Ok(client) => client,
        Err(code) => return code,
    };

    let req = SubscribeRequest {
        namespace: args.namespace,
        bucket: args.bucket,
        ops: "put".to_string(),
        queue: args.queue,
    };

    match client.subscribe(&req).await {
        Ok(()) => {
            formatter.success("Notification set up");
            ExitCode::Success
        }
        Err(e) => admin_failure(formatter, "notify", &e),
    }
}
