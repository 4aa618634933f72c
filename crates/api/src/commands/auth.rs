//! Post-login hooks

use std::sync::Arc;

use calsync_core::RefreshReport;
use calsync_domain::{Credential, Result};
use tokio::task::JoinHandle;
use tracing::{error, info, Instrument};

use crate::AppContext;

/// Start a background refresh for a user who just signed in.
///
/// Returns `None` when `sync.sync_on_login` is disabled. The task runs
/// independently of the login flow: its failures are logged here and only
/// reach whoever awaits the handle.
pub fn spawn_post_login_sync(
    ctx: &Arc<AppContext>,
    user_id: impl Into<String>,
    credential: Credential,
) -> Option<JoinHandle<Result<RefreshReport>>> {
    if !ctx.config.sync.sync_on_login {
        return None;
    }

    let user_id = user_id.into();
    let calendar = Arc::clone(&ctx.calendar);
    let span = tracing::info_span!("post_login_sync", user_id = %user_id);

    let handle = tokio::spawn(
        async move {
            match calendar.refresh(&user_id, &credential).await {
                Ok(report) => {
                    info!(fetched = report.fetched, "Post-login calendar sync complete");
                    Ok(report)
                }
                Err(err) => {
                    error!(error = %err, error_type = err.label(), "Post-login calendar sync failed");
                    Err(err)
                }
            }
        }
        .instrument(span),
    );

    Some(handle)
}
