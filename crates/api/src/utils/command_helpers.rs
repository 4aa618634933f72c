//! Command execution helpers
//!
//! Every command times itself and logs its outcome the same way; this keeps
//! that boilerplate out of the command bodies.

use std::future::Future;
use std::time::Instant;

use calsync_domain::Result as DomainResult;

use crate::utils::logging::log_command_execution;

/// Execute a command with timing and outcome logging.
///
/// # Example
///
/// ```rust,ignore
/// pub async fn my_command(ctx: &AppContext) -> Result<Vec<CalendarEvent>> {
///     execute_logged("my_module::my_command", || async {
///         ctx.calendar.list_events("user", from, to).await
///     })
///     .await
/// }
/// ```
pub async fn execute_logged<F, Fut, T>(command_name: &str, command_fn: F) -> DomainResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    let start = Instant::now();

    let result = command_fn().await;

    log_command_execution(command_name, start.elapsed(), result.as_ref().err());
    result
}
