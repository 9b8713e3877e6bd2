//! `pk stats`.

use pustakalaya_console::stats::StatsAggregator;

use super::{CliError, Context};
use crate::output;

/// Print the four library counters.
///
/// # Errors
///
/// Returns the gateway error if the counters cannot be fetched.
pub async fn show(ctx: &Context) -> Result<(), CliError> {
    ctx.require_session()?;

    let mut stats = StatsAggregator::new(ctx.api.clone());
    stats.refresh().await?;
    if let Some(stats) = stats.stats() {
        output::stats(stats)?;
    }
    Ok(())
}
