use holidays_common::{
    error::Error,
    frame::{HolidayFrame, PIPE_DELIMITER},
    holiday::{CountryCode, StagedObjectKey},
};
use tracing::info;

use super::RunContext;

/// Reads a staged object back and appends its rows to the holidays table.
/// ---
/// No existence check, validation or conflict handling: a missing or
/// malformed object fails the task before any row is written, and loading
/// the same object twice stores its rows twice.
pub async fn stage_and_load(ctx: &RunContext, country: CountryCode) -> Result<u64, Error> {
    let key = StagedObjectKey::new(ctx.year, country);

    let staged = ctx.store.get(&key).await?;
    let frame = HolidayFrame::from_delimited(&staged, PIPE_DELIMITER)?;

    info!(
        key = %key,
        columns = frame.columns().len(),
        rows = frame.len(),
        "Parsed staged object"
    );

    let rows_written = ctx.sink.append_rows(&ctx.table, &frame).await?;

    info!(key = %key, table = %ctx.table, rows = rows_written, "Loaded holidays");

    Ok(rows_written)
}
