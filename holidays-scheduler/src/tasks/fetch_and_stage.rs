use holidays_common::{
    error::Error,
    frame::{HolidayFrame, PIPE_DELIMITER},
    holiday::{CountryCode, StagedObjectKey},
};
use tracing::info;

use super::RunContext;

/// Pulls one country's holidays and writes them as a staged object.
/// ---
/// Nothing is written unless the fetch, normalization and serialization
/// all succeed. The object under `{year}/{country}.csv` is replaced on
/// every run. Returns the number of staged rows.
pub async fn fetch_and_stage(ctx: &RunContext, country: CountryCode) -> Result<usize, Error> {
    let key = StagedObjectKey::new(ctx.year, country);

    let payload = ctx.source.fetch_public_holidays(ctx.year, country).await?;
    let frame = HolidayFrame::from_json(&payload)?;

    info!(
        %country,
        columns = frame.columns().len(),
        rows = frame.len(),
        "Normalized public holidays"
    );

    let staged = frame.to_delimited(PIPE_DELIMITER)?;

    ctx.store.put(&key, &staged, ctx.storage_class).await?;

    info!(
        key = %key,
        location = %ctx.store.location(),
        bytes = staged.len(),
        storage_class = %ctx.storage_class,
        "Staged holidays"
    );

    Ok(frame.len())
}
