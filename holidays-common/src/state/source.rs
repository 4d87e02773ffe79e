use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::Error, holiday::CountryCode};

#[async_trait]
pub trait HolidaySource: Send + Sync + Debug + 'static {
    /// Fetches the raw public-holiday payload for one country and year.
    /// ---
    /// The payload is returned as decoded JSON without any schema check,
    /// normalization happens in [`crate::frame::HolidayFrame::from_json`].
    async fn fetch_public_holidays(
        &self,
        year: i32,
        country: CountryCode,
    ) -> Result<serde_json::Value, Error>;
}
