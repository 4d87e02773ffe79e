use std::{collections::HashMap, fmt::Debug};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{error::Error, frame::HolidayFrame, holiday::TableRef};

#[async_trait]
pub trait HolidaySink: Send + Sync + Debug + 'static {
    /// Appends every row of `frame` to `table`.
    /// ---
    /// Append-only: nothing is deduplicated or upserted, loading the same
    /// frame twice stores its rows twice.
    /// Returns the number of rows written.
    async fn append_rows(&self, table: &TableRef, frame: &HolidayFrame) -> Result<u64, Error>;
}

/// Table sink kept in memory, used for dry runs and tests.
#[derive(Debug, Default)]
pub struct InMemoryHolidaySink {
    tables: RwLock<HashMap<String, Vec<Vec<String>>>>,
}

impl InMemoryHolidaySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn rows(&self, table: &TableRef) -> Vec<Vec<String>> {
        self.tables
            .read()
            .await
            .get(&table.to_string())
            .cloned()
            .unwrap_or_default()
    }

    pub async fn row_count(&self, table: &TableRef) -> usize {
        self.tables
            .read()
            .await
            .get(&table.to_string())
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl HolidaySink for InMemoryHolidaySink {
    async fn append_rows(&self, table: &TableRef, frame: &HolidayFrame) -> Result<u64, Error> {
        self.tables
            .write()
            .await
            .entry(table.to_string())
            .or_default()
            .extend(frame.rows().iter().cloned());

        Ok(frame.len() as u64)
    }
}
