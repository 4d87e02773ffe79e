//! Tabular view over the holiday API payload.
//!
//! A [`HolidayFrame`] is the normalized, schema-less form of the JSON
//! response: one column per (flattened) key, one row per holiday.
//! Cells are kept as text since both stages only ever move them
//! through the pipe-delimited staging format.

mod codec;
mod normalize;

pub use codec::PIPE_DELIMITER;

use crate::error::Error;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HolidayFrame {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl HolidayFrame {
    /// Builds a frame, checking every row is as wide as the header.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, Error> {
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(Error::InvalidInput(format!(
                "Row {} has {} cells, expected {}",
                idx,
                row.len(),
                columns.len()
            )));
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows (the header is not counted).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over the cells of a single column.
    pub fn column_values(&self, column_idx: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter_map(move |row| row.get(column_idx).map(String::as_str))
    }
}
