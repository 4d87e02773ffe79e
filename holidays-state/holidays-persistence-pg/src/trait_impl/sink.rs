use async_trait::async_trait;
use holidays_common::{
    error::Error, frame::HolidayFrame, holiday::TableRef, state::HolidaySink,
};
use sea_orm::{ConnectionTrait, DatabaseTransaction, DbBackend, TransactionTrait};
use tracing::{debug, info};

use crate::{
    db::PostgresHolidaySink,
    mapping::db_error_to_domain,
    statements::{
        ColumnKind, build_add_columns, build_column_types_query, build_create_table,
        build_insert_chunks, build_table_lock, infer_column_kinds, resolve_column_kinds,
    },
};

async fn existing_column_kinds(
    txn: &DatabaseTransaction,
    backend: DbBackend,
    table: &TableRef,
) -> Result<Vec<(String, ColumnKind)>, Error> {
    let rows = txn
        .query_all(backend.build(&build_column_types_query(table)))
        .await
        .map_err(db_error_to_domain)?;

    rows.iter()
        .map(|row| {
            let name = row
                .try_get::<String>("", "column_name")
                .map_err(db_error_to_domain)?;
            let udt_name = row
                .try_get::<String>("", "udt_name")
                .map_err(db_error_to_domain)?;
            Ok((name, ColumnKind::from_udt_name(&udt_name)))
        })
        .collect()
}

/// Brings the target table in line with the frame and returns the kinds
/// its cells are converted with. Runs under the table lock.
async fn prepare_table(
    txn: &DatabaseTransaction,
    backend: DbBackend,
    table: &TableRef,
    frame: &HolidayFrame,
) -> Result<Vec<ColumnKind>, Error> {
    let existing = existing_column_kinds(txn, backend, table).await?;

    if existing.is_empty() {
        let kinds = infer_column_kinds(frame);
        txn.execute(backend.build(&build_create_table(table, frame.columns(), &kinds)))
            .await
            .map_err(db_error_to_domain)?;

        info!(%table, "Created table");
        return Ok(kinds);
    }

    let (kinds, missing) = resolve_column_kinds(frame, &existing);
    if !missing.is_empty() {
        txn.execute(backend.build(&build_add_columns(table, &missing)))
            .await
            .map_err(db_error_to_domain)?;

        info!(%table, added = missing.len(), "Added staged columns missing from table");
    }

    Ok(kinds)
}

#[async_trait]
impl HolidaySink for PostgresHolidaySink {
    async fn append_rows(&self, table: &TableRef, frame: &HolidayFrame) -> Result<u64, Error> {
        if frame.columns().is_empty() {
            info!(%table, "Nothing to load, staged frame has no columns");
            return Ok(0);
        }

        let conn = self.connection().await?;
        let backend = conn.get_database_backend();
        let txn = conn.begin().await.map_err(db_error_to_domain)?;

        // Held until commit or rollback.
        txn.execute(backend.build(&build_table_lock(table)))
            .await
            .map_err(db_error_to_domain)?;

        let kinds = prepare_table(&txn, backend, table, frame).await?;
        let inserts = build_insert_chunks(table, frame, &kinds)?;

        let mut rows_written = 0;
        for insert in &inserts {
            let result = txn
                .execute(backend.build(insert))
                .await
                .map_err(db_error_to_domain)?;
            rows_written += result.rows_affected();
        }

        txn.commit().await.map_err(db_error_to_domain)?;

        debug!(%table, statements = inserts.len(), "Committed append transaction");

        Ok(rows_written)
    }
}
