use std::fmt;

use holidays_common::error::Error;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tokio::sync::OnceCell;
use tracing::info;

/// Postgres-backed [holidays_common::state::HolidaySink].
/// ---
/// The connection is opened on first use and then kept for the lifetime
/// of the sink, which is one workflow run. Tasks that never touch the
/// database never open a connection.
pub struct PostgresHolidaySink {
    db_url: String,
    conn: OnceCell<DatabaseConnection>,
}

impl PostgresHolidaySink {
    pub fn new(db_url: impl Into<String>) -> Self {
        Self {
            db_url: db_url.into(),
            conn: OnceCell::new(),
        }
    }

    pub(crate) async fn connection(&self) -> Result<&DatabaseConnection, Error> {
        self.conn
            .get_or_try_init(|| async {
                let mut opt = ConnectOptions::new(self.db_url.clone());
                opt.sqlx_logging(false);

                let conn = Database::connect(opt)
                    .await
                    .map_err(|e| Error::Database(format!("Failed to connect to database: {e}")))?;

                info!("Connected to holidays database");

                Ok(conn)
            })
            .await
    }
}

impl fmt::Debug for PostgresHolidaySink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresHolidaySink")
            .field("connected", &self.conn.initialized())
            .finish()
    }
}
