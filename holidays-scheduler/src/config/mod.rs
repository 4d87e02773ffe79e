mod parser;
mod schema;
mod variables;

use std::path::Path;

use holidays_common::error::Error;
use tracing::warn;

pub use parser::parse_yaml;
pub use schema::HolidaysConfig;
pub use variables::{ObsBucketKeys, ObsBucketVariables, VariableStore};

/// Variable holding the object storage endpoint (JSON object).
pub const VAR_OBS_BUCKET_VARIABLES: &str = "obs_bucket_variables";
/// Variable holding the object storage credentials (JSON object).
pub const VAR_OBS_BUCKET_KEYS: &str = "obs_bucket_keys";
/// Variable holding the database connection string.
pub const VAR_PG_CONN: &str = "pg_conn";

/// Loads the configuration file, falling back to defaults when it is absent
/// so that a deployment can be driven by environment variables alone.
pub async fn load_config(path: &Path) -> Result<HolidaysConfig, Error> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => parse_yaml(&contents),
        Err(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
            warn!(
                "Config file {} not found, using defaults and environment variables",
                path.display()
            );
            Ok(HolidaysConfig::default())
        }
        Err(io_err) => Err(Error::Config(format!(
            "Failed to read config file {}: {}",
            path.display(),
            io_err
        ))),
    }
}
