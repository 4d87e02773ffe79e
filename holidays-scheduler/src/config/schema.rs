use std::collections::HashMap;

use holidays_common::{
    error::Error,
    holiday::{StorageClass, TableRef},
};
use serde::Deserialize;

const DEFAULT_YEAR: i32 = 2023;
const DEFAULT_BUCKET: &str = "yi-otus-holidays";
const DEFAULT_API_BASE_URL: &str = "https://date.nager.at";
const DEFAULT_S3_REGION: &str = "us-east-1";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct HolidaysConfig {
    pub workflow: WorkflowSettings,
    /// Inline variables, overridden by `HOLIDAYS_VAR_*` environment entries
    pub variables: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WorkflowSettings {
    pub year: i32,
    pub bucket: String,
    pub api_base_url: String,
    pub s3_region: String,
    pub storage_class: StorageClass,
    pub table: TableRef,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            year: DEFAULT_YEAR,
            bucket: DEFAULT_BUCKET.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            s3_region: DEFAULT_S3_REGION.to_string(),
            storage_class: StorageClass::Cold,
            table: TableRef::default(),
        }
    }
}

impl HolidaysConfig {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        let workflow = &self.workflow;

        if workflow.bucket.trim().is_empty() {
            return Err(Error::Config("workflow.bucket must not be empty".to_string()));
        }

        if workflow.table.schema.trim().is_empty() || workflow.table.name.trim().is_empty() {
            return Err(Error::Config(
                "workflow.table needs both a schema and a name".to_string(),
            ));
        }

        if !(1..=9999).contains(&workflow.year) {
            return Err(Error::Config(format!(
                "workflow.year {} is out of range",
                workflow.year
            )));
        }

        Ok(())
    }
}
