use std::{fmt, sync::Arc};

use holidays_common::{
    holiday::{StorageClass, TableRef},
    resource_manager::ObjectStore,
    state::{HolidaySink, HolidaySource},
};

/// Everything a task needs, built once per workflow run.
#[derive(Clone)]
pub struct RunContext {
    pub year: i32,
    pub table: TableRef,
    pub storage_class: StorageClass,
    pub store: Arc<dyn ObjectStore>,
    pub source: Arc<dyn HolidaySource>,
    pub sink: Arc<dyn HolidaySink>,
}

impl fmt::Debug for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunContext")
            .field("year", &self.year)
            .field("table", &self.table)
            .field("storage_class", &self.storage_class)
            .field("store", &self.store.location())
            .field("source", &self.source)
            .field("sink", &self.sink)
            .finish()
    }
}
