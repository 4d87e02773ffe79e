//! Fakes shared by the scheduler's unit tests.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use holidays_common::{
    error::Error,
    holiday::{CountryCode, StorageClass, TableRef},
    resource_manager::InMemoryObjectStore,
    state::{HolidaySource, InMemoryHolidaySink},
};
use serde_json::{Value, json};

use crate::tasks::RunContext;

/// Source answering from a fixed map; countries not in the map fail
/// the way an unreachable endpoint would.
#[derive(Debug, Default)]
pub(crate) struct StaticHolidaySource {
    payloads: HashMap<CountryCode, Value>,
}

impl StaticHolidaySource {
    pub(crate) fn with_all_countries() -> Self {
        Self {
            payloads: CountryCode::ALL
                .iter()
                .map(|country| (*country, sample_payload(*country)))
                .collect(),
        }
    }

    pub(crate) fn without(mut self, country: CountryCode) -> Self {
        self.payloads.remove(&country);
        self
    }
}

#[async_trait]
impl HolidaySource for StaticHolidaySource {
    async fn fetch_public_holidays(
        &self,
        _year: i32,
        country: CountryCode,
    ) -> Result<Value, Error> {
        self.payloads
            .get(&country)
            .cloned()
            .ok_or_else(|| Error::Http(format!("connection refused for {country}")))
    }
}

pub(crate) fn sample_payload(country: CountryCode) -> Value {
    json!([
        {
            "date": "2023-01-01",
            "localName": "New Year",
            "name": "New Year's Day",
            "countryCode": country.to_string(),
            "fixed": false,
            "global": true,
            "counties": null,
            "launchYear": null,
            "types": ["Public"]
        },
        {
            "date": "2023-03-08",
            "localName": "Women's Day",
            "name": "International Women's Day",
            "countryCode": country.to_string(),
            "fixed": true,
            "global": true,
            "counties": null,
            "launchYear": 1966,
            "types": ["Public"]
        },
        {
            "date": "2023-05-09",
            "localName": "Victory Day",
            "name": "Victory Day",
            "countryCode": country.to_string(),
            "fixed": true,
            "global": true,
            "counties": null,
            "launchYear": null,
            "types": ["Public"]
        }
    ])
}

pub(crate) struct TestHarness {
    pub(crate) store: Arc<InMemoryObjectStore>,
    pub(crate) sink: Arc<InMemoryHolidaySink>,
    pub(crate) ctx: RunContext,
}

pub(crate) fn harness(source: StaticHolidaySource) -> TestHarness {
    let store = Arc::new(InMemoryObjectStore::new("yi-otus-holidays"));
    let sink = Arc::new(InMemoryHolidaySink::new());

    let ctx = RunContext {
        year: 2023,
        table: TableRef::default(),
        storage_class: StorageClass::Cold,
        store: store.clone(),
        source: Arc::new(source),
        sink: sink.clone(),
    };

    TestHarness { store, sink, ctx }
}
