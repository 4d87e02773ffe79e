use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use holidays_common::{
    error::Error,
    event::EventType,
    pipeline::{PipelineInfo, PipelineRun, Schedule},
};
use tracing::{error, info};

/// Fires a pipeline once per day at midnight UTC.
///
/// Only future midnights are considered, so intervals missed while the
/// process was down are not run.
#[derive(Debug, Clone)]
pub struct DailyTrigger {
    pipeline_name: String,
    start_date: NaiveDate,
}

impl DailyTrigger {
    pub fn for_pipeline(info: &PipelineInfo) -> Result<Self, Error> {
        match info.schedule {
            Schedule::Daily => Ok(Self {
                pipeline_name: info.name.clone(),
                start_date: info.start_date,
            }),
            Schedule::Manual => Err(Error::InvalidInput(format!(
                "Pipeline '{}' has no daily schedule",
                info.name
            ))),
        }
    }

    /// The first midnight strictly after `now`, never earlier than the
    /// pipeline's start date.
    pub fn next_fire_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let next_midnight = now
            .date_naive()
            .succ_opt()
            .unwrap_or(NaiveDate::MAX)
            .and_time(NaiveTime::MIN)
            .and_utc();
        let first_fire = self.start_date.and_time(NaiveTime::MIN).and_utc();

        next_midnight.max(first_fire)
    }

    /// Waits for each fire time and awaits `run_once`, one run at a time,
    /// until Ctrl-C arrives. A failed run is logged and the loop keeps going.
    pub async fn serve<F, Fut>(&self, mut run_once: F) -> Result<(), Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<PipelineRun, Error>>,
    {
        loop {
            let now = Utc::now();
            let fire_at = self.next_fire_after(now);
            let wait = (fire_at - now).to_std().unwrap_or(Duration::ZERO);

            info!(
                event = %EventType::EngineEvent,
                %fire_at,
                "Next run of '{}' at {}",
                self.pipeline_name, fire_at
            );

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}

                ctrl_c_res = tokio::signal::ctrl_c() => {
                    if let Err(e) = ctrl_c_res {
                        error!("Error listening for Ctrl-C: {}", e);
                    }
                    info!("Received Ctrl-C, stopping trigger for '{}'", self.pipeline_name);
                    return Ok(());
                }
            }

            info!(
                event = %EventType::RunTriggered,
                "Triggering scheduled run of '{}' for {}",
                self.pipeline_name, fire_at
            );

            match run_once().await {
                Ok(run) => info!(
                    "Scheduled run {} of '{}' finished as {}",
                    run.id, self.pipeline_name, run.status
                ),
                Err(e) => error!(
                    event = %EventType::EngineEvent,
                    "Scheduled run of '{}' could not be driven: {}",
                    self.pipeline_name, e
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::workflow::pl_holidays;

    fn trigger() -> DailyTrigger {
        DailyTrigger::for_pipeline(&pl_holidays().unwrap().info).unwrap()
    }

    #[test]
    fn test_fires_at_next_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 15, 30, 0).unwrap();

        assert_eq!(
            trigger().next_fire_after(now),
            Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_exact_midnight_waits_a_full_day() {
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();

        assert_eq!(
            trigger().next_fire_after(now),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_never_fires_before_start_date() {
        let now = Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap();

        assert_eq!(
            trigger().next_fire_after(now),
            Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_manual_pipelines_have_no_trigger() {
        let mut info = pl_holidays().unwrap().info;
        info.schedule = Schedule::Manual;

        assert!(matches!(
            DailyTrigger::for_pipeline(&info),
            Err(Error::InvalidInput(_))
        ));
    }
}
