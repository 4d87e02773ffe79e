use std::{sync::Arc, time::Duration};

use chrono::Utc;
use holidays_common::{
    error::Error,
    event::EventType,
    task::{TaskDefinition, TaskRunStatus},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::tasks::execute_task;

use super::{MonitoredTaskWorker, default::Launcher};

#[derive(Debug, Clone)]
pub(super) struct TaskToLaunch {
    task_definition: TaskDefinition,
    attempt: u32,
}

impl Launcher {
    /// Schedules and launches tasks for the current pipeline run.
    /// ---
    /// Tasks that can never run because a dependency failed are marked
    /// `UpstreamFailed` first, then every ready task gets a worker.
    pub(super) fn schedule_and_launch_tasks(&mut self) -> Result<(), Error> {
        self.mark_upstream_failed_tasks()?;

        for task_info in self.gather_scheduling_info()? {
            self.launch_task_worker(task_info);
        }

        Ok(())
    }

    /// Propagates failures down the graph until no pending task is left
    /// behind a failed dependency.
    fn mark_upstream_failed_tasks(&mut self) -> Result<(), Error> {
        loop {
            let skipped = self.graph()?.get_upstream_failed_tasks(&self.task_states);
            if skipped.is_empty() {
                return Ok(());
            }

            for task_def_id in skipped {
                let task_name = self
                    .task_runs
                    .get(&task_def_id)
                    .map(|task_run| task_run.name.clone())
                    .unwrap_or_default();

                warn!(
                    event = %EventType::TaskUpstreamFailed,
                    task = %task_name,
                    "Launcher [{}]: Task '{}' will not run, an upstream task failed",
                    self.id, task_name
                );

                self.task_states
                    .insert(task_def_id, TaskRunStatus::UpstreamFailed);
                if let Some(task_run) = self.task_runs.get_mut(&task_def_id) {
                    task_run.status = TaskRunStatus::UpstreamFailed;
                    task_run.end_time = Some(Utc::now());
                }
            }
        }
    }

    /// Gathers the tasks whose dependencies have all succeeded, with the
    /// attempt number each one is about to make.
    fn gather_scheduling_info(&self) -> Result<Vec<TaskToLaunch>, Error> {
        let graph = self.graph()?;

        graph
            .get_ready_tasks(&self.task_states)
            .into_iter()
            .map(|task_id| {
                let task_def = graph.get_task_definition(task_id).ok_or_else(|| {
                    Error::Internal(format!(
                        "Failed to find TaskDefinition for task ID {}",
                        task_id
                    ))
                })?;

                let completed_attempts = self.task_attempts.get(&task_id).copied().unwrap_or(0);

                Ok(TaskToLaunch {
                    task_definition: task_def.clone(),
                    attempt: completed_attempts + 1,
                })
            })
            .collect()
    }

    fn launch_task_worker(&mut self, task_info: TaskToLaunch) {
        let TaskToLaunch {
            task_definition,
            attempt,
        } = task_info;
        let task_def_id = task_definition.id;

        info!(
            event = %EventType::TaskStart,
            task = %task_definition.name,
            attempt,
            "Launcher [{}]: Task '{}' (ID: {}), attempt {}. Launching.",
            self.id, task_definition.name, task_def_id, attempt
        );

        let delay = if attempt > 1 {
            self.config.retry_delay
        } else {
            Duration::ZERO
        };
        let context = Arc::clone(&self.context);
        let kind = task_definition.kind;

        let handle = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            execute_task(&kind, &context).await
        });

        self.active_workers.push(MonitoredTaskWorker {
            task_def_id,
            attempt,
            handle,
        });

        self.task_states.insert(task_def_id, TaskRunStatus::Running);
        self.task_attempts.insert(task_def_id, attempt);
        if let Some(task_run) = self.task_runs.get_mut(&task_def_id) {
            task_run.status = TaskRunStatus::Running;
            task_run.attempts = attempt;
            task_run.start_time.get_or_insert_with(Utc::now);
            task_run.end_time = None;
        }
    }
}
