use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use futures::{StreamExt, stream::FuturesUnordered};
use holidays_common::{
    error::{Error, TaskError},
    event::EventType,
    pipeline::{PipelineDefinition, PipelineRun},
    task::{TaskRun, TaskRunStatus},
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::tasks::RunContext;

use super::{LauncherConfig, MonitoredTaskWorker, PipelineExecutionGraph, WorkerOutcome};

/// Drives one pipeline run at a time over a shared `RunContext`.
pub struct Launcher {
    pub id: Uuid,
    pub config: LauncherConfig,
    pub(super) context: Arc<RunContext>,
    pub(super) current_pipeline_run_id: Option<Uuid>,
    pub(super) execution_graph: Option<PipelineExecutionGraph>,
    pub(super) task_states: HashMap<Uuid, TaskRunStatus>,
    pub(super) task_attempts: HashMap<Uuid, u32>,
    pub(super) task_runs: HashMap<Uuid, TaskRun>,
    pub(super) active_workers: FuturesUnordered<MonitoredTaskWorker>,
}

impl Launcher {
    pub fn new(config: LauncherConfig, context: Arc<RunContext>) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            context,
            current_pipeline_run_id: None,
            execution_graph: None,
            task_states: HashMap::new(),
            task_attempts: HashMap::new(),
            task_runs: HashMap::new(),
            active_workers: FuturesUnordered::new(),
        }
    }

    /// Runs every task of `pipeline_definition` to a terminal state.
    ///
    /// Task failures are recorded on the returned `PipelineRun`; an `Err`
    /// means the launcher itself could not drive the run.
    pub async fn run_pipeline(
        &mut self,
        pipeline_definition: Arc<PipelineDefinition>,
    ) -> Result<PipelineRun, Error> {
        let start_time = Utc::now();
        let run_id = self.initialize_pipeline_state(&pipeline_definition)?;

        info!(
            event = %EventType::RunStart,
            %run_id,
            pipeline = %pipeline_definition.info.name,
            "Launcher [{}]: Starting run {} of '{}'",
            self.id, run_id, pipeline_definition.info.name
        );

        loop {
            self.schedule_and_launch_tasks()?;

            if self.active_workers.is_empty() {
                let final_status = self
                    .graph()?
                    .is_pipeline_complete(&self.task_states)
                    .ok_or_else(|| {
                        Error::Internal(format!(
                            "Run {} stalled: no task is running and none can be launched",
                            run_id
                        ))
                    })?;

                return self.finalize_pipeline(&pipeline_definition, final_status, start_time);
            }

            if let Some(outcome) = self.active_workers.next().await {
                self.handle_worker_outcome(outcome)?;
            }
        }
    }

    pub(super) fn graph(&self) -> Result<&PipelineExecutionGraph, Error> {
        self.execution_graph
            .as_ref()
            .ok_or_else(|| Error::Internal("Execution graph missing for current run".to_string()))
    }

    fn handle_worker_outcome(&mut self, outcome: WorkerOutcome) -> Result<(), Error> {
        let WorkerOutcome {
            task_def_id,
            attempt,
            result,
        } = outcome;

        let task_def = self.graph()?.get_task_definition(task_def_id).ok_or_else(|| {
            Error::Internal(format!(
                "Worker finished for task ID {} which is not part of the current run",
                task_def_id
            ))
        })?;
        let task_name = task_def.name.clone();
        let total_attempts = task_def.total_attempts();

        let result = result.unwrap_or_else(|join_error| {
            Err(Error::TaskExecution(format!(
                "Worker for task '{}' did not finish: {}",
                task_name, join_error
            )))
        });

        let status = match result {
            Ok(output) => {
                info!(
                    event = %EventType::TaskOutput,
                    task = %task_name,
                    "Launcher [{}]: {}",
                    self.id, output
                );
                info!(
                    event = %EventType::TaskSuccess,
                    task = %task_name,
                    attempt,
                    "Launcher [{}]: Task '{}' succeeded on attempt {}",
                    self.id, task_name, attempt
                );
                self.record_task_end(task_def_id, TaskRunStatus::Succeeded, None);
                TaskRunStatus::Succeeded
            }
            Err(err) if attempt < total_attempts => {
                warn!(
                    event = %EventType::TaskReadyToRetry,
                    task = %task_name,
                    attempt,
                    error = %err,
                    "Launcher [{}]: Task '{}' failed on attempt {}/{}, will retry",
                    self.id, task_name, attempt, total_attempts
                );
                self.record_task_end(
                    task_def_id,
                    TaskRunStatus::Retrying,
                    Some(TaskError::from_error(&err, attempt)),
                );
                TaskRunStatus::Retrying
            }
            Err(err) => {
                error!(
                    event = %EventType::TaskFailure,
                    task = %task_name,
                    attempt,
                    error = %err,
                    "Launcher [{}]: Task '{}' failed after {} attempt(s)",
                    self.id, task_name, attempt
                );
                self.record_task_end(
                    task_def_id,
                    TaskRunStatus::Failed,
                    Some(TaskError::from_error(&err, attempt)),
                );
                TaskRunStatus::Failed
            }
        };

        self.task_states.insert(task_def_id, status);
        Ok(())
    }

    fn record_task_end(&mut self, task_def_id: Uuid, status: TaskRunStatus, error: Option<TaskError>) {
        if let Some(task_run) = self.task_runs.get_mut(&task_def_id) {
            task_run.status = status;
            task_run.end_time = Some(Utc::now());
            task_run.error = error;
        }
    }
}
