use chrono::{DateTime, Utc};
use holidays_common::{
    error::Error,
    event::EventType,
    pipeline::{PipelineDefinition, PipelineRun, PipelineRunStatus},
    task::{TaskRun, TaskRunStatus},
};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::launcher::execution_graph::PipelineExecutionGraph;

use super::default::Launcher;

impl Launcher {
    /// Builds the execution graph and resets every task to `Pending`.
    /// Returns the id of the new run.
    pub(super) fn initialize_pipeline_state(
        &mut self,
        pipeline_def: &PipelineDefinition,
    ) -> Result<Uuid, Error> {
        self.cleanup_current_pipeline_state();

        let pipeline_def_id = pipeline_def.info.id;
        let pipeline_run_id = Uuid::new_v4();

        info!(
            "Launcher [{}]: Initializing run_id {} for pipeline_def {}",
            self.id, pipeline_run_id, pipeline_def_id
        );

        let graph = PipelineExecutionGraph::new(pipeline_def)?;
        debug!(
            tasks = graph.get_all_task_ids().len(),
            entry_tasks = graph.get_source_task_ids().len(),
            "Launcher [{}]: Built execution graph",
            self.id
        );

        for task_def_id in graph.get_all_task_ids() {
            let task_def = graph.get_task_definition(*task_def_id).ok_or_else(|| {
                Error::Internal(format!(
                    "Failed to find TaskDefinition for task ID {}",
                    task_def_id
                ))
            })?;

            self.task_states.insert(*task_def_id, TaskRunStatus::Pending);
            self.task_runs
                .insert(*task_def_id, TaskRun::pending(*task_def_id, &task_def.name));
        }

        self.execution_graph = Some(graph);
        self.current_pipeline_run_id = Some(pipeline_run_id);

        Ok(pipeline_run_id)
    }

    /// Collects task runs in topological order, logs the run outcome and
    /// clears the launcher for the next run.
    pub(super) fn finalize_pipeline(
        &mut self,
        pipeline_def: &PipelineDefinition,
        final_status: PipelineRunStatus,
        start_time: DateTime<Utc>,
    ) -> Result<PipelineRun, Error> {
        let run_id = self
            .current_pipeline_run_id
            .ok_or_else(|| Error::Internal("Pipeline run ID missing at finalization".to_string()))?;

        let task_runs: Vec<TaskRun> = self
            .graph()?
            .get_all_task_ids()
            .iter()
            .filter_map(|task_def_id| self.task_runs.get(task_def_id).cloned())
            .collect();

        let run = PipelineRun {
            id: run_id,
            pipeline_def_id: pipeline_def.info.id,
            status: final_status,
            start_time,
            end_time: Some(Utc::now()),
            task_runs,
        };

        match final_status {
            PipelineRunStatus::Succeeded => info!(
                event = %EventType::RunSuccess,
                %run_id,
                "Launcher [{}]: Run {} of '{}' succeeded",
                self.id, run_id, pipeline_def.info.name
            ),
            _ => {
                let failed: Vec<&str> = run
                    .task_runs
                    .iter()
                    .filter(|task_run| task_run.status == TaskRunStatus::Failed)
                    .map(|task_run| task_run.name.as_str())
                    .collect();

                error!(
                    event = %EventType::RunFailure,
                    %run_id,
                    "Launcher [{}]: Run {} of '{}' finished as {}, failed tasks: {:?}",
                    self.id, run_id, pipeline_def.info.name, final_status, failed
                );
            }
        }

        self.cleanup_current_pipeline_state();

        Ok(run)
    }

    pub(super) fn cleanup_current_pipeline_state(&mut self) {
        self.current_pipeline_run_id = None;
        self.execution_graph = None;
        self.task_states.clear();
        self.task_attempts.clear();
        self.task_runs.clear();
        // Active workers are drained by the run loop before finalization.
    }
}
