use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

use crate::task::TaskRun;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineRun {
    pub id: Uuid,
    pub pipeline_def_id: Uuid,
    pub status: PipelineRunStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub task_runs: Vec<TaskRun>,
}

impl PipelineRun {
    pub fn task_run(&self, name: &str) -> Option<&TaskRun> {
        self.task_runs.iter().find(|run| run.name == name)
    }
}

#[derive(Clone, Debug, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum PipelineRunStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}
