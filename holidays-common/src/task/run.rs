use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

use crate::error::TaskError;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskRun {
    pub task_def_id: Uuid,
    pub name: String,
    pub status: TaskRunStatus,
    pub attempts: u32,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub error: Option<TaskError>,
}

impl TaskRun {
    pub fn pending(task_def_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            task_def_id,
            name: name.into(),
            status: TaskRunStatus::Pending,
            attempts: 0,
            start_time: None,
            end_time: None,
            error: None,
        }
    }
}

#[derive(Clone, Debug, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskRunStatus {
    Pending,
    Running,
    Retrying,
    Succeeded,
    Failed,
    UpstreamFailed,
}

impl TaskRunStatus {
    /// No further transitions happen from a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskRunStatus::Succeeded | TaskRunStatus::Failed | TaskRunStatus::UpstreamFailed
        )
    }
}
