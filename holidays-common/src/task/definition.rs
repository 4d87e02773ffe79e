use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::holiday::CountryCode;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub id: Uuid,
    pub pipeline_id: Uuid,
    pub name: String,
    pub description: Option<String>,

    /// What the task does when launched
    pub kind: TaskKind,

    /// Task ids on which this task depends
    pub depends_on: Vec<Uuid>,

    /// Total attempts allowed, `None` means a single attempt
    pub max_attempts: Option<u32>,
}

impl TaskDefinition {
    /// Deterministic id of a task inside a pipeline.
    pub fn derive_id(pipeline_id: Uuid, task_name: &str) -> Uuid {
        Uuid::new_v5(&pipeline_id, task_name.as_bytes())
    }

    pub fn total_attempts(&self) -> u32 {
        self.max_attempts.unwrap_or(1).max(1)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskKind {
    /// Logs the current timestamp, marks the start of a run.
    Marker,
    /// Succeeds once every upstream task succeeded.
    Barrier,
    /// Pulls the holidays of one country and stages them in object storage.
    FetchAndStage { country: CountryCode },
    /// Loads a staged object into the holidays table.
    StageAndLoad { country: CountryCode },
}
