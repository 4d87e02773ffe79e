use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::task::TaskDefinition;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineInfo {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub schedule: Schedule,
    pub start_date: NaiveDate,
    pub max_active_runs: u32,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineDefinition {
    pub info: PipelineInfo,
    pub task_definitions: Vec<TaskDefinition>,
}

impl PipelineDefinition {
    pub fn find_task(&self, name: &str) -> Option<&TaskDefinition> {
        self.task_definitions.iter().find(|task| task.name == name)
    }
}

#[derive(Clone, Debug, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schedule {
    /// Once a day at midnight UTC
    Daily,
    /// Only when triggered by hand
    Manual,
}
