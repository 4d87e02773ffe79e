mod context;
mod fetch_and_stage;
mod stage_and_load;

use std::fmt;

use chrono::Utc;
use holidays_common::{
    error::Error,
    holiday::{StagedObjectKey, TableRef},
    task::TaskKind,
};
use tracing::info;

pub use context::RunContext;
pub use fetch_and_stage::fetch_and_stage;
pub use stage_and_load::stage_and_load;

/// What a finished task reports back to the launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutput {
    Marker,
    Barrier,
    Staged { key: StagedObjectKey, rows: usize },
    Loaded { table: TableRef, rows: u64 },
}

impl fmt::Display for TaskOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskOutput::Marker => f.write_str("started"),
            TaskOutput::Barrier => f.write_str("all upstream tasks succeeded"),
            TaskOutput::Staged { key, rows } => write!(f, "staged {rows} rows at {key}"),
            TaskOutput::Loaded { table, rows } => write!(f, "appended {rows} rows to {table}"),
        }
    }
}

/// Runs the body of a single task.
pub async fn execute_task(kind: &TaskKind, ctx: &RunContext) -> Result<TaskOutput, Error> {
    match kind {
        TaskKind::Marker => {
            info!("Run marker at {}", Utc::now().to_rfc2822());
            Ok(TaskOutput::Marker)
        }
        TaskKind::Barrier => Ok(TaskOutput::Barrier),
        TaskKind::FetchAndStage { country } => {
            let key = StagedObjectKey::new(ctx.year, *country);
            let rows = fetch_and_stage(ctx, *country).await?;
            Ok(TaskOutput::Staged { key, rows })
        }
        TaskKind::StageAndLoad { country } => {
            let rows = stage_and_load(ctx, *country).await?;
            Ok(TaskOutput::Loaded {
                table: ctx.table.clone(),
                rows,
            })
        }
    }
}
