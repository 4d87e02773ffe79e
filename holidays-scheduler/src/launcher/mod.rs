use std::{
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use holidays_common::error::Error;
use tokio::task::{JoinError, JoinHandle};
use uuid::Uuid;

use crate::tasks::TaskOutput;

pub mod default;
mod execution_graph;
mod scheduling;
mod state;

pub use default::Launcher;
pub use execution_graph::PipelineExecutionGraph;

#[derive(Debug, Clone)]
pub struct LauncherConfig {
    /// Pause before re-running a task that failed with attempts left.
    pub retry_delay: Duration,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            retry_delay: Duration::from_secs(5),
        }
    }
}

/// A spawned task attempt, resolved together with the ids it was launched for.
pub(crate) struct MonitoredTaskWorker {
    task_def_id: Uuid,
    attempt: u32,
    handle: JoinHandle<Result<TaskOutput, Error>>,
}

pub(crate) struct WorkerOutcome {
    pub task_def_id: Uuid,
    pub attempt: u32,
    pub result: Result<Result<TaskOutput, Error>, JoinError>,
}

impl Future for MonitoredTaskWorker {
    type Output = WorkerOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.handle).poll(cx) {
            Poll::Ready(join_result) => Poll::Ready(WorkerOutcome {
                task_def_id: self.task_def_id,
                attempt: self.attempt,
                result: join_result,
            }),
            Poll::Pending => Poll::Pending,
        }
    }
}
