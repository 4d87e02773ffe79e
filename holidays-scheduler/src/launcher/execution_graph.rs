use std::collections::{HashMap, HashSet};

use holidays_common::{
    error::Error,
    pipeline::{PipelineDefinition, PipelineRunStatus},
    task::{TaskDefinition, TaskRunStatus},
};
use petgraph::{
    Direction::Incoming,
    algo::toposort,
    graph::{DiGraph, NodeIndex},
};
use tracing::warn;
use uuid::Uuid;

pub struct PipelineExecutionGraph {
    /// The directed graph where nodes are task definitions and edges represent dependencies.
    /// An edge from Task A to Task B means Task A must complete before Task B can start.
    graph: DiGraph<TaskDefinition, ()>,

    /// Mapping from a task's Uuid to its NodeIndex in the petgraph.
    task_id_to_node_idx: HashMap<Uuid, NodeIndex>,

    /// Mapping from a NodeIndex to its task's Uuid.
    node_idx_to_task_id: HashMap<NodeIndex, Uuid>,

    /// Set of task IDs that are source nodes (no incoming dependencies).
    source_nodes: HashSet<Uuid>,

    /// Task IDs in an order where every task comes after its dependencies.
    topological_order: Vec<Uuid>,
}

impl PipelineExecutionGraph {
    /// Creates a new `PipelineExecutionGraph` from a `PipelineDefinition`.
    /// All tasks are added as nodes first, then edges are added from the
    /// `depends_on` field of each task, so declaration order does not matter.
    /// Duplicate ids, unknown dependencies and cycles are rejected.
    pub fn new(pipeline_def: &PipelineDefinition) -> Result<Self, Error> {
        let mut graph = DiGraph::new();
        let mut task_id_to_node_idx = HashMap::new();
        let mut node_idx_to_task_id = HashMap::new();

        if pipeline_def.task_definitions.is_empty() {
            warn!(
                "Creating an execution graph for an empty pipeline definition ({}).",
                pipeline_def.info.name
            );
        }

        for task_def in &pipeline_def.task_definitions {
            if task_id_to_node_idx.contains_key(&task_def.id) {
                return Err(Error::Conflict(format!(
                    "Duplicate task ID {} ('{}') found in pipeline definition {}.",
                    task_def.id, task_def.name, pipeline_def.info.name
                )));
            }

            let node_idx = graph.add_node(task_def.clone());
            task_id_to_node_idx.insert(task_def.id, node_idx);
            node_idx_to_task_id.insert(node_idx, task_def.id);
        }

        for task_def in &pipeline_def.task_definitions {
            let to_node_idx = task_id_to_node_idx[&task_def.id];

            for dep_task_id in &task_def.depends_on {
                let from_node_idx = task_id_to_node_idx.get(dep_task_id).ok_or_else(|| {
                    Error::InvalidInput(format!(
                        "Task '{}' depends on unknown task ID {} in pipeline definition {}.",
                        task_def.name, dep_task_id, pipeline_def.info.name
                    ))
                })?;

                graph.add_edge(*from_node_idx, to_node_idx, ());
            }
        }

        let topological_order = toposort(&graph, None)
            .map_err(|cycle| {
                Error::Conflict(format!(
                    "Cyclic dependency graph detected for pipeline definition {} (at task '{}').",
                    pipeline_def.info.name, graph[cycle.node_id()].name
                ))
            })?
            .into_iter()
            .map(|node_idx| node_idx_to_task_id[&node_idx])
            .collect();

        let source_nodes = node_idx_to_task_id
            .iter()
            .filter(|(node_idx, _)| graph.neighbors_directed(**node_idx, Incoming).count() == 0)
            .map(|(_, task_def_id)| *task_def_id)
            .collect();

        Ok(Self {
            graph,
            task_id_to_node_idx,
            node_idx_to_task_id,
            source_nodes,
            topological_order,
        })
    }

    /// Retrieves a reference to a task definition by its ID.
    pub fn get_task_definition(&self, task_def_id: Uuid) -> Option<&TaskDefinition> {
        self.task_id_to_node_idx
            .get(&task_def_id)
            .and_then(|node_idx| self.graph.node_weight(*node_idx))
    }

    /// Gets all task IDs present in the graph, in topological order.
    pub fn get_all_task_ids(&self) -> &[Uuid] {
        &self.topological_order
    }

    /// Gets the IDs of tasks that have no incoming dependencies (source nodes).
    /// These are the tasks that can potentially start first.
    pub fn get_source_task_ids(&self) -> &HashSet<Uuid> {
        &self.source_nodes
    }

    fn predecessor_ids(&self, node_idx: NodeIndex) -> impl Iterator<Item = Uuid> + '_ {
        self.graph
            .neighbors_directed(node_idx, Incoming)
            .filter_map(|pred_idx| self.node_idx_to_task_id.get(&pred_idx).copied())
    }

    /// Identifies tasks whose direct dependencies have all successfully completed.
    ///
    /// # Arguments
    /// * `current_task_states`: A map of task IDs to their current `TaskRunStatus`.
    ///
    /// # Returns
    /// The `Uuid`s of `Pending` or `Retrying` tasks that can be launched now,
    /// in topological order.
    pub fn get_ready_tasks(&self, current_task_states: &HashMap<Uuid, TaskRunStatus>) -> Vec<Uuid> {
        self.topological_order
            .iter()
            .filter(|task_def_id| {
                matches!(
                    current_task_states.get(task_def_id),
                    Some(TaskRunStatus::Pending) | Some(TaskRunStatus::Retrying)
                )
            })
            .filter(|task_def_id| {
                let node_idx = self.task_id_to_node_idx[task_def_id];
                self.predecessor_ids(node_idx).all(|dep_task_id| {
                    current_task_states.get(&dep_task_id) == Some(&TaskRunStatus::Succeeded)
                })
            })
            .copied()
            .collect()
    }

    /// Identifies pending tasks that can never run because a direct dependency
    /// failed or was itself skipped for an upstream failure.
    pub fn get_upstream_failed_tasks(
        &self,
        current_task_states: &HashMap<Uuid, TaskRunStatus>,
    ) -> Vec<Uuid> {
        self.topological_order
            .iter()
            .filter(|task_def_id| {
                current_task_states.get(task_def_id) == Some(&TaskRunStatus::Pending)
            })
            .filter(|task_def_id| {
                let node_idx = self.task_id_to_node_idx[task_def_id];
                self.predecessor_ids(node_idx).any(|dep_task_id| {
                    matches!(
                        current_task_states.get(&dep_task_id),
                        Some(TaskRunStatus::Failed) | Some(TaskRunStatus::UpstreamFailed)
                    )
                })
            })
            .copied()
            .collect()
    }

    /// Checks if the entire pipeline has completed based on the states of its tasks.
    ///
    /// # Arguments
    /// * `current_task_states`: A map of task IDs to their current `TaskRunStatus`.
    ///
    /// # Returns
    /// * `Some(PipelineRunStatus::Succeeded)` if all tasks finished successfully.
    /// * `Some(PipelineRunStatus::Failed)` if every task is terminal and at least one
    ///   failed or was skipped because of an upstream failure.
    /// * `None` if the pipeline is still running (some tasks are not yet in a terminal state).
    pub fn is_pipeline_complete(
        &self,
        current_task_states: &HashMap<Uuid, TaskRunStatus>,
    ) -> Option<PipelineRunStatus> {
        if self.graph.node_count() == 0 {
            return Some(PipelineRunStatus::Succeeded); // Empty pipeline is always successful
        }

        let mut any_task_failed = false;

        for task_def_id in self.node_idx_to_task_id.values() {
            match current_task_states.get(task_def_id) {
                Some(TaskRunStatus::Succeeded) => continue,
                Some(TaskRunStatus::Failed) | Some(TaskRunStatus::UpstreamFailed) => {
                    any_task_failed = true;
                }
                Some(TaskRunStatus::Pending)
                | Some(TaskRunStatus::Running)
                | Some(TaskRunStatus::Retrying)
                | None => {
                    return None; // Pipeline is definitely not complete yet
                }
            }
        }

        if any_task_failed {
            Some(PipelineRunStatus::Failed)
        } else {
            Some(PipelineRunStatus::Succeeded)
        }
    }
}
