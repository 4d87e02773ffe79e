use chrono::NaiveDate;
use holidays_common::{
    error::Error,
    holiday::CountryCode,
    pipeline::{PipelineDefinition, PipelineInfo, Schedule},
    task::{TaskDefinition, TaskKind},
};
use uuid::Uuid;

pub const PIPELINE_NAME: &str = "pl_holidays";
pub const START_TASK: &str = "start";
pub const BARRIER_TASK: &str = "getting_data_is_ready";

const PIPELINE_NAMESPACE: Uuid = uuid::uuid!("6b0f5c7e-2a44-4f7e-9d0c-1d2f3e4a5b6c");

pub fn fetch_task_name(group: usize) -> String {
    format!("load_source_api_{group}")
}

pub fn load_task_name(group: usize) -> String {
    format!("load_to_DB_{group}")
}

/// The `pl_holidays` workflow.
/// ---
/// `start` fans out to one fetch task per country, the barrier waits for
/// all of them to succeed, then one load task per country runs.
/// Group `N` (1-based) handles `CountryCode::ALL[N - 1]`.
pub fn pl_holidays() -> Result<PipelineDefinition, Error> {
    let pipeline_id = Uuid::new_v5(&PIPELINE_NAMESPACE, PIPELINE_NAME.as_bytes());
    let start_date = NaiveDate::from_ymd_opt(2023, 12, 1)
        .ok_or_else(|| Error::Internal("Invalid pipeline start date".to_string()))?;

    let mut builder = DefinitionBuilder::new(pipeline_id);

    let start = builder.add(START_TASK, "Marks the start of a run", TaskKind::Marker, &[]);

    let fetch_tasks: Vec<Uuid> = CountryCode::ALL
        .iter()
        .enumerate()
        .map(|(idx, country)| {
            builder.add(
                &fetch_task_name(idx + 1),
                &format!("Fetch {country} holidays and stage them in object storage"),
                TaskKind::FetchAndStage { country: *country },
                &[start],
            )
        })
        .collect();

    let barrier = builder.add(
        BARRIER_TASK,
        "Waits until every country is staged",
        TaskKind::Barrier,
        &fetch_tasks,
    );

    for (idx, country) in CountryCode::ALL.iter().enumerate() {
        builder.add(
            &load_task_name(idx + 1),
            &format!("Append staged {country} holidays to the database"),
            TaskKind::StageAndLoad { country: *country },
            &[barrier],
        );
    }

    Ok(PipelineDefinition {
        info: PipelineInfo {
            id: pipeline_id,
            name: PIPELINE_NAME.to_string(),
            description: Some("DAG for public holidays of different countries".to_string()),
            schedule: Schedule::Daily,
            start_date,
            max_active_runs: 1,
            tags: vec!["Holidays".to_string()],
        },
        task_definitions: builder.tasks,
    })
}

struct DefinitionBuilder {
    pipeline_id: Uuid,
    tasks: Vec<TaskDefinition>,
}

impl DefinitionBuilder {
    fn new(pipeline_id: Uuid) -> Self {
        Self {
            pipeline_id,
            tasks: Vec::new(),
        }
    }

    fn add(&mut self, name: &str, description: &str, kind: TaskKind, depends_on: &[Uuid]) -> Uuid {
        let id = TaskDefinition::derive_id(self.pipeline_id, name);

        self.tasks.push(TaskDefinition {
            id,
            pipeline_id: self.pipeline_id,
            name: name.to_string(),
            description: Some(description.to_string()),
            kind,
            depends_on: depends_on.to_vec(),
            max_attempts: None,
        });

        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_surface() {
        let def = pl_holidays().unwrap();

        assert_eq!(def.info.name, "pl_holidays");
        assert_eq!(def.info.schedule, Schedule::Daily);
        assert_eq!(def.info.max_active_runs, 1);
        assert_eq!(def.info.tags, vec!["Holidays"]);

        let names: Vec<&str> = def.task_definitions.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "start",
                "load_source_api_1",
                "load_source_api_2",
                "load_source_api_3",
                "getting_data_is_ready",
                "load_to_DB_1",
                "load_to_DB_2",
                "load_to_DB_3"
            ]
        );
    }

    #[test]
    fn test_groups_map_to_countries_in_order() {
        let def = pl_holidays().unwrap();

        assert_eq!(
            def.find_task("load_source_api_2").unwrap().kind,
            TaskKind::FetchAndStage { country: CountryCode::By }
        );
        assert_eq!(
            def.find_task("load_to_DB_3").unwrap().kind,
            TaskKind::StageAndLoad { country: CountryCode::Ua }
        );
    }

    #[test]
    fn test_barrier_depends_on_every_fetch() {
        let def = pl_holidays().unwrap();
        let barrier = def.find_task(BARRIER_TASK).unwrap();

        for group in 1..=3 {
            let fetch = def.find_task(&fetch_task_name(group)).unwrap();
            assert!(barrier.depends_on.contains(&fetch.id));

            let load = def.find_task(&load_task_name(group)).unwrap();
            assert_eq!(load.depends_on, vec![barrier.id]);
        }
    }

    #[test]
    fn test_ids_are_stable_across_builds() {
        assert_eq!(pl_holidays().unwrap(), pl_holidays().unwrap());
    }
}
