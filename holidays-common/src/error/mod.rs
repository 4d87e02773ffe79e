use std::fmt::Debug;

mod task;
pub use task::TaskError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Database Error: {0}")]
    Database(String),

    #[error("Serialization Error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Resource Not Found: {resource_type} with ID {resource_id}")]
    NotFound {
        resource_type: String,
        resource_id: String,
    },

    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    #[error("HTTP Error: {0}")]
    Http(String),

    #[error("Object Storage Error: {0}")]
    Storage(String),

    #[error("Delimited Codec Error: {0}")]
    Codec(String),

    #[error("Task Execution Error: {0}")]
    TaskExecution(String),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Internal Error: {0}")]
    Internal(String),

    #[error("Conflict Error: {0}")]
    Conflict(String),
}

impl Error {
    /// Short machine-readable name of the variant, used when
    /// an error is recorded against a task run.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Database(_) => "database",
            Error::Serialization(_) => "serialization",
            Error::NotFound { .. } => "not_found",
            Error::InvalidInput(_) => "invalid_input",
            Error::Http(_) => "http",
            Error::Storage(_) => "storage",
            Error::Codec(_) => "codec",
            Error::TaskExecution(_) => "task_execution",
            Error::Config(_) => "config",
            Error::Internal(_) => "internal",
            Error::Conflict(_) => "conflict",
        }
    }
}
