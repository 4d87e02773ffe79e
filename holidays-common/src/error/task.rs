use serde::{Deserialize, Serialize};

use super::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskError {
    pub error_type: String,
    pub message: String,
    pub attempt: u32,
}

impl TaskError {
    pub fn from_error(err: &Error, attempt: u32) -> Self {
        Self {
            error_type: err.kind().to_string(),
            message: err.to_string(),
            attempt,
        }
    }
}
