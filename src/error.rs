use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FvuError {
    #[error("Project validation failed: {0}")]
    ProjectValidation(String),

    #[error("Failed to read POM '{}': {message}", .path.display())]
    PomParse { path: PathBuf, message: String },

    #[error("Parent resolution failed: {0}")]
    ParentResolution(String),

    #[error("Maven execution failed: {0}")]
    MavenExecution(String),

    #[error("Git operation failed: {0}")]
    GitOperation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FvuError {
    pub fn pom_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        FvuError::PomParse {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FvuError>;
