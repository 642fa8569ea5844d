use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Invalid project name: '{0}'")]
    InvalidProjectName(String),

    #[error("Invalid tool name: '{0}'")]
    InvalidToolName(String),

    #[error("Invalid parameter name '{name}' in tool '{tool}'")]
    InvalidParameterName { tool: String, name: String },

    #[error("Duplicate tool name: '{0}'")]
    DuplicateToolName(String),

    #[error("At least one tool must be provided")]
    NoToolsProvided,

    #[error("Directory already exists: {}", .0.display())]
    DirectoryAlreadyExists(PathBuf),

    #[error("Cannot generate in place, critical files exist: {}", .0.join(", "))]
    CriticalFilesConflict(Vec<String>),

    #[error("Invalid runtime version: '{0}' (expected MAJOR.MINOR)")]
    InvalidRuntimeVersion(String),

    #[error("{what} '{key}' not found (available: {})", .available.join(", "))]
    NotFound {
        what: &'static str,
        key: String,
        available: Vec<String>,
    },

    #[error("template error: {0}")]
    Render(#[from] RenderError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl GeneratorError {
    /// Stable identifier used in serialized failure results.
    pub fn kind(&self) -> &'static str {
        match self {
            GeneratorError::InvalidProjectName(_) => "InvalidProjectName",
            GeneratorError::InvalidToolName(_) => "InvalidToolName",
            GeneratorError::InvalidParameterName { .. } => "InvalidParameterName",
            GeneratorError::DuplicateToolName(_) => "DuplicateToolName",
            GeneratorError::NoToolsProvided => "NoToolsProvided",
            GeneratorError::DirectoryAlreadyExists(_) => "DirectoryAlreadyExists",
            GeneratorError::CriticalFilesConflict(_) => "CriticalFilesConflict",
            GeneratorError::InvalidRuntimeVersion(_) => "InvalidRuntimeVersion",
            GeneratorError::NotFound { .. } => "NotFound",
            GeneratorError::Render(_) => "RenderError",
            GeneratorError::Io(_) => "IoError",
            GeneratorError::Serde(_) => "SerdeError",
        }
    }
}

/// Failures of the format-style template renderer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("unknown template variable '{name}' at byte {offset}")]
    UnknownVariable { name: String, offset: usize },

    #[error("unmatched '{brace}' at byte {offset}")]
    UnmatchedBrace { brace: char, offset: usize },

    #[error("template fragments nested deeper than {0} levels")]
    TooDeep(usize),
}

pub type Result<T> = std::result::Result<T, GeneratorError>;
