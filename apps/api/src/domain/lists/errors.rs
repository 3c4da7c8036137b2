use thiserror::Error;

/// Failures of the upload, normalize and distribute pipeline
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Could not read file: {0}")]
    Parse(String),

    #[error("Invalid file type. Only CSV, XLS, and XLSX files are allowed.")]
    UnsupportedFormat,

    #[error("No valid data found in the file")]
    EmptyResult,

    #[error("No active agents found. Please add agents first.")]
    NoAgents,

    #[error("Failed to store upload: {0}")]
    Persistence(String),

    #[error("File exceeds the maximum upload size of {limit} bytes")]
    FileTooLarge { limit: usize },

    #[error("No file was uploaded")]
    MissingFile,

    /// Server-side failure while holding the upload on disk; the detail is
    /// logged and kept out of the message
    #[error("Could not stage the uploaded file")]
    Staging(String),

    #[error("Internal error while processing the upload")]
    Internal(String),
}

impl UploadError {
    /// Stable identifier for the error, suitable for programmatic checks
    pub fn kind(&self) -> &'static str {
        match self {
            UploadError::Parse(_) => "parse_error",
            UploadError::UnsupportedFormat => "unsupported_format",
            UploadError::EmptyResult => "empty_result",
            UploadError::NoAgents => "no_agents",
            UploadError::Persistence(_) => "persistence_error",
            UploadError::FileTooLarge { .. } => "file_too_large",
            UploadError::MissingFile => "missing_file",
            UploadError::Staging(_) => "staging_error",
            UploadError::Internal(_) => "internal_error",
        }
    }

    /// Server-side detail not shown to clients
    pub fn detail(&self) -> Option<&str> {
        match self {
            UploadError::Staging(detail) | UploadError::Internal(detail) => Some(detail.as_str()),
            _ => None,
        }
    }
}

pub type UploadResult<T> = Result<T, UploadError>;
