use thiserror::Error;

/// Errors that can occur while building or exporting an import graph.
#[derive(Error, Debug)]
pub enum ImportGraphError {
    #[error("extraction error: {message} (path: {path})")]
    Extraction { message: String, path: String },

    #[error("filter pattern error: {message} (pattern: {pattern})")]
    FilterPattern { message: String, pattern: String },

    #[error("io error: {message} (path: {path})")]
    Io { message: String, path: String },

    #[error("malformed record at {path}:{line}: {record:?}")]
    MalformedRecord {
        path: String,
        line: usize,
        record: String,
    },

    #[error("template error: {message} (path: {path})")]
    Template { message: String, path: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ImportGraphError {
    /// Wraps an `std::io::Error` with the path that was being accessed.
    pub fn io(path: impl AsRef<std::path::Path>, err: std::io::Error) -> Self {
        ImportGraphError::Io {
            message: err.to_string(),
            path: path.as_ref().display().to_string(),
        }
    }
}

/// Convenience alias for results using `ImportGraphError`.
pub type Result<T> = std::result::Result<T, ImportGraphError>;
