//! Error types for the labstub core library.

/// Top-level error enum for the labstub core library.
#[derive(Debug, thiserror::Error)]
pub enum LabstubError {
    #[error("Parse error in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Remote API error: {0}")]
    Api(String),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl LabstubError {
    /// Only transport-level failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LabstubError::Timeout(_) | LabstubError::Transport(_))
    }

    /// Short classification used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            LabstubError::Parse { .. } => "parse",
            LabstubError::Timeout(_) => "timeout",
            LabstubError::Transport(_) => "transport",
            LabstubError::Api(_) => "api",
            LabstubError::Write { .. } => "write",
            LabstubError::Config(_) => "config",
            LabstubError::Io(_) => "io",
            LabstubError::Json(_) => "json",
            LabstubError::Yaml(_) => "yaml",
        }
    }
}

impl From<reqwest::Error> for LabstubError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LabstubError::Timeout(err.to_string())
        } else if err.is_decode() {
            LabstubError::Api(err.to_string())
        } else {
            LabstubError::Transport(err.to_string())
        }
    }
}

pub type LabstubResult<T> = Result<T, LabstubError>;
