use thiserror::Error;

/// Failures talking to the TaskFlow API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected locally before any request was sent.
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("could not reach the TaskFlow API: {0}")]
    Transport(#[from] reqwest::Error),
    /// 404, typically a task deleted by someone else.
    #[error("not found: {0}")]
    NotFound(String),
    #[error("server returned {status}: {message}")]
    Http { status: u16, message: String },
    /// `success: false` envelope.
    #[error("{0}")]
    Api(String),
    #[error("response is missing its data field")]
    MissingData,
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Short text for a toast. Details stay in the log.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Validation(msg) => format!("Invalid change: {}", msg),
            ApiError::Transport(_) => "Could not reach the server. Check your connection.".to_string(),
            ApiError::NotFound(_) => "The item no longer exists. Refresh to see the latest state.".to_string(),
            ApiError::Http { status: 401, .. } | ApiError::Http { status: 403, .. } => {
                "You are not authorised. Update your access token.".to_string()
            }
            ApiError::Http { .. } | ApiError::MissingData | ApiError::Decode(_) => {
                "The server could not complete the request.".to_string()
            }
            ApiError::Api(msg) => msg.clone(),
        }
    }
}

/// Failures loading or saving local settings and session files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no home directory available for settings")]
    NoConfigDir,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid settings file: {0}")]
    ParseToml(#[from] toml::de::Error),
    #[error("could not write settings: {0}")]
    WriteToml(#[from] toml::ser::Error),
    #[error("invalid session file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures building the app before the first frame.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("could not start the network runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
}
