use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Error loading env file '{path}': {source}")]
    Env {
        path: String,
        #[source]
        source: dotenv::Error,
    },

    #[error("Failed to read token file '{path}': {source}")]
    TokenFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Registry responded with HTTP {status}: {body}")]
    RegistryStatus { status: u16, body: String },

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Nobody found with the following {query}")]
    NotFound { query: String },

    #[error("There were {count} certifications found for {query}, refusing to guess")]
    AmbiguousMatch { count: usize, query: String },

    #[error("Unable to send message: {0}")]
    Notify(String),

    #[error("Schedule error: {0}")]
    Schedule(String),
}

impl CheckerError {
    /// Errors that may clear up on their own by the next scheduled check.
    ///
    /// Transport failures, timeouts and 5xx answers are transient. Anything that
    /// says something about the candidate or our own inputs is not.
    pub fn is_transient(&self) -> bool {
        match self {
            CheckerError::Http(e) => {
                if e.is_decode() || e.is_builder() {
                    return false;
                }
                match e.status() {
                    Some(status) => status.is_server_error(),
                    None => true,
                }
            }
            CheckerError::RegistryStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckerError>;
