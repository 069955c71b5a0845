// file: src/error.rs
// description: error taxonomy for the compose and launch cycle
// reference: https://docs.rs/thiserror

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueryError>;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected model response: {0}")]
    Parse(String),

    #[error("Could not open browser: {0}")]
    BrowserLaunch(String),

    #[error("A search is already running, wait for it to finish")]
    Busy,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QueryError {
    /// Short label shown in front of error lines.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::InvalidInput(_) => "invalid input",
            QueryError::Authentication(_) => "authentication",
            QueryError::Network(_) => "network",
            QueryError::Parse(_) => "parse",
            QueryError::BrowserLaunch(_) => "browser",
            QueryError::Busy => "busy",
            QueryError::Config(_) => "config",
            QueryError::Io(_) => "io",
        }
    }
}

impl From<reqwest::Error> for QueryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            QueryError::Network(format!("request timed out: {}", err))
        } else if err.is_decode() {
            QueryError::Parse(err.to_string())
        } else {
            QueryError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = QueryError::InvalidInput("search text is empty".to_string());
        assert_eq!(err.to_string(), "Invalid input: search text is empty");
        assert_eq!(err.kind(), "invalid input");

        let err = QueryError::Busy;
        assert!(err.to_string().contains("already running"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "xdg-open");
        let err: QueryError = io.into();
        assert_eq!(err.kind(), "io");
    }
}
