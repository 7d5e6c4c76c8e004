use thiserror::Error;

/// Main error type for Wikiracer
#[derive(Error, Debug)]
pub enum WikiracerError {
    /// A title could not be canonicalized after following redirects and trying variants
    #[error("Article not found: {0}")]
    NotFound(String),

    /// A heuristic could not be initialized for a start/goal pair
    #[error("Heuristic setup failed: {0}")]
    Setup(String),

    /// A single remote or storage fetch failed
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Parse errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation not offered by this provider
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl WikiracerError {
    /// True for failures that mean "this title has no canonical form" rather
    /// than an infrastructure problem.
    pub fn is_not_found(&self) -> bool {
        matches!(self, WikiracerError::NotFound(_))
    }
}

/// Convenient Result type using WikiracerError
pub type Result<T> = std::result::Result<T, WikiracerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WikiracerError::NotFound("Bat".to_string());
        assert!(err.to_string().contains("Article not found"));
        assert!(err.to_string().contains("Bat"));
    }

    #[test]
    fn test_error_from_rusqlite() {
        let rusqlite_err = rusqlite::Error::InvalidQuery;
        let err: WikiracerError = rusqlite_err.into();
        assert!(matches!(err, WikiracerError::Database(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: WikiracerError = io_err.into();
        assert!(matches!(err, WikiracerError::Io(_)));
    }

    #[test]
    fn test_is_not_found() {
        assert!(WikiracerError::NotFound("x".into()).is_not_found());
        assert!(!WikiracerError::Fetch("x".into()).is_not_found());
    }
}
