use std::path::PathBuf;

const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

/// Rejected user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("empty city name")]
    Empty,
    #[error("city name shorter than 2 characters")]
    TooShort,
}

impl ValidationError {
    /// User-facing copy.
    pub fn message(&self) -> String {
        match self {
            ValidationError::Empty => "Please enter a city name".to_string(),
            ValidationError::TooShort => {
                "City name must be at least 2 characters long".to_string()
            }
        }
    }
}

/// Failure of a dispatched search, classified for display.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("no response from weather service: {0}")]
    Network(String),
    #[error("city '{city}' not found")]
    NotFound { city: String },
    #[error("rate limited")]
    RateLimited,
    #[error("server error (HTTP {0})")]
    Server(u16),
    #[error("unexpected HTTP status {0}")]
    UnknownHttp(u16),
    #[error("application error: {0}")]
    Application(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl SearchError {
    /// Classify a non-2xx status that carried no `error` body.
    pub fn from_status(status: u16, city: &str) -> Self {
        match status {
            404 => SearchError::NotFound { city: city.to_string() },
            429 => SearchError::RateLimited,
            500..=599 => SearchError::Server(status),
            _ => SearchError::UnknownHttp(status),
        }
    }

    /// User-facing copy. Application errors are passed through verbatim.
    pub fn message(&self) -> String {
        match self {
            SearchError::Network(_) => {
                "Network error. Please check your internet connection and try again.".to_string()
            }
            SearchError::NotFound { city } => {
                format!("City \"{city}\" not found. Please check the spelling and try again.")
            }
            SearchError::RateLimited => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            SearchError::Server(_) => "Server error. Please try again later.".to_string(),
            SearchError::Application(message) => message.clone(),
            SearchError::UnknownHttp(_) | SearchError::Malformed(_) => GENERIC_MESSAGE.to_string(),
        }
    }
}

/// Anything that stops a submission from producing a result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Search(#[from] SearchError),
}

impl SubmitError {
    pub fn message(&self) -> String {
        match self {
            SubmitError::Invalid(err) => err.message(),
            SubmitError::Search(err) => err.message(),
        }
    }
}

/// No response was obtained from the weather endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transport failure: {0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError(err.to_string())
    }
}

/// Failure reading or writing the local key-value store.
///
/// Always recovered locally; never shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode stored value: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
