use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Missing credentials: environment variable {0} is not set")]
    MissingCredentials(&'static str),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse JSON response from {url}")]
    JsonParse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    #[error("Source returned no data points for the requested range")]
    EmptySeries,

    #[error("Weather could not be fetched for any of the {attempted} requested locations")]
    NoLocationSucceeded { attempted: usize },
}

impl SourceError {
    /// True when the server rejected the request's credentials (401 or 403).
    pub fn is_credential_problem(&self) -> bool {
        match self {
            SourceError::MissingCredentials(_) => true,
            SourceError::HttpStatus { status, .. } => {
                *status == reqwest::StatusCode::UNAUTHORIZED
                    || *status == reqwest::StatusCode::FORBIDDEN
            }
            _ => false,
        }
    }
}
