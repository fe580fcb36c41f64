use thiserror::Error;

/// Error type shared by the draft, submission, preference and API layers.
///
/// Validation failures are not errors; they travel as
/// [`ValidationReport`](crate::wizard::ValidationReport) values.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Wizard is on step {current}, expected step {expected}")]
    WrongStep { current: u8, expected: u8 },
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Preferences error: {0}")]
    Preferences(String),
    #[error("Prompt failed: {0}")]
    Prompt(String),
}

pub type Result<T> = std::result::Result<T, ListingError>;

impl From<dialoguer::Error> for ListingError {
    fn from(err: dialoguer::Error) -> Self {
        ListingError::Prompt(err.to_string())
    }
}

/// Failure reported by the remote listing API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Server answered with a non-success status. `message` is taken from the
    /// response body when it carries one.
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text suitable for inline display next to the submit button.
    pub fn user_message(&self) -> &str {
        match self {
            ApiError::Status { message, .. } => message,
            ApiError::Transport(message) | ApiError::Decode(message) => message,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<reqwest::Error> for ListingError {
    fn from(err: reqwest::Error) -> Self {
        ListingError::Api(ApiError::from(err))
    }
}
