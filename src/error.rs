use thiserror::Error;

use crate::response::Response;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Cannot encode query options: {0}")]
    Options(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Api(Box<ApiError>),

    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Issue #{number} in {repo} has no milestone due date")]
    MissingMilestone { repo: String, number: u64 },

    #[error("Issues in {repo} span more than one milestone: {first} and {other}")]
    MilestoneMismatch {
        repo: String,
        first: String,
        other: String,
    },

    #[error("Template error: {0}")]
    Template(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A non-success answer from the API.
///
/// The wrapped [`Response`] is kept so callers can still look at the
/// pagination and rate-limit state of the failed call.
#[derive(Debug)]
pub struct ApiError {
    pub response: Response,
    pub message: String,
    pub documentation_url: Option<String>,
    pub errors: Vec<serde_json::Value>,
}

impl ApiError {
    /// True when the server refused the call because the quota is used up.
    pub fn is_rate_limited(&self) -> bool {
        let status = self.response.status().as_u16();
        (status == 403 || status == 429) && self.response.rate.is_exhausted()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "API error {} for {}: {}",
            self.response.status(),
            self.response.url(),
            self.message
        )?;
        if let Some(doc) = &self.documentation_url {
            write!(f, " (see {doc})")?;
        }
        Ok(())
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Self::Api(Box::new(err))
    }
}
