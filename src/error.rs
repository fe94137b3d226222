use reqwest::StatusCode;

/// Everything that can go wrong while fetching a recommendation. None of it is
/// fatal; the session shows the message and keeps its last movie.
#[derive(thiserror::Error, Debug)]
pub enum DiscoveryError {
    #[error("Failed to fetch movie data ({0})")]
    ListingUnavailable(StatusCode),

    #[error("Movie listing came back empty")]
    EmptyListing,

    #[error("Failed to fetch watch provider data ({0})")]
    ProvidersUnavailable(StatusCode),

    #[error("Network error: {0}")]
    NetworkFailure(String),
}

impl From<reqwest::Error> for DiscoveryError {
    fn from(err: reqwest::Error) -> Self {
        DiscoveryError::NetworkFailure(err.to_string())
    }
}

impl From<serde_json::Error> for DiscoveryError {
    fn from(err: serde_json::Error) -> Self {
        DiscoveryError::NetworkFailure(format!("unreadable response body: {err}"))
    }
}
