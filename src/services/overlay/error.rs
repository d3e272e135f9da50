/// Errors that can occur while talking to the playback backend.
///
/// None of these are fatal to the engine: poll failures keep the last known
/// state and flip the connectivity flag, command failures surface a message
/// and are corrected by a later poll. The engine never stops its cadence
/// because of a prior failure.
#[derive(thiserror::Error, Debug)]
pub enum OverlayError {
    /// Backend answered with a non-success HTTP status.
    #[error("HTTP {0}")]
    Status(u16),

    /// Transport-level failure reaching the backend.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered, but the body was not the expected JSON.
    #[error("malformed response body: {0}")]
    MalformedBody(String),

    /// A control request exceeded its deadline.
    #[error("Request to {endpoint} timed out")]
    CommandTimeout {
        /// Endpoint the request was addressed to.
        endpoint: &'static str,
    },

    /// A control request failed outright.
    #[error("Failed to call {endpoint}: {detail}")]
    CommandFailure {
        /// Endpoint the request was addressed to.
        endpoint: &'static str,
        /// Human-readable failure detail.
        detail: String,
    },
}
