use thiserror::Error;

/// Failure modes of a classifier call, kept apart because callers map them
/// to different HTTP statuses and different retry behavior.
#[derive(Debug, Error)]
pub enum AiError {
    /// The model endpoint could not be reached, timed out, or answered
    /// with a server error. Retrying later may succeed.
    #[error("classifier unavailable: {0}")]
    Unavailable(String),

    /// The model answered, but the reply did not contain the JSON document
    /// the prompt demanded, or its fields were out of bounds.
    #[error("unparseable classifier reply: {0}")]
    Unparseable(String),

    /// The API refused the request outright (bad credentials, malformed
    /// payload). Retrying will not help.
    #[error("classifier API error: {0}")]
    Api(String),
}
