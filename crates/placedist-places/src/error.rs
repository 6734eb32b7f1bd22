use thiserror::Error;

/// Errors returned by the places text-search client.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response other than 429.
    #[error("unexpected HTTP status {status} from places search")]
    UnexpectedStatus { status: u16 },

    /// HTTP 429 or an `OVER_QUERY_LIMIT` envelope.
    #[error("rate limited by places search: {0}")]
    RateLimited(String),

    /// A continuation token was rejected because it has not propagated yet.
    #[error("continuation token is not ready yet")]
    TokenNotReady,

    /// Any other non-success `status` in the response envelope.
    #[error("places search returned {status}: {message}")]
    Api { status: String, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
