use thiserror::Error;

/// Errors returned by the storefront backend client.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network or TLS failure, or a non-2xx status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered but the call made no sense for it.
    #[error("Backend error: {0}")]
    Api(String),

    /// The response envelope carried no `data`.
    #[error("Response for {0} carried no data")]
    MissingData(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type GatewayResult<T> = Result<T, GatewayError>;
