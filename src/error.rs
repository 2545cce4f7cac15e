/// Custom error type for flowdock_notify operations
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// Payload could not be form-encoded. Part of the delivery taxonomy
    /// for completeness; this client encodes UTF-8 strings and never
    /// produces it.
    #[error("Cannot encode request data: {0}")]
    Encoding(String),

    #[error("Flowdock API URL is invalid: {0}")]
    Endpoint(String),

    #[error("Protocol error in connecting to Flowdock: {0}")]
    Protocol(String),

    #[error("IO error in connecting to Flowdock: {0}")]
    Transport(String),

    #[error(
        "Flowdock returned an error response with status {status} {status_text}, {body}\n\nURL: {url}"
    )]
    Response {
        status: u16,
        status_text: String,
        body: String,
        url: String,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

impl DeliveryError {
    /// Classify a reqwest failure into the delivery taxonomy.
    ///
    /// Builder and body-decode failures are HTTP-level misuse; everything
    /// else (connect, timeout, socket I/O) counts as transport.
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_builder() || err.is_decode() {
            DeliveryError::Protocol(err.to_string())
        } else {
            DeliveryError::Transport(err.to_string())
        }
    }
}

/// Helper type for Results that use DeliveryError
pub type Result<T> = std::result::Result<T, DeliveryError>;
