use thiserror::Error;

/// Failure of a single backend call. The chat session never shows these to
/// the user verbatim; every variant collapses to a fixed transcript message.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Connection refused, DNS failure, timeout, ...
    #[error("transport error: {0}")]
    Transport(String),
    /// Backend answered with a non-2xx status
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// Response body did not match the expected shape
    #[error("could not decode backend response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Machine-readable code for structured CLI output.
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Transport(_) => codes::CONNECTION_ERROR,
            GatewayError::Status { .. } => codes::HTTP_ERROR,
            GatewayError::Decode(_) => codes::DECODE_ERROR,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("timeout must be at least one second")]
    ZeroTimeout,
    #[error("user id must not be empty")]
    EmptyUserId,
}

/// Error codes used in structured CLI output
pub mod codes {
    pub const CLI_ERROR: &str = "cli_error";
    pub const CONFIG_ERROR: &str = "config_error";
    pub const CONNECTION_ERROR: &str = "connection_error";
    pub const HTTP_ERROR: &str = "http_error";
    pub const DECODE_ERROR: &str = "decode_error";
}
