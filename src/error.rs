use thiserror::Error;

/// Errors surfaced by the portal client.
///
/// `Connection` and `HttpStatus` are transport-level failures; `Decode` is a
/// malformed body; `Status` is a well-formed response whose embedded logical
/// status is not 200. Cipher failures are represented as `None` at the
/// `encryption` boundary and never appear here.
#[derive(Debug, Error)]
pub enum CarwingsError {
    #[error("connection error: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("request rejected with HTTP status {0}")]
    HttpStatus(u16),

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("remote operation failed with status {0}")]
    Status(i64),

    #[error("empty response body where a record was expected")]
    EmptyResponse,

    #[error("login response contained no vehicles")]
    MissingVehicle,
}

impl CarwingsError {
    /// True for failures at the HTTP layer, as opposed to decode or
    /// logical-status failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::HttpStatus(_))
    }
}
