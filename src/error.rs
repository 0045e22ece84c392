//! Pipeline error kinds

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Upstream unreachable, connection refused, timed out, etc.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream answered with a non-success HTTP status.
    #[error("upstream returned HTTP {0}")]
    UpstreamStatus(StatusCode),

    /// Upstream answered 2xx but the payload shape was unexpected.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// An outbound send was rejected by the delivery endpoint.
    #[error("delivery rejected: {0}")]
    Delivery(String),

    /// A credential or destination is absent from the configuration.
    /// Detected at send time, not startup.
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),
}
