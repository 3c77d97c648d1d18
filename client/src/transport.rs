use futures_util::future::LocalBoxFuture;
use thiserror::Error;

/// One outgoing state-mutating request, already shaped by the kind modules.
/// `path` is relative to the API base; `body` is a form-encoded document when
/// the endpoint takes one.
#[derive(Hash, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct ToggleRequest {
    pub path: String,
    pub body: Option<String>,
}

/// Every way a toggle request can fail. The controller treats all variants
/// identically: roll back to the last confirmed state and notify the user.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("server rejected request: {0}")]
    Rejected(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Issues one HTTP POST and resolves to the raw 2xx response body.
/// Implementations attach the anti-forgery token; they report non-2xx
/// statuses as `TransportError::Status` and everything below that as
/// `TransportError::Network`.
pub trait Transport {
    fn send(&self, request: ToggleRequest) -> LocalBoxFuture<'static, Result<String, TransportError>>;
}
