use thiserror::Error;

/// Failure taxonomy of the dashboard client.
///
/// `Transport` is the network layer failing outright; `Api` is the backend
/// answering `success: false` with a message; `InvalidResponse` is a payload
/// that does not match the contract. All three are handled at the call site
/// and surfaced as status text, never allowed to take the process down.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend error: {0}")]
    Api(String),

    #[error("invalid response from backend: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
