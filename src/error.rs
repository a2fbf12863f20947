//! Error taxonomy for the gateway client (spec §7).

use thiserror::Error;

/// The two envelope error codes that signal terminal-instance loss on the
/// gateway side. Seeing either one drives a transparent reconnect+retry
/// instead of surfacing the error to the caller.
pub const SENTINEL_CODES: [&str; 2] =
    ["TERMINAL_INSTANCE_NOT_FOUND", "TERMINAL_REGISTRY_TERMINAL_NOT_FOUND"];

/// Coarse status classification, mirroring the subset of `tonic::Code` the
/// executors reason about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    Unavailable,
    DeadlineExceeded,
    Cancelled,
    InvalidArgument,
    Unauthenticated,
    Internal,
    Unknown,
}

impl Code {
    pub fn is_retryable(self) -> bool {
        matches!(self, Code::Unavailable)
    }
}

impl From<tonic::Code> for Code {
    fn from(code: tonic::Code) -> Self {
        match code {
            tonic::Code::Unavailable => Code::Unavailable,
            tonic::Code::DeadlineExceeded => Code::DeadlineExceeded,
            tonic::Code::Cancelled => Code::Cancelled,
            tonic::Code::InvalidArgument => Code::InvalidArgument,
            tonic::Code::Unauthenticated => Code::Unauthenticated,
            _ => Code::Unknown,
        }
    }
}

/// Errors surfaced by the client's public API (spec §7 taxonomy).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("client is not connected")]
    NotConnected,

    #[error("transport error: {0}")]
    Transport(#[from] tonic::Status),

    #[error("application error {code}: {message}")]
    Application { code: String, message: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("call deadline exceeded")]
    Timeout,

    #[error("channel dial failed: {0}")]
    DialFailed(String),
}

impl ClientError {
    pub fn code(&self) -> Code {
        match self {
            ClientError::NotConnected => Code::Internal,
            ClientError::Transport(status) => Code::from(status.code()),
            ClientError::Application { .. } => Code::Unknown,
            ClientError::InvalidRequest(_) => Code::InvalidArgument,
            ClientError::Timeout => Code::DeadlineExceeded,
            ClientError::DialFailed(_) => Code::Unavailable,
        }
    }

    /// Whether the Unary/Stream Executors should retry this error
    /// themselves. Application errors are never retryable here — the two
    /// sentinel codes are handled as a distinct reconnect path before a
    /// `ClientError::Application` is ever constructed (see
    /// `executor::unary`).
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Transport(status) if is_retryable_status(status))
    }
}

pub(crate) fn is_retryable_status(status: &tonic::Status) -> bool {
    matches!(status.code(), tonic::Code::Unavailable | tonic::Code::DeadlineExceeded)
}

/// True when the two top-level envelope fields described in spec §3 are
/// inspected and an application error code was present.
pub fn is_sentinel(code: &str) -> bool {
    SENTINEL_CODES.contains(&code)
}
