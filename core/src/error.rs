//! Error type of the default ureq-backed client.
//!
//! # Design
//! The factories never produce errors of their own; whatever the client
//! returns reaches the caller as is. `ClientError` therefore only describes
//! what `UreqClient` can fail with. A custom `HttpClient` brings its own
//! error type.

use std::fmt;

/// Errors returned by `UreqClient`.
#[derive(Debug)]
pub enum ClientError {
    /// Network failure, timeout, or a non-2xx status when the request was
    /// configured to treat statuses as errors.
    Transport(ureq::Error),

    /// The request payload could not be serialized to JSON.
    Serialization(serde_json::Error),

    /// The blocking task running the exchange panicked or was cancelled.
    Runtime(tokio::task::JoinError),
}

impl ClientError {
    /// The HTTP status when the failure was a rejected status code.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Transport(ureq::Error::StatusCode(status)) => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Transport(ureq::Error::Timeout(_)))
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transport(err) => write!(f, "request failed: {err}"),
            ClientError::Serialization(err) => write!(f, "serialization failed: {err}"),
            ClientError::Runtime(err) => write!(f, "request task failed: {err}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Transport(err) => Some(err),
            ClientError::Serialization(err) => Some(err),
            ClientError::Runtime(err) => Some(err),
        }
    }
}

impl From<ureq::Error> for ClientError {
    fn from(err: ureq::Error) -> Self {
        ClientError::Transport(err)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Serialization(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_exposed_for_rejected_codes() {
        let err = ClientError::from(ureq::Error::StatusCode(503));
        assert_eq!(err.status(), Some(503));
        assert!(!err.is_timeout());
        assert!(err.to_string().starts_with("request failed"));
    }

    #[test]
    fn serialization_error_has_source() {
        use std::error::Error;

        let inner = serde_json::from_str::<u8>("nope").unwrap_err();
        let err = ClientError::from(inner);
        assert!(err.source().is_some());
        assert_eq!(err.status(), None);
    }
}
