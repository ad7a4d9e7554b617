//! Error types for the SABnzbd API client.
//!
//! # Design
//! Failures are classified by where the round trip broke down. `Transport`
//! covers everything before a usable body exists (connection failures and
//! non-2xx statuses). `Decode` means the body arrived but was not the
//! requested encoding. `Protocol` means it decoded but lacked a field the
//! operation needs. `Rejected` is the service's own `status: false` answer.
//! `Config` is the only error raised before any request is built.

use thiserror::Error;

/// Errors returned by client operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Host or API key missing or unusable. Raised at construction time.
    #[error("invalid client configuration: {0}")]
    Config(String),

    /// The request never produced a successful HTTP response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body was not valid JSON.
    #[error("response was not valid JSON: {0}")]
    Decode(String),

    /// The response decoded but did not have the shape the operation expects.
    #[error("unexpected response shape: {0}")]
    Protocol(String),

    /// The service answered with `status: false` and an error message.
    #[error("request rejected by server: {0}")]
    Rejected(String),
}

/// Failures below the response decoding layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, DNS, TLS or timeout failure. The cause never contains the
    /// request URL, since the URL carries the API key.
    #[error("request failed: {source}")]
    Request {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl TransportError {
    /// Wrap an arbitrary transport failure.
    pub fn request(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Request {
            source: source.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::request(err.without_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_message_includes_code_and_body() {
        let err = ApiError::from(TransportError::Status {
            status: 503,
            body: "maintenance".to_string(),
        });
        assert_eq!(err.to_string(), "HTTP 503: maintenance");
    }

    #[test]
    fn request_error_preserves_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = TransportError::request(io);
        assert_eq!(err.to_string(), "request failed: refused");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn protocol_error_names_expectation() {
        let err = ApiError::Protocol("missing field `version`".to_string());
        assert_eq!(
            err.to_string(),
            "unexpected response shape: missing field `version`"
        );
    }
}
