//! Error types shared by the upstream gateways.

use reqwest::StatusCode;
use thiserror::Error;

/// Convenient result alias returning [`GatewayError`] failures.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Failures that can occur while talking to an upstream service.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build upstream HTTP client")]
    ClientBuilder {
        /// Underlying reqwest failure.
        #[source]
        source: reqwest::Error,
    },
    /// The configured base URL cannot carry endpoint paths.
    #[error("invalid upstream base URL `{url}`")]
    InvalidBaseUrl {
        /// Configured value.
        url: String,
    },
    /// A value placed in an endpoint path is not a usable segment.
    #[error("invalid path segment `{segment}`")]
    InvalidPathSegment {
        /// Rejected value.
        segment: String,
    },
    /// The request could not be sent (connection refused, timeout...).
    #[error("failed to send request to `{path}`")]
    RequestSend {
        /// Endpoint that was called.
        path: String,
        /// Underlying reqwest failure.
        #[source]
        source: reqwest::Error,
    },
    /// The upstream service answered with a non-success status.
    #[error("unexpected response status {status} for `{path}`")]
    RequestStatus {
        /// Endpoint that was called.
        path: String,
        /// Status returned by the service.
        status: StatusCode,
    },
    /// Response payload could not be decoded.
    #[error("failed to decode response for `{path}`")]
    DecodeResponse {
        /// Endpoint that was called.
        path: String,
        /// Underlying reqwest failure.
        #[source]
        source: reqwest::Error,
    },
}
