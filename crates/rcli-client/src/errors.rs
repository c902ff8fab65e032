//! Error taxonomy for daemon invocations.

use std::io;

use thiserror::Error;

/// Errors surfaced by the client.
///
/// Connection resets that terminate a response are not errors; they are
/// absorbed by the protocol client and never reach this type.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The endpoint host did not resolve to any address.
    #[error("failed to resolve daemon address {endpoint}: {source}")]
    Resolve {
        /// Endpoint being resolved.
        endpoint: String,
        /// Resolver failure.
        #[source]
        source: io::Error,
    },
    /// No resolved address accepted a connection.
    #[error("failed to connect to daemon at {endpoint}: {source}")]
    Connect {
        /// Endpoint being dialled.
        endpoint: String,
        /// Error from the last address attempted.
        #[source]
        source: io::Error,
    },
    /// The argument list could not be encoded as JSON.
    #[error("failed to serialise command request: {0}")]
    SerialiseRequest(#[source] serde_json::Error),
    /// Writing the request lines failed.
    #[error("failed to send request to daemon: {0}")]
    SendRequest(#[source] io::Error),
    /// Writing standard input failed.
    #[error("failed to send standard input to daemon: {0}")]
    SendInput(#[source] io::Error),
    /// Half-closing the connection after standard input failed.
    #[error("failed to close the write side of the daemon connection: {0}")]
    CloseInput(#[source] io::Error),
    /// Reading failed with something other than a connection reset.
    #[error("failed to read response from daemon: {0}")]
    ReadResponse(#[source] io::Error),
    /// `inspect` output was not valid JSON.
    #[error("failed to decode inspect output for {subject}: {source}")]
    DecodeInspect {
        /// Container or image that was inspected.
        subject: String,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Returns true when the daemon could not be reached at all.
    #[must_use]
    pub const fn is_connectivity(&self) -> bool {
        matches!(self, Self::Resolve { .. } | Self::Connect { .. })
    }
}
