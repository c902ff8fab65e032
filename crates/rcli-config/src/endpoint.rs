use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::defaults::{DEFAULT_DAEMON_HOST, DEFAULT_DAEMON_PORT};

/// TCP address of the daemon's remote command listener.
///
/// The value is fixed when a client is constructed and only ever read
/// afterwards, so every invocation issued by that client targets the same
/// daemon.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct DaemonEndpoint {
    host: String,
    port: u16,
}

impl DaemonEndpoint {
    /// Builds an endpoint from an explicit host and port.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Builds an endpoint on the default port, falling back to the default
    /// host when `host` is absent or blank.
    #[must_use]
    pub fn with_host(host: Option<&str>) -> Self {
        let resolved = host
            .map(str::trim)
            .filter(|candidate| !candidate.is_empty())
            .unwrap_or(DEFAULT_DAEMON_HOST);
        Self::new(resolved, DEFAULT_DAEMON_PORT)
    }

    /// Host name or address of the daemon.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// TCP port of the daemon.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl Default for DaemonEndpoint {
    fn default() -> Self {
        Self::with_host(None)
    }
}

impl fmt::Display for DaemonEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "tcp://{}:{}", self.host, self.port)
    }
}

impl FromStr for DaemonEndpoint {
    type Err = EndpointParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(input)?;
        if url.scheme() != "tcp" {
            return Err(EndpointParseError::UnsupportedScheme(
                url.scheme().to_owned(),
            ));
        }
        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| EndpointParseError::MissingHost(input.to_owned()))?;
        let port = url.port().unwrap_or(DEFAULT_DAEMON_PORT);
        Ok(Self::new(host, port))
    }
}

/// Errors encountered while parsing a [`DaemonEndpoint`] from text.
#[derive(Debug, Error)]
pub enum EndpointParseError {
    /// Scheme was not recognised.
    #[error("unsupported daemon endpoint scheme '{0}'")]
    UnsupportedScheme(String),
    /// TCP host name was missing.
    #[error("missing TCP host in '{0}'")]
    MissingHost(String),
    /// URL failed to parse.
    #[error(transparent)]
    Url(#[from] url::ParseError),
}
