//! Shared configuration for the remote command client.
//!
//! Configuration is layered by `ortho_config`: built-in defaults, then a
//! TOML file (`--config-path` or a discovered `.rcli.toml`), then `RCLI_*`
//! environment variables, then command-line flags.

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

mod defaults;
mod endpoint;
mod logging;

pub use defaults::{
    DEFAULT_DAEMON_HOST, DEFAULT_DAEMON_PORT, DEFAULT_LOG_FILTER, default_daemon_endpoint,
    default_daemon_host, default_log_filter_string, default_log_format,
};
pub use endpoint::{DaemonEndpoint, EndpointParseError};
pub use logging::{LogFormat, LogFormatParseError};

/// Configuration consumed by the client and its host binary.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, OrthoConfig)]
#[ortho_config(prefix = "RCLI")]
pub struct Config {
    /// Host name or address of the daemon.
    #[ortho_config(default = default_daemon_host())]
    pub daemon_host: String,
    /// TCP port of the daemon's remote command listener.
    #[ortho_config(default = DEFAULT_DAEMON_PORT)]
    pub daemon_port: u16,
    /// `tracing` filter expression applied to diagnostics.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for diagnostics.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Config {
    /// Endpoint every invocation connects to.
    ///
    /// A blank host falls back to [`DEFAULT_DAEMON_HOST`].
    #[must_use]
    pub fn daemon_endpoint(&self) -> DaemonEndpoint {
        let endpoint = DaemonEndpoint::with_host(Some(self.daemon_host.as_str()));
        DaemonEndpoint::new(endpoint.host(), self.daemon_port)
    }

    /// Filter expression for the diagnostics subscriber.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Output format for the diagnostics subscriber.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            daemon_host: default_daemon_host(),
            daemon_port: DEFAULT_DAEMON_PORT,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}
