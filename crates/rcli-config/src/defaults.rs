use crate::endpoint::DaemonEndpoint;

/// Host contacted when no daemon host is configured.
pub const DEFAULT_DAEMON_HOST: &str = "localhost";

/// Fixed TCP port the daemon accepts remote commands on.
pub const DEFAULT_DAEMON_PORT: u16 = 4242;

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Owned daemon host value used where allocation is required (e.g. serde).
pub fn default_daemon_host() -> String {
    DEFAULT_DAEMON_HOST.to_owned()
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
pub fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Compact
}

/// Endpoint used when neither host nor port have been configured.
pub fn default_daemon_endpoint() -> DaemonEndpoint {
    DaemonEndpoint::new(DEFAULT_DAEMON_HOST, DEFAULT_DAEMON_PORT)
}
