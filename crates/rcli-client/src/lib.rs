//! Client for a container daemon's line-oriented remote command protocol.
//!
//! Every call opens its own TCP connection, sends the subcommand's argument
//! list as a JSON array line, skips the daemon's handshake line, optionally
//! streams standard input, and then collects output until the daemon closes
//! or resets the connection. The [`ContainerCommands`] trait layers the
//! individual subcommands on top of [`Invoke`], and
//! [`extend_image_with_file`] composes them.
//!
//! ```no_run
//! use rcli_client::{Client, ContainerCommands};
//! use rcli_config::DaemonEndpoint;
//!
//! let client = Client::new(DaemonEndpoint::with_host(Some("dock-01")));
//! for container in client.list_running_containers()? {
//!     println!("{container}");
//! }
//! # Ok::<(), rcli_client::ClientError>(())
//! ```

mod client;
mod commands;
mod errors;
mod image;
mod request;
mod stream_end;
mod transport;

#[cfg(test)]
mod test_support;

pub use client::{Client, Invoke, Response};
pub use commands::{ContainerCommands, ContainerId};
pub use errors::ClientError;
pub use image::extend_image_with_file;
pub use request::CommandRequest;
pub use stream_end::{StreamEnd, is_benign_reset};
pub use transport::{Connector, Duplex, TcpConnector, with_connection};
