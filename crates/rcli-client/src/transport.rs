//! Connection management for daemon invocations.
//!
//! Every invocation runs against its own stream, opened immediately before the
//! framing sequence starts and closed as soon as the sequence finishes. The
//! [`with_connection`] scope owns the stream so that closure happens exactly
//! once whether the callback returns normally, fails, or unwinds.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};

use rcli_config::DaemonEndpoint;
use tracing::debug;

use crate::ClientError;

pub(crate) const TRANSPORT_TARGET: &str = "rcli_client::transport";

/// Bidirectional byte stream whose write side can be closed independently.
pub trait Duplex: Read + Write {
    /// Signals end of input to the peer while leaving the read side open.
    fn close_write(&mut self) -> io::Result<()>;
}

impl Duplex for TcpStream {
    fn close_write(&mut self) -> io::Result<()> {
        self.shutdown(Shutdown::Write)
    }
}

/// Opens streams to the daemon.
pub trait Connector {
    /// Stream type handed to the protocol layer.
    type Stream: Duplex;

    /// Opens a fresh stream to `endpoint`.
    fn open(&self, endpoint: &DaemonEndpoint) -> Result<Self::Stream, ClientError>;
}

/// Blocking TCP connector used against a real daemon.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpConnector;

impl Connector for TcpConnector {
    type Stream = TcpStream;

    fn open(&self, endpoint: &DaemonEndpoint) -> Result<Self::Stream, ClientError> {
        let addresses =
            resolve_tcp_addresses(endpoint.host(), endpoint.port()).map_err(|source| {
                ClientError::Resolve {
                    endpoint: endpoint.to_string(),
                    source,
                }
            })?;
        connect_first(&addresses).map_err(|source| ClientError::Connect {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

/// Runs `f` against a freshly opened stream and closes the stream afterwards.
///
/// Connection failures are returned without retrying. The stream is dropped,
/// and therefore closed, exactly once after `f` completes on every path.
pub fn with_connection<C, T, F>(
    connector: &C,
    endpoint: &DaemonEndpoint,
    f: F,
) -> Result<T, ClientError>
where
    C: Connector + ?Sized,
    F: FnOnce(&mut C::Stream) -> Result<T, ClientError>,
{
    let mut stream = connector.open(endpoint)?;
    debug!(target: TRANSPORT_TARGET, %endpoint, "opened daemon connection");
    let outcome = f(&mut stream);
    drop(stream);
    debug!(
        target: TRANSPORT_TARGET,
        %endpoint,
        succeeded = outcome.is_ok(),
        "released daemon connection"
    );
    outcome
}

fn resolve_tcp_addresses(host: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
    let addresses: Vec<SocketAddr> = (host, port).to_socket_addrs()?.collect();
    if addresses.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            "no resolved addresses",
        ));
    }
    Ok(addresses)
}

fn connect_first(addresses: &[SocketAddr]) -> io::Result<TcpStream> {
    let mut last_error = None;
    for address in addresses {
        match TcpStream::connect(address) {
            Ok(stream) => return Ok(stream),
            Err(error) => last_error = Some(error),
        }
    }
    Err(last_error.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::AddrNotAvailable, "no resolved addresses")
    }))
}
