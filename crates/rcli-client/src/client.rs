//! Protocol client for the daemon's remote command interface.
//!
//! One invocation is one exchange over one connection:
//!
//! 1. send the argument list as a JSON array line plus an empty line;
//! 2. read and discard the daemon's handshake line;
//! 3. optionally send standard input and half-close the write side;
//! 4. collect output lines until the daemon closes or resets the connection.
//!
//! A reset or clean close while waiting for the handshake is reported as
//! [`Response::ClosedBeforeHandshake`] rather than as an error, because some
//! subcommands (`wait` in particular) drop the connection without one. No
//! further reads or writes happen on such a connection.

use std::io::BufReader;

use rcli_config::{Config, DaemonEndpoint};
use tracing::debug;

use crate::request::write_input;
use crate::stream_end::{ReadStep, read_step};
use crate::transport::{Connector, Duplex, TcpConnector, with_connection};
use crate::{ClientError, CommandRequest};

pub(crate) const CLIENT_TARGET: &str = "rcli_client::client";

/// Result of a completed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Output collected after the handshake, line terminators preserved.
    Output(String),
    /// The daemon reset or closed the connection before sending its handshake.
    ClosedBeforeHandshake,
}

impl Response {
    /// Output text; empty when the daemon hung up before the handshake.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Output(text) => text,
            Self::ClosedBeforeHandshake => "",
        }
    }

    /// Consumes the response, yielding its output text.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Output(text) => text,
            Self::ClosedBeforeHandshake => String::new(),
        }
    }

    /// Returns true when the daemon hung up before responding.
    #[must_use]
    pub const fn is_closed_before_handshake(&self) -> bool {
        matches!(self, Self::ClosedBeforeHandshake)
    }
}

/// Executes daemon subcommands.
pub trait Invoke {
    /// Runs `request`, forwarding `stdin` to the invoked process when given.
    fn invoke(
        &self,
        request: &CommandRequest,
        stdin: Option<&str>,
    ) -> Result<Response, ClientError>;

    /// Runs `request` without standard input.
    fn invoke_simple(&self, request: &CommandRequest) -> Result<Response, ClientError> {
        self.invoke(request, None)
    }
}

/// Client bound to one daemon endpoint.
///
/// The client holds no connection; each invocation opens and closes its own,
/// so a client may be shared freely between threads.
#[derive(Debug, Clone)]
pub struct Client<C = TcpConnector> {
    endpoint: DaemonEndpoint,
    connector: C,
}

impl Client {
    /// Creates a TCP client for `endpoint`.
    #[must_use]
    pub const fn new(endpoint: DaemonEndpoint) -> Self {
        Self::with_connector(endpoint, TcpConnector)
    }

    /// Creates a TCP client for the endpoint described by `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.daemon_endpoint())
    }
}

impl<C> Client<C> {
    /// Creates a client that opens streams through `connector`.
    #[must_use]
    pub const fn with_connector(endpoint: DaemonEndpoint, connector: C) -> Self {
        Self {
            endpoint,
            connector,
        }
    }

    /// Endpoint every invocation connects to.
    #[must_use]
    pub const fn endpoint(&self) -> &DaemonEndpoint {
        &self.endpoint
    }
}

impl<C: Connector> Invoke for Client<C> {
    fn invoke(
        &self,
        request: &CommandRequest,
        stdin: Option<&str>,
    ) -> Result<Response, ClientError> {
        debug!(
            target: CLIENT_TARGET,
            endpoint = %self.endpoint,
            arguments = ?request.arguments(),
            with_stdin = stdin.is_some(),
            "invoking daemon command"
        );
        let response = with_connection(&self.connector, &self.endpoint, |stream| {
            exchange(stream, request, stdin)
        })?;
        debug!(
            target: CLIENT_TARGET,
            arguments = ?request.arguments(),
            closed_before_handshake = response.is_closed_before_handshake(),
            output = response.text(),
            "daemon command finished"
        );
        Ok(response)
    }
}

/// Performs the framing sequence over an open stream.
pub(crate) fn exchange<S>(
    stream: &mut S,
    request: &CommandRequest,
    stdin: Option<&str>,
) -> Result<Response, ClientError>
where
    S: Duplex + ?Sized,
{
    request.write_to(stream)?;

    let mut reader = BufReader::new(stream);
    let mut handshake = Vec::new();
    if let ReadStep::Ended(end) =
        read_step(&mut reader, &mut handshake).map_err(ClientError::ReadResponse)?
    {
        debug!(target: CLIENT_TARGET, ?end, "daemon hung up before the handshake");
        return Ok(Response::ClosedBeforeHandshake);
    }

    if let Some(input) = stdin {
        write_input(reader.get_mut(), input)?;
        reader
            .get_mut()
            .close_write()
            .map_err(ClientError::CloseInput)?;
    }

    let mut output = Vec::new();
    let end = loop {
        match read_step(&mut reader, &mut output).map_err(ClientError::ReadResponse)? {
            ReadStep::Line => {}
            ReadStep::Ended(end) => break end,
        }
    };
    debug!(target: CLIENT_TARGET, ?end, bytes = output.len(), "daemon output ended");

    Ok(Response::Output(decode_output(output)))
}

fn decode_output(output: Vec<u8>) -> String {
    String::from_utf8(output)
        .unwrap_or_else(|error| String::from_utf8_lossy(error.as_bytes()).into_owned())
}
