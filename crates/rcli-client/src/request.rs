//! Request framing for the remote command protocol.
//!
//! A request is the argument list encoded as one compact JSON array on its own
//! line, followed by an empty line. Standard input for the invoked process, if
//! any, follows after the daemon's handshake line.

use std::io::Write;

use serde::Serialize;

use crate::ClientError;

/// Ordered argument list naming a daemon subcommand and its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommandRequest {
    arguments: Vec<String>,
}

impl CommandRequest {
    /// Builds a request from the subcommand followed by its parameters.
    pub fn new<I, S>(arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }

    /// Arguments in the order they are sent.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Writes the request line and the blank terminator line, then flushes.
    pub fn write_to<W>(&self, writer: &mut W) -> Result<(), ClientError>
    where
        W: Write + ?Sized,
    {
        let mut frame = serde_json::to_vec(self).map_err(ClientError::SerialiseRequest)?;
        frame.extend_from_slice(b"\n\n");
        writer.write_all(&frame).map_err(ClientError::SendRequest)?;
        writer.flush().map_err(ClientError::SendRequest)
    }
}

/// Writes standard input content as a line and flushes.
///
/// A newline is appended unless the content already ends with one. Content
/// and terminator go out in a single write.
pub(crate) fn write_input<W>(writer: &mut W, input: &str) -> Result<(), ClientError>
where
    W: Write + ?Sized,
{
    let mut line = Vec::with_capacity(input.len() + 1);
    line.extend_from_slice(input.as_bytes());
    if !input.ends_with('\n') {
        line.push(b'\n');
    }
    writer.write_all(&line).map_err(ClientError::SendInput)?;
    writer.flush().map_err(ClientError::SendInput)
}
