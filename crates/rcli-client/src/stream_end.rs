//! End-of-output detection for daemon responses.
//!
//! The daemon does not frame its output: a response ends when the peer closes
//! the connection, and frequently the close arrives as a reset rather than an
//! orderly shutdown. Both are normal terminations. [`is_benign_reset`] is the
//! only place that distinguishes such a reset from a genuine transport fault.

use std::io::{self, BufRead};

/// How the daemon terminated a response stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// The peer shut the stream down cleanly (a zero-length read).
    Clean,
    /// The peer reset or aborted the connection.
    Reset,
}

/// Outcome of reading one line from a response stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReadStep {
    /// A line (or a trailing fragment without a newline) was appended.
    Line,
    /// The stream has ended; no further reads should be attempted.
    Ended(StreamEnd),
}

/// Determines whether a read error is the daemon terminating the stream.
///
/// Returns true for `ConnectionReset` and `ConnectionAborted`. Every other
/// error kind, including `BrokenPipe` and `TimedOut`, is a transport failure
/// and must be propagated.
#[must_use]
pub fn is_benign_reset(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted
    )
}

/// Reads the next line from `reader` into `line`, classifying termination.
///
/// Bytes received before a reset remain in `line`.
pub(crate) fn read_step<R>(reader: &mut R, line: &mut Vec<u8>) -> io::Result<ReadStep>
where
    R: BufRead + ?Sized,
{
    match reader.read_until(b'\n', line) {
        Ok(0) => Ok(ReadStep::Ended(StreamEnd::Clean)),
        Ok(_) => Ok(ReadStep::Line),
        Err(error) if is_benign_reset(&error) => Ok(ReadStep::Ended(StreamEnd::Reset)),
        Err(error) => Err(error),
    }
}
