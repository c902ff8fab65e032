//! Fake daemon for exercising the client over real TCP connections.
//!
//! The daemon serves one scripted exchange per accepted connection, in order,
//! and records what each client sent so tests can assert on the wire format.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow, bail};
use socket2::SockRef;

/// How the daemon terminates a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// Orderly shutdown.
    Close,
    /// Abortive close (RST) after a short pause so sent data is consumed.
    Reset,
}

/// Scripted behaviour for one connection.
#[derive(Debug, Clone)]
pub enum Exchange {
    /// Drop the connection with a reset before sending the handshake.
    ResetBeforeHandshake,
    /// Close the connection in an orderly way before sending the handshake.
    CloseBeforeHandshake,
    /// Send a handshake and `lines`, then end the connection.
    Respond { lines: Vec<String>, ending: Ending },
    /// Send a handshake, read standard input until the client half-closes,
    /// then echo it back and close.
    EchoStdin,
    /// Send a handshake, read standard input until the client half-closes,
    /// then send `lines` and close.
    ConsumeStdin { lines: Vec<String> },
}

impl Exchange {
    pub fn respond<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Respond {
            lines: lines.into_iter().map(Into::into).collect(),
            ending: Ending::Close,
        }
    }

    pub fn respond_then_reset<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Respond {
            lines: lines.into_iter().map(Into::into).collect(),
            ending: Ending::Reset,
        }
    }

    pub fn consume_stdin<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ConsumeStdin {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

/// What one client connection sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Received {
    /// Request line and blank terminator line, terminators included.
    pub request_lines: Vec<String>,
    /// Bytes received after the handshake up to the client's half-close.
    pub stdin: Option<String>,
}

impl Received {
    /// Decodes the request line as a JSON array of strings.
    pub fn arguments(&self) -> Result<Vec<String>> {
        let line = self
            .request_lines
            .first()
            .ok_or_else(|| anyhow!("no request line recorded"))?;
        serde_json::from_str(line).context("decode request line")
    }
}

pub struct FakeDaemon {
    port: u16,
    received: Arc<Mutex<Vec<Received>>>,
    handle: Option<thread::JoinHandle<Result<()>>>,
}

const HANDSHAKE: &str = "\u{1b}[?1h\u{1b}=\n";

impl FakeDaemon {
    /// Spawns a daemon on an ephemeral port serving `exchanges` in order.
    pub fn spawn(exchanges: Vec<Exchange>) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake daemon")?;
        listener
            .set_nonblocking(true)
            .context("fake daemon nonblocking")?;
        let port = listener.local_addr().context("local addr")?.port();
        let received = Arc::new(Mutex::new(Vec::new()));
        let received_clone = Arc::clone(&received);
        let handle = thread::spawn(move || Self::serve(listener, exchanges, received_clone));
        Ok(Self {
            port,
            received,
            handle: Some(handle),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Waits for the daemon thread and returns what every client sent.
    pub fn finish(mut self) -> Result<Vec<Received>> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake daemon thread panicked"))??;
        }
        let received = self
            .received
            .lock()
            .map_err(|error| anyhow!("lock received requests: {error}"))?;
        Ok(received.clone())
    }

    fn serve(
        listener: TcpListener,
        exchanges: Vec<Exchange>,
        received: Arc<Mutex<Vec<Received>>>,
    ) -> Result<()> {
        for exchange in exchanges {
            let stream = accept_with_deadline(&listener)?;
            let record = Self::serve_connection(stream, &exchange)?;
            received
                .lock()
                .map_err(|error| anyhow!("lock received requests: {error}"))?
                .push(record);
        }
        Ok(())
    }

    fn serve_connection(stream: TcpStream, exchange: &Exchange) -> Result<Received> {
        stream
            .set_nonblocking(false)
            .context("blocking client stream")?;
        let mut reader = BufReader::new(stream.try_clone().context("clone stream")?);
        let mut record = Received::default();
        for _ in 0..2 {
            let mut line = String::new();
            if reader.read_line(&mut line).context("read request")? == 0 {
                bail!("client closed before completing the request");
            }
            record.request_lines.push(line);
        }

        let mut writer = stream;
        match exchange {
            Exchange::ResetBeforeHandshake => reset(&writer)?,
            Exchange::CloseBeforeHandshake => writer
                .shutdown(Shutdown::Both)
                .context("close before handshake")?,
            Exchange::Respond { lines, ending } => {
                writer.write_all(HANDSHAKE.as_bytes())?;
                for line in lines {
                    writer.write_all(line.as_bytes())?;
                }
                writer.flush()?;
                if *ending == Ending::Reset {
                    thread::sleep(Duration::from_millis(100));
                    reset(&writer)?;
                }
            }
            Exchange::EchoStdin => {
                let input = read_stdin(&mut writer, &mut reader)?;
                writer.write_all(format!("received {} bytes\n", input.len()).as_bytes())?;
                writer.write_all(input.as_bytes())?;
                writer.flush()?;
                record.stdin = Some(input);
            }
            Exchange::ConsumeStdin { lines } => {
                let input = read_stdin(&mut writer, &mut reader)?;
                for line in lines {
                    writer.write_all(line.as_bytes())?;
                }
                writer.flush()?;
                record.stdin = Some(input);
            }
        }
        Ok(record)
    }
}

impl Drop for FakeDaemon {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Sends the handshake and reads input until the client closes its write side.
fn read_stdin(writer: &mut TcpStream, reader: &mut BufReader<TcpStream>) -> Result<String> {
    writer.write_all(HANDSHAKE.as_bytes())?;
    writer.flush()?;
    let mut input = String::new();
    reader
        .read_to_string(&mut input)
        .context("read stdin until half-close")?;
    Ok(input)
}

fn accept_with_deadline(listener: &TcpListener) -> Result<TcpStream> {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        match listener.accept() {
            Ok((stream, _)) => return Ok(stream),
            Err(ref error) if error.kind() == io::ErrorKind::WouldBlock => {
                if Instant::now() >= deadline {
                    bail!("no client connected before the deadline");
                }
                thread::sleep(Duration::from_millis(10));
            }
            Err(error) => return Err(error).context("accept connection"),
        }
    }
}

/// Closes the stream abortively so the client observes a reset.
fn reset(stream: &TcpStream) -> Result<()> {
    SockRef::from(stream)
        .set_linger(Some(Duration::ZERO))
        .context("enable abortive close")?;
    Ok(())
}
