//! In-memory test doubles for the connection and invocation seams.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::rc::Rc;

use rcli_config::DaemonEndpoint;

use crate::client::{Invoke, Response};
use crate::transport::{Connector, Duplex};
use crate::{ClientError, CommandRequest};

/// Operation observed on a [`ScriptedStream`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Write(Vec<u8>),
    Read,
    CloseWrite,
}

/// Stream that serves one scripted chunk per read and records every call.
pub(crate) struct ScriptedStream {
    chunks: VecDeque<Vec<u8>>,
    ending: Option<io::ErrorKind>,
    writes_before_failure: Option<usize>,
    events: Vec<Event>,
    closed: Rc<Cell<u32>>,
}

impl ScriptedStream {
    pub(crate) fn new<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        Self {
            chunks: chunks
                .into_iter()
                .map(|chunk| chunk.as_ref().to_vec())
                .collect(),
            ending: None,
            writes_before_failure: None,
            events: Vec::new(),
            closed: Rc::new(Cell::new(0)),
        }
    }

    /// Fails reads with `kind` once the scripted chunks are exhausted.
    pub(crate) const fn ending_with(mut self, kind: io::ErrorKind) -> Self {
        self.ending = Some(kind);
        self
    }

    pub(crate) fn events(&self) -> Vec<Event> {
        self.events.clone()
    }
}

impl Read for ScriptedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.events.push(Event::Read);
        let Some(mut chunk) = self.chunks.pop_front() else {
            return match self.ending {
                Some(kind) => Err(io::Error::from(kind)),
                None => Ok(0),
            };
        };
        let count = chunk.len().min(buf.len());
        let rest = chunk.split_off(count);
        buf[..count].copy_from_slice(&chunk);
        if !rest.is_empty() {
            self.chunks.push_front(rest);
        }
        Ok(count)
    }
}

impl Write for ScriptedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(remaining) = self.writes_before_failure.as_mut() {
            if *remaining == 0 {
                return Err(io::Error::from(io::ErrorKind::BrokenPipe));
            }
            *remaining -= 1;
        }
        self.events.push(Event::Write(buf.to_vec()));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Duplex for ScriptedStream {
    fn close_write(&mut self) -> io::Result<()> {
        self.events.push(Event::CloseWrite);
        Ok(())
    }
}

impl Drop for ScriptedStream {
    fn drop(&mut self) {
        self.closed.set(self.closed.get() + 1);
    }
}

/// Connector handing out identical scripted streams and counting their lifetimes.
#[derive(Clone)]
pub(crate) struct ScriptedConnector {
    chunks: Vec<Vec<u8>>,
    writes_before_failure: Option<usize>,
    opened: Rc<Cell<u32>>,
    closed: Rc<Cell<u32>>,
}

impl ScriptedConnector {
    pub(crate) fn new<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        Self {
            chunks: chunks
                .into_iter()
                .map(|chunk| chunk.as_ref().to_vec())
                .collect(),
            writes_before_failure: None,
            opened: Rc::new(Cell::new(0)),
            closed: Rc::new(Cell::new(0)),
        }
    }

    /// Lets `count` writes succeed on each stream, then fails the rest.
    pub(crate) const fn failing_write_after(mut self, count: usize) -> Self {
        self.writes_before_failure = Some(count);
        self
    }

    pub(crate) fn opened(&self) -> u32 {
        self.opened.get()
    }

    pub(crate) fn closed(&self) -> u32 {
        self.closed.get()
    }
}

impl Connector for ScriptedConnector {
    type Stream = ScriptedStream;

    fn open(&self, _endpoint: &DaemonEndpoint) -> Result<Self::Stream, ClientError> {
        self.opened.set(self.opened.get() + 1);
        let mut stream = ScriptedStream::new(self.chunks.iter());
        stream.writes_before_failure = self.writes_before_failure;
        stream.closed = Rc::clone(&self.closed);
        Ok(stream)
    }
}

/// Call captured by [`RecordingInvoker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedCall {
    pub(crate) arguments: Vec<String>,
    pub(crate) stdin: Option<String>,
}

/// Invoker that records requests and replays canned responses in order.
#[derive(Default)]
pub(crate) struct RecordingInvoker {
    responses: RefCell<VecDeque<Result<Response, ClientError>>>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl RecordingInvoker {
    pub(crate) fn with_outputs<I, S>(outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let invoker = Self::default();
        for output in outputs {
            invoker.push(Ok(Response::Output(output.into())));
        }
        invoker
    }

    pub(crate) fn push(&self, response: Result<Response, ClientError>) {
        self.responses.borrow_mut().push_back(response);
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }
}

impl Invoke for RecordingInvoker {
    fn invoke(
        &self,
        request: &CommandRequest,
        stdin: Option<&str>,
    ) -> Result<Response, ClientError> {
        self.calls.borrow_mut().push(RecordedCall {
            arguments: request.arguments().to_vec(),
            stdin: stdin.map(str::to_owned),
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(Response::Output(String::new())))
    }
}
