//! In-memory transport for tests.

use std::collections::VecDeque;
use std::io;

use crate::frame::Frame;
use crate::transport::Transport;
use crate::Error;

#[derive(Default)]
pub struct MockTransport {
    /// Bytes the "module" has sent and the driver has not read yet.
    pub rx: VecDeque<u8>,
    /// Everything the driver wrote.
    pub tx: Vec<u8>,
    /// Echo every written frame back, the way the module acknowledges a parameter.
    pub echo: bool,
    /// Fail every call as if the port disappeared.
    pub closed: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn echoing() -> Self {
        Self { echo: true, ..Self::default() }
    }

    pub fn with_rx(bytes: &[u8]) -> Self {
        Self { rx: bytes.iter().copied().collect(), ..Self::default() }
    }

    pub fn queue(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes);
    }

    pub fn queue_frame(&mut self, frame: &Frame) {
        self.queue(frame.as_bytes());
    }

    fn check_open(&self) -> Result<(), Error> {
        if self.closed {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "port closed").into());
        }
        Ok(())
    }
}

impl Transport for MockTransport {
    fn bytes_available(&mut self) -> Result<usize, Error> {
        self.check_open()?;
        Ok(self.rx.len())
    }

    fn read_byte(&mut self) -> Result<u8, Error> {
        self.check_open()?;
        self.rx
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::TimedOut, "no byte").into())
    }

    fn write_all_flush(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.check_open()?;
        self.tx.extend_from_slice(bytes);
        if self.echo {
            self.rx.extend(bytes);
        }
        Ok(())
    }
}
