//! Splits the incoming byte stream into [`Frame`]s.

use tracing::{debug, trace, warn};

use crate::constants::{END2, HEAD1, HEAD2};
use crate::frame::{Frame, FRAME_CAPACITY, REQUEST_LEN};
use crate::transport::Transport;
use crate::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scan {
    /// Looking for HEAD1.
    Idle,
    /// Got HEAD1, next byte must be HEAD2.
    Header,
    /// Inside a frame, capturing until END2.
    Body,
}

/// Non-blocking frame assembler over a [`Transport`].
///
/// A frame that straddles two calls is kept internally and finished on a later call; it is
/// never handed out half-built.
pub struct Framer<T> {
    transport: T,
    partial: Frame,
    scan: Scan,
    max_len: usize,
}

impl<T: Transport> Framer<T> {
    pub fn new(transport: T, max_len: usize) -> Self {
        Self {
            transport,
            partial: Frame::empty(),
            scan: Scan::Idle,
            max_len: max_len.clamp(REQUEST_LEN, FRAME_CAPACITY),
        }
    }

    /// Consume the bytes that are available right now and return the first complete frame.
    ///
    /// `Ok(None)` means "nothing yet, try again later". A frame that grows past the
    /// configured maximum without a terminator is dropped with [`Error::MalformedStream`];
    /// the next call starts scanning afresh.
    pub fn try_read_frame(&mut self) -> Result<Option<Frame>, Error> {
        while self.transport.bytes_available()? > 0 {
            let byte = self.transport.read_byte()?;
            if let Some(frame) = self.push(byte)? {
                if !frame.checksum_ok() {
                    warn!("checksum mismatch in received frame [{frame}]");
                }
                debug!("rx [{frame}]");
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    fn push(&mut self, byte: u8) -> Result<Option<Frame>, Error> {
        match self.scan {
            Scan::Idle => {
                if byte == HEAD1 {
                    self.start(byte);
                } else {
                    trace!("skipping noise byte {byte:02X}");
                }
            }
            Scan::Header => {
                if byte == HEAD2 {
                    self.partial.push(byte);
                    self.scan = Scan::Body;
                } else if byte == HEAD1 {
                    self.start(byte);
                } else {
                    trace!("false start: {HEAD1:02X} followed by {byte:02X}");
                    self.reset();
                }
            }
            Scan::Body => {
                if self.partial.len() >= self.max_len {
                    let len = self.partial.len() + 1;
                    warn!("dropping {} bytes without terminator", self.partial.len());
                    self.reset();
                    // The byte that overflowed may open the next frame.
                    if byte == HEAD1 {
                        self.start(byte);
                    }
                    return Err(Error::MalformedStream { len });
                }
                self.partial.push(byte);
                if byte == END2 {
                    let frame = self.partial;
                    self.reset();
                    return Ok(Some(frame));
                }
            }
        }
        Ok(None)
    }

    fn start(&mut self, head: u8) {
        self.partial.clear();
        self.partial.push(head);
        self.scan = Scan::Header;
    }

    fn reset(&mut self) {
        self.partial.clear();
        self.scan = Scan::Idle;
    }

    /// Write the frame verbatim and flush it.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<(), Error> {
        debug!("tx [{frame}]");
        self.transport.write_all_flush(frame.as_bytes())
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_FRAME_LEN;
    use crate::constants::*;
    use crate::mock::MockTransport;

    fn framer(bytes: &[u8]) -> Framer<MockTransport> {
        Framer::new(MockTransport::with_rx(bytes), DEFAULT_MAX_FRAME_LEN)
    }

    #[test_log::test]
    fn skips_leading_noise() {
        let request = Frame::request(0x01, 0x02, 0x05);
        let mut stream = vec![0xAA];
        stream.extend_from_slice(request.as_bytes());
        assert_eq!(stream.len(), 11);

        let mut framer = framer(&stream);
        let frame = framer.try_read_frame().unwrap().expect("frame");
        assert_eq!(frame.len(), 10);
        assert_eq!(frame.data(), Some(0x05));
        assert_eq!(frame.as_bytes(), request.as_bytes());
        assert!(framer.transport().rx.is_empty());
    }

    #[test_log::test]
    fn request_round_trip() {
        let mut transport = MockTransport::new();
        let mut writer = Framer::new(&mut transport, DEFAULT_MAX_FRAME_LEN);
        writer.write_frame(&Frame::request(0x01, 0x02, 0x05)).unwrap();

        let mut reader = framer(&transport.tx);
        let frame = reader.try_read_frame().unwrap().expect("frame");
        assert_eq!(frame.control(), Some(0x01));
        assert_eq!(frame.command(), Some(0x02));
        assert_eq!(frame.data(), Some(0x05));
        assert!(frame.checksum_ok());
    }

    #[test_log::test]
    fn empty_stream_has_no_frame() {
        let mut framer = framer(&[]);
        assert!(framer.try_read_frame().unwrap().is_none());
    }

    #[test_log::test]
    fn false_start_is_not_part_of_a_frame() {
        let good = Frame::request(HUMAN_STATUS, PRESENCE, OCCUPIED);
        let mut stream = vec![HEAD1, 0x00, 0x11, HEAD1, 0x22];
        stream.extend_from_slice(good.as_bytes());

        let mut framer = framer(&stream);
        let frame = framer.try_read_frame().unwrap().expect("frame");
        assert_eq!(frame.as_bytes(), good.as_bytes());
    }

    #[test_log::test]
    fn repeated_head1_restarts_header() {
        let good = Frame::request(HUMAN_STATUS, MOTION, ACTIVE);
        let mut stream = vec![HEAD1];
        stream.extend_from_slice(good.as_bytes());

        let mut framer = framer(&stream);
        let frame = framer.try_read_frame().unwrap().expect("frame");
        assert_eq!(frame.as_bytes(), good.as_bytes());
    }

    #[test_log::test]
    fn frame_split_across_polls() {
        let good = Frame::request(WORKING_STATUS, SET_SCENARIO, BEDROOM);
        let (first, second) = good.as_bytes().split_at(4);

        let mut framer = framer(first);
        assert!(framer.try_read_frame().unwrap().is_none());

        framer.transport_mut().queue(second);
        let frame = framer.try_read_frame().unwrap().expect("frame");
        assert_eq!(frame.as_bytes(), good.as_bytes());
    }

    #[test_log::test]
    fn one_frame_per_call() {
        let a = Frame::request(HUMAN_STATUS, PRESENCE, OCCUPIED);
        let b = Frame::request(HUMAN_STATUS, MOTION, MOTIONLESS);
        let mut framer = framer(&[a.as_bytes(), b.as_bytes()].concat());

        assert_eq!(framer.try_read_frame().unwrap(), Some(a));
        assert_eq!(framer.transport().rx.len(), b.len());
        assert_eq!(framer.try_read_frame().unwrap(), Some(b));
        assert_eq!(framer.try_read_frame().unwrap(), None);
    }

    #[test_log::test]
    fn missing_terminator_is_malformed() {
        let mut stream = vec![HEAD1, HEAD2];
        stream.extend(std::iter::repeat(0x00).take(DEFAULT_MAX_FRAME_LEN));
        let good = Frame::request(HUMAN_STATUS, PRESENCE, UNOCCUPIED);
        stream.extend_from_slice(good.as_bytes());

        let mut framer = framer(&stream);
        match framer.try_read_frame() {
            Err(Error::MalformedStream { len }) => assert_eq!(len, DEFAULT_MAX_FRAME_LEN + 1),
            other => panic!("expected MalformedStream, got {other:?}"),
        }
        // Scanning resumes after the dropped bytes.
        assert_eq!(framer.try_read_frame().unwrap(), Some(good));
    }

    #[test_log::test]
    fn frame_right_after_overflow_is_kept() {
        // HEAD1 HEAD2 plus filler fills the frame to exactly the maximum length, so the next
        // frame's HEAD1 is the byte that trips the guard.
        let mut stream = vec![HEAD1, HEAD2];
        stream.extend(std::iter::repeat(0x00).take(DEFAULT_MAX_FRAME_LEN - 2));
        let good = Frame::request(HUMAN_STATUS, PRESENCE, OCCUPIED);
        stream.extend_from_slice(good.as_bytes());

        let mut framer = framer(&stream);
        assert!(matches!(
            framer.try_read_frame(),
            Err(Error::MalformedStream { len }) if len == DEFAULT_MAX_FRAME_LEN + 1
        ));
        assert_eq!(framer.try_read_frame().unwrap(), Some(good));
        assert_eq!(framer.try_read_frame().unwrap(), None);
    }

    #[test_log::test]
    fn bad_checksum_is_still_delivered() {
        let mut bytes = Frame::request(HUMAN_STATUS, PRESENCE, OCCUPIED).as_bytes().to_vec();
        bytes[7] = 0x00;
        let mut framer = framer(&bytes);
        let frame = framer.try_read_frame().unwrap().expect("frame");
        assert!(!frame.checksum_ok());
    }

    #[test_log::test]
    fn closed_transport_is_an_error() {
        let mut transport = MockTransport::new();
        transport.closed = true;
        let mut framer = Framer::new(transport, DEFAULT_MAX_FRAME_LEN);
        assert!(matches!(framer.try_read_frame(), Err(Error::Io(_))));
        assert!(matches!(framer.write_frame(&Frame::request(SYSTEM, RESET, ZERO_F)), Err(Error::Io(_))));
    }
}
