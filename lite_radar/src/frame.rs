//! Protocol frame and checksum helpers.
//!
//! ```text
//! [0]=HEAD1 [1]=HEAD2 [2]=control [3]=command [4..5]=data length (BE) [6]=data
//! [len-3]=checksum [len-2]=END1 [len-1]=END2
//! ```

use std::fmt;

use crate::constants::{END1, END2, HEAD1, HEAD2};
use crate::Error;

/// Storage size of a [`Frame`].
pub const FRAME_CAPACITY: usize = 64;

/// Length of a single-byte parameter frame.
pub const REQUEST_LEN: usize = 10;

const CONTROL: usize = 2;
const COMMAND: usize = 3;
const LEN_HIGH: usize = 4;
const LEN_LOW: usize = 5;
const DATA: usize = 6;
/// Checksum + END1 + END2.
const TRAILER_LEN: usize = 3;

/// Simple 8-bit checksum (sum of `bytes` mod 256).
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// A delimited protocol message held in a fixed-capacity buffer.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    bytes: [u8; FRAME_CAPACITY],
    len: usize,
}

impl Frame {
    pub(crate) const fn empty() -> Self {
        Self { bytes: [0; FRAME_CAPACITY], len: 0 }
    }

    /// Build a single-byte parameter request with its checksum filled in.
    pub fn request(control: u8, command: u8, value: u8) -> Self {
        let mut frame = Self::empty();
        frame.bytes[..REQUEST_LEN]
            .copy_from_slice(&[HEAD1, HEAD2, control, command, 0x00, 0x01, value, 0x00, END1, END2]);
        frame.len = REQUEST_LEN;
        frame.compute_checksum();
        frame
    }

    /// Copy already-delimited bytes into a frame. Nothing is validated except the capacity.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() > FRAME_CAPACITY {
            return Err(Error::MalformedStream { len: bytes.len() });
        }
        let mut frame = Self::empty();
        frame.bytes[..bytes.len()].copy_from_slice(bytes);
        frame.len = bytes.len();
        Ok(frame)
    }

    /// Append one byte. Callers keep frames within [`FRAME_CAPACITY`]; past it the byte is
    /// dropped (and debug builds panic).
    pub(crate) fn push(&mut self, byte: u8) {
        debug_assert!(self.len < FRAME_CAPACITY, "frame capacity exceeded");
        if let Some(slot) = self.bytes.get_mut(self.len) {
            *slot = byte;
            self.len += 1;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    fn byte(&self, index: usize) -> Option<u8> {
        self.as_bytes().get(index).copied()
    }

    fn checksum_index(&self) -> Option<usize> {
        self.len.checked_sub(TRAILER_LEN)
    }

    pub fn control(&self) -> Option<u8> {
        self.byte(CONTROL)
    }

    pub fn command(&self) -> Option<u8> {
        self.byte(COMMAND)
    }

    /// Big-endian data-length field.
    pub fn data_len(&self) -> Option<u16> {
        Some(u16::from_be_bytes([self.byte(LEN_HIGH)?, self.byte(LEN_LOW)?]))
    }

    /// First data byte, `None` if the frame ends before the trailer would start.
    pub fn data(&self) -> Option<u8> {
        match self.checksum_index() {
            Some(cs) if DATA < cs => self.byte(DATA),
            _ => None,
        }
    }

    pub fn checksum(&self) -> Option<u8> {
        self.byte(self.checksum_index()?)
    }

    /// Write the sum of every byte before the checksum slot into the slot.
    ///
    /// The previous content of the slot does not take part, so calling this twice is a no-op.
    pub fn compute_checksum(&mut self) {
        if let Some(cs) = self.checksum_index() {
            self.bytes[cs] = checksum(&self.bytes[..cs]);
        }
    }

    /// Whether the stored checksum matches the frame contents.
    pub fn checksum_ok(&self) -> bool {
        match self.checksum_index() {
            Some(cs) => self.bytes[cs] == checksum(&self.bytes[..cs]),
            None => false,
        }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame").field("bytes", &format_args!("[{self}]")).finish()
    }
}

/// Hex dump, e.g. `53 59 01 02 00 01 0F BF 54 43`.
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.as_bytes().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{b:02X}")?;
        }
        Ok(())
    }
}
