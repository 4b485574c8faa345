use std::time::Duration;

use crate::frame::{FRAME_CAPACITY, REQUEST_LEN};

/// Default deadline for a parameter acknowledgement.
pub const DEFAULT_ACK_TIMEOUT: Duration = Duration::from_millis(2000);

/// Longest frame the framer will assemble before giving up on a terminator.
///
/// Single-byte parameter frames are 10 bytes; the module's longer reports (product
/// strings and the like) stay well below this.
pub const DEFAULT_MAX_FRAME_LEN: usize = 32;

/// Serial read timeout used by [`crate::LiteRadar::open`].
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Driver settings.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    /// How long `set_parameter` waits for a matching acknowledgement.
    pub ack_timeout: Duration,
    /// Maximum frame length, never more than [`FRAME_CAPACITY`].
    pub max_frame_len: usize,
    /// Per-read timeout handed to the serial port.
    pub read_timeout: Duration,
}

impl Config {
    /// Sets the acknowledgement deadline.
    pub fn ack_timeout(mut self, timeout: Duration) -> Self {
        self.ack_timeout = timeout;
        self
    }

    /// Sets the maximum frame length, clamped to `REQUEST_LEN..=FRAME_CAPACITY`.
    pub fn max_frame_len(mut self, len: usize) -> Self {
        self.max_frame_len = len.clamp(REQUEST_LEN, FRAME_CAPACITY);
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ack_timeout: DEFAULT_ACK_TIMEOUT,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_frame_len_is_clamped_to_capacity() {
        let config = Config::default().max_frame_len(FRAME_CAPACITY * 4);
        assert_eq!(config.max_frame_len, FRAME_CAPACITY);
    }

    #[test]
    fn max_frame_len_fits_a_request() {
        let config = Config::default().max_frame_len(2);
        assert_eq!(config.max_frame_len, REQUEST_LEN);
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.ack_timeout, Duration::from_millis(2000));
        assert_eq!(config.max_frame_len, DEFAULT_MAX_FRAME_LEN);
    }
}
