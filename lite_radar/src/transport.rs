//! Byte transport the driver talks through.

use std::io::{Read, Write};

use serialport::SerialPort;

use crate::Error;

/// A duplex byte stream owned by exactly one driver.
pub trait Transport {
    /// Number of bytes that can be read right now without blocking.
    fn bytes_available(&mut self) -> Result<usize, Error>;

    /// Read a single byte. Only called after `bytes_available` reported data.
    fn read_byte(&mut self) -> Result<u8, Error>;

    /// Write all of `bytes` and flush them out of any local buffer.
    fn write_all_flush(&mut self, bytes: &[u8]) -> Result<(), Error>;
}

impl Transport for Box<dyn SerialPort> {
    fn bytes_available(&mut self) -> Result<usize, Error> {
        Ok(self.bytes_to_read()? as usize)
    }

    fn read_byte(&mut self) -> Result<u8, Error> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn write_all_flush(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.write_all(bytes)?;
        self.flush()?;
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn bytes_available(&mut self) -> Result<usize, Error> {
        (**self).bytes_available()
    }

    fn read_byte(&mut self) -> Result<u8, Error> {
        (**self).read_byte()
    }

    fn write_all_flush(&mut self, bytes: &[u8]) -> Result<(), Error> {
        (**self).write_all_flush(bytes)
    }
}
