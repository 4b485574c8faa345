#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serial-port error: {0}")]
    SerialPort(#[from] serialport::Error),
    #[error(
        "no acknowledgement for control 0x{control:02X} command 0x{command:02X} before timeout \
         ({malformed} malformed frames discarded)"
    )]
    Timeout { control: u8, command: u8, malformed: usize },
    #[error("no frame terminator after {len} bytes")]
    MalformedStream { len: usize },
    #[error("{parameter} value {value} out of range")]
    OutOfRange { parameter: &'static str, value: u8 },
}
