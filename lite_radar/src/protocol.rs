//! Request / acknowledgement exchange.
//!
//! [`submit`] writes a request and returns a [`PendingRequest`]; [`poll`] looks at no more
//! than one incoming frame per call. The blocking `set_parameter` on the driver is just these
//! two in a loop, the split exists so a cooperative scheduler can drive the exchange itself.

use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::constants::INIT_COMPLETE;
use crate::frame::Frame;
use crate::framer::Framer;
use crate::transport::Transport;
use crate::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestState {
    Pending,
    Confirmed,
    TimedOut,
}

/// One in-flight parameter request.
#[derive(Clone, Debug)]
pub struct PendingRequest {
    control: u8,
    command: u8,
    value: u8,
    started: Instant,
    timeout: Duration,
    state: RequestState,
    malformed: usize,
}

impl PendingRequest {
    pub fn control(&self) -> u8 {
        self.control
    }

    pub fn command(&self) -> u8 {
        self.command
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Last state returned by [`poll`].
    pub fn state(&self) -> RequestState {
        self.state
    }

    /// Framing errors seen while waiting. Non-zero on a timeout points at a noisy line rather
    /// than a silent module.
    pub fn malformed_frames(&self) -> usize {
        self.malformed
    }
}

/// Acceptance rule for an acknowledgement.
///
/// Control must match and the command must either match or be `INIT_COMPLETE`. The latter
/// means a module reboot notification under the same control also counts as success.
pub fn is_acknowledgement(frame: &Frame, control: u8, command: u8) -> bool {
    frame.control() == Some(control)
        && matches!(frame.command(), Some(c) if c == command || c == INIT_COMPLETE)
}

/// Build, checksum and send a request. The deadline starts once the frame is flushed.
pub fn submit<T: Transport>(
    framer: &mut Framer<T>,
    control: u8,
    command: u8,
    value: u8,
    timeout: Duration,
) -> Result<PendingRequest, Error> {
    let frame = Frame::request(control, command, value);
    framer.write_frame(&frame)?;
    Ok(PendingRequest {
        control,
        command,
        value,
        started: Instant::now(),
        timeout,
        state: RequestState::Pending,
        malformed: 0,
    })
}

/// Check for the acknowledgement without blocking.
///
/// Frames that don't match are dropped and the request is not re-sent. A malformed stream
/// is not an answer either way, so it is counted on the request and polling goes on;
/// transport errors are returned.
pub fn poll<T: Transport>(
    framer: &mut Framer<T>,
    request: &mut PendingRequest,
) -> Result<RequestState, Error> {
    if request.state != RequestState::Pending {
        return Ok(request.state);
    }

    match framer.try_read_frame() {
        Ok(Some(frame)) if is_acknowledgement(&frame, request.control, request.command) => {
            debug!(
                "control {:02X} command {:02X} confirmed after {:?}",
                request.control,
                request.command,
                request.elapsed()
            );
            request.state = RequestState::Confirmed;
            return Ok(request.state);
        }
        Ok(Some(frame)) => trace!("ignoring unrelated frame [{frame}]"),
        Ok(None) => {}
        Err(Error::MalformedStream { len }) => {
            request.malformed += 1;
            warn!("malformed stream ({len} bytes) while waiting for acknowledgement")
        }
        Err(e) => return Err(e),
    }

    if request.elapsed() >= request.timeout {
        warn!(
            "control {:02X} command {:02X} not acknowledged within {:?}",
            request.control, request.command, request.timeout
        );
        request.state = RequestState::TimedOut;
    }
    Ok(request.state)
}
