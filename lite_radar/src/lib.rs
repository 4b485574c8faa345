//! Driver for the **Seeed 24 GHz Human Static Presence Lite** radar (MR24HPC1)
//!
//! A *blocking*, `std`-based interface to the module over a UART (`/dev/serial0`,
//! `/dev/ttyAMA0`, USB serial adapters, …) using the
//! [`serialport`](https://crates.io/crates/serialport) crate.
//!
//! ```ignore
//! use lite_radar::{constants::*, LiteRadar, StatusChange};
//!
//! let mut radar = LiteRadar::open("/dev/serial0", DEFAULT_BAUD_RATE)?;
//! radar.set_scenario(BEDROOM)?;
//! radar.set_sensitivity(2)?;
//!
//! loop {
//!     if radar.poll_status()? == StatusChange::Changed {
//!         println!("present={} moving={}", radar.is_present(), radar.is_moving());
//!     }
//! }
//! ```
//!
//! ---
//! # Contents
//! * **`LiteRadar`** – owns the transport, the framer and the module state.
//! * **[`framer`]** – non-blocking frame assembly with a maximum-length guard.
//! * **[`protocol`]** – request / acknowledgement exchange, also usable as submit + poll.
//! * **[`status`]** – presence / motion tracking from unsolicited reports.
//! * **[`Frame`]** – fixed-capacity frame with named accessors and checksum.
//! * **[`Error`]** – wraps `std::io::Error` / `serialport::Error` plus protocol errors
//!   (`Timeout`, `MalformedStream`, `OutOfRange`).
//!
//! Only single-byte parameters are supported, and only one request is in flight at a time.

use std::time::Duration;

use tracing::{debug, info};

pub mod config;
pub mod constants;
mod error;
pub mod frame;
pub mod framer;
pub mod protocol;
pub mod status;
pub mod transport;

#[cfg(test)]
mod mock;

pub use config::Config;
pub use error::Error;
pub use frame::Frame;
pub use framer::Framer;
pub use protocol::{PendingRequest, RequestState};
pub use status::{ModuleState, StatusChange};
pub use transport::Transport;

use constants::*;

/// Main driver struct.
pub struct LiteRadar<T> {
    framer: Framer<T>,
    state: ModuleState,
    config: Config,
}

impl LiteRadar<Box<dyn serialport::SerialPort>> {
    /// Open the given serial device at `baud` with default settings.
    pub fn open(path: &str, baud: u32) -> Result<Self, Error> {
        Self::open_with_config(path, baud, Config::default())
    }

    pub fn open_with_config(path: &str, baud: u32, config: Config) -> Result<Self, Error> {
        let port = serialport::new(path, baud).timeout(config.read_timeout).open()?;
        info!("opened {path} at {baud} baud");
        Ok(Self::new(port, config))
    }
}

impl<T: Transport> LiteRadar<T> {
    /// Wrap an already-open transport. Presence and motion start out unknown.
    pub fn new(transport: T, config: Config) -> Self {
        Self {
            framer: Framer::new(transport, config.max_frame_len),
            state: ModuleState::default(),
            config,
        }
    }

    // -----------------------------------------------------------------------------------------
    // Command protocol
    // -----------------------------------------------------------------------------------------

    /// Send one parameter and block until the module acknowledges it or the configured
    /// timeout passes.
    pub fn set_parameter(&mut self, control: u8, command: u8, value: u8) -> Result<(), Error> {
        self.set_parameter_with_timeout(control, command, value, self.config.ack_timeout)
    }

    /// Like [`set_parameter`](Self::set_parameter) with an explicit deadline.
    ///
    /// Spins on the transport without sleeping; nothing else runs on this thread meanwhile.
    /// Frames that are not the acknowledgement are discarded, including status reports.
    pub fn set_parameter_with_timeout(
        &mut self,
        control: u8,
        command: u8,
        value: u8,
        timeout: Duration,
    ) -> Result<(), Error> {
        let mut request = self.submit_with_timeout(control, command, value, timeout)?;
        loop {
            match self.poll_request(&mut request)? {
                RequestState::Pending => continue,
                RequestState::Confirmed => return Ok(()),
                RequestState::TimedOut => {
                    return Err(Error::Timeout { control, command, malformed: request.malformed_frames() })
                }
            }
        }
    }

    /// Send a request without waiting; drive it with [`poll_request`](Self::poll_request).
    pub fn submit(&mut self, control: u8, command: u8, value: u8) -> Result<PendingRequest, Error> {
        self.submit_with_timeout(control, command, value, self.config.ack_timeout)
    }

    pub fn submit_with_timeout(
        &mut self,
        control: u8,
        command: u8,
        value: u8,
        timeout: Duration,
    ) -> Result<PendingRequest, Error> {
        protocol::submit(&mut self.framer, control, command, value, timeout)
    }

    /// Look at no more than one incoming frame for the acknowledgement of `request`.
    pub fn poll_request(&mut self, request: &mut PendingRequest) -> Result<RequestState, Error> {
        protocol::poll(&mut self.framer, request)
    }

    // -----------------------------------------------------------------------------------------
    // Named parameters
    // -----------------------------------------------------------------------------------------

    /// Reset the module. Settings stored on the module survive.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.set_parameter(SYSTEM, RESET, ZERO_F)
    }

    /// Select a preset scenario (`LIVING_ROOM`, `BEDROOM`, `BATHROOM`, `AREA_DETECTION`).
    pub fn set_scenario(&mut self, scenario: u8) -> Result<(), Error> {
        check_range("scenario", scenario, LIVING_ROOM, AREA_DETECTION)?;
        self.set_parameter(WORKING_STATUS, SET_SCENARIO, scenario)
    }

    /// Sensitivity 1-3.
    pub fn set_sensitivity(&mut self, sensitivity: u8) -> Result<(), Error> {
        check_range("sensitivity", sensitivity, 1, 3)?;
        self.set_parameter(WORKING_STATUS, SET_SENSITIVITY, sensitivity)
    }

    /// Enter custom mode 1-4, which unlocks the threshold and range settings.
    pub fn open_custom_mode(&mut self, mode: u8) -> Result<(), Error> {
        check_range("custom mode", mode, 1, 4)?;
        self.set_parameter(WORKING_STATUS, OPEN_CUSTOM, mode)
    }

    /// Leave custom mode; the module stores the custom values.
    pub fn exit_custom_mode(&mut self) -> Result<(), Error> {
        self.set_parameter(WORKING_STATUS, EXIT_CUSTOM, ZERO_F)
    }

    /// Presence threshold 0-250 for the open custom mode.
    pub fn set_presence_threshold(&mut self, threshold: u8) -> Result<(), Error> {
        check_range("presence threshold", threshold, 0, 250)?;
        self.set_parameter(CUSTOM, SET_PRESENCE_THRESHOLD, threshold)
    }

    /// Presence range 0x00 (0 m) to 0x0A (5 m), in half metres.
    pub fn set_presence_range(&mut self, range: u8) -> Result<(), Error> {
        check_range("presence range", range, 0x00, 0x0A)?;
        self.set_parameter(CUSTOM, SET_PRESENCE_RANGE, range)
    }

    pub fn set_motion_threshold(&mut self, threshold: u8) -> Result<(), Error> {
        check_range("motion threshold", threshold, 0, 250)?;
        self.set_parameter(CUSTOM, SET_MOTION_THRESHOLD, threshold)
    }

    pub fn set_motion_range(&mut self, range: u8) -> Result<(), Error> {
        check_range("motion range", range, 0x00, 0x0A)?;
        self.set_parameter(CUSTOM, SET_MOTION_RANGE, range)
    }

    /// Delay before absence is reported: 0x00 (none) up to 0x08 (60 min).
    ///
    /// Sent under `HUMAN_STATUS`, where `INIT_COMPLETE` shares its byte with `PRESENCE`. Any
    /// presence report arriving during the wait is therefore taken as the acknowledgement, so
    /// `Ok` here only means the request was written and the module is talking.
    pub fn set_time_of_absence(&mut self, code: u8) -> Result<(), Error> {
        check_range("time of absence", code, 0x00, 0x08)?;
        self.set_parameter(HUMAN_STATUS, SET_TIME_OF_ABSENCE, code)
    }

    // -----------------------------------------------------------------------------------------
    // Status tracking
    // -----------------------------------------------------------------------------------------

    /// Read at most one frame and fold it into the module state. Never blocks.
    pub fn poll_status(&mut self) -> Result<StatusChange, Error> {
        match self.framer.try_read_frame()? {
            Some(frame) => Ok(status::apply_status_frame(&mut self.state, &frame)),
            None => Ok(StatusChange::Unchanged),
        }
    }

    pub fn is_present(&self) -> bool {
        self.state.is_present()
    }

    pub fn is_moving(&self) -> bool {
        self.state.is_moving()
    }

    pub fn presence(&self) -> Option<u8> {
        self.state.presence
    }

    pub fn motion(&self) -> Option<u8> {
        self.state.motion
    }

    pub fn state(&self) -> &ModuleState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // -----------------------------------------------------------------------------------------
    // Transport access
    // -----------------------------------------------------------------------------------------

    pub fn transport(&self) -> &T {
        self.framer.transport()
    }

    pub fn transport_mut(&mut self) -> &mut T {
        self.framer.transport_mut()
    }

    pub fn into_inner(self) -> T {
        self.framer.into_inner()
    }
}

fn check_range(parameter: &'static str, value: u8, min: u8, max: u8) -> Result<(), Error> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        debug!("rejecting {parameter} {value}, expected {min}..={max}");
        Err(Error::OutOfRange { parameter, value })
    }
}
