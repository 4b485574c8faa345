//! Presence / motion tracking from the module's unsolicited status reports.

use tracing::{debug, trace};

use crate::constants::{ACTIVE, HUMAN_STATUS, MOTION, OCCUPIED, PRESENCE};
use crate::frame::Frame;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusChange {
    Changed,
    Unchanged,
}

/// Last reported human status. `None` until the module has reported the field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModuleState {
    pub presence: Option<u8>,
    pub motion: Option<u8>,
}

impl ModuleState {
    pub fn is_present(&self) -> bool {
        self.presence == Some(OCCUPIED)
    }

    /// True only for active motion; "motionless" presence is not moving.
    pub fn is_moving(&self) -> bool {
        self.motion == Some(ACTIVE)
    }
}

/// Fold one frame into `state`.
pub fn apply_status_frame(state: &mut ModuleState, frame: &Frame) -> StatusChange {
    if frame.control() != Some(HUMAN_STATUS) {
        trace!("not a human status frame [{frame}]");
        return StatusChange::Unchanged;
    }
    let (slot, name) = match frame.command() {
        Some(PRESENCE) => (&mut state.presence, "presence"),
        Some(MOTION) => (&mut state.motion, "motion"),
        _ => return StatusChange::Unchanged,
    };
    let Some(value) = frame.data() else {
        return StatusChange::Unchanged;
    };
    if *slot == Some(value) {
        return StatusChange::Unchanged;
    }
    debug!("{name} {:?} -> {value:02X}", *slot);
    *slot = Some(value);
    StatusChange::Changed
}
