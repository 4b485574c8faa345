//! Wire constants for the MR24HPC1 serial protocol.
//!
//! The driver core treats control/command/value bytes as opaque; these names are
//! here so callers don't have to spell the magic numbers.

// Frame markers ----------------------------------------------------------------------------------
pub const HEAD1: u8 = 0x53; // 'S'
pub const HEAD2: u8 = 0x59; // 'Y'
pub const END1: u8 = 0x54; // 'T'
/// Only this byte is scanned for when looking for the end of a frame.
pub const END2: u8 = 0x43; // 'C'

pub const DEFAULT_BAUD_RATE: u32 = 115_200;

// Control bytes (subsystem) ----------------------------------------------------------------------
pub const SYSTEM: u8 = 0x01;
pub const PRODUCT_INFO: u8 = 0x02;
pub const WORKING_STATUS: u8 = 0x05;
pub const CUSTOM: u8 = 0x08;
pub const HUMAN_STATUS: u8 = 0x80;

// Command bytes ----------------------------------------------------------------------------------
// SYSTEM
pub const HEARTBEAT: u8 = 0x01;
pub const RESET: u8 = 0x02;

// WORKING_STATUS
/// Reported by the module once it has (re)booted. Also accepted as an acknowledgement.
pub const INIT_COMPLETE: u8 = 0x01;
pub const SET_SCENARIO: u8 = 0x07;
pub const SET_SENSITIVITY: u8 = 0x08;
pub const OPEN_CUSTOM: u8 = 0x09;
pub const EXIT_CUSTOM: u8 = 0x0A;

// CUSTOM
pub const SET_PRESENCE_THRESHOLD: u8 = 0x08;
pub const SET_MOTION_THRESHOLD: u8 = 0x09;
pub const SET_PRESENCE_RANGE: u8 = 0x0A;
pub const SET_MOTION_RANGE: u8 = 0x0B;

// HUMAN_STATUS
pub const PRESENCE: u8 = 0x01;
pub const MOTION: u8 = 0x02;
pub const SET_TIME_OF_ABSENCE: u8 = 0x0A;

// Values -----------------------------------------------------------------------------------------
/// Filler data byte for commands that carry no meaningful value.
pub const ZERO_F: u8 = 0x0F;

pub const UNOCCUPIED: u8 = 0x00;
pub const OCCUPIED: u8 = 0x01;

pub const NO_MOTION: u8 = 0x00;
pub const MOTIONLESS: u8 = 0x01;
pub const ACTIVE: u8 = 0x02;

// Scenarios
pub const LIVING_ROOM: u8 = 0x01;
pub const BEDROOM: u8 = 0x02;
pub const BATHROOM: u8 = 0x03;
pub const AREA_DETECTION: u8 = 0x04;
