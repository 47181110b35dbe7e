//! # Flight controller setpoint messages
//!
//! The exec streams `PositionTarget` messages towards the flight controller bridge. The message
//! mirrors the MAVLink `SET_POSITION_TARGET_LOCAL_NED` field set: all vectors are in the local
//! NED frame, and the type mask tells the receiver which fields it must ignore rather than apply.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A position/velocity/acceleration/yaw setpoint in the local NED frame.
///
/// Built fresh on every playback tick and published fire-and-forget. Staleness is harmless, each
/// setpoint is superseded by the next tick's.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PositionTarget {
    /// Time reference of the setpoint in milliseconds. This is the stamp of the trajectory the
    /// setpoint was sampled from, not the time of transmission.
    pub stamp_ms: i64,

    /// Coordinate frame tag, see the `FRAME_*` constants
    pub coordinate_frame: u8,

    /// Bitmask of fields the receiver shall ignore, see the `IGNORE_*` constants
    pub type_mask: u16,

    /// Position demand in the local NED frame
    pub position_m_ned: Vector3<f64>,

    /// Velocity demand in the local NED frame
    pub velocity_ms_ned: Vector3<f64>,

    /// Acceleration (or force, if `FORCE` is set) demand in the local NED frame
    pub acc_mss_ned: Vector3<f64>,

    /// Yaw demand in radians
    pub yaw_rad: f64,

    /// Yaw rate demand in radians/second
    pub yaw_rate_rads: f64
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PositionTarget {
    /// Local NED frame, origin at the vehicle's takeoff position
    pub const FRAME_LOCAL_NED: u8 = 1;

    pub const IGNORE_PX: u16 = 1;
    pub const IGNORE_PY: u16 = 2;
    pub const IGNORE_PZ: u16 = 4;
    pub const IGNORE_VX: u16 = 8;
    pub const IGNORE_VY: u16 = 16;
    pub const IGNORE_VZ: u16 = 32;
    pub const IGNORE_AFX: u16 = 64;
    pub const IGNORE_AFY: u16 = 128;
    pub const IGNORE_AFZ: u16 = 256;

    /// When set the acceleration field is interpreted as a force demand. Never set by this
    /// software, carried for receiver-side mask completeness.
    pub const FORCE: u16 = 512;

    pub const IGNORE_YAW: u16 = 1024;
    pub const IGNORE_YAW_RATE: u16 = 2048;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mask_bits_disjoint() {
        let bits = [
            PositionTarget::IGNORE_PX,
            PositionTarget::IGNORE_PY,
            PositionTarget::IGNORE_PZ,
            PositionTarget::IGNORE_VX,
            PositionTarget::IGNORE_VY,
            PositionTarget::IGNORE_VZ,
            PositionTarget::IGNORE_AFX,
            PositionTarget::IGNORE_AFY,
            PositionTarget::IGNORE_AFZ,
            PositionTarget::FORCE,
            PositionTarget::IGNORE_YAW,
            PositionTarget::IGNORE_YAW_RATE,
        ];

        // Each flag is a single unique bit
        let mut seen = 0u16;
        for bit in bits.iter() {
            assert_eq!(bit.count_ones(), 1);
            assert_eq!(seen & bit, 0);
            seen |= bit;
        }
    }
}
