//! # Trajectory stream messages
//!
//! This module defines the trajectory message accepted by the trajectory exec and the preview
//! path it republishes for visualisation. All quantities in these messages are expressed in the
//! ingest convention: a right handed ENU (X-East, Y-North, Z-Up) world frame with body attitudes
//! in the baselink convention. Conversion into the flight controller's NED/aircraft convention
//! happens inside the exec at dispatch time, never on the wire.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use chrono::{DateTime, Utc};
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Common message header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Header {
    /// Time at which the message was stamped by its producer
    pub stamp: DateTime<Utc>,

    /// Identifier of the coordinate frame the message's quantities are expressed in
    pub frame_id: String
}

/// A time-parameterised multi-point trajectory.
///
/// The points are ordered and their `time_from_start_s` values are assumed to be monotonically
/// non-decreasing. This is not enforced here, the producer is responsible for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trajectory {
    /// Header stamped by the trajectory producer. The stamp is used as the time reference of all
    /// setpoints streamed from this trajectory.
    pub header: Header,

    /// The sequence of timed waypoints making up the trajectory
    pub points: Vec<TrajectoryPoint>
}

/// One timed waypoint of a trajectory.
///
/// Each field other than the time offset is optional. A missing field is not an error, it is
/// signalled to the flight controller through the setpoint type mask.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    /// Duration since trajectory start at which this point becomes active, in seconds.
    /// Non-negative.
    pub time_from_start_s: f64,

    /// Position in the ENU world frame
    pub position_m_enu: Option<Vector3<f64>>,

    /// Attitude of the body (baselink convention) in the ENU world frame
    pub attitude_q_enu: Option<UnitQuaternion<f64>>,

    /// Linear velocity in the ENU world frame
    pub velocity_ms_enu: Option<Vector3<f64>>,

    /// Linear acceleration in the ENU world frame
    pub acc_mss_enu: Option<Vector3<f64>>
}

/// A position and attitude pair in the ENU world frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pose {
    /// Position in the ENU world frame
    pub position_m_enu: Vector3<f64>,

    /// Attitude of the body (baselink convention) in the ENU world frame
    pub attitude_q_enu: UnitQuaternion<f64>
}

/// Preview of a full ingested trajectory, published once per ingest event for visualisation.
///
/// The poses are republished exactly as ingested (ENU convention), no frame conversion is
/// applied. The header carries the configured preview reference frame id and the wall clock time
/// at which the preview was built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathPreview {
    pub header: Header,

    /// Poses of the trajectory points which carry a position, in trajectory order
    pub poses: Vec<Pose>
}
