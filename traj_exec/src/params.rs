//! # Trajectory Exec Parameters
//!
//! This module provides parameters for the trajectory executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Serialize, Deserialize)]
pub struct TrajExecParams {

    /// Network endpoint of the planner's trajectory stream
    pub traj_endpoint: String,

    /// Network endpoint for the outbound setpoint stream
    pub setpoint_endpoint: String,

    /// Network endpoint for the preview path stream
    pub preview_endpoint: String,

    /// Reference frame identifier stamped onto preview paths
    pub preview_frame_id: String
}
