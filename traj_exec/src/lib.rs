//! # Trajectory exec library.
//!
//! This library allows other crates in the workspace to access items defined inside the
//! trajectory exec crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Global data store for the executable
pub mod data_store;

/// Frame and convention transforms between the ENU/baselink and NED/aircraft conventions
pub mod frame_tf;

/// Trajectory ingest handler - loads new trajectories and builds their preview paths
pub mod ingest;

/// Executable parameters
pub mod params;

/// Trajectory playback module - turns the loaded trajectory into per-cycle setpoints
pub mod playback;

/// Preview server - publishes preview paths for visualisation
pub mod preview_server;

/// Setpoint server - publishes position targets towards the flight controller bridge
pub mod setpoint_server;

/// Trajectory client - recieves trajectories from the planner
pub mod traj_client;
