//! # Communications interface crate.
//!
//! Provides all common communications interfaces for the software.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Trajectory stream and preview path message definitions
pub mod traj;

/// Flight controller setpoint message definitions
pub mod setpoint;

/// Network module
pub mod net;
