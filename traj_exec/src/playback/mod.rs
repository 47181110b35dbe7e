//! # Trajectory playback module
//!
//! Playback turns the most recently ingested trajectory into a stream of flight controller
//! setpoints, one per exec cycle. On each cycle the module:
//!
//! 1. Loads any newly ingested trajectory into the trajectory store, discarding the previous
//!    one (last ingest wins, with no notice to anyone).
//! 2. Finds the waypoint that is currently due: the first point in the sequence whose time
//!    offset is at or beyond the elapsed time since the trajectory was accepted, i.e. the next
//!    future waypoint. Points are never interpolated between.
//! 3. Converts that waypoint from the ENU/baselink ingest convention into the NED/aircraft
//!    transmission convention and builds the outbound position target, collecting an ignore
//!    flag in the type mask for every field the waypoint does not carry.
//!
//! Once the elapsed time passes the last point the trajectory is finished, the store is
//! cleared, and the module stays quiet until the next ingest.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod state;
mod store;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use state::*;
pub use store::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during initialisation of the playback module.
///
/// Cyclic processing itself has no error path: every cycle either emits a target, emits
/// nothing, or clears the store.
#[derive(Debug, thiserror::Error)]
pub enum PlaybackInitError {
    #[error("Could not create the archive directory: {0}")]
    ArchDirCreateError(std::io::Error),

    #[error("Could not initialise an archiver: {0}")]
    ArchiverInitError(std::io::Error),
}
