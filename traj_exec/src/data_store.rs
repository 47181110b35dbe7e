//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::time::Instant;

// Internal
use crate::playback;
use comms_if::{setpoint::PositionTarget, traj::PathPreview};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Session elapsed time
    pub session_time_s: f64,

    // Playback
    pub playback: playback::Playback,
    pub playback_input: playback::InputData,
    pub playback_output: Option<PositionTarget>,
    pub playback_status_rpt: playback::StatusReport,

    // Ingest
    /// Preview path queued for publication this cycle
    pub preview_path: Option<PathPreview>,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, stamps the playback input
    /// with this cycle's time, and sets the 1Hz cycle flag.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64) {
        self.is_1_hz_cycle = self.num_cycles % (cycle_frequency_hz as u128) == 0;

        self.playback_input = playback::InputData::new(Instant::now());
        self.playback_output = None;
        self.playback_status_rpt = playback::StatusReport::default();
        self.preview_path = None;

        self.session_time_s = util::session::get_elapsed_seconds();
    }
}
