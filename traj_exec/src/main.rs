//! Main trajectory exec entry point.
//!
//! # Architecture
//!
//! The exec accepts time-parameterised trajectories from the planner and streams them to the
//! flight controller bridge as individual setpoints, sampled on a fixed cycle. The general
//! execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop (one iteration per sampling interval):
//!         - Trajectory ingest - recieve any new trajectory and queue its preview path
//!         - Preview publication
//!         - Playback processing - select the waypoint that is due and convert it
//!         - Setpoint dispatch - publish the converted target
//!
//! A new trajectory always replaces the current one wholesale. Once playback runs off the end
//! of the loaded trajectory the exec goes quiet until the next ingest.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use traj_lib::{
    data_store::DataStore,
    ingest,
    params::TrajExecParams,
    preview_server::PreviewServer,
    setpoint_server::SetpointServer,
    traj_client::{TrajClient, TrajClientError},
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{debug, info, trace, warn};
use std::thread;
use std::time::{Duration, Instant};

// Internal
use util::{
    archive::Archived,
    host,
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle - the trajectory sampling interval.
const CYCLE_PERIOD_S: f64 = 0.10;

/// Number of cycles per second
const CYCLE_FREQUENCY_HZ: f64 = 1.0 / CYCLE_PERIOD_S;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "traj_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Kestrel Trajectory Exec\n");
    info!(
        "Running on: {:#?}",
        host::get_uname().wrap_err("Failed to get host information")?
    );
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: TrajExecParams = util::params::load(
        "traj_exec.toml"
    ).wrap_err("Could not load traj_exec params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    // ---- INITIALISE MODULES ----

    ds.playback.init(&session)
        .wrap_err("Failed to initialise Playback")?;
    info!("Playback init complete");

    info!("Module initialisation complete\n");

    // ---- INITIALISE NETWORK ----

    info!("Initialising network");

    let zmq_ctx = comms_if::net::zmq::Context::new();

    let traj_client = TrajClient::new(&zmq_ctx, &exec_params)
        .wrap_err("Failed to initialise the TrajClient")?;
    info!("TrajClient initialised");

    let mut setpoint_server = SetpointServer::new(&zmq_ctx, &exec_params)
        .wrap_err("Failed to initialise the SetpointServer")?;
    info!("SetpointServer initialised");

    let mut preview_server = PreviewServer::new(&zmq_ctx, &exec_params)
        .wrap_err("Failed to initialise the PreviewServer")?;
    info!("PreviewServer initialised");

    info!("Network initialisation complete");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {

        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(CYCLE_FREQUENCY_HZ);

        // ---- TRAJECTORY INGEST ----

        // Get trajectories until none remain. Each one replaces the previous wholesale, so if
        // more than one arrived since the last cycle only the final one survives.
        loop {
            match traj_client.recieve_trajectory() {
                Ok(Some(traj)) => ingest::exec(&mut ds, traj, &exec_params),
                Ok(None) => break,
                Err(TrajClientError::TrajParseError(e)) => {
                    warn!("Could not parse recieved trajectory: {}", e);
                    break;
                },
                Err(e) => {
                    warn!("Error recieving trajectory: {}", e);
                    break;
                }
            }
        }

        // ---- PREVIEW PUBLICATION ----

        if let Some(preview) = ds.preview_path.take() {
            match preview_server.send(&preview) {
                Ok(_) => debug!(
                    "Preview path with {} poses published",
                    preview.poses.len()
                ),
                Err(e) => warn!("PreviewServer error: {}", e)
            }
        }

        // ---- PLAYBACK PROCESSING ----

        let (output, report) = ds.playback.proc(&ds.playback_input);
        ds.playback_output = output;
        ds.playback_status_rpt = report;

        if report.finished {
            info!("End of trajectory reached, playback stopped");
        }

        // Low rate status
        if ds.is_1_hz_cycle {
            if !traj_client.is_connected() {
                trace!("No planner connection");
            }

            if ds.playback.is_active() {
                debug!(
                    "Playback: point {:?} at {:.2} s elapsed",
                    report.active_point_index,
                    report.elapsed_s.unwrap_or(0.0)
                );
            }
        }

        // ---- SETPOINT DISPATCH ----

        if let Some(ref target) = ds.playback_output {
            match setpoint_server.send(target) {
                Ok(_) => (),
                Err(e) => warn!("SetpointServer error: {}", e)
            }
        }

        // ---- WRITE ARCHIVES ----

        match ds.playback.write() {
            Ok(_) => (),
            Err(e) => warn!("Could not write playback archives: {}", e)
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(CYCLE_PERIOD_S)
            .checked_sub(cycle_dur)
        {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            },
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - CYCLE_PERIOD_S
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }

        // Increment cycle counter
        ds.num_cycles += 1;
    }
}
