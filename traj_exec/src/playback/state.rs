//! Implementations for the playback state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;
use std::time::Instant;

// Internal
use super::{ActivePoint, PlaybackInitError, TrajStore};
use crate::frame_tf;
use comms_if::{
    setpoint::PositionTarget,
    traj::{Trajectory, TrajectoryPoint}
};
use nalgebra::Vector3;
use util::{
    archive::{Archived, Archiver},
    session::Session
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Trajectory playback module state
#[derive(Default)]
pub struct Playback {
    /// Store owning the trajectory currently being played back
    store: TrajStore,

    report: StatusReport,
    arch_report: Archiver,

    last_target: Option<PositionTarget>,
    arch_target: Archiver
}

/// Input data for one playback cycle.
pub struct InputData {
    /// A newly ingested trajectory, or `None` if there is no new trajectory this cycle
    pub new_traj: Option<Trajectory>,

    /// The instant this cycle started, used for all elapsed time comparisons
    pub now: Instant
}

/// Status report for playback processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// Elapsed playback time this cycle, or `None` if no trajectory is loaded
    pub elapsed_s: Option<f64>,

    /// Index of the active waypoint, or `None` if no target was emitted
    pub active_point_index: Option<usize>,

    /// True if the trajectory reached its end this cycle and the store was cleared
    pub finished: bool
}

/// Flat record of an emitted target, the csv archives cannot hold nested vectors.
#[derive(Serialize)]
struct TargetRecord {
    stamp_ms: i64,
    type_mask: u16,
    px_m: f64,
    py_m: f64,
    pz_m: f64,
    vx_ms: f64,
    vy_ms: f64,
    vz_ms: f64,
    afx_mss: f64,
    afy_mss: f64,
    afz_mss: f64,
    yaw_rad: f64,
    yaw_rate_rads: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Playback {
    /// Initialise the playback module, setting up its archives.
    pub fn init(&mut self, session: &Session) -> Result<(), PlaybackInitError> {
        // Create the arch folder for playback
        let mut arch_path = session.arch_root.clone();
        arch_path.push("playback");
        std::fs::create_dir_all(arch_path)
            .map_err(PlaybackInitError::ArchDirCreateError)?;

        // Initialise the archivers
        self.arch_report = Archiver::from_path(
            session, "playback/status_report.csv"
        ).map_err(PlaybackInitError::ArchiverInitError)?;
        self.arch_target = Archiver::from_path(
            session, "playback/position_target.csv"
        ).map_err(PlaybackInitError::ArchiverInitError)?;

        Ok(())
    }

    /// Perform cyclic processing of trajectory playback.
    ///
    /// Playback cannot fail: every cycle either emits a target, emits nothing, or clears the
    /// store, so the cyclic loop never has an error to handle from here.
    pub fn proc(&mut self, input_data: &InputData) -> (Option<PositionTarget>, StatusReport) {
        // Clear the status report
        self.report = StatusReport::default();

        // Load any newly ingested trajectory, discarding the current one
        if let Some(ref traj) = input_data.new_traj {
            self.store.replace(traj.clone(), input_data.now);
        }

        self.report.elapsed_s = self.store.elapsed_s(input_data.now);

        // Find the waypoint due this cycle. With nothing loaded the cycle is a silent no-op.
        let target = match self.store.active_waypoint(input_data.now) {
            Some(ActivePoint::Point(index, point)) => {
                // Can safely unwrap here as a point was just selected from the store
                let stamp_ms = self.store.start_stamp_ms().unwrap();

                self.report.active_point_index = Some(index);

                Some(build_position_target(&point, stamp_ms))
            },
            Some(ActivePoint::Finished) => {
                // Every point is now in the past. Clear the store so subsequent cycles are
                // no-ops until the next ingest.
                self.store.clear();
                self.report.finished = true;
                None
            },
            None => None
        };

        self.last_target = target;

        (target, self.report)
    }

    /// True if a trajectory is currently loaded.
    pub fn is_active(&self) -> bool {
        self.store.is_loaded()
    }
}

impl InputData {
    pub fn new(now: Instant) -> Self {
        Self {
            new_traj: None,
            now
        }
    }
}

impl Default for InputData {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl Archived for Playback {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.arch_report.serialise(self.report)?;

        if let Some(ref target) = self.last_target {
            self.arch_target.serialise(TargetRecord::from(target))?;
        }

        Ok(())
    }
}

impl From<&PositionTarget> for TargetRecord {
    fn from(target: &PositionTarget) -> Self {
        Self {
            stamp_ms: target.stamp_ms,
            type_mask: target.type_mask,
            px_m: target.position_m_ned.x,
            py_m: target.position_m_ned.y,
            pz_m: target.position_m_ned.z,
            vx_ms: target.velocity_ms_ned.x,
            vy_ms: target.velocity_ms_ned.y,
            vz_ms: target.velocity_ms_ned.z,
            afx_mss: target.acc_mss_ned.x,
            afy_mss: target.acc_mss_ned.y,
            afz_mss: target.acc_mss_ned.z,
            yaw_rad: target.yaw_rad,
            yaw_rate_rads: target.yaw_rate_rads
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Build the outbound position target for a waypoint.
///
/// This is the single place target messages are constructed. The type mask starts from zero for
/// every evaluation and collects an ignore flag for each field the waypoint does not carry.
///
/// Yaw rate is always reported as zero: trajectory points carry no angular velocity. This is a
/// known limitation of the stream, not something the mask flags.
fn build_position_target(point: &TrajectoryPoint, stamp_ms: i64) -> PositionTarget {
    let mut type_mask: u16 = 0;

    let position_m_ned = match point.position_m_enu {
        Some(ref p) => frame_tf::enu_to_ned(p),
        None => {
            type_mask |= PositionTarget::IGNORE_PX
                | PositionTarget::IGNORE_PY
                | PositionTarget::IGNORE_PZ;
            Vector3::zeros()
        }
    };

    let velocity_ms_ned = match point.velocity_ms_enu {
        Some(ref v) => frame_tf::enu_to_ned(v),
        None => {
            type_mask |= PositionTarget::IGNORE_VX
                | PositionTarget::IGNORE_VY
                | PositionTarget::IGNORE_VZ;
            Vector3::zeros()
        }
    };

    // A missing acceleration masks the acceleration flags, not the velocity ones
    let acc_mss_ned = match point.acc_mss_enu {
        Some(ref a) => frame_tf::enu_to_ned(a),
        None => {
            type_mask |= PositionTarget::IGNORE_AFX
                | PositionTarget::IGNORE_AFY
                | PositionTarget::IGNORE_AFZ;
            Vector3::zeros()
        }
    };

    // A waypoint without an attitude cannot provide a yaw demand, flag it ignored rather than
    // sending an unmasked zero
    let yaw_rad = match point.attitude_q_enu {
        Some(ref q) => frame_tf::quaternion_get_yaw(
            &frame_tf::enu_baselink_to_ned_aircraft(q)
        ),
        None => {
            type_mask |= PositionTarget::IGNORE_YAW;
            0.0
        }
    };

    PositionTarget {
        stamp_ms,
        coordinate_frame: PositionTarget::FRAME_LOCAL_NED,
        type_mask,
        position_m_ned,
        velocity_ms_ned,
        acc_mss_ned,
        yaw_rad,
        yaw_rate_rads: 0.0
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Utc;
    use comms_if::traj::Header;
    use nalgebra::UnitQuaternion;
    use std::f64::consts::FRAC_PI_2;
    use std::time::Duration;

    fn full_point(time_from_start_s: f64) -> TrajectoryPoint {
        TrajectoryPoint {
            time_from_start_s,
            position_m_enu: Some(Vector3::new(1.0, 2.0, 3.0)),
            attitude_q_enu: Some(UnitQuaternion::from_euler_angles(0.0, 0.0, FRAC_PI_2)),
            velocity_ms_enu: Some(Vector3::new(0.5, 0.0, 0.0)),
            acc_mss_enu: Some(Vector3::new(0.0, 0.1, 0.0))
        }
    }

    fn sparse_point(time_from_start_s: f64) -> TrajectoryPoint {
        TrajectoryPoint {
            time_from_start_s,
            position_m_enu: Some(Vector3::new(1.0, 2.0, 3.0)),
            attitude_q_enu: None,
            velocity_ms_enu: None,
            acc_mss_enu: None
        }
    }

    fn traj_from_points(points: Vec<TrajectoryPoint>) -> Trajectory {
        Trajectory {
            header: Header {
                stamp: Utc::now(),
                frame_id: String::from("map")
            },
            points
        }
    }

    fn input_with_traj(traj: Trajectory, now: Instant) -> InputData {
        let mut input = InputData::new(now);
        input.new_traj = Some(traj);
        input
    }

    #[test]
    fn test_presence_masking() {
        // A fully populated point has a clean mask
        let target = build_position_target(&full_point(0.0), 0);
        assert_eq!(target.type_mask, 0);

        // A pose only point masks the velocity, acceleration and nothing else
        let mut point = full_point(0.0);
        point.velocity_ms_enu = None;
        point.acc_mss_enu = None;
        let target = build_position_target(&point, 0);
        assert_eq!(
            target.type_mask,
            PositionTarget::IGNORE_VX
                | PositionTarget::IGNORE_VY
                | PositionTarget::IGNORE_VZ
                | PositionTarget::IGNORE_AFX
                | PositionTarget::IGNORE_AFY
                | PositionTarget::IGNORE_AFZ
        );

        // A missing velocity masks only the velocity bits
        let mut point = full_point(0.0);
        point.velocity_ms_enu = None;
        let target = build_position_target(&point, 0);
        assert_eq!(
            target.type_mask,
            PositionTarget::IGNORE_VX
                | PositionTarget::IGNORE_VY
                | PositionTarget::IGNORE_VZ
        );

        // Specifically a missing acceleration must mask the acceleration bits, not double up
        // the velocity ones
        let mut point = full_point(0.0);
        point.acc_mss_enu = None;
        let target = build_position_target(&point, 0);
        assert_eq!(
            target.type_mask,
            PositionTarget::IGNORE_AFX
                | PositionTarget::IGNORE_AFY
                | PositionTarget::IGNORE_AFZ
        );

        // A missing attitude masks yaw
        let mut point = full_point(0.0);
        point.attitude_q_enu = None;
        let target = build_position_target(&point, 0);
        assert_eq!(target.type_mask, PositionTarget::IGNORE_YAW);
        assert_eq!(target.yaw_rad, 0.0);
    }

    #[test]
    fn test_mask_not_accumulated() {
        // The mask of one evaluation must not leak into the next
        let sparse = build_position_target(&sparse_point(0.0), 0);
        assert_ne!(sparse.type_mask, 0);

        let full = build_position_target(&full_point(0.0), 0);
        assert_eq!(full.type_mask, 0);
    }

    #[test]
    fn test_target_conversion() {
        let target = build_position_target(&full_point(0.0), 42);

        // ENU (1, 2, 3) becomes NED (2, 1, -3)
        assert!((target.position_m_ned - Vector3::new(2.0, 1.0, -3.0)).norm() < 1e-9);

        // A pure ENU yaw of pi/2 is an NED yaw of 0
        assert!(target.yaw_rad.abs() < 1e-9);

        // Yaw rate is always zero
        assert_eq!(target.yaw_rate_rads, 0.0);

        assert_eq!(target.stamp_ms, 42);
        assert_eq!(target.coordinate_frame, PositionTarget::FRAME_LOCAL_NED);
    }

    #[test]
    fn test_end_to_end_two_point_playback() {
        let mut playback = Playback::default();
        let t0 = Instant::now();

        let traj = traj_from_points(vec![full_point(0.0), full_point(0.2)]);
        let stamp_ms = traj.header.stamp.timestamp_millis();

        // First cycle ingests the trajectory and emits point 0
        let (target, report) = playback.proc(&input_with_traj(traj, t0));
        let target = target.expect("Expected a target on the first cycle");
        assert_eq!(report.active_point_index, Some(0));
        assert_eq!(target.stamp_ms, stamp_ms);

        // At 0.1 s point 0 is in the past, point 1 is the next future point
        let (target, report) = playback.proc(
            &InputData::new(t0 + Duration::from_secs_f64(0.1))
        );
        assert!(target.is_some());
        assert_eq!(report.active_point_index, Some(1));

        // At 0.2 s point 1 is exactly due
        let (target, report) = playback.proc(
            &InputData::new(t0 + Duration::from_secs_f64(0.2))
        );
        assert!(target.is_some());
        assert_eq!(report.active_point_index, Some(1));

        // At 0.3 s no point qualifies: nothing is emitted and the store clears
        let (target, report) = playback.proc(
            &InputData::new(t0 + Duration::from_secs_f64(0.3))
        );
        assert!(target.is_none());
        assert!(report.finished);
        assert!(!playback.is_active());

        // Subsequent cycles are silent no-ops until the next ingest
        let (target, report) = playback.proc(
            &InputData::new(t0 + Duration::from_secs_f64(0.4))
        );
        assert!(target.is_none());
        assert!(!report.finished);
        assert!(report.elapsed_s.is_none());
    }

    #[test]
    fn test_last_ingest_wins() {
        let mut playback = Playback::default();
        let t0 = Instant::now();

        let traj_a = traj_from_points(vec![full_point(0.0), full_point(1.0)]);
        let (_, report) = playback.proc(&input_with_traj(traj_a, t0));
        assert_eq!(report.active_point_index, Some(0));

        // Ingesting B mid playback replaces A immediately, and B's timing is relative to B's
        // own acceptance time
        let mut traj_b = traj_from_points(vec![full_point(0.3), full_point(0.6)]);
        traj_b.header.stamp = traj_b.header.stamp + chrono::Duration::seconds(3);
        let stamp_b_ms = traj_b.header.stamp.timestamp_millis();

        let t1 = t0 + Duration::from_secs_f64(0.8);
        let (target, report) = playback.proc(&input_with_traj(traj_b, t1));
        let target = target.expect("Expected a target from trajectory B");

        assert_eq!(report.active_point_index, Some(0));
        assert_eq!(target.stamp_ms, stamp_b_ms);
    }

    #[test]
    fn test_empty_trajectory_is_already_finished() {
        let mut playback = Playback::default();
        let t0 = Instant::now();

        let (target, report) = playback.proc(
            &input_with_traj(traj_from_points(vec![]), t0)
        );

        assert!(target.is_none());
        assert!(report.finished);
        assert!(!playback.is_active());
    }
}
