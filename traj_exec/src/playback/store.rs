//! Trajectory store
//!
//! The store is the single place playback state lives. Ingest replaces the loaded trajectory
//! through [`TrajStore::replace`], the playback cycle queries it through
//! [`TrajStore::active_waypoint`] and explicitly clears it once completion is observed.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::time::Instant;

// Internal
use comms_if::traj::{Trajectory, TrajectoryPoint};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Store owning the trajectory currently being played back, if any.
#[derive(Default)]
pub struct TrajStore {
    current: Option<LoadedTrajectory>
}

/// A trajectory together with the playback state attached to it on acceptance.
struct LoadedTrajectory {
    /// The trajectory as ingested
    traj: Trajectory,

    /// Local monotonic clock time at which the trajectory was accepted. Fixed for the lifetime
    /// of the loaded trajectory, it is the zero point of all elapsed time comparisons.
    acceptance_time: Instant,

    /// Index of the first point not yet known to be in the past. Only ever advances.
    cursor: usize
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Result of an active waypoint query on a loaded trajectory.
pub enum ActivePoint {
    /// The index and data of the waypoint which is currently due
    Point(usize, TrajectoryPoint),

    /// Playback has passed the last point, the caller must clear the store
    Finished
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrajStore {
    /// Load a new trajectory, replacing the current one.
    ///
    /// Always succeeds. Any trajectory still being played back is silently discarded, which is
    /// the intended last-ingest-wins behaviour.
    pub fn replace(&mut self, traj: Trajectory, now: Instant) {
        self.current = Some(LoadedTrajectory {
            traj,
            acceptance_time: now,
            cursor: 0
        });
    }

    /// Clear the store, dropping the loaded trajectory.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// True if a trajectory is loaded.
    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    /// The stamp of the loaded trajectory's header in milliseconds.
    ///
    /// This is the time reference carried by every setpoint streamed from the trajectory.
    pub fn start_stamp_ms(&self) -> Option<i64> {
        self.current
            .as_ref()
            .map(|c| c.traj.header.stamp.timestamp_millis())
    }

    /// Elapsed playback time in seconds at the given instant, or `None` if no trajectory is
    /// loaded.
    pub fn elapsed_s(&self, now: Instant) -> Option<f64> {
        self.current
            .as_ref()
            .map(|c| now.saturating_duration_since(c.acceptance_time).as_secs_f64())
    }

    /// Find the waypoint which is due at the given instant.
    ///
    /// The due waypoint is the first point in the sequence whose time offset is greater than or
    /// equal to the elapsed time since acceptance. The search uses a cursor that only ever
    /// advances, which selects exactly the point a from-the-start scan would provided the time
    /// offsets are non-decreasing.
    ///
    /// Advancing the cursor is the only mutation performed here. Clearing the store on
    /// completion is left to the caller, so the end of a trajectory is handled at one explicit
    /// point.
    pub fn active_waypoint(&mut self, now: Instant) -> Option<ActivePoint> {
        let loaded = self.current.as_mut()?;

        let elapsed_s = now
            .saturating_duration_since(loaded.acceptance_time)
            .as_secs_f64();

        // Move the cursor past every point whose window has already closed
        while loaded.cursor < loaded.traj.points.len()
            && loaded.traj.points[loaded.cursor].time_from_start_s < elapsed_s
        {
            loaded.cursor += 1;
        }

        match loaded.traj.points.get(loaded.cursor) {
            Some(point) => Some(ActivePoint::Point(loaded.cursor, *point)),
            None => Some(ActivePoint::Finished)
        }
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
    use std::time::Duration;

    /// Build a trajectory with the given time offsets and no point data
    fn traj_with_offsets(offsets: &[f64]) -> Trajectory {
        Trajectory {
            header: Header {
                stamp: Utc::now(),
                frame_id: String::from("map")
            },
            points: offsets
                .iter()
                .map(|&time_from_start_s| TrajectoryPoint {
                    time_from_start_s,
                    position_m_enu: None,
                    attitude_q_enu: None,
                    velocity_ms_enu: None,
                    acc_mss_enu: None
                })
                .collect()
        }
    }

    fn at(t0: Instant, offset_s: f64) -> Instant {
        t0 + Duration::from_secs_f64(offset_s)
    }

    #[test]
    fn test_no_trajectory() {
        let mut store = TrajStore::default();

        assert!(!store.is_loaded());
        assert!(store.active_waypoint(Instant::now()).is_none());
        assert!(store.start_stamp_ms().is_none());
    }

    #[test]
    fn test_selection_rule() {
        let mut store = TrajStore::default();
        let t0 = Instant::now();

        store.replace(traj_with_offsets(&[0.0, 0.5, 1.0]), t0);

        // At zero elapsed the first point is due
        match store.active_waypoint(t0) {
            Some(ActivePoint::Point(i, _)) => assert_eq!(i, 0),
            _ => panic!("Expected an active point")
        }

        // The first point at or beyond 0.3 s elapsed is index 1
        match store.active_waypoint(at(t0, 0.3)) {
            Some(ActivePoint::Point(i, p)) => {
                assert_eq!(i, 1);
                assert_eq!(p.time_from_start_s, 0.5);
            },
            _ => panic!("Expected an active point")
        }

        // Past the last point playback is finished, and the caller clears the store
        match store.active_waypoint(at(t0, 1.5)) {
            Some(ActivePoint::Finished) => store.clear(),
            _ => panic!("Expected playback to be finished")
        }

        assert!(!store.is_loaded());
    }

    #[test]
    fn test_cursor_only_advances() {
        let mut store = TrajStore::default();
        let t0 = Instant::now();

        store.replace(traj_with_offsets(&[0.0, 0.5, 1.0]), t0);

        match store.active_waypoint(at(t0, 0.3)) {
            Some(ActivePoint::Point(i, _)) => assert_eq!(i, 1),
            _ => panic!("Expected an active point")
        }
        match store.active_waypoint(at(t0, 0.7)) {
            Some(ActivePoint::Point(i, _)) => assert_eq!(i, 2),
            _ => panic!("Expected an active point")
        }
        match store.active_waypoint(at(t0, 1.2)) {
            Some(ActivePoint::Finished) => (),
            _ => panic!("Expected playback to be finished")
        }
    }

    #[test]
    fn test_empty_trajectory_is_finished() {
        let mut store = TrajStore::default();
        let t0 = Instant::now();

        store.replace(traj_with_offsets(&[]), t0);

        match store.active_waypoint(t0) {
            Some(ActivePoint::Finished) => (),
            _ => panic!("Expected an empty trajectory to be already finished")
        }
    }

    #[test]
    fn test_last_ingest_wins() {
        let mut store = TrajStore::default();
        let t0 = Instant::now();

        let traj_a = traj_with_offsets(&[0.0, 1.0]);
        let mut traj_b = traj_with_offsets(&[0.25, 0.5]);
        traj_b.header.stamp = traj_a.header.stamp + chrono::Duration::seconds(5);

        store.replace(traj_a.clone(), t0);

        match store.active_waypoint(at(t0, 0.8)) {
            Some(ActivePoint::Point(i, _)) => assert_eq!(i, 1),
            _ => panic!("Expected an active point")
        }

        // Replacing mid playback restarts the clock from the new acceptance time
        let t1 = at(t0, 0.9);
        store.replace(traj_b.clone(), t1);

        match store.active_waypoint(at(t1, 0.1)) {
            Some(ActivePoint::Point(i, p)) => {
                assert_eq!(i, 0);
                assert_eq!(p.time_from_start_s, 0.25);
            },
            _ => panic!("Expected an active point")
        }

        assert_eq!(
            store.start_stamp_ms(),
            Some(traj_b.header.stamp.timestamp_millis())
        );
        assert_ne!(
            traj_a.header.stamp.timestamp_millis(),
            traj_b.header.stamp.timestamp_millis()
        );
    }
}
