//! # Trajectory ingest handler
//!
//! Handles newly recieved trajectories: loads them for playback and builds the preview path
//! which is republished for visualisation.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use chrono::Utc;
use log::info;
use nalgebra::UnitQuaternion;

// Internal
use crate::{data_store::DataStore, params::TrajExecParams};
use comms_if::traj::{Header, PathPreview, Pose, Trajectory};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Accept a newly recieved trajectory.
///
/// The trajectory is handed to playback, replacing whatever is currently loaded, and its
/// preview path is queued for publication this cycle. Acceptance never fails, a trajectory
/// that turns out to be empty simply plays back as already finished.
pub fn exec(ds: &mut DataStore, traj: Trajectory, params: &TrajExecParams) {
    info!(
        "New trajectory with {} points recieved (stamp {})",
        traj.points.len(),
        traj.header.stamp
    );

    ds.preview_path = Some(build_preview(&traj, &params.preview_frame_id));
    ds.playback_input.new_traj = Some(traj);
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Build the preview path for a trajectory.
///
/// The preview keeps the ingest (ENU) convention, it sits next to the rest of the ENU world
/// data in visualisation and never goes through the frame transform. Points without a position
/// are skipped, points with a position but no attitude preview with an identity attitude.
fn build_preview(traj: &Trajectory, frame_id: &str) -> PathPreview {
    let poses = traj
        .points
        .iter()
        .filter_map(|point| {
            point.position_m_enu.map(|position_m_enu| Pose {
                position_m_enu,
                attitude_q_enu: point
                    .attitude_q_enu
                    .unwrap_or_else(UnitQuaternion::identity)
            })
        })
        .collect();

    PathPreview {
        header: Header {
            stamp: Utc::now(),
            frame_id: String::from(frame_id)
        },
        poses
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::traj::TrajectoryPoint;
    use nalgebra::Vector3;

    #[test]
    fn test_build_preview() {
        let attitude_q_enu = UnitQuaternion::from_euler_angles(0.0, 0.0, 1.0);

        let traj = Trajectory {
            header: Header {
                stamp: Utc::now(),
                frame_id: String::from("odom")
            },
            points: vec![
                // A full pose
                TrajectoryPoint {
                    time_from_start_s: 0.0,
                    position_m_enu: Some(Vector3::new(1.0, 2.0, 3.0)),
                    attitude_q_enu: Some(attitude_q_enu),
                    velocity_ms_enu: None,
                    acc_mss_enu: None
                },
                // No position, skipped by the preview
                TrajectoryPoint {
                    time_from_start_s: 0.5,
                    position_m_enu: None,
                    attitude_q_enu: None,
                    velocity_ms_enu: Some(Vector3::new(1.0, 0.0, 0.0)),
                    acc_mss_enu: None
                },
                // Position without attitude, previewed with identity
                TrajectoryPoint {
                    time_from_start_s: 1.0,
                    position_m_enu: Some(Vector3::new(4.0, 5.0, 6.0)),
                    attitude_q_enu: None,
                    velocity_ms_enu: None,
                    acc_mss_enu: None
                },
            ]
        };

        let preview = build_preview(&traj, "map");

        assert_eq!(preview.header.frame_id, "map");
        assert_eq!(preview.poses.len(), 2);

        // Poses are republished in the ingest convention, untouched
        assert_eq!(preview.poses[0].position_m_enu, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(preview.poses[0].attitude_q_enu, attitude_q_enu);

        assert_eq!(preview.poses[1].position_m_enu, Vector3::new(4.0, 5.0, 6.0));
        assert_eq!(preview.poses[1].attitude_q_enu, UnitQuaternion::identity());
    }
}
