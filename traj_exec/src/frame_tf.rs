//! # Frame and convention transforms
//!
//! Pure conversions between the ingest convention (right handed ENU world frame, baselink body
//! convention) and the transmission convention (right handed NED world frame, aircraft body
//! convention), plus yaw extraction from an attitude quaternion.
//!
//! Nothing in here carries state. Waypoints are stored in the ingest convention and pass through
//! these functions exactly once, at dispatch time.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{UnitQuaternion, Vector3};
use std::f64::consts::{FRAC_PI_2, PI};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Transform a vector from the ENU world frame to the NED world frame.
///
/// Swaps the X and Y axes and negates Z. The transform is an involution, applying it twice
/// returns the original vector.
pub fn enu_to_ned(v: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(v.y, v.x, -v.z)
}

/// Transform a vector from the NED world frame to the ENU world frame.
pub fn ned_to_enu(v: &Vector3<f64>) -> Vector3<f64> {
    enu_to_ned(v)
}

/// Convert a body attitude from the ENU/baselink convention to the NED/aircraft convention.
///
/// The world frame change is composed on the left and the body convention change on the right.
/// The order must stay the exact inverse of the composition used for inbound targets elsewhere
/// in the system, the two orders are not algebraically interchangeable.
pub fn enu_baselink_to_ned_aircraft(q: &UnitQuaternion<f64>) -> UnitQuaternion<f64> {
    ned_enu_q() * q * aircraft_baselink_q()
}

/// Convert a body attitude from the NED/aircraft convention to the ENU/baselink convention.
///
/// Exact inverse of [`enu_baselink_to_ned_aircraft`].
pub fn ned_aircraft_to_enu_baselink(q: &UnitQuaternion<f64>) -> UnitQuaternion<f64> {
    ned_enu_q().inverse() * q * aircraft_baselink_q().inverse()
}

/// Extract the yaw angle from an attitude quaternion, in radians.
///
/// Standard atan2 based extraction of the rotation about the vertical axis. Flight attitudes
/// keep yaw well defined everywhere except a pitch of exactly +/-90 degrees, so no gimbal lock
/// special casing is done here.
pub fn quaternion_get_yaw(q: &UnitQuaternion<f64>) -> f64 {
    let (w, x, y, z) = (q.w, q.i, q.j, q.k);

    (2.0 * (w * z + x * y)).atan2(1.0 - 2.0 * (y * y + z * z))
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Rotation taking the ENU world frame into the NED world frame.
fn ned_enu_q() -> UnitQuaternion<f64> {
    UnitQuaternion::from_euler_angles(PI, 0.0, FRAC_PI_2)
}

/// Rotation between the aircraft and baselink body conventions, a 180 degree roll about the
/// forward axis.
fn aircraft_baselink_q() -> UnitQuaternion<f64> {
    UnitQuaternion::from_euler_angles(PI, 0.0, 0.0)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::FRAC_PI_4;
    use util::maths::get_ang_dist_2pi;

    /// Tolerance for all floating point comparisons
    const TOL: f64 = 1e-9;

    #[test]
    fn test_enu_ned_known_values() {
        let v = Vector3::new(1.0, 2.0, 3.0);

        assert!((enu_to_ned(&v) - Vector3::new(2.0, 1.0, -3.0)).norm() < TOL);
    }

    #[test]
    fn test_enu_ned_round_trip() {
        let vectors = [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(-2.5, 3.7, -0.1),
            Vector3::new(1.0e3, -1.0e-3, 42.0),
        ];

        for v in vectors.iter() {
            assert!((ned_to_enu(&enu_to_ned(v)) - v).norm() < TOL);
        }
    }

    #[test]
    fn test_attitude_round_trip() {
        let attitudes = [
            UnitQuaternion::identity(),
            UnitQuaternion::from_euler_angles(0.1, -0.2, 0.3),
            UnitQuaternion::from_euler_angles(PI, 0.0, 0.0),
            UnitQuaternion::from_euler_angles(-1.0, 0.5, -2.8),
        ];

        for q in attitudes.iter() {
            let back = ned_aircraft_to_enu_baselink(&enu_baselink_to_ned_aircraft(q));

            assert!(back.angle_to(q) < TOL);
        }
    }

    #[test]
    fn test_yaw_extraction() {
        let yaws = [0.0, FRAC_PI_4, FRAC_PI_2, PI, -FRAC_PI_2];

        for &yaw_rad in yaws.iter() {
            let q = UnitQuaternion::from_euler_angles(0.0, 0.0, yaw_rad);

            // Compare modulo 2pi, atan2 wraps pi to -pi
            assert!(get_ang_dist_2pi(quaternion_get_yaw(&q), yaw_rad).abs() < TOL);
        }
    }

    #[test]
    fn test_yaw_convention_change() {
        // A pure yaw of theta in ENU/baselink corresponds to a yaw of pi/2 - theta in
        // NED/aircraft
        let yaws = [0.0, 0.3, FRAC_PI_2, -1.2];

        for &yaw_rad in yaws.iter() {
            let q = UnitQuaternion::from_euler_angles(0.0, 0.0, yaw_rad);
            let yaw_ned_rad = quaternion_get_yaw(&enu_baselink_to_ned_aircraft(&q));

            assert!(get_ang_dist_2pi(yaw_ned_rad, FRAC_PI_2 - yaw_rad).abs() < TOL);
        }
    }
}
