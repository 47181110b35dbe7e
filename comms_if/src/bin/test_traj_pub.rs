//! Test trajectory publisher
//!
//! Publishes a square test trajectory on the trajectory endpoint, letting the trajectory exec be
//! exercised without a real planner in the loop.

use chrono::Utc;
use comms_if::{
    net::{zmq, MonitoredSocket, SocketOptions},
    traj::{Header, Trajectory, TrajectoryPoint},
};
use nalgebra::{UnitQuaternion, Vector3};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "test_traj_pub", about = "Publishes a square test trajectory")]
struct Opt {
    /// Endpoint to bind the trajectory publisher to
    #[structopt(long, default_value = "tcp://*:5030")]
    endpoint: String,

    /// Side length of the square in meters
    #[structopt(long, default_value = "2.0")]
    side_m: f64,

    /// Altitude of the square above the origin in meters
    #[structopt(long, default_value = "1.5")]
    alt_m: f64,

    /// Time between consecutive corners in seconds
    #[structopt(long, default_value = "2.0")]
    leg_duration_s: f64,

    /// Time between repeat publications in seconds
    #[structopt(long, default_value = "15.0")]
    repeat_s: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = Opt::from_args();

    // Create zmq context
    let ctx = zmq::Context::new();

    // Create socket options
    let socket_options = SocketOptions {
        bind: true,
        block_on_first_connect: false,
        ..Default::default()
    };

    // Create the socket
    let socket = MonitoredSocket::new(
        &ctx,
        zmq::PUB,
        socket_options,
        &opt.endpoint
    )?;

    println!("Trajectory publisher open on {}", opt.endpoint);

    loop {
        let traj = build_square(&opt);

        let traj_str = serde_json::to_string(&traj)?;

        match socket.send(&traj_str, 0) {
            Ok(_) => println!(
                "Published square trajectory with {} points", traj.points.len()
            ),
            Err(e) => println!("Failed to send trajectory: {}", e)
        }

        std::thread::sleep(std::time::Duration::from_secs_f64(opt.repeat_s));
    }
}

/// Build a square trajectory at the given altitude, starting and ending at the ENU origin.
fn build_square(opt: &Opt) -> Trajectory {
    let corners = [
        Vector3::new(0.0, 0.0, opt.alt_m),
        Vector3::new(opt.side_m, 0.0, opt.alt_m),
        Vector3::new(opt.side_m, opt.side_m, opt.alt_m),
        Vector3::new(0.0, opt.side_m, opt.alt_m),
        Vector3::new(0.0, 0.0, opt.alt_m),
    ];

    let speed_ms = opt.side_m / opt.leg_duration_s;

    let mut points: Vec<TrajectoryPoint> = Vec::with_capacity(corners.len());

    for (i, corner) in corners.iter().enumerate() {
        // Head and fly towards the next corner. The final point hovers, keeping the heading of
        // the last leg.
        let (yaw_rad, velocity) = match corners.get(i + 1) {
            Some(next) => {
                let dir = (next - corner).normalize();
                (dir.y.atan2(dir.x), Some(dir * speed_ms))
            },
            None => {
                let prev = corners[i - 1];
                let dir = (corner - prev).normalize();
                (dir.y.atan2(dir.x), None)
            }
        };

        points.push(TrajectoryPoint {
            time_from_start_s: i as f64 * opt.leg_duration_s,
            position_m_enu: Some(*corner),
            attitude_q_enu: Some(UnitQuaternion::from_euler_angles(0.0, 0.0, yaw_rad)),
            velocity_ms_enu: velocity,
            acc_mss_enu: None
        });
    }

    Trajectory {
        header: Header {
            stamp: Utc::now(),
            frame_id: String::from("map")
        },
        points
    }
}
