//! Test setpoint subscriber
//!
//! Connects to the trajectory exec's setpoint stream and prints every received target. Useful for
//! checking what the flight controller bridge would see.

use comms_if::{
    net::{zmq, MonitoredSocket, SocketOptions},
    setpoint::PositionTarget,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional endpoint argument, defaulting to the exec's setpoint endpoint
    let endpoint = std::env::args()
        .nth(1)
        .unwrap_or_else(|| String::from("tcp://localhost:5031"));

    // Create zmq context
    let ctx = zmq::Context::new();

    // Create socket options
    let socket_options = SocketOptions {
        block_on_first_connect: false,
        connect_timeout: 1000,
        ..Default::default()
    };

    // Create the socket and subscribe to everything on it
    let socket = MonitoredSocket::new(
        &ctx,
        zmq::SUB,
        socket_options,
        &endpoint
    )?;
    socket.set_subscribe(b"")?;

    println!("Listening for setpoints on {}", endpoint);

    loop {
        match socket.recv_string(0) {
            Ok(Ok(s)) => match serde_json::from_str::<PositionTarget>(&s) {
                Ok(target) => println!(
                    "[{} ms] mask {:#06x} pos_ned ({:7.3}, {:7.3}, {:7.3}) m yaw {:6.3} rad",
                    target.stamp_ms,
                    target.type_mask,
                    target.position_m_ned.x,
                    target.position_m_ned.y,
                    target.position_m_ned.z,
                    target.yaw_rad
                ),
                Err(e) => println!("Could not parse setpoint: {}", e)
            },
            Ok(Err(_)) => println!("Recieved a non UTF-8 message, skipping"),
            Err(e) => println!("Failed to recieve setpoint: {}", e)
        }
    }
}
