//! # Trajectory Client
//!
//! Subscribes to the trajectory stream published by the planner and hands each recieved
//! trajectory to the ingest handler.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    net::{zmq, MonitoredSocket, MonitoredSocketError, SocketOptions},
    traj::Trajectory
};

use crate::params::TrajExecParams;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Trajectory client
pub struct TrajClient {
    socket: MonitoredSocket
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum TrajClientError {
    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),

    #[error("Could not subscribe to the trajectory stream: {0}")]
    SubscribeError(zmq::Error),

    #[error("Could not recieve a message from the planner: {0}")]
    RecvError(zmq::Error),

    #[error("Could not parse the recieved trajectory: {0}")]
    TrajParseError(serde_json::Error),

    #[error("The planner sent a message which was not valid UTF-8")]
    NonUtf8Message
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TrajClient {
    /// Create a new instance of the trajectory client.
    ///
    /// This function will not block until the planner connects.
    pub fn new(ctx: &zmq::Context, params: &TrajExecParams) -> Result<Self, TrajClientError> {
        // Create the socket options
        let socket_options = SocketOptions {
            block_on_first_connect: false,
            connect_timeout: 1000,
            heartbeat_ivl: 500,
            heartbeat_ttl: 1000,
            heartbeat_timeout: 1000,
            linger: 1,
            recv_timeout: 10,
            send_timeout: 10,
            ..Default::default()
        };

        // Connect the socket
        let socket = MonitoredSocket::new(
            ctx,
            zmq::SUB,
            socket_options,
            &params.traj_endpoint
        ).map_err(TrajClientError::SocketError)?;

        // Subscribe to every message on the stream
        socket.set_subscribe(b"")
            .map_err(TrajClientError::SubscribeError)?;

        // Create self
        Ok(Self {
            socket
        })
    }

    /// Check if the client is connected to the planner
    pub fn is_connected(&self) -> bool {
        self.socket.connected()
    }

    /// Recieve a single trajectory from the planner.
    ///
    /// The protocol here is to call this in a loop until `Ok(None)` is returned, indicating
    /// that there are no more pending trajectories to be recieved this cycle. A parse failure
    /// only drops the offending message, the socket stays usable.
    pub fn recieve_trajectory(&self) -> Result<Option<Trajectory>, TrajClientError> {
        let msg_str = match self.socket.recv_string(0) {
            Ok(Ok(s)) => s,
            Ok(Err(_)) => return Err(TrajClientError::NonUtf8Message),
            Err(zmq::Error::EAGAIN) => return Ok(None),
            Err(e) => return Err(TrajClientError::RecvError(e))
        };

        match serde_json::from_str(&msg_str) {
            Ok(traj) => Ok(Some(traj)),
            Err(e) => Err(TrajClientError::TrajParseError(e))
        }
    }
}
