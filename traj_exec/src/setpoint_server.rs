//! # Setpoint Server
//!
//! Publishes the per-cycle position targets towards the flight controller bridge. The stream is
//! fire-and-forget: no retry and no acknowledgment, a stale target is simply superseded by the
//! next cycle's.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    net::{zmq, MonitoredSocket, MonitoredSocketError, SocketOptions},
    setpoint::PositionTarget
};

use crate::params::TrajExecParams;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Setpoint server
pub struct SetpointServer {
    socket: MonitoredSocket
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SetpointServerError {
    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),

    #[error("Could not send the target: {0}")]
    SendError(zmq::Error),

    #[error("Could not serialize the target: {0}")]
    SerializationError(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SetpointServer {
    /// Create a new instance of the setpoint server.
    ///
    /// This function will not block until a consumer connects.
    pub fn new(ctx: &zmq::Context, params: &TrajExecParams) -> Result<Self, SetpointServerError> {
        // Create the socket options
        let socket_options = SocketOptions {
            block_on_first_connect: false,
            bind: true,
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
            zmq::PUB,
            socket_options,
            &params.setpoint_endpoint
        ).map_err(SetpointServerError::SocketError)?;

        // Create self
        Ok(Self {
            socket
        })
    }

    /// Publish a single position target.
    pub fn send(&mut self, target: &PositionTarget) -> Result<(), SetpointServerError> {
        // Serialize the target
        let target_string = serde_json::to_string(target)
            .map_err(SetpointServerError::SerializationError)?;

        // Send it
        self.socket.send(&target_string, 0)
            .map_err(SetpointServerError::SendError)
    }
}
