//! # Preview Server
//!
//! Publishes the preview path built from each ingested trajectory. The preview stays in the
//! ingest (ENU) convention and is meant for visualisation tools, not the flight controller.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    net::{zmq, MonitoredSocket, MonitoredSocketError, SocketOptions},
    traj::PathPreview
};

use crate::params::TrajExecParams;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Preview path server
pub struct PreviewServer {
    socket: MonitoredSocket
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PreviewServerError {
    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),

    #[error("Could not send the preview path: {0}")]
    SendError(zmq::Error),

    #[error("Could not serialize the preview path: {0}")]
    SerializationError(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PreviewServer {
    /// Create a new instance of the preview server.
    ///
    /// This function will not block until a consumer connects.
    pub fn new(ctx: &zmq::Context, params: &TrajExecParams) -> Result<Self, PreviewServerError> {
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
            &params.preview_endpoint
        ).map_err(PreviewServerError::SocketError)?;

        // Create self
        Ok(Self {
            socket
        })
    }

    /// Publish a single preview path.
    pub fn send(&mut self, preview: &PathPreview) -> Result<(), PreviewServerError> {
        // Serialize the preview
        let preview_string = serde_json::to_string(preview)
            .map_err(PreviewServerError::SerializationError)?;

        // Send it
        self.socket.send(&preview_string, 0)
            .map_err(PreviewServerError::SendError)
    }
}
