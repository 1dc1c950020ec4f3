//! Wire types for the TriadNet dashboard protocol.
//!
//! The dashboard client and a node's dashboard endpoint exchange JSON text
//! frames over a persistent WebSocket: tagged [`Command`]s outbound, and
//! [`Snapshot`]s inbound. This crate provides the framing only; the client
//! logic lives in `triadnet-dashboard`.

mod command;
mod snapshot;

pub use command::{Algorithm, AlgorithmParseError, Command, ConfigError, MiningConfig};
pub use snapshot::{Figure, LogEntry, MiningStats, NetworkStats, Snapshot, Transaction};

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No live connection.
    Disconnected,
    /// Connection attempt in flight.
    Connecting,
    /// Normal operation.
    Connected,
    /// Reconnect budget exhausted; only external intervention restarts the session.
    Failed,
}

impl ConnectionState {
    /// Whether commands may be transmitted in this state.
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}
