//! TriadNet dashboard client.
//!
//! Maintains one WebSocket session to a node's dashboard endpoint: bounded
//! automatic reconnection, periodic snapshot polling, inbound dispatch to
//! view projections, and outbound mining controls. The wire types live in
//! `triadnet-proto`.
//!
//! Delivery is best-effort: a command issued while disconnected is dropped,
//! not queued, and nothing is persisted across a restart.

mod client;
mod config;
mod controls;
mod dispatch;
mod poller;
mod session;
mod view;

pub use client::{CommandSink, DashboardClient, DashboardEvent, DashboardHandle, SendError};
pub use config::DashboardConfig;
pub use controls::{ControlsError, MiningControls};
pub use dispatch::{DashboardView, apply_message, apply_snapshot};
pub use poller::Poller;
pub use session::{Effect, Event, Session};
pub use view::{
    NO_LOG_ENTRIES, NO_TRANSACTIONS, TextView, render_mining_log, render_transactions,
    status_label,
};
