//! View projection: snapshot sections to display strings.
//!
//! Pure formatting only; where the rendered strings end up (DOM, terminal,
//! logs) is the embedder's business.

use triadnet_proto::{ConnectionState, LogEntry, MiningStats, NetworkStats, Transaction};

use crate::dispatch::DashboardView;

/// Placeholder row for an empty transaction pool.
pub const NO_TRANSACTIONS: &str = "No transactions to display";
/// Placeholder row for an empty mining log.
pub const NO_LOG_ENTRIES: &str = "No log entries to display";

/// Status indicator label for a lifecycle state.
///
/// Exhausted retries read the same as a plain disconnect; the distinction is
/// visible only through [`ConnectionState`] itself.
pub fn status_label(state: ConnectionState) -> &'static str {
    match state {
        ConnectionState::Connected => "Connected",
        ConnectionState::Connecting => "Connecting",
        ConnectionState::Disconnected | ConnectionState::Failed => "Disconnected",
    }
}

/// Project the transaction pool into display rows; an empty pool yields
/// exactly one placeholder row.
pub fn render_transactions(transactions: &[Transaction]) -> Vec<String> {
    if transactions.is_empty() {
        return vec![NO_TRANSACTIONS.to_string()];
    }
    transactions
        .iter()
        .map(|tx| format!("{}  {}  {} TND", tx.timestamp, tx.hash, tx.amount))
        .collect()
}

/// Project the mining log into display rows; an empty log yields exactly one
/// placeholder row.
pub fn render_mining_log(entries: &[LogEntry]) -> Vec<String> {
    if entries.is_empty() {
        return vec![NO_LOG_ENTRIES.to_string()];
    }
    entries
        .iter()
        .map(|entry| {
            format!(
                "{}  {}  {}  {}",
                entry.timestamp, entry.hash, entry.coordinates, entry.status
            )
        })
        .collect()
}

/// Text rendering of the full dashboard.
///
/// Every field keeps its last rendered value until a snapshot section
/// replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct TextView {
    pub chain_height: String,
    pub difficulty: String,
    pub rewards: String,
    pub hash_rate: String,
    pub connected_nodes: String,
    pub avg_block_time: String,
    pub network_hashrate: String,
    pub active_miners: String,
    pub transactions: Vec<String>,
    pub mining_log: Vec<String>,
}

impl Default for TextView {
    fn default() -> Self {
        let unknown = "--".to_string();
        Self {
            chain_height: unknown.clone(),
            difficulty: unknown.clone(),
            rewards: unknown.clone(),
            hash_rate: unknown.clone(),
            connected_nodes: unknown.clone(),
            avg_block_time: unknown.clone(),
            network_hashrate: unknown.clone(),
            active_miners: unknown,
            transactions: vec![NO_TRANSACTIONS.to_string()],
            mining_log: vec![NO_LOG_ENTRIES.to_string()],
        }
    }
}

impl DashboardView for TextView {
    fn apply_mining_stats(&mut self, stats: &MiningStats) {
        self.chain_height = stats.chain_height.to_string();
        self.difficulty = stats.difficulty.to_string();
        self.rewards = format!("{} TND", stats.rewards);
        self.hash_rate = format!("{} H/s", stats.hash_rate);
    }

    fn apply_network_stats(&mut self, stats: &NetworkStats) {
        self.connected_nodes = stats.connected_nodes.to_string();
        self.avg_block_time = format!("{}s", stats.avg_block_time);
        self.network_hashrate = format!("{} H/s", stats.network_hashrate);
        self.active_miners = stats.active_miners.to_string();
    }

    fn replace_transactions(&mut self, transactions: &[Transaction]) {
        self.transactions = render_transactions(transactions);
    }

    fn replace_mining_log(&mut self, entries: &[LogEntry]) {
        self.mining_log = render_mining_log(entries);
    }
}
