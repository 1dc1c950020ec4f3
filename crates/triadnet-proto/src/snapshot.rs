//! Inbound snapshots.
//!
//! A snapshot is one structured update from the node, partitioned into four
//! independent optional sections. A section that is absent means "no update
//! this cycle", not "cleared".

use serde::{Deserialize, Serialize};
use std::fmt;

/// One inbound dashboard update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mining_stats: Option<MiningStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_stats: Option<NetworkStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<Transaction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mining_log: Option<Vec<LogEntry>>,
}

impl Snapshot {
    /// True when no section is present (e.g. a bare status acknowledgment).
    pub fn is_empty(&self) -> bool {
        self.mining_stats.is_none()
            && self.network_stats.is_none()
            && self.transactions.is_none()
            && self.mining_log.is_none()
    }
}

/// Local miner statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiningStats {
    pub chain_height: u64,
    pub difficulty: f64,
    pub rewards: f64,
    pub hash_rate: Figure,
}

/// Network-wide statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    pub connected_nodes: u64,
    pub avg_block_time: f64,
    pub network_hashrate: Figure,
    pub active_miners: u64,
}

/// One entry of the pending transaction pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub timestamp: String,
    pub hash: String,
    pub amount: f64,
}

/// One line of the mining log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub hash: String,
    pub coordinates: String,
    pub status: String,
}

/// A numeric display value.
///
/// Nodes sometimes pre-format large rates with digit grouping (`"12,000"`),
/// so a figure decodes from either a bare number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Figure {
    Int(u64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Figure::Int(n) => write!(f, "{}", n),
            Figure::Float(x) => write!(f, "{}", x),
            Figure::Text(s) => f.write_str(s),
        }
    }
}
