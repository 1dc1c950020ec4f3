//! Inbound message dispatch.
//!
//! Each text frame decodes into a [`Snapshot`]; the sections that are present
//! are routed to the view in a fixed order. Absent sections are skipped, so
//! previously rendered values persist. Undecodable frames are logged and
//! discarded; they never touch connection state.

use triadnet_proto::{LogEntry, MiningStats, NetworkStats, Snapshot, Transaction};

/// Receiver for snapshot sections.
///
/// The two sequence sections use full-replace semantics: each call discards
/// whatever was rendered before.
pub trait DashboardView {
    fn apply_mining_stats(&mut self, stats: &MiningStats);
    fn apply_network_stats(&mut self, stats: &NetworkStats);
    fn replace_transactions(&mut self, transactions: &[Transaction]);
    fn replace_mining_log(&mut self, entries: &[LogEntry]);
}

/// Decode one inbound frame and apply it to the view.
pub fn apply_message(text: &str, view: &mut dyn DashboardView) {
    match serde_json::from_str::<Snapshot>(text) {
        Ok(snapshot) => apply_snapshot(&snapshot, view),
        Err(e) => tracing::warn!("discarding undecodable frame: {}", e),
    }
}

/// Apply one decoded snapshot: mining stats, network stats, transactions,
/// then the mining log.
pub fn apply_snapshot(snapshot: &Snapshot, view: &mut dyn DashboardView) {
    if let Some(ref stats) = snapshot.mining_stats {
        view.apply_mining_stats(stats);
    }
    if let Some(ref stats) = snapshot.network_stats {
        view.apply_network_stats(stats);
    }
    if let Some(ref transactions) = snapshot.transactions {
        view.replace_transactions(transactions);
    }
    if let Some(ref entries) = snapshot.mining_log {
        view.replace_mining_log(entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct SpyView {
        calls: Vec<&'static str>,
    }

    impl DashboardView for SpyView {
        fn apply_mining_stats(&mut self, _stats: &MiningStats) {
            self.calls.push("mining_stats");
        }
        fn apply_network_stats(&mut self, _stats: &NetworkStats) {
            self.calls.push("network_stats");
        }
        fn replace_transactions(&mut self, _transactions: &[Transaction]) {
            self.calls.push("transactions");
        }
        fn replace_mining_log(&mut self, _entries: &[LogEntry]) {
            self.calls.push("mining_log");
        }
    }

    const FULL: &str = r#"{
        "mining_log":[],
        "transactions":[],
        "network_stats":{"connected_nodes":1,"avg_block_time":60.0,"network_hashrate":100,"active_miners":1},
        "mining_stats":{"chain_height":1,"difficulty":1.0,"rewards":0.5,"hash_rate":100}
    }"#;

    #[test]
    fn sections_applied_in_fixed_order() {
        let mut view = SpyView::default();
        // Key order in the frame does not matter.
        apply_message(FULL, &mut view);
        assert_eq!(
            view.calls,
            vec!["mining_stats", "network_stats", "transactions", "mining_log"]
        );
    }

    #[test]
    fn absent_sections_are_skipped() {
        let mut view = SpyView::default();
        apply_message(r#"{"mining_stats":{"chain_height":1,"difficulty":1.0,"rewards":0.5,"hash_rate":100}}"#, &mut view);
        assert_eq!(view.calls, vec!["mining_stats"]);
    }

    #[test]
    fn status_ack_is_a_noop() {
        let mut view = SpyView::default();
        apply_message(r#"{"status":"Mining started"}"#, &mut view);
        assert!(view.calls.is_empty());
    }

    #[test]
    fn malformed_frame_is_discarded() {
        let mut view = SpyView::default();
        apply_message("{not json", &mut view);
        apply_message(r#"{"transactions":"nope"}"#, &mut view);
        assert!(view.calls.is_empty());

        // The dispatcher keeps working afterwards.
        apply_message(FULL, &mut view);
        assert_eq!(view.calls.len(), 4);
    }
}
