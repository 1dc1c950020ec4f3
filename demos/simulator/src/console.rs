//! Headless dashboard console.
//!
//! Connects to a node endpoint, starts the miner once, and logs each
//! rendered snapshot section.

use tokio::sync::broadcast::error::RecvError;

use triadnet_dashboard::{
    DashboardClient, DashboardConfig, DashboardEvent, MiningControls, TextView, apply_message,
    status_label,
};

pub async fn run(url: String) -> anyhow::Result<()> {
    let client = DashboardClient::spawn(DashboardConfig::new(url));
    let mut events = client.subscribe();
    let mut controls = MiningControls::new(client.handle());
    let mut view = TextView::default();
    let mut started = false;

    loop {
        match events.recv().await {
            Ok(DashboardEvent::Opened) => {
                tracing::info!("status: {}", status_label(client.state()));
                if !started && controls.start_mining(4, "mandelbrot").is_ok() {
                    started = true;
                }
            }
            Ok(DashboardEvent::Closed) => {
                tracing::info!("status: {}", status_label(client.state()));
            }
            Ok(DashboardEvent::Failed) => {
                tracing::warn!("reconnect budget exhausted; giving up");
                break;
            }
            Ok(DashboardEvent::Message(text)) => {
                apply_message(&text, &mut view);
                tracing::info!(
                    "height {} | difficulty {} | rewards {} | hash rate {} | nodes {}",
                    view.chain_height,
                    view.difficulty,
                    view.rewards,
                    view.hash_rate,
                    view.connected_nodes,
                );
                for row in &view.transactions {
                    tracing::debug!("tx: {}", row);
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!("lagged behind {} events", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }

    client.shutdown().await;
    Ok(())
}
