//! Mock node endpoint.
//!
//! Fabricates dashboard data the way a real node's telemetry service would:
//! a monotonically advancing chain, a rolling transaction pool, and a mining
//! log with fractal coordinates. Each inbound command gets exactly one reply
//! frame: a snapshot for `get_dashboard_data`, a status acknowledgment for
//! the control actions.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;

use triadnet_proto::{
    Algorithm, Command, Figure, LogEntry, MiningStats, NetworkStats, Snapshot, Transaction,
};

/// Simulated node state behind the endpoint.
struct NodeState {
    chain_height: u64,
    difficulty: f64,
    rewards: f64,
    hash_rate: u64,
    mining: bool,
    threads: u32,
    algorithm: Algorithm,
    transactions: Vec<Transaction>,
    mining_log: Vec<LogEntry>,
}

impl NodeState {
    fn new() -> Self {
        Self {
            chain_height: 0,
            difficulty: 1.0,
            rewards: 0.0,
            hash_rate: 0,
            mining: false,
            threads: 4,
            algorithm: Algorithm::Mandelbrot,
            transactions: Vec::new(),
            mining_log: Vec::new(),
        }
    }

    /// Advance the simulation one step and take a full snapshot.
    fn advance(&mut self) -> Snapshot {
        self.chain_height += 1;
        self.difficulty += 0.1;
        self.rewards += 0.5;
        self.hash_rate = 1000 + self.chain_height * 100;
        if self.mining {
            self.hash_rate *= u64::from(self.threads);
        }

        let connected_nodes = (self.chain_height / 10).min(10);
        let avg_block_time = 60.0 - ((self.chain_height / 10) as f64).min(30.0);
        let network_hashrate = self.hash_rate * connected_nodes.max(1);
        let active_miners = (self.chain_height / 20).min(5);

        if self.transactions.len() < 5 && self.chain_height % 3 == 0 {
            self.transactions.push(Transaction {
                timestamp: wall_clock(),
                hash: short_hash(self.chain_height),
                amount: self.chain_height as f64 * 0.1,
            });
        }

        if self.mining_log.len() < 5 {
            let x = self.chain_height as f64 * 0.1;
            let y = self.chain_height as f64 * 0.2;
            self.mining_log.push(LogEntry {
                timestamp: wall_clock(),
                hash: short_hash(self.chain_height),
                coordinates: format!("({:.2}, {:.2})", x, y),
                status: if self.chain_height % 2 == 0 {
                    format!("Mining ({})...", self.algorithm)
                } else {
                    "Found block!".to_string()
                },
            });
        }

        Snapshot {
            mining_stats: Some(MiningStats {
                chain_height: self.chain_height,
                difficulty: round2(self.difficulty),
                rewards: round2(self.rewards),
                hash_rate: Figure::Text(grouped(self.hash_rate)),
            }),
            network_stats: Some(NetworkStats {
                connected_nodes,
                avg_block_time,
                network_hashrate: Figure::Text(grouped(network_hashrate)),
                active_miners,
            }),
            transactions: Some(self.transactions.clone()),
            mining_log: Some(self.mining_log.clone()),
        }
    }
}

type SharedState = Arc<Mutex<NodeState>>;

pub async fn run(addr: SocketAddr) -> anyhow::Result<()> {
    let state = Arc::new(Mutex::new(NodeState::new()));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Dashboard endpoint listening on ws://{}", addr);

    loop {
        let (stream, client_addr) = listener.accept().await?;
        let state = state.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, client_addr, state).await {
                tracing::warn!("Connection error from {}: {}", client_addr, e);
            }
        });
    }
}

async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: SharedState,
) -> anyhow::Result<()> {
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let (mut sink, mut stream) = ws.split();

    tracing::debug!("New dashboard connection from {}", addr);

    while let Some(msg) = stream.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!("WebSocket error: {}", e);
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                let command: Command = match serde_json::from_str(&text) {
                    Ok(c) => c,
                    Err(e) => {
                        tracing::warn!("Invalid command: {}", e);
                        continue;
                    }
                };
                let reply = {
                    let mut s = state.lock().await;
                    respond(&mut s, command)?
                };
                sink.send(Message::Text(reply.into())).await?;
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    tracing::debug!("Dashboard connection closed: {}", addr);
    Ok(())
}

fn respond(state: &mut NodeState, command: Command) -> anyhow::Result<String> {
    let reply = match command {
        Command::GetDashboardData => serde_json::to_string(&state.advance())?,
        Command::StartMining { config } => {
            state.mining = true;
            state.threads = config.threads;
            state.algorithm = config.algorithm;
            tracing::info!(
                "Started mining with {} threads using {}",
                config.threads,
                config.algorithm
            );
            ack("Mining started")
        }
        Command::StopMining => {
            state.mining = false;
            tracing::info!("Mining stopped");
            ack("Mining stopped")
        }
        Command::UpdateThreads { threads } => {
            state.threads = threads;
            tracing::info!("Updated thread count to {}", threads);
            ack("Thread count updated")
        }
        Command::UpdateAlgorithm { algorithm } => {
            state.algorithm = algorithm;
            tracing::info!("Updated algorithm to {}", algorithm);
            ack("Algorithm updated")
        }
    };
    Ok(reply)
}

fn ack(status: &str) -> String {
    serde_json::json!({ "status": status }).to_string()
}

/// HH:MM:SS, UTC.
fn wall_clock() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        % 86_400;
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

fn short_hash(height: u64) -> String {
    let full = format!("0x{:064x}", height);
    format!("{}...", &full[..16])
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Digit-grouped rendering, `12345` -> `"12,345"`. Hash rates go over the
/// wire pre-formatted for display.
fn grouped(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
