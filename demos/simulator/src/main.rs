//! Dashboard simulator demo.
//!
//! Runs a mock node endpoint that fabricates dashboard data, a headless
//! console client, or both wired together:
//!
//!   cargo run -p triadnet-demo-simulator -- --listen 8765
//!   cargo run -p triadnet-demo-simulator -- --connect ws://localhost:8765
//!   cargo run -p triadnet-demo-simulator

mod console;
mod node;

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("triadnet_demo_simulator=info".parse()?)
                .add_directive("triadnet_dashboard=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let listen = parse_arg(&args, "--listen");
    let connect = parse_arg_string(&args, "--connect");

    match (listen, connect) {
        (Some(port), None) => {
            let addr: SocketAddr = ([127, 0, 0, 1], port).into();
            node::run(addr).await
        }
        (None, Some(url)) => console::run(url).await,
        (None, None) => {
            let addr: SocketAddr = ([127, 0, 0, 1], 8765).into();
            tokio::spawn(async move {
                if let Err(e) = node::run(addr).await {
                    tracing::error!("node endpoint failed: {}", e);
                }
            });
            console::run(format!("ws://{}", addr)).await
        }
        _ => anyhow::bail!("use either --listen <port> or --connect <url>"),
    }
}

fn parse_arg(args: &[String], flag: &str) -> Option<u16> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}

fn parse_arg_string(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
