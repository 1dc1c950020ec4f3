//! Outbound commands.
//!
//! Each user intent maps to exactly one tagged JSON object, e.g.
//! `{"action":"start_mining","config":{"threads":4,"algorithm":"sha256"}}`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mining algorithm identifiers the node accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Mandelbrot,
    Julia,
    Sha256,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Mandelbrot => "mandelbrot",
            Algorithm::Julia => "julia",
            Algorithm::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = AlgorithmParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mandelbrot" => Ok(Algorithm::Mandelbrot),
            "julia" => Ok(Algorithm::Julia),
            "sha256" => Ok(Algorithm::Sha256),
            other => Err(AlgorithmParseError(other.to_string())),
        }
    }
}

/// Error parsing an algorithm identifier.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown mining algorithm: {0}")]
pub struct AlgorithmParseError(pub String);

/// Mining configuration carried by `start_mining`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningConfig {
    pub threads: u32,
    pub algorithm: Algorithm,
}

impl MiningConfig {
    /// Build a config, rejecting a zero thread count.
    pub fn new(threads: u32, algorithm: Algorithm) -> Result<Self, ConfigError> {
        if threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        Ok(Self { threads, algorithm })
    }
}

/// Invalid mining configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("thread count must be positive")]
    ZeroThreads,
}

/// Requests sent from the dashboard to the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Command {
    /// Start the miner with the given configuration.
    StartMining { config: MiningConfig },
    /// Stop the miner.
    StopMining,
    /// Change the worker thread count of a running miner.
    UpdateThreads { threads: u32 },
    /// Change the mining algorithm.
    UpdateAlgorithm { algorithm: Algorithm },
    /// Ask for a full dashboard snapshot.
    GetDashboardData,
}

impl Command {
    /// Serialize into a single text frame.
    pub fn to_frame(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn start_mining_wire_shape() {
        let config = MiningConfig::new(4, Algorithm::Sha256).unwrap();
        let frame = Command::StartMining { config }.to_frame();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(
            value,
            json!({"action": "start_mining", "config": {"threads": 4, "algorithm": "sha256"}})
        );
    }

    #[test]
    fn bare_action_wire_shapes() {
        let value: serde_json::Value =
            serde_json::from_str(&Command::StopMining.to_frame()).unwrap();
        assert_eq!(value, json!({"action": "stop_mining"}));

        let value: serde_json::Value =
            serde_json::from_str(&Command::GetDashboardData.to_frame()).unwrap();
        assert_eq!(value, json!({"action": "get_dashboard_data"}));
    }

    #[test]
    fn parameter_update_wire_shapes() {
        let value: serde_json::Value =
            serde_json::from_str(&Command::UpdateThreads { threads: 8 }.to_frame()).unwrap();
        assert_eq!(value, json!({"action": "update_threads", "threads": 8}));

        let frame = Command::UpdateAlgorithm {
            algorithm: Algorithm::Julia,
        }
        .to_frame();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value, json!({"action": "update_algorithm", "algorithm": "julia"}));
    }

    #[test]
    fn algorithm_parse_roundtrip() {
        for id in ["mandelbrot", "julia", "sha256"] {
            let algorithm: Algorithm = id.parse().unwrap();
            assert_eq!(algorithm.to_string(), id);
        }
    }

    #[test]
    fn unknown_algorithm_rejected() {
        assert!("scrypt".parse::<Algorithm>().is_err());
        assert!("".parse::<Algorithm>().is_err());
    }

    #[test]
    fn zero_threads_rejected() {
        assert_eq!(
            MiningConfig::new(0, Algorithm::Mandelbrot),
            Err(ConfigError::ZeroThreads)
        );
        assert!(MiningConfig::new(1, Algorithm::Mandelbrot).is_ok());
    }
}
