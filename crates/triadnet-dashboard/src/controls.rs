//! Mining controls: user intents to outbound commands.
//!
//! Each intent produces exactly one send attempt; rapid parameter changes are
//! all sent, never batched or debounced. Input is validated here, at the
//! encoding boundary, so nothing malformed reaches the wire.

use thiserror::Error;

use triadnet_proto::{Algorithm, AlgorithmParseError, Command, ConfigError, MiningConfig};

use crate::client::{CommandSink, SendError};

/// Invalid input or failed handoff for a control action.
#[derive(Debug, Error)]
pub enum ControlsError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Algorithm(#[from] AlgorithmParseError),
    #[error(transparent)]
    Send(#[from] SendError),
}

/// Control panel for the miner.
///
/// The enabled flags are optimistic: flipped the moment a start/stop command
/// is handed to the transport, without waiting for the node to confirm.
pub struct MiningControls<S> {
    sink: S,
    start_enabled: bool,
    stop_enabled: bool,
}

impl<S: CommandSink> MiningControls<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            start_enabled: true,
            stop_enabled: false,
        }
    }

    /// Whether the start affordance is currently offered.
    pub fn start_enabled(&self) -> bool {
        self.start_enabled
    }

    /// Whether the stop affordance is currently offered.
    pub fn stop_enabled(&self) -> bool {
        self.stop_enabled
    }

    /// Start mining. The thread count must be positive and the algorithm
    /// known; invalid input is rejected here and nothing is sent.
    pub fn start_mining(&mut self, threads: u32, algorithm: &str) -> Result<(), ControlsError> {
        let algorithm: Algorithm = algorithm.parse()?;
        let config = MiningConfig::new(threads, algorithm)?;
        self.sink.send_command(Command::StartMining { config })?;
        self.start_enabled = false;
        self.stop_enabled = true;
        Ok(())
    }

    /// Stop mining.
    pub fn stop_mining(&mut self) -> Result<(), ControlsError> {
        self.sink.send_command(Command::StopMining)?;
        self.start_enabled = true;
        self.stop_enabled = false;
        Ok(())
    }

    /// Update the worker thread count.
    pub fn set_threads(&mut self, threads: u32) -> Result<(), ControlsError> {
        if threads == 0 {
            return Err(ConfigError::ZeroThreads.into());
        }
        self.sink.send_command(Command::UpdateThreads { threads })?;
        Ok(())
    }

    /// Update the mining algorithm.
    pub fn set_algorithm(&mut self, algorithm: &str) -> Result<(), ControlsError> {
        let algorithm: Algorithm = algorithm.parse()?;
        self.sink
            .send_command(Command::UpdateAlgorithm { algorithm })?;
        Ok(())
    }
}
