//! Connection lifecycle state machine.
//!
//! The retry policy lives here as a pure transition table: feeding an
//! [`Event`] yields the [`Effect`]s the driver must execute. Keeping it away
//! from any socket makes the retry bound and the stale-timer guard testable
//! in isolation.
//!
//! Every connection attempt runs under an epoch. A reconnect timer is armed
//! with the epoch current at arming time; if the session has moved on by the
//! time the timer fires (explicit close, a newer attempt), the event carries
//! a stale epoch and is ignored.

use std::time::Duration;

use triadnet_proto::ConnectionState;

/// Something that happened to the live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Connection established.
    Opened,
    /// Connection closed without us asking.
    Closed,
    /// Transport-level error. Same policy as `Closed`.
    Errored,
    /// A reconnect delay elapsed. Carries the epoch it was armed under.
    ReconnectDue { epoch: u64 },
    /// Explicit teardown; suppresses automatic reconnection.
    CloseRequested,
}

/// An action for the driver to carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Start a connection attempt.
    Connect,
    /// Arm a one-shot reconnect timer under the given epoch.
    ScheduleReconnect { delay: Duration, epoch: u64 },
    /// Tell observers the session is up.
    NotifyOpened,
    /// Tell observers the connection is down.
    NotifyClosed,
    /// Tell observers the retry budget is spent.
    NotifyFailed,
}

/// Transition table for one dashboard session.
#[derive(Debug)]
pub struct Session {
    state: ConnectionState,
    attempts: u32,
    epoch: u64,
    max_attempts: u32,
    reconnect_delay: Duration,
}

impl Session {
    pub fn new(max_attempts: u32, reconnect_delay: Duration) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            attempts: 0,
            epoch: 0,
            max_attempts,
            reconnect_delay,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Unsolicited closes seen since the last successful open.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Kick off a connection attempt. No-op while one is already in flight
    /// or the session is live.
    pub fn open(&mut self) -> Vec<Effect> {
        match self.state {
            ConnectionState::Connecting | ConnectionState::Connected => Vec::new(),
            ConnectionState::Disconnected | ConnectionState::Failed => {
                self.epoch += 1;
                self.state = ConnectionState::Connecting;
                vec![Effect::Connect]
            }
        }
    }

    /// Feed one event, returning the effects to execute in order.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Opened => {
                self.state = ConnectionState::Connected;
                self.attempts = 0;
                vec![Effect::NotifyOpened]
            }
            Event::Closed | Event::Errored => self.on_unsolicited_close(),
            Event::ReconnectDue { epoch } => {
                if epoch != self.epoch || self.state != ConnectionState::Disconnected {
                    // Timer from a superseded attempt; must not touch current state.
                    return Vec::new();
                }
                self.epoch += 1;
                self.state = ConnectionState::Connecting;
                vec![Effect::Connect]
            }
            Event::CloseRequested => {
                // Bumping the epoch invalidates any pending reconnect timer.
                self.epoch += 1;
                let was_down = matches!(
                    self.state,
                    ConnectionState::Disconnected | ConnectionState::Failed
                );
                self.state = ConnectionState::Disconnected;
                if was_down {
                    Vec::new()
                } else {
                    vec![Effect::NotifyClosed]
                }
            }
        }
    }

    fn on_unsolicited_close(&mut self) -> Vec<Effect> {
        if matches!(
            self.state,
            ConnectionState::Disconnected | ConnectionState::Failed
        ) {
            // Already down; nothing new to report.
            return Vec::new();
        }
        self.attempts += 1;
        if self.attempts < self.max_attempts {
            self.state = ConnectionState::Disconnected;
            vec![
                Effect::NotifyClosed,
                Effect::ScheduleReconnect {
                    delay: self.reconnect_delay,
                    epoch: self.epoch,
                },
            ]
        } else {
            self.state = ConnectionState::Failed;
            vec![Effect::NotifyClosed, Effect::NotifyFailed]
        }
    }
}
