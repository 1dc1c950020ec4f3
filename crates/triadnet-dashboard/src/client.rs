//! WebSocket driver for a dashboard session.
//!
//! Owns the single connection. The lifecycle policy lives in
//! [`Session`](crate::session::Session); this module executes its effects
//! with tokio + tungstenite and fans events out to observers. At most one
//! live transport exists per [`DashboardClient`].

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::{Notify, broadcast, mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use triadnet_proto::{Command, ConnectionState};

use crate::config::DashboardConfig;
use crate::poller::Poller;
use crate::session::{Effect, Event, Session};

/// Why a command was not transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendError {
    /// Not connected. The command is dropped, never queued.
    #[error("not connected")]
    NotConnected,
    /// The session driver has shut down.
    #[error("session closed")]
    Closed,
}

/// Anything that can push a command toward the node.
pub trait CommandSink {
    /// Best-effort send: hand the command to the transport only while
    /// connected, otherwise drop it and report why.
    fn send_command(&self, command: Command) -> Result<(), SendError>;
}

/// Lifecycle and data events observed on a session.
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    /// Connection established.
    Opened,
    /// Connection lost; a reconnect may follow.
    Closed,
    /// Retry budget exhausted; no further automatic attempts.
    Failed,
    /// One inbound text frame, undecoded.
    Message(String),
}

/// Teardown signal shared between handles and the driver.
#[derive(Clone)]
struct CloseSignal {
    flag: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CloseSignal {
    fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
        }
    }

    fn trigger(&self) {
        self.flag.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_set() {
                return;
            }
            notified.await;
        }
    }
}

/// Cloneable handle to a running session.
#[derive(Clone)]
pub struct DashboardHandle {
    outbound: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<ConnectionState>,
    close: CloseSignal,
}

impl DashboardHandle {
    /// Current lifecycle state (read-only).
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// Request explicit teardown; suppresses automatic reconnection.
    pub fn close(&self) {
        self.close.trigger();
    }
}

impl CommandSink for DashboardHandle {
    fn send_command(&self, command: Command) -> Result<(), SendError> {
        if !self.is_connected() {
            tracing::debug!("not connected; dropping outbound command");
            return Err(SendError::NotConnected);
        }
        self.outbound.send(command).map_err(|_| SendError::Closed)
    }
}

/// A live dashboard session: driver task plus the internal poll scheduler.
pub struct DashboardClient {
    handle: DashboardHandle,
    events: broadcast::Sender<DashboardEvent>,
    driver: tokio::task::JoinHandle<()>,
    scheduler: tokio::task::JoinHandle<()>,
}

impl DashboardClient {
    /// Spawn the session driver. Must be called within a tokio runtime.
    ///
    /// The driver dials immediately and keeps the session alive per the
    /// config's retry policy. Polling is armed on every open and disarmed on
    /// every close.
    pub fn spawn(config: DashboardConfig) -> Self {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let (event_tx, _) = broadcast::channel(64);
        let close = CloseSignal::new();

        let handle = DashboardHandle {
            outbound: outbound_tx,
            state: state_rx,
            close: close.clone(),
        };

        let scheduler = tokio::spawn(schedule_polling(
            config.poll_interval,
            event_tx.subscribe(),
            handle.clone(),
        ));
        let driver = tokio::spawn(drive(
            config,
            outbound_rx,
            state_tx,
            event_tx.clone(),
            close,
        ));

        Self {
            handle,
            events: event_tx,
            driver,
            scheduler,
        }
    }

    /// Handle for sending commands and observing state.
    pub fn handle(&self) -> DashboardHandle {
        self.handle.clone()
    }

    /// Subscribe to lifecycle and message events.
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    pub fn state(&self) -> ConnectionState {
        self.handle.state()
    }

    pub fn is_connected(&self) -> bool {
        self.handle.is_connected()
    }

    /// Request teardown without waiting for it to finish.
    pub fn close(&self) {
        self.handle.close();
    }

    /// Tear the session down and wait for its tasks to finish.
    pub async fn shutdown(self) {
        let Self {
            handle,
            events,
            driver,
            scheduler,
        } = self;
        handle.close();
        let _ = driver.await;
        // Dropping the last event sender lets the scheduler task drain out.
        drop(events);
        drop(handle);
        let _ = scheduler.await;
    }
}

impl CommandSink for DashboardClient {
    fn send_command(&self, command: Command) -> Result<(), SendError> {
        self.handle.send_command(command)
    }
}

/// Arm the poller on open, disarm it on close; runs until the driver and all
/// client handles are gone.
async fn schedule_polling(
    interval: Duration,
    mut events: broadcast::Receiver<DashboardEvent>,
    handle: DashboardHandle,
) {
    let mut poller = Poller::new(interval);
    loop {
        match events.recv().await {
            Ok(DashboardEvent::Opened) => poller.start(handle.clone()),
            Ok(DashboardEvent::Closed) | Ok(DashboardEvent::Failed) => poller.stop(),
            Ok(DashboardEvent::Message(_)) => {}
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    poller.stop();
}

/// The driver loop: execute the session machine's effects until it goes
/// terminal (explicit close or exhausted retries).
async fn drive(
    config: DashboardConfig,
    mut outbound: mpsc::UnboundedReceiver<Command>,
    state: watch::Sender<ConnectionState>,
    events: broadcast::Sender<DashboardEvent>,
    close: CloseSignal,
) {
    let endpoint = config.endpoint();
    let mut session = Session::new(config.max_reconnect_attempts, config.reconnect_delay);
    let mut pending: VecDeque<Effect> = session.open().into();

    while let Some(effect) = pending.pop_front() {
        match effect {
            Effect::Connect => {
                // Delivery is send-if-open, never queue-and-replay: a command
                // accepted just before the previous connection died must not
                // surface on this one.
                while outbound.try_recv().is_ok() {}
                let _ = state.send(ConnectionState::Connecting);
                let attempt = tokio::select! {
                    result = connect_async(endpoint.as_str()) => Some(result),
                    _ = close.wait() => None,
                };
                let followups = match attempt {
                    Some(Ok((ws, _))) => {
                        tracing::info!("connected to {}", endpoint);
                        for effect in session.handle(Event::Opened) {
                            if effect == Effect::NotifyOpened {
                                let _ = state.send(ConnectionState::Connected);
                                let _ = events.send(DashboardEvent::Opened);
                            }
                        }
                        let cause = run_connected(ws, &mut outbound, &events, &close).await;
                        session.handle(cause)
                    }
                    Some(Err(e)) => {
                        tracing::warn!("connect to {} failed: {}", endpoint, e);
                        session.handle(Event::Errored)
                    }
                    None => session.handle(Event::CloseRequested),
                };
                let _ = state.send(session.state());
                pending.extend(followups);
            }
            Effect::ScheduleReconnect { delay, epoch } => {
                let due = tokio::select! {
                    _ = tokio::time::sleep(delay) => Event::ReconnectDue { epoch },
                    _ = close.wait() => Event::CloseRequested,
                };
                let followups = session.handle(due);
                let _ = state.send(session.state());
                pending.extend(followups);
            }
            Effect::NotifyOpened => {
                // Handled inline on connect so observers never see Opened
                // before the state reads Connected.
            }
            Effect::NotifyClosed => {
                let _ = events.send(DashboardEvent::Closed);
            }
            Effect::NotifyFailed => {
                tracing::warn!("reconnect budget exhausted; session parked");
                let _ = events.send(DashboardEvent::Failed);
            }
        }
    }
    tracing::debug!("session driver finished");
}

/// Pump one live connection: outbound commands to the sink, inbound text
/// frames to observers. Returns the event that ended it.
async fn run_connected(
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    outbound: &mut mpsc::UnboundedReceiver<Command>,
    events: &broadcast::Sender<DashboardEvent>,
    close: &CloseSignal,
) -> Event {
    let (mut sink, mut stream) = ws.split();
    loop {
        tokio::select! {
            command = outbound.recv() => {
                let Some(command) = command else {
                    // Every handle is gone; treat as an explicit close.
                    let _ = sink.send(Message::Close(None)).await;
                    return Event::CloseRequested;
                };
                let frame = command.to_frame();
                if let Err(e) = sink.send(Message::Text(frame.into())).await {
                    tracing::warn!("send failed: {}", e);
                    return Event::Errored;
                }
            }
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let _ = events.send(DashboardEvent::Message(text.to_string()));
                    }
                    Some(Ok(Message::Close(_))) | None => return Event::Closed,
                    Some(Ok(_)) => {} // ping/pong/binary: nothing for us
                    Some(Err(e)) => {
                        tracing::warn!("websocket error: {}", e);
                        return Event::Errored;
                    }
                }
            }
            _ = close.wait() => {
                let _ = sink.send(Message::Close(None)).await;
                return Event::CloseRequested;
            }
        }
    }
}
