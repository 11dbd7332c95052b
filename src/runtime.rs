use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

/// Unified event type consumed by whatever drives a `Player`. Frontends
/// translate raw pointer/keyboard input into these; the engine never sees
/// anything lower-level.
#[derive(Clone, Debug, PartialEq)]
pub enum PlayerEvent {
    Click { x: f64, y: f64 },
    Input { box_id: String, text: String },
    Advance,
    Retreat,
    Tick,
}

/// Source of player events (clicks, typed answers, navigation).
pub trait PlayerEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<PlayerEvent, RecvTimeoutError>;
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Channel-backed event source, used by headless tests and the replay driver.
pub struct ChannelEventSource {
    rx: Receiver<PlayerEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<PlayerEvent>) -> Self {
        Self { rx }
    }
}

impl PlayerEventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<PlayerEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the session one event/tick at a time
pub struct Runner<E: PlayerEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: PlayerEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> PlayerEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                PlayerEvent::Tick
            }
        }
    }
}
