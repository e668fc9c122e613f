use sim_core::{TerminalOutcome, Tick};

/// Tracks position in an event stream for cursor-based retrieval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct EventCursor(pub u64);

/// Lifecycle of a hosted session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    Finished(TerminalOutcome),
    Stopped,
}

/// An event from the runtime with a sequence number for cursor tracking.
#[derive(Clone, Debug)]
pub struct RuntimeEvent<E> {
    pub sequence: u64,
    pub tick: Tick,
    pub event: E,
}

/// Configuration for the session runtime.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Tick rate the loop drives the session at (ticks per second).
    pub tick_hz: u32,
    /// Capacity of the per-session event buffer.
    pub event_buffer_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60,
            event_buffer_capacity: 1024,
        }
    }
}
