use crate::errors::SubmitError;
use crate::events::EventBuffer;
use crate::types::{EventCursor, RuntimeEvent, SessionStatus};
use sim_core::{CommandEnvelope, Game, Tick};
use sim_host::SessionHost;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Internal state of a hosted session.
pub struct SessionInner<G: Game> {
    pub host: SessionHost<G>,
    pub events: EventBuffer<G::Event>,
    pub status: SessionStatus,
}

/// Thread-safe handle to a session driven by a tick loop.
///
/// Clones share the same underlying session, so one clone can sit in the
/// tick loop while others submit commands and poll state.
pub struct SessionHandle<G: Game> {
    inner: Arc<Mutex<SessionInner<G>>>,
    shutdown: Arc<AtomicBool>,
    tick_hz: u32,
}

impl<G: Game> Clone for SessionHandle<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            shutdown: Arc::clone(&self.shutdown),
            tick_hz: self.tick_hz,
        }
    }
}

impl<G: Game> SessionHandle<G> {
    pub fn new(host: SessionHost<G>, event_buffer_capacity: usize) -> Self {
        let tick_hz = host.tick_hz();
        Self {
            inner: Arc::new(Mutex::new(SessionInner {
                host,
                events: EventBuffer::new(event_buffer_capacity),
                status: SessionStatus::Running,
            })),
            shutdown: Arc::new(AtomicBool::new(false)),
            tick_hz,
        }
    }

    pub fn tick_hz(&self) -> u32 {
        self.tick_hz
    }

    pub fn should_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Submit a command for a future tick.
    /// Returns the tick the command will actually run on; past ticks are
    /// moved to the next tick.
    pub async fn submit(
        &self,
        command: G::Command,
        intended_tick: Tick,
    ) -> Result<Tick, SubmitError> {
        let mut inner = self.inner.lock().await;

        match inner.status {
            SessionStatus::Running => {}
            SessionStatus::Finished(_) => return Err(SubmitError::Finished),
            SessionStatus::Stopped => return Err(SubmitError::Stopped),
        }

        let scheduled_tick = inner.host.submit(CommandEnvelope {
            intended_tick,
            payload: command,
        });

        Ok(scheduled_tick)
    }

    /// Get the current observation.
    pub async fn observe(&self) -> G::Observation {
        let inner = self.inner.lock().await;
        let tick = inner.host.current_tick();
        inner.host.game().observe(tick)
    }

    /// Poll events from the given cursor.
    pub async fn poll_events(
        &self,
        cursor: EventCursor,
    ) -> (Vec<RuntimeEvent<G::Event>>, EventCursor) {
        let inner = self.inner.lock().await;
        inner.events.get_from_cursor(cursor)
    }

    /// Get the current tick.
    pub async fn current_tick(&self) -> Tick {
        let inner = self.inner.lock().await;
        inner.host.current_tick()
    }

    /// Get the current session status.
    pub async fn status(&self) -> SessionStatus {
        let inner = self.inner.lock().await;
        inner.status
    }

    /// Step one tick and record its events.
    /// Returns true once the session is no longer running.
    pub async fn step_one_tick(&self) -> bool {
        let mut inner = self.inner.lock().await;

        if inner.status != SessionStatus::Running {
            return true;
        }

        if let Some(events) = inner.host.step_one_tick() {
            let tick = inner.host.current_tick();
            for event in events {
                inner.events.push(tick, event);
            }
        }

        if let Some(outcome) = inner.host.is_terminal() {
            inner.status = SessionStatus::Finished(outcome);
            return true;
        }

        false
    }

    /// Stop the session and shut down its tick loop.
    pub async fn stop(&self) {
        let mut inner = self.inner.lock().await;
        if inner.status == SessionStatus::Running {
            inner.status = SessionStatus::Stopped;
        }
        drop(inner);
        self.request_shutdown();
    }
}
