use crate::session::SessionHandle;
use sim_core::Game;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

/// Drive a session in real time until it finishes or is stopped.
pub async fn run_session_loop<G: Game + Send + 'static>(handle: SessionHandle<G>) {
    let tick_duration = Duration::from_secs_f64(1.0 / handle.tick_hz() as f64);

    let mut interval = interval(tick_duration);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        if handle.should_shutdown() {
            break;
        }

        let finished = handle.step_one_tick().await;

        if finished {
            break;
        }
    }
}

/// Spawn a session loop as a tokio task.
/// Returns a JoinHandle that can be used to wait for the loop to finish.
pub fn spawn_session_loop<G: Game + Send + 'static>(
    handle: SessionHandle<G>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(run_session_loop(handle))
}
