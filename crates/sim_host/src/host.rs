use sim_core::{CommandEnvelope, Game, TerminalOutcome, Tick};
use std::collections::BTreeMap;

pub struct RunResult<G: Game> {
    pub outcome: Option<TerminalOutcome>,
    pub final_tick: Tick,
    pub events: Vec<G::Event>,
}

/// Synchronous driver for a single game session.
///
/// Owns the game and the pending command queue; advances the simulation
/// one tick at a time. Commands within a tick run in submission order.
pub struct SessionHost<G: Game> {
    game: G,
    current_tick: Tick,
    tick_hz: u32,
    pending_commands: BTreeMap<Tick, Vec<CommandEnvelope<G::Command>>>,
}

impl<G: Game> SessionHost<G> {
    pub fn new(config: G::Config, seed: u64, tick_hz: u32) -> Self {
        Self {
            game: G::new(config, seed),
            current_tick: 0,
            tick_hz,
            pending_commands: BTreeMap::new(),
        }
    }

    /// Submit a command to be executed at the given tick.
    /// If `intended_tick` is in the past, schedules for the next tick.
    /// Returns the actual tick the command was scheduled for.
    pub fn submit(&mut self, mut command: CommandEnvelope<G::Command>) -> Tick {
        // If intended tick is in the past or current, schedule for next tick
        let scheduled_tick = if command.intended_tick <= self.current_tick {
            self.current_tick + 1
        } else {
            command.intended_tick
        };

        command.intended_tick = scheduled_tick;
        self.pending_commands
            .entry(scheduled_tick)
            .or_default()
            .push(command);

        scheduled_tick
    }

    /// Submit a command for the next tick.
    pub fn submit_now(&mut self, payload: G::Command) -> Tick {
        self.submit(CommandEnvelope {
            intended_tick: self.current_tick,
            payload,
        })
    }

    pub fn run_for_ticks(&mut self, max_ticks: Tick) -> RunResult<G> {
        let mut all_events = Vec::new();

        for _ in 0..max_ticks {
            // Check terminal before advancing
            if let Some(outcome) = self.game.is_terminal() {
                return RunResult {
                    outcome: Some(outcome),
                    final_tick: self.current_tick,
                    events: all_events,
                };
            }

            // Increment tick
            self.current_tick += 1;

            // Extract commands for this tick (submission order)
            let commands = self
                .pending_commands
                .remove(&self.current_tick)
                .unwrap_or_default();

            // Step the game
            let mut tick_events = Vec::new();
            self.game
                .step(self.current_tick, &commands, &mut tick_events);
            all_events.extend(tick_events);
        }

        // Check terminal one final time
        let outcome = self.game.is_terminal();
        RunResult {
            outcome,
            final_tick: self.current_tick,
            events: all_events,
        }
    }

    /// Advance by one tick. Returns None if game already terminal, otherwise the events from this tick.
    pub fn step_one_tick(&mut self) -> Option<Vec<G::Event>> {
        // Check terminal before advancing
        if self.game.is_terminal().is_some() {
            return None;
        }

        // Increment tick
        self.current_tick += 1;

        // Extract commands for this tick (submission order)
        let commands = self
            .pending_commands
            .remove(&self.current_tick)
            .unwrap_or_default();

        // Step the game
        let mut tick_events = Vec::new();
        self.game
            .step(self.current_tick, &commands, &mut tick_events);

        Some(tick_events)
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    pub fn tick_hz(&self) -> u32 {
        self.tick_hz
    }

    pub fn is_terminal(&self) -> Option<TerminalOutcome> {
        self.game.is_terminal()
    }
}
