use crate::commands::CwCommand;
use crate::config::CwConfig;
use crate::events::CwEvent;
use crate::observe;
use crate::systems;
use crate::world::{CwState, SessionPhase};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use sim_core::{CommandEnvelope, Game, TerminalOutcome, Tick};

pub struct CleanwaterGame {
    state: CwState,
    rng: SmallRng,
}

impl CleanwaterGame {
    pub fn state(&self) -> &CwState {
        &self.state
    }
}

fn apply_command(state: &mut CwState, command: &CwCommand, tick: Tick, events: &mut Vec<CwEvent>) {
    let running = state.phase == SessionPhase::Running;
    match *command {
        CwCommand::SelectDifficulty(difficulty) => {
            if state.phase == SessionPhase::NotStarted {
                state.difficulty = difficulty;
                state.apply_difficulty();
            }
        }
        CwCommand::SelectTower(kind) => {
            if running {
                state.selected_tower = Some(kind);
            }
        }
        CwCommand::PlaceOrUpgrade { cell } => {
            if running {
                systems::place_or_upgrade(state, cell, events);
            }
        }
        CwCommand::DismissDrop { id } => {
            if running {
                systems::dismiss_drop(state, id, events);
                systems::check_milestones(state, events);
            }
        }
        CwCommand::Cheer => {
            if running {
                state.score += state.config.cheer_score;
                systems::check_milestones(state, events);
            }
        }
        CwCommand::StartGame => {
            if state.phase == SessionPhase::NotStarted {
                systems::start_session(state, tick, events);
            }
        }
        CwCommand::StartNextWave => {
            if running {
                systems::request_next_wave(state, tick, events);
            }
        }
        CwCommand::ToggleAutoAdvance => {
            state.auto_advance = !state.auto_advance;
        }
        CwCommand::ResetGame => {
            systems::reset_session(state);
        }
    }
}

impl Game for CleanwaterGame {
    type Config = CwConfig;
    type Command = CwCommand;
    type Observation = observe::CwObservation;
    type Event = CwEvent;

    fn new(config: Self::Config, seed: u64) -> Self {
        Self {
            state: CwState::new(config),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    fn step(
        &mut self,
        tick: Tick,
        commands: &[CommandEnvelope<Self::Command>],
        out_events: &mut Vec<Self::Event>,
    ) {
        self.state.tick = tick;

        // 1. Apply commands
        for command in commands {
            apply_command(&mut self.state, &command.payload, tick, out_events);
        }

        if self.state.phase != SessionPhase::Running {
            return;
        }

        // 2. Wave lifecycle: due spawns, queued wave starts, countdown
        systems::update_wave(&mut self.state, tick, out_events);

        // 3. Combat and movement at the step cadence
        if self.state.phase == SessionPhase::Running && tick >= self.state.next_step_tick {
            let step_ticks = self
                .state
                .config
                .duration_to_ticks(self.state.config.step_period);
            self.state.next_step_tick = tick + step_ticks;

            systems::tower_attacks(&mut self.state, out_events);
            systems::move_drops(&mut self.state, &mut self.rng, out_events);

            // 4. Wave completion (skipped if the session just ended)
            if self.state.phase == SessionPhase::Running {
                systems::check_wave_complete(&mut self.state, tick, out_events);
            }
        }
    }

    fn observe(&self, tick: Tick) -> Self::Observation {
        observe::build_observation(&self.state, tick)
    }

    fn is_terminal(&self) -> Option<TerminalOutcome> {
        match self.state.phase {
            SessionPhase::Ended(outcome) => Some(outcome),
            _ => None,
        }
    }
}
