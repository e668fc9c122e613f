use crate::config::{Difficulty, TowerKind};
use crate::world::{CellIndex, CwState, DropId, SessionPhase, WavePhase};
use serde::{Deserialize, Serialize};
use sim_core::{TerminalOutcome, Tick};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObsPhase {
    NotStarted,
    Running,
    Victory,
    Defeat,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObsTower {
    pub cell: CellIndex,
    pub kind: TowerKind,
    pub level: u32,
    pub power: f64,
    pub range: u16,
    pub slow: f64,
    pub upgrade_cost: u32,
    pub targeting: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObsDrop {
    pub id: DropId,
    pub cell: CellIndex,
    pub path_index: usize,
    pub hp: f64,
    pub max_hp: f64,
    pub cleaned: bool,
    pub damaged: bool,
    pub targeted: bool,
    pub recently_hit: bool,
}

/// Full presentation-facing snapshot. Everything a renderer needs to draw
/// a frame without reaching into simulation state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CwObservation {
    pub tick: Tick,
    pub ticks_per_second: u32,
    pub phase: ObsPhase,
    pub difficulty: Difficulty,

    pub rows: u16,
    pub cols: u16,
    pub path: Vec<CellIndex>,

    pub wave: u32,
    pub wave_target: u32,
    pub score: u32,
    pub coins: u32,
    pub health: u32,
    pub polluted: u32,
    pub polluted_limit: u32,

    pub timer_seconds: u32,
    pub wave_time_limit_secs: u32,

    pub auto_advance: bool,
    pub spawning: bool,
    /// True when a manual wave start would be honored.
    pub can_start_wave: bool,
    pub at_checkpoint: bool,

    pub selected_tower: Option<TowerKind>,
    pub basic_cost: u32,
    pub slow_cost: u32,

    pub towers: Vec<ObsTower>,
    pub drops: Vec<ObsDrop>,
}

pub fn build_observation(state: &CwState, tick: Tick) -> CwObservation {
    let config = &state.config;

    let phase = match state.phase {
        SessionPhase::NotStarted => ObsPhase::NotStarted,
        SessionPhase::Running => ObsPhase::Running,
        SessionPhase::Ended(TerminalOutcome::Victory) => ObsPhase::Victory,
        SessionPhase::Ended(TerminalOutcome::Defeat) => ObsPhase::Defeat,
    };

    CwObservation {
        tick,
        ticks_per_second: config.tick_hz,
        phase,
        difficulty: state.difficulty,

        rows: config.rows,
        cols: config.cols,
        path: state.world.path.clone(),

        wave: state.wave,
        wave_target: state.wave_target,
        score: state.score,
        coins: state.coins,
        health: state.health,
        polluted: state.polluted,
        polluted_limit: state.polluted_limit,

        timer_seconds: state.timer_seconds,
        wave_time_limit_secs: state.wave_time_limit_secs,

        auto_advance: state.auto_advance,
        spawning: matches!(state.wave_phase, WavePhase::Spawning { .. }),
        can_start_wave: state.phase == SessionPhase::Running
            && matches!(
                state.wave_phase,
                WavePhase::AwaitingNext | WavePhase::Checkpoint
            ),
        at_checkpoint: state.wave_phase == WavePhase::Checkpoint,

        selected_tower: state.selected_tower,
        basic_cost: config.basic_spec.cost,
        slow_cost: config.slow_spec.cost,

        towers: state
            .world
            .towers
            .values()
            .map(|t| ObsTower {
                cell: t.cell,
                kind: t.kind,
                level: t.level,
                power: t.power,
                range: t.range,
                slow: t.slow,
                upgrade_cost: config.upgrade_cost(t.level),
                targeting: t.targeting,
            })
            .collect(),
        drops: state
            .world
            .drops
            .iter()
            .map(|d| ObsDrop {
                id: d.id,
                cell: state.world.path[d.path_index],
                path_index: d.path_index,
                hp: d.hp,
                max_hp: d.max_hp,
                cleaned: d.cleaned,
                damaged: !d.cleaned && d.hp < d.max_hp,
                targeted: d.targeted,
                recently_hit: d.recently_hit,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CwConfig;

    #[test]
    fn observation_serializes_round_trip() {
        let state = CwState::new(CwConfig::default());
        let obs = build_observation(&state, 0);
        assert_eq!(obs.phase, ObsPhase::NotStarted);
        assert_eq!(obs.rows, 9);
        assert_eq!(obs.path.len(), 15);
        assert_eq!(obs.coins, 10);

        let json = serde_json::to_string(&obs).unwrap();
        let back: CwObservation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, obs);
    }

    #[test]
    fn difficulty_serializes_snake_case() {
        let json = serde_json::to_string(&Difficulty::Hard).unwrap();
        assert_eq!(json, "\"hard\"");
        let json = serde_json::to_string(&TowerKind::Slow).unwrap();
        assert_eq!(json, "\"slow\"");
    }
}
