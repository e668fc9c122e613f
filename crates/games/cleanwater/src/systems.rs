use crate::config::TowerKind;
use crate::events::{CwEvent, PlacementRejection, UpgradeRejection};
use crate::world::{
    CellIndex, CellKind, CwState, Drop, DropId, SessionPhase, Tower, TowerId, WavePhase, World,
};
use rand::rngs::SmallRng;
use rand::Rng;
use sim_core::{TerminalOutcome, Tick};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Grid-click dispatch: path cells reject, tower cells upgrade, empty
/// cells place the currently selected tower.
pub fn place_or_upgrade(state: &mut CwState, cell: CellIndex, events: &mut Vec<CwEvent>) {
    if !state.world.grid.in_bounds(cell) {
        return;
    }
    match state.world.grid.get(cell) {
        CellKind::Path => {
            events.push(CwEvent::PlacementRejected {
                cell,
                reason: PlacementRejection::OnPath,
            });
        }
        CellKind::Tower(_) => {
            try_upgrade_tower(state, cell, events);
        }
        CellKind::Empty => {
            let Some(kind) = state.selected_tower else {
                events.push(CwEvent::PlacementRejected {
                    cell,
                    reason: PlacementRejection::NoTowerSelected,
                });
                return;
            };
            try_place_tower(state, cell, kind, events);
        }
    }
}

pub fn try_place_tower(
    state: &mut CwState,
    cell: CellIndex,
    kind: TowerKind,
    events: &mut Vec<CwEvent>,
) -> bool {
    if !state.world.grid.in_bounds(cell) {
        return false;
    }
    match state.world.grid.get(cell) {
        CellKind::Path => {
            events.push(CwEvent::PlacementRejected {
                cell,
                reason: PlacementRejection::OnPath,
            });
            return false;
        }
        CellKind::Tower(_) => {
            events.push(CwEvent::PlacementRejected {
                cell,
                reason: PlacementRejection::Occupied,
            });
            return false;
        }
        CellKind::Empty => {}
    }

    let spec = *state.config.spec(kind);
    if state.coins < spec.cost {
        events.push(CwEvent::PlacementRejected {
            cell,
            reason: PlacementRejection::NotEnoughCoins,
        });
        return false;
    }

    state.coins -= spec.cost;
    let id = state.world.towers.insert(Tower {
        cell,
        kind,
        level: 1,
        power: spec.power,
        range: spec.range,
        slow: spec.slow,
        targeting: false,
    });
    state.world.grid.set(cell, CellKind::Tower(id));
    events.push(CwEvent::TowerPlaced { cell, kind });
    true
}

pub fn try_upgrade_tower(state: &mut CwState, cell: CellIndex, events: &mut Vec<CwEvent>) -> bool {
    if !state.world.grid.in_bounds(cell) {
        return false;
    }
    let CellKind::Tower(id) = state.world.grid.get(cell) else {
        events.push(CwEvent::UpgradeRejected {
            cell,
            reason: UpgradeRejection::NoTower,
        });
        return false;
    };

    // Cost scales with the level being upgraded from.
    let cost = state.config.upgrade_cost(state.world.towers[id].level);
    if state.coins < cost {
        events.push(CwEvent::UpgradeRejected {
            cell,
            reason: UpgradeRejection::NotEnoughCoins,
        });
        return false;
    }

    state.coins -= cost;
    let step = state.config.upgrade_power_step;
    let tower = &mut state.world.towers[id];
    tower.level += 1;
    tower.power = round2(tower.power + step);
    let (level, power) = (tower.level, tower.power);
    events.push(CwEvent::TowerUpgraded { cell, level, power });
    true
}

/// Manually clean a drop. The drop is removed either way; the reward is
/// only paid if it had not been cleaned yet.
pub fn dismiss_drop(state: &mut CwState, id: DropId, events: &mut Vec<CwEvent>) {
    let Some(pos) = state.world.drops.iter().position(|d| d.id == id) else {
        return;
    };
    if !state.world.drops[pos].cleaned {
        state.score += state.config.dismiss_score;
        state.coins += state.config.dismiss_coins;
        events.push(CwEvent::DropCleaned {
            id,
            dismissed: true,
        });
    }
    state.world.drops.remove(pos);
}

/// One combat step: every tower picks at most one target and attacks it.
///
/// Target selection scans drops in spawn order and takes the first
/// uncleaned one within Manhattan range, not the nearest.
pub fn tower_attacks(state: &mut CwState, events: &mut Vec<CwEvent>) {
    for drop in &mut state.world.drops {
        drop.targeted = false;
        drop.recently_hit = false;
    }

    // Collect ids up front (can't iterate and mutate simultaneously)
    let tower_ids: Vec<TowerId> = state.world.towers.keys().collect();
    for tower_id in tower_ids {
        state.world.towers[tower_id].targeting = false;
        let (cell, range, power, slow) = {
            let tower = &state.world.towers[tower_id];
            (tower.cell, tower.range, tower.power, tower.slow)
        };

        let Some(target) = find_target(&state.world, cell, range) else {
            continue;
        };

        state.world.towers[tower_id].targeting = true;
        let drop = &mut state.world.drops[target];
        drop.targeted = true;
        drop.recently_hit = true;
        drop.hp -= power;
        if slow > 0.0 {
            drop.slow_stacks += slow;
        }
        if drop.hp <= 0.0 && !drop.cleaned {
            drop.cleaned = true;
            drop.hp = 0.0;
            let id = drop.id;
            state.score += state.config.clean_score;
            state.coins += state.config.clean_coins;
            events.push(CwEvent::DropCleaned {
                id,
                dismissed: false,
            });
        }
    }

    check_milestones(state, events);
}

fn find_target(world: &World, tower_cell: CellIndex, range: u16) -> Option<usize> {
    world.drops.iter().position(|drop| {
        !drop.cleaned && world.grid.distance(tower_cell, world.path[drop.path_index]) <= range
    })
}

/// One movement step. Slowed drops hold position half the time, shedding
/// a stack; everything else advances one path cell. Drops that walk off
/// the end either vanish quietly (cleaned) or pollute the village.
pub fn move_drops(state: &mut CwState, rng: &mut SmallRng, events: &mut Vec<CwEvent>) {
    let path_len = state.world.path.len();
    let mut i = 0;
    while i < state.world.drops.len() {
        if state.world.drops[i].slow_stacks > 0.0 && rng.gen_bool(0.5) {
            let drop = &mut state.world.drops[i];
            drop.slow_stacks = (drop.slow_stacks - 1.0).max(0.0);
            i += 1;
            continue;
        }

        state.world.drops[i].path_index += 1;
        if state.world.drops[i].path_index < path_len {
            i += 1;
            continue;
        }

        let drop = state.world.drops.remove(i);
        if !drop.cleaned {
            state.polluted += 1;
            state.health = state.health.saturating_sub(state.config.leak_damage);
            events.push(CwEvent::DropLeaked { id: drop.id });
            if state.health == 0 {
                // Remaining drops this step are abandoned where they stand.
                end_session(state, TerminalOutcome::Defeat, events);
                return;
            }
        }
    }

    if state.polluted >= state.polluted_limit {
        end_session(state, TerminalOutcome::Defeat, events);
    }
}

pub fn end_session(state: &mut CwState, outcome: TerminalOutcome, events: &mut Vec<CwEvent>) {
    state.phase = SessionPhase::Ended(outcome);
    state.wave_phase = WavePhase::Idle;
    events.push(CwEvent::GameEnded {
        outcome,
        wave: state.wave,
        score: state.score,
    });
}

pub fn start_wave(state: &mut CwState, tick: Tick, events: &mut Vec<CwEvent>) {
    state.wave += 1;
    let count = state.config.wave_spawn_count(state.wave);
    let interval = state.config.wave_spawn_interval(state.wave, state.spawn_speed);
    let interval_ticks = state.config.duration_to_ticks(interval);
    state.wave_phase = WavePhase::Spawning {
        spawned: 0,
        count,
        interval_ticks,
        // First drop arrives one full interval after the wave starts.
        next_spawn_tick: tick + interval_ticks,
    };
    state.timer_seconds = 0;
    state.next_timer_tick = tick + state.config.tick_hz as u64;
    events.push(CwEvent::WaveStarted {
        wave: state.wave,
        count,
    });
}

/// Advance the wave machine: due spawns, due queued wave starts, and the
/// once-per-second countdown.
pub fn update_wave(state: &mut CwState, tick: Tick, events: &mut Vec<CwEvent>) {
    match &mut state.wave_phase {
        WavePhase::Spawning {
            spawned,
            count,
            interval_ticks,
            next_spawn_tick,
        } => {
            if tick >= *next_spawn_tick && *spawned < *count {
                *spawned += 1;
                *next_spawn_tick = tick + *interval_ticks;
                let done = *spawned >= *count;

                let hp = state.config.drop_hp(state.wave);
                let id = state.world.alloc_drop_id();
                state.world.drops.push(Drop {
                    id,
                    path_index: 0,
                    hp,
                    max_hp: hp,
                    cleaned: false,
                    slow_stacks: 0.0,
                    targeted: false,
                    recently_hit: false,
                });
                events.push(CwEvent::DropSpawned { id, hp });

                if done {
                    state.wave_phase = WavePhase::Draining;
                }
            }
        }
        WavePhase::NextWaveQueued { start_tick } => {
            if tick >= *start_tick {
                start_wave(state, tick, events);
            }
        }
        _ => {}
    }

    run_wave_timer(state, tick, events);
}

/// Per-wave countdown, ticking only while a wave is in flight. Hitting
/// the limit costs health and restarts the count.
fn run_wave_timer(state: &mut CwState, tick: Tick, events: &mut Vec<CwEvent>) {
    if !matches!(
        state.wave_phase,
        WavePhase::Spawning { .. } | WavePhase::Draining
    ) {
        return;
    }
    if tick < state.next_timer_tick {
        return;
    }
    state.next_timer_tick = tick + state.config.tick_hz as u64;
    state.timer_seconds += 1;

    if state.timer_seconds >= state.wave_time_limit_secs {
        state.timer_seconds = 0;
        state.health = state.health.saturating_sub(state.config.time_penalty);
        events.push(CwEvent::WaveTimePenalty {
            wave: state.wave,
            health: state.health,
        });
        if state.health == 0 {
            end_session(state, TerminalOutcome::Defeat, events);
        }
    }
}

/// Wave completion, checked at the combat cadence: all drops spawned and
/// the field empty. Checkpoint takes precedence over victory; otherwise
/// the next wave auto-queues or waits for a manual start.
pub fn check_wave_complete(state: &mut CwState, tick: Tick, events: &mut Vec<CwEvent>) {
    if state.wave_phase != WavePhase::Draining || !state.world.drops.is_empty() {
        return;
    }

    events.push(CwEvent::WaveCompleted { wave: state.wave });

    if state.wave == state.config.checkpoint_wave {
        state.wave_phase = WavePhase::Checkpoint;
        events.push(CwEvent::CheckpointReached { wave: state.wave });
        return;
    }

    if state.wave >= state.wave_target {
        end_session(state, TerminalOutcome::Victory, events);
        return;
    }

    if state.auto_advance {
        let delay = state.config.duration_to_ticks(state.config.next_wave_delay);
        state.wave_phase = WavePhase::NextWaveQueued {
            start_tick: tick + delay,
        };
    } else {
        state.wave_phase = WavePhase::AwaitingNext;
    }
}

/// Manual wave start. Immediate from `AwaitingNext`; from a checkpoint it
/// queues after the configured delay. A no-op in every other phase, so a
/// wave already queued cannot be started twice.
pub fn request_next_wave(state: &mut CwState, tick: Tick, events: &mut Vec<CwEvent>) {
    match state.wave_phase {
        WavePhase::AwaitingNext => start_wave(state, tick, events),
        WavePhase::Checkpoint => {
            let delay = state.config.duration_to_ticks(state.config.next_wave_delay);
            state.wave_phase = WavePhase::NextWaveQueued {
                start_tick: tick + delay,
            };
        }
        _ => {}
    }
}

pub fn start_session(state: &mut CwState, tick: Tick, events: &mut Vec<CwEvent>) {
    state.apply_difficulty();
    state.phase = SessionPhase::Running;
    let step_ticks = state.config.duration_to_ticks(state.config.step_period);
    state.next_step_tick = tick + step_ticks;
    events.push(CwEvent::SessionStarted {
        difficulty: state.difficulty,
    });
    start_wave(state, tick, events);
}

pub fn reset_session(state: &mut CwState) {
    state.phase = SessionPhase::NotStarted;
    state.apply_difficulty();
}

/// Award any newly crossed score milestone, once per session each.
pub fn check_milestones(state: &mut CwState, events: &mut Vec<CwEvent>) {
    for milestone in &state.config.milestones {
        if state.score >= milestone.score && state.achieved_milestones.insert(milestone.score) {
            state.coins += state.config.milestone_coins;
            events.push(CwEvent::MilestoneReached {
                score: milestone.score,
                title: milestone.title.clone(),
                message: milestone.message.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CwConfig;
    use rand::SeedableRng;

    fn running_state() -> CwState {
        let mut state = CwState::new(CwConfig::default());
        state.phase = SessionPhase::Running;
        state
    }

    fn push_drop(state: &mut CwState, path_index: usize, hp: f64) -> DropId {
        let id = state.world.alloc_drop_id();
        state.world.drops.push(Drop {
            id,
            path_index,
            hp,
            max_hp: hp,
            cleaned: false,
            slow_stacks: 0.0,
            targeted: false,
            recently_hit: false,
        });
        id
    }

    #[test]
    fn place_tower_deducts_coins_and_marks_grid() {
        let mut state = running_state();
        let mut events = Vec::new();
        let cell = state.world.grid.cell_at(3, 2);

        assert!(try_place_tower(&mut state, cell, TowerKind::Basic, &mut events));
        assert_eq!(state.coins, 0);
        assert!(matches!(state.world.grid.get(cell), CellKind::Tower(_)));
        assert_eq!(events, vec![CwEvent::TowerPlaced { cell, kind: TowerKind::Basic }]);
    }

    #[test]
    fn place_tower_rejects_path_and_occupied_and_poverty() {
        let mut state = running_state();
        state.coins = 25;
        let mut events = Vec::new();

        let path_cell = state.world.path[3];
        assert!(!try_place_tower(&mut state, path_cell, TowerKind::Basic, &mut events));
        assert_eq!(
            events.last(),
            Some(&CwEvent::PlacementRejected {
                cell: path_cell,
                reason: PlacementRejection::OnPath
            })
        );

        let cell = state.world.grid.cell_at(1, 1);
        assert!(try_place_tower(&mut state, cell, TowerKind::Basic, &mut events));
        assert!(!try_place_tower(&mut state, cell, TowerKind::Basic, &mut events));
        assert_eq!(
            events.last(),
            Some(&CwEvent::PlacementRejected {
                cell,
                reason: PlacementRejection::Occupied
            })
        );

        state.coins = 9;
        let other = state.world.grid.cell_at(2, 1);
        assert!(!try_place_tower(&mut state, other, TowerKind::Slow, &mut events));
        assert_eq!(
            events.last(),
            Some(&CwEvent::PlacementRejected {
                cell: other,
                reason: PlacementRejection::NotEnoughCoins
            })
        );
        assert_eq!(state.coins, 9);
    }

    #[test]
    fn out_of_bounds_click_is_ignored() {
        let mut state = running_state();
        let mut events = Vec::new();
        place_or_upgrade(&mut state, 9 * 15, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn upgrade_raises_level_and_power() {
        let mut state = running_state();
        state.coins = 30;
        let mut events = Vec::new();
        let cell = state.world.grid.cell_at(2, 4);

        try_place_tower(&mut state, cell, TowerKind::Slow, &mut events);
        assert!(try_upgrade_tower(&mut state, cell, &mut events));
        assert_eq!(
            events.last(),
            Some(&CwEvent::TowerUpgraded {
                cell,
                level: 2,
                power: 1.5
            })
        );
        // Level 1 -> 2 cost 5: 30 - 10 - 5
        assert_eq!(state.coins, 15);

        assert!(try_upgrade_tower(&mut state, cell, &mut events));
        assert_eq!(
            events.last(),
            Some(&CwEvent::TowerUpgraded {
                cell,
                level: 3,
                power: 2.5
            })
        );
        assert_eq!(state.coins, 5);

        // Level 3 -> 4 costs 15, only 5 left
        assert!(!try_upgrade_tower(&mut state, cell, &mut events));
        assert_eq!(
            events.last(),
            Some(&CwEvent::UpgradeRejected {
                cell,
                reason: UpgradeRejection::NotEnoughCoins
            })
        );
    }

    #[test]
    fn upgrade_requires_a_tower() {
        let mut state = running_state();
        let mut events = Vec::new();
        let cell = state.world.grid.cell_at(0, 0);
        assert!(!try_upgrade_tower(&mut state, cell, &mut events));
        assert_eq!(
            events.last(),
            Some(&CwEvent::UpgradeRejected {
                cell,
                reason: UpgradeRejection::NoTower
            })
        );
    }

    #[test]
    fn dismiss_rewards_once_and_always_removes() {
        let mut state = running_state();
        let mut events = Vec::new();
        let id = push_drop(&mut state, 2, 1.0);

        dismiss_drop(&mut state, id, &mut events);
        assert_eq!(state.score, 6);
        assert_eq!(state.coins, 13);
        assert!(state.world.drops.is_empty());
        assert_eq!(
            events,
            vec![CwEvent::DropCleaned {
                id,
                dismissed: true
            }]
        );

        // A cleaned drop is removed without a second reward.
        events.clear();
        let id = push_drop(&mut state, 2, 1.0);
        state.world.drops[0].cleaned = true;
        dismiss_drop(&mut state, id, &mut events);
        assert_eq!(state.score, 6);
        assert_eq!(state.coins, 13);
        assert!(state.world.drops.is_empty());
        assert!(events.is_empty());

        // Unknown ids are ignored.
        dismiss_drop(&mut state, DropId(999), &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn towers_attack_first_drop_in_spawn_order() {
        let mut state = running_state();
        state.coins = 100;
        let mut events = Vec::new();

        // Tower one row above path cell 5, range 2.
        let cell = state.world.grid.cell_at(3, 5);
        try_place_tower(&mut state, cell, TowerKind::Basic, &mut events);

        // Second drop is closer, but the first in spawn order wins.
        let first = push_drop(&mut state, 4, 3.0);
        let second = push_drop(&mut state, 5, 3.0);
        events.clear();

        tower_attacks(&mut state, &mut events);
        assert!(events.is_empty());

        let drops = &state.world.drops;
        assert_eq!(drops[0].id, first);
        assert_eq!(drops[0].hp, 2.0);
        assert!(drops[0].targeted && drops[0].recently_hit);
        assert_eq!(drops[1].id, second);
        assert_eq!(drops[1].hp, 3.0);
        assert!(!drops[1].targeted);
        assert!(state.world.towers.values().next().unwrap().targeting);
    }

    #[test]
    fn drops_out_of_range_are_left_alone() {
        let mut state = running_state();
        let mut events = Vec::new();

        let cell = state.world.grid.cell_at(3, 0);
        try_place_tower(&mut state, cell, TowerKind::Basic, &mut events);

        // Path cell 10 is 11 cells away from column 0, far out of range 2.
        push_drop(&mut state, 10, 1.0);
        events.clear();

        tower_attacks(&mut state, &mut events);
        assert!(events.is_empty());
        assert_eq!(state.world.drops[0].hp, 1.0);
        assert!(!state.world.towers.values().next().unwrap().targeting);
    }

    #[test]
    fn kill_awards_clean_reward_and_clamps_hp() {
        let mut state = running_state();
        let mut events = Vec::new();

        let cell = state.world.grid.cell_at(3, 2);
        try_place_tower(&mut state, cell, TowerKind::Basic, &mut events);
        let id = push_drop(&mut state, 2, 1.0);
        events.clear();

        tower_attacks(&mut state, &mut events);
        assert_eq!(
            events,
            vec![CwEvent::DropCleaned {
                id,
                dismissed: false
            }]
        );
        let drop = &state.world.drops[0];
        assert!(drop.cleaned);
        assert_eq!(drop.hp, 0.0);
        assert_eq!(state.score, 10);
        assert_eq!(state.coins, 4);

        // Cleaned drops cannot be re-targeted.
        events.clear();
        tower_attacks(&mut state, &mut events);
        assert!(events.is_empty());
        assert_eq!(state.score, 10);
    }

    #[test]
    fn slow_tower_stacks_slow_on_hit() {
        let mut state = running_state();
        let mut events = Vec::new();

        let cell = state.world.grid.cell_at(3, 2);
        try_place_tower(&mut state, cell, TowerKind::Slow, &mut events);
        push_drop(&mut state, 2, 5.0);

        tower_attacks(&mut state, &mut events);
        assert_eq!(state.world.drops[0].hp, 4.5);
        assert_eq!(state.world.drops[0].slow_stacks, 1.0);

        tower_attacks(&mut state, &mut events);
        assert_eq!(state.world.drops[0].slow_stacks, 2.0);
    }

    #[test]
    fn unslowed_drops_always_advance() {
        let mut state = running_state();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut events = Vec::new();
        push_drop(&mut state, 0, 1.0);

        for expected in 1..=5 {
            move_drops(&mut state, &mut rng, &mut events);
            assert_eq!(state.world.drops[0].path_index, expected);
        }
        assert!(events.is_empty());
    }

    #[test]
    fn slowed_drop_either_holds_or_advances() {
        let mut state = running_state();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut events = Vec::new();
        push_drop(&mut state, 0, 1.0);
        state.world.drops[0].slow_stacks = 4.0;

        for _ in 0..4 {
            let before_index = state.world.drops[0].path_index;
            let before_stacks = state.world.drops[0].slow_stacks;
            move_drops(&mut state, &mut rng, &mut events);
            let drop = &state.world.drops[0];
            let held = drop.path_index == before_index && drop.slow_stacks == before_stacks - 1.0;
            let advanced =
                drop.path_index == before_index + 1 && drop.slow_stacks == before_stacks;
            assert!(held || advanced);
        }
    }

    #[test]
    fn leaked_drop_pollutes_and_damages() {
        let mut state = running_state();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut events = Vec::new();
        let id = push_drop(&mut state, 14, 1.0);

        move_drops(&mut state, &mut rng, &mut events);
        assert!(state.world.drops.is_empty());
        assert_eq!(state.polluted, 1);
        assert_eq!(state.health, 95);
        assert_eq!(events, vec![CwEvent::DropLeaked { id }]);
    }

    #[test]
    fn cleaned_drop_exits_without_penalty() {
        let mut state = running_state();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut events = Vec::new();
        push_drop(&mut state, 14, 1.0);
        state.world.drops[0].cleaned = true;

        move_drops(&mut state, &mut rng, &mut events);
        assert!(state.world.drops.is_empty());
        assert_eq!(state.polluted, 0);
        assert_eq!(state.health, 100);
        assert!(events.is_empty());
    }

    #[test]
    fn fatal_leak_ends_session_and_abandons_the_sweep() {
        let mut state = running_state();
        state.health = 5;
        let mut rng = SmallRng::seed_from_u64(1);
        let mut events = Vec::new();
        push_drop(&mut state, 14, 1.0);
        let survivor = push_drop(&mut state, 3, 1.0);

        move_drops(&mut state, &mut rng, &mut events);
        assert_eq!(state.phase, SessionPhase::Ended(TerminalOutcome::Defeat));
        assert_eq!(state.health, 0);
        // The later drop was never processed this step.
        assert_eq!(state.world.drops.len(), 1);
        assert_eq!(state.world.drops[0].id, survivor);
        assert_eq!(state.world.drops[0].path_index, 3);
        assert!(matches!(events.last(), Some(CwEvent::GameEnded { .. })));
    }

    #[test]
    fn pollution_limit_ends_session() {
        let mut state = running_state();
        state.polluted_limit = 2;
        let mut rng = SmallRng::seed_from_u64(1);
        let mut events = Vec::new();
        push_drop(&mut state, 14, 1.0);
        push_drop(&mut state, 14, 1.0);

        move_drops(&mut state, &mut rng, &mut events);
        assert_eq!(state.polluted, 2);
        assert_eq!(state.phase, SessionPhase::Ended(TerminalOutcome::Defeat));
    }

    #[test]
    fn milestones_fire_once() {
        let mut state = running_state();
        let mut events = Vec::new();

        state.score = 21;
        check_milestones(&mut state, &mut events);
        assert_eq!(state.coins, 15);
        assert!(matches!(
            events.last(),
            Some(CwEvent::MilestoneReached { score: 20, .. })
        ));

        events.clear();
        check_milestones(&mut state, &mut events);
        assert!(events.is_empty());
        assert_eq!(state.coins, 15);

        // Jumping past two thresholds fires both, once each.
        state.score = 120;
        check_milestones(&mut state, &mut events);
        assert_eq!(events.len(), 2);
        assert_eq!(state.coins, 25);
    }
}
