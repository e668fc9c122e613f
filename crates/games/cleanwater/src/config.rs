use serde::{Deserialize, Serialize};
use sim_core::Millis;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    Basic,
    Slow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

/// Session parameters selected before the run starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyPreset {
    pub wave_target: u32,
    pub polluted_limit: u32,
    /// Spawn-interval divisor; higher means faster spawning.
    pub spawn_speed: f64,
    pub starting_coins: u32,
    pub wave_time_limit_secs: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct TowerSpec {
    pub cost: u32,
    pub range: u16,
    pub power: f64,
    pub slow: f64,
}

#[derive(Clone, Debug)]
pub struct Milestone {
    pub score: u32,
    pub title: String,
    pub message: String,
}

#[derive(Clone, Debug)]
pub struct CwConfig {
    pub rows: u16,
    pub cols: u16,
    pub tick_hz: u32,
    /// Combat/movement cadence.
    pub step_period: Millis,
    /// Delay before an auto-advanced or checkpoint-resumed wave begins.
    pub next_wave_delay: Millis,

    // Wave pacing
    pub early_wave_cutoff: u32,
    pub early_spawn_interval: Millis,
    pub late_spawn_interval: Millis,
    pub min_spawn_interval: Millis,

    // Health and pollution
    pub starting_health: u32,
    pub leak_damage: u32,
    pub time_penalty: u32,

    // Economy
    pub clean_score: u32,
    pub clean_coins: u32,
    pub dismiss_score: u32,
    pub dismiss_coins: u32,
    pub milestone_coins: u32,
    pub cheer_score: u32,

    // Tower specs
    pub basic_spec: TowerSpec,
    pub slow_spec: TowerSpec,
    pub upgrade_cost_per_level: u32,
    pub upgrade_power_step: f64,

    pub checkpoint_wave: u32,

    pub easy: DifficultyPreset,
    pub normal: DifficultyPreset,
    pub hard: DifficultyPreset,

    pub milestones: Vec<Milestone>,
}

impl CwConfig {
    pub fn spec(&self, kind: TowerKind) -> &TowerSpec {
        match kind {
            TowerKind::Basic => &self.basic_spec,
            TowerKind::Slow => &self.slow_spec,
        }
    }

    pub fn preset(&self, difficulty: Difficulty) -> DifficultyPreset {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Normal => self.normal,
            Difficulty::Hard => self.hard,
        }
    }

    pub fn duration_to_ticks(&self, d: Millis) -> u64 {
        d.to_ticks(self.tick_hz)
    }

    /// Drops per wave. Fewer in the early waves, then linear growth.
    pub fn wave_spawn_count(&self, wave: u32) -> u32 {
        if wave <= self.early_wave_cutoff {
            // floor((2 + wave) / 1.5), at least one drop
            ((2 + wave) * 2 / 3).max(1)
        } else {
            4 + wave
        }
    }

    /// Interval between spawns within a wave, scaled by the difficulty's
    /// spawn-speed divisor and clamped to the configured minimum.
    pub fn wave_spawn_interval(&self, wave: u32, spawn_speed: f64) -> Millis {
        let base = if wave <= self.early_wave_cutoff {
            self.early_spawn_interval
        } else {
            self.late_spawn_interval
        };
        let scaled = (base.as_millis() as f64 / spawn_speed).round() as u64;
        Millis::from_millis(scaled.max(self.min_spawn_interval.as_millis()))
    }

    /// Spawn HP for a drop in the given wave.
    pub fn drop_hp(&self, wave: u32) -> f64 {
        let base = if wave <= self.early_wave_cutoff { 1 } else { 2 };
        let wave_bonus = (wave - 1) / 2;
        (base + wave_bonus) as f64
    }

    /// Cost of the next upgrade for a tower at `level`.
    pub fn upgrade_cost(&self, level: u32) -> u32 {
        level * self.upgrade_cost_per_level
    }
}

impl Default for CwConfig {
    fn default() -> Self {
        Self {
            rows: 9,
            cols: 15,
            tick_hz: 60,
            step_period: Millis::from_millis(450),
            next_wave_delay: Millis::from_millis(800),

            early_wave_cutoff: 10,
            early_spawn_interval: Millis::from_millis(1100),
            late_spawn_interval: Millis::from_millis(700),
            min_spawn_interval: Millis::from_millis(120),

            starting_health: 100,
            leak_damage: 5,
            time_penalty: 5,

            clean_score: 10,
            clean_coins: 4,
            dismiss_score: 6,
            dismiss_coins: 3,
            milestone_coins: 5,
            cheer_score: 1,

            basic_spec: TowerSpec {
                cost: 10,
                range: 2,
                power: 1.0,
                slow: 0.0,
            },
            slow_spec: TowerSpec {
                cost: 10,
                range: 3,
                power: 0.5,
                slow: 1.0,
            },
            upgrade_cost_per_level: 5,
            upgrade_power_step: 1.0,

            checkpoint_wave: 10,

            easy: DifficultyPreset {
                wave_target: 10,
                polluted_limit: 12,
                spawn_speed: 0.85,
                starting_coins: 14,
                wave_time_limit_secs: 90,
            },
            normal: DifficultyPreset {
                wave_target: 15,
                polluted_limit: 8,
                spawn_speed: 1.0,
                starting_coins: 10,
                wave_time_limit_secs: 60,
            },
            hard: DifficultyPreset {
                wave_target: 20,
                polluted_limit: 6,
                spawn_speed: 1.25,
                starting_coins: 8,
                wave_time_limit_secs: 45,
            },

            milestones: vec![
                Milestone {
                    score: 20,
                    title: "First Steps".to_string(),
                    message: "Nice! You've cleaned 20 points — keep going!".to_string(),
                },
                Milestone {
                    score: 50,
                    title: "Helping Hands".to_string(),
                    message: "Great work — 50 points. The village thanks you!".to_string(),
                },
                Milestone {
                    score: 100,
                    title: "Community Hero".to_string(),
                    message: "Amazing! 100 points — you're making a real difference.".to_string(),
                },
                Milestone {
                    score: 200,
                    title: "Water Champion".to_string(),
                    message: "Incredible — 200 points! The village is thriving.".to_string(),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_count_grows_with_wave() {
        let config = CwConfig::default();
        assert_eq!(config.wave_spawn_count(1), 2);
        assert_eq!(config.wave_spawn_count(2), 2);
        assert_eq!(config.wave_spawn_count(3), 3);
        assert_eq!(config.wave_spawn_count(4), 4);
        assert_eq!(config.wave_spawn_count(10), 8);
        // Past the early cutoff the count jumps to 4 + wave.
        assert_eq!(config.wave_spawn_count(11), 15);
        assert_eq!(config.wave_spawn_count(20), 24);
    }

    #[test]
    fn spawn_interval_respects_speed_and_minimum() {
        let config = CwConfig::default();
        assert_eq!(config.wave_spawn_interval(1, 1.0).as_millis(), 1100);
        assert_eq!(config.wave_spawn_interval(11, 1.0).as_millis(), 700);

        // Hard speeds spawning up, easy slows it down (rounded).
        assert_eq!(config.wave_spawn_interval(1, 1.25).as_millis(), 880);
        assert_eq!(config.wave_spawn_interval(1, 0.85).as_millis(), 1294);
        assert_eq!(config.wave_spawn_interval(11, 1.25).as_millis(), 560);

        // An extreme multiplier clamps to the floor.
        assert_eq!(config.wave_spawn_interval(11, 10.0).as_millis(), 120);
    }

    #[test]
    fn drop_hp_scales_with_wave() {
        let config = CwConfig::default();
        assert_eq!(config.drop_hp(1), 1.0);
        assert_eq!(config.drop_hp(2), 1.0);
        assert_eq!(config.drop_hp(3), 2.0);
        assert_eq!(config.drop_hp(10), 5.0);
        // Base HP doubles past the early cutoff.
        assert_eq!(config.drop_hp(11), 7.0);
        assert_eq!(config.drop_hp(12), 7.0);
    }

    #[test]
    fn upgrade_cost_scales_with_level() {
        let config = CwConfig::default();
        assert_eq!(config.upgrade_cost(1), 5);
        assert_eq!(config.upgrade_cost(2), 10);
        assert_eq!(config.upgrade_cost(7), 35);
    }

    #[test]
    fn difficulty_presets() {
        let config = CwConfig::default();
        assert_eq!(config.preset(Difficulty::Easy).wave_target, 10);
        assert_eq!(config.preset(Difficulty::Easy).starting_coins, 14);
        assert_eq!(config.preset(Difficulty::Normal).polluted_limit, 8);
        assert_eq!(config.preset(Difficulty::Hard).wave_target, 20);
        assert_eq!(config.preset(Difficulty::Hard).wave_time_limit_secs, 45);
    }
}
