use crate::config::{CwConfig, Difficulty, TowerKind};
use serde::{Deserialize, Serialize};
use sim_core::{TerminalOutcome, Tick};
use slotmap::{new_key_type, SlotMap};
use std::collections::HashSet;

new_key_type! { pub struct TowerId; }

/// Flat grid index: `row * cols + col`.
pub type CellIndex = u16;

/// Monotonic per-session drop identifier.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct DropId(pub u64);

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum CellKind {
    #[default]
    Empty,
    Path,
    Tower(TowerId),
}

#[derive(Clone, Debug)]
pub struct Grid {
    pub rows: u16,
    pub cols: u16,
    cells: Vec<CellKind>,
}

impl Grid {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            rows,
            cols,
            cells: vec![CellKind::Empty; (rows as usize) * (cols as usize)],
        }
    }

    #[inline]
    pub fn cell_at(&self, row: u16, col: u16) -> CellIndex {
        row * self.cols + col
    }

    #[inline]
    pub fn row_col(&self, cell: CellIndex) -> (u16, u16) {
        (cell / self.cols, cell % self.cols)
    }

    #[inline]
    pub fn in_bounds(&self, cell: CellIndex) -> bool {
        cell < self.rows * self.cols
    }

    #[inline]
    pub fn get(&self, cell: CellIndex) -> CellKind {
        self.cells[cell as usize]
    }

    #[inline]
    pub fn set(&mut self, cell: CellIndex, kind: CellKind) {
        self.cells[cell as usize] = kind;
    }

    /// Manhattan distance between two cells.
    #[inline]
    pub fn distance(&self, a: CellIndex, b: CellIndex) -> u16 {
        let (ar, ac) = self.row_col(a);
        let (br, bc) = self.row_col(b);
        ar.abs_diff(br) + ac.abs_diff(bc)
    }
}

#[derive(Clone, Debug)]
pub struct Tower {
    pub cell: CellIndex,
    pub kind: TowerKind,
    pub level: u32,
    pub power: f64,
    pub range: u16,
    pub slow: f64,
    /// Set each combat step while the tower has a target.
    pub targeting: bool,
}

#[derive(Clone, Debug)]
pub struct Drop {
    pub id: DropId,
    pub path_index: usize,
    pub hp: f64,
    pub max_hp: f64,
    /// One-way flag: a cleaned drop keeps moving but cannot be targeted,
    /// rewarded again, or pollute the village.
    pub cleaned: bool,
    pub slow_stacks: f64,
    pub targeted: bool,
    pub recently_hit: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WavePhase {
    /// No wave has run yet (or the session is over).
    Idle,
    Spawning {
        spawned: u32,
        count: u32,
        interval_ticks: u64,
        next_spawn_tick: Tick,
    },
    /// All drops spawned; waiting for the field to clear.
    Draining,
    /// Wave complete; the next starts on explicit request.
    AwaitingNext,
    /// Wave complete; the next starts automatically at `start_tick`.
    NextWaveQueued { start_tick: Tick },
    /// Checkpoint wave cleared; paused until the player continues.
    Checkpoint,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    NotStarted,
    Running,
    Ended(TerminalOutcome),
}

#[derive(Clone, Debug)]
pub struct World {
    pub grid: Grid,
    /// Cells the drops travel, in order. Middle row, left to right.
    pub path: Vec<CellIndex>,
    /// Towers are never removed mid-session, so iteration follows
    /// placement order.
    pub towers: SlotMap<TowerId, Tower>,
    pub drops: Vec<Drop>,
    next_drop_id: u64,
}

impl World {
    pub fn new(rows: u16, cols: u16) -> Self {
        let mut grid = Grid::new(rows, cols);
        let path_row = rows / 2;
        let path: Vec<CellIndex> = (0..cols).map(|col| grid.cell_at(path_row, col)).collect();
        for &cell in &path {
            grid.set(cell, CellKind::Path);
        }
        Self {
            grid,
            path,
            towers: SlotMap::with_key(),
            drops: Vec::new(),
            next_drop_id: 0,
        }
    }

    pub fn alloc_drop_id(&mut self) -> DropId {
        let id = DropId(self.next_drop_id);
        self.next_drop_id += 1;
        id
    }
}

#[derive(Clone, Debug)]
pub struct CwState {
    pub config: CwConfig,
    pub tick: Tick,
    pub world: World,
    pub phase: SessionPhase,
    pub wave_phase: WavePhase,

    // Active difficulty settings
    pub difficulty: Difficulty,
    pub wave_target: u32,
    pub polluted_limit: u32,
    pub spawn_speed: f64,
    pub wave_time_limit_secs: u32,

    // Session counters
    pub wave: u32,
    pub score: u32,
    pub coins: u32,
    pub health: u32,
    pub polluted: u32,

    pub auto_advance: bool,
    pub selected_tower: Option<TowerKind>,

    // Wave countdown
    pub timer_seconds: u32,
    pub next_timer_tick: Tick,

    // Combat/movement cadence
    pub next_step_tick: Tick,

    /// Milestone scores already awarded this session.
    pub achieved_milestones: HashSet<u32>,
}

impl CwState {
    pub fn new(config: CwConfig) -> Self {
        let mut state = Self {
            tick: 0,
            world: World::new(config.rows, config.cols),
            phase: SessionPhase::NotStarted,
            wave_phase: WavePhase::Idle,
            difficulty: Difficulty::Normal,
            wave_target: 0,
            polluted_limit: 0,
            spawn_speed: 1.0,
            wave_time_limit_secs: 0,
            wave: 0,
            score: 0,
            coins: 0,
            health: 0,
            polluted: 0,
            auto_advance: true,
            selected_tower: None,
            timer_seconds: 0,
            next_timer_tick: 0,
            next_step_tick: 0,
            achieved_milestones: HashSet::new(),
            config,
        };
        state.apply_difficulty();
        state
    }

    /// Reload the active difficulty preset and clear all per-session state.
    /// `auto_advance` deliberately survives; everything else resets.
    pub fn apply_difficulty(&mut self) {
        let preset = self.config.preset(self.difficulty);
        self.wave_target = preset.wave_target;
        self.polluted_limit = preset.polluted_limit;
        self.spawn_speed = preset.spawn_speed;
        self.wave_time_limit_secs = preset.wave_time_limit_secs;

        self.world = World::new(self.config.rows, self.config.cols);
        self.wave_phase = WavePhase::Idle;
        self.wave = 0;
        self.score = 0;
        self.coins = preset.starting_coins;
        self.health = self.config.starting_health;
        self.polluted = 0;
        self.selected_tower = None;
        self.timer_seconds = 0;
        self.next_timer_tick = 0;
        self.next_step_tick = 0;
        self.achieved_milestones.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_index_round_trip() {
        let grid = Grid::new(9, 15);
        let cell = grid.cell_at(4, 7);
        assert_eq!(cell, 67);
        assert_eq!(grid.row_col(cell), (4, 7));
        assert!(grid.in_bounds(134));
        assert!(!grid.in_bounds(135));
    }

    #[test]
    fn manhattan_distance() {
        let grid = Grid::new(9, 15);
        let a = grid.cell_at(4, 0);
        let b = grid.cell_at(2, 3);
        assert_eq!(grid.distance(a, b), 5);
        assert_eq!(grid.distance(b, a), 5);
        assert_eq!(grid.distance(a, a), 0);
    }

    #[test]
    fn path_occupies_middle_row() {
        let world = World::new(9, 15);
        assert_eq!(world.path.len(), 15);
        assert_eq!(world.path.first(), Some(&60));
        assert_eq!(world.path.last(), Some(&74));
        for &cell in &world.path {
            assert_eq!(world.grid.get(cell), CellKind::Path);
        }
        assert_eq!(world.grid.get(0), CellKind::Empty);
    }

    #[test]
    fn drop_ids_are_monotonic() {
        let mut world = World::new(9, 15);
        assert_eq!(world.alloc_drop_id(), DropId(0));
        assert_eq!(world.alloc_drop_id(), DropId(1));
        assert_eq!(world.alloc_drop_id(), DropId(2));
    }
}
