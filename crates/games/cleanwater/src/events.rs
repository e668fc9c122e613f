use crate::config::{Difficulty, TowerKind};
use crate::world::{CellIndex, DropId};
use sim_core::TerminalOutcome;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementRejection {
    OnPath,
    Occupied,
    NoTowerSelected,
    NotEnoughCoins,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpgradeRejection {
    NoTower,
    NotEnoughCoins,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CwEvent {
    SessionStarted {
        difficulty: Difficulty,
    },
    WaveStarted {
        wave: u32,
        count: u32,
    },
    DropSpawned {
        id: DropId,
        hp: f64,
    },
    /// A drop was neutralized, by tower fire or manual dismissal.
    DropCleaned {
        id: DropId,
        dismissed: bool,
    },
    DropLeaked {
        id: DropId,
    },
    TowerPlaced {
        cell: CellIndex,
        kind: TowerKind,
    },
    TowerUpgraded {
        cell: CellIndex,
        level: u32,
        power: f64,
    },
    PlacementRejected {
        cell: CellIndex,
        reason: PlacementRejection,
    },
    UpgradeRejected {
        cell: CellIndex,
        reason: UpgradeRejection,
    },
    WaveCompleted {
        wave: u32,
    },
    WaveTimePenalty {
        wave: u32,
        health: u32,
    },
    CheckpointReached {
        wave: u32,
    },
    MilestoneReached {
        score: u32,
        title: String,
        message: String,
    },
    GameEnded {
        outcome: TerminalOutcome,
        wave: u32,
        score: u32,
    },
}
