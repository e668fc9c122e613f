pub mod commands;
pub mod config;
pub mod events;
pub mod game;
pub mod observe;
pub mod systems;
pub mod world;

pub use commands::CwCommand;
pub use config::{CwConfig, Difficulty, DifficultyPreset, Milestone, TowerKind, TowerSpec};
pub use events::{CwEvent, PlacementRejection, UpgradeRejection};
pub use game::CleanwaterGame;
pub use observe::{CwObservation, ObsDrop, ObsPhase, ObsTower};
pub use world::{CellIndex, CellKind, CwState, Drop, DropId, SessionPhase, Tower, TowerId, WavePhase};
