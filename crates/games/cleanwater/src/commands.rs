use crate::config::{Difficulty, TowerKind};
use crate::world::{CellIndex, DropId};

#[derive(Clone, Copy, Debug)]
pub enum CwCommand {
    /// Only honored before the session starts.
    SelectDifficulty(Difficulty),
    SelectTower(TowerKind),
    /// Place the selected tower on an empty cell, or upgrade the tower
    /// already standing there.
    PlaceOrUpgrade { cell: CellIndex },
    /// Manually clean a drop in flight.
    DismissDrop { id: DropId },
    Cheer,
    StartGame,
    StartNextWave,
    ToggleAutoAdvance,
    ResetGame,
}
