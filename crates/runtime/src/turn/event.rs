//! Player input delivered to the turn manager.

use serde::{Deserialize, Serialize};
use strum::Display;

use crawl_core::GridPoint;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum TurnEvent {
    /// Open the main menu, saving first when mid-game.
    MainMenu,
    /// A walkable tile that is not a door, possibly occupied.
    ClickedFreeGround(GridPoint),
    ClickedEntrance(GridPoint),
    ClickedExit(GridPoint),
    /// Use the artefact in this slot of the hero's store.
    UseArtefact(usize),
    /// Equip, unequip, prepare or unprepare this slot.
    ToggleEquip(usize),
}

/// Whether the manager acted on an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventDisposition {
    Handled,
    /// Dropped because another event was still being handled.
    Ignored,
}
