//! Turn states and the transition table between them.
//!
//! Handlers never pick the next state themselves. They report an
//! [`Outcome`] and [`next_state`] maps `(state, outcome)` to where the
//! machine goes, so the whole flow can be read in one place.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum TurnState {
    #[default]
    WaitingToStart,
    AtMainMenu,
    AtStart,
    HeroTurnIdle,
    HeroTurnInteracting,
    ComputerTurnIdle,
    ComputerTurnInteracting,
    AtGameOver,
    AtGameCompleted,
}

impl TurnState {
    /// States in which the player's clicks mean something.
    pub fn is_hero_turn(self) -> bool {
        matches!(self, Self::HeroTurnIdle | Self::HeroTurnInteracting)
    }

    pub fn is_computer_turn(self) -> bool {
        matches!(self, Self::ComputerTurnIdle | Self::ComputerTurnInteracting)
    }
}

/// What a handler reports back to the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum Outcome {
    /// Nothing to change; the current state keeps waiting.
    Stay,
    MenuRequested,
    /// The player chose to play from the main menu.
    Play,
    Quit,
    /// A scene is loaded and the hero stands on its entrance.
    SceneReady,
    /// The hero used their turn and nobody enacting is on their tile.
    HeroActed,
    /// The hero used their turn with enemies still on their tile.
    HeroEngaged,
    /// Computer turn finished with the hero alone.
    ComputerDone,
    /// Computer turn finished with enemies on the hero's tile.
    ComputerEngaged,
    HeroDied,
    CampaignCompleted,
    /// Game over or completion acknowledged.
    GameEnded,
}

/// Where the machine goes from `state` after `outcome`.
///
/// `None` means stay put. Unexpected pairs are logged and ignored.
pub fn next_state(state: TurnState, outcome: Outcome) -> Option<TurnState> {
    use Outcome as O;
    use TurnState as S;

    let next = match (state, outcome) {
        (_, O::Stay) => return None,

        (S::WaitingToStart, O::MenuRequested) => S::AtMainMenu,

        (S::AtMainMenu, O::Play) => S::AtStart,
        (S::AtMainMenu, O::Quit) => S::WaitingToStart,

        (S::AtStart, O::SceneReady) => S::HeroTurnIdle,

        (S::HeroTurnIdle | S::HeroTurnInteracting, O::MenuRequested) => S::AtMainMenu,
        (S::HeroTurnIdle, O::HeroActed) => S::ComputerTurnIdle,
        // The fight is over; the hero carries on.
        (S::HeroTurnInteracting, O::HeroActed) => S::HeroTurnIdle,
        (S::HeroTurnIdle | S::HeroTurnInteracting, O::HeroEngaged) => S::ComputerTurnInteracting,
        (S::HeroTurnIdle | S::HeroTurnInteracting, O::SceneReady) => S::HeroTurnIdle,
        (S::HeroTurnIdle | S::HeroTurnInteracting, O::CampaignCompleted) => S::AtGameCompleted,
        (S::HeroTurnIdle | S::HeroTurnInteracting, O::HeroDied) => S::AtGameOver,

        (S::ComputerTurnIdle | S::ComputerTurnInteracting, O::ComputerDone) => S::HeroTurnIdle,
        (S::ComputerTurnIdle | S::ComputerTurnInteracting, O::ComputerEngaged) => {
            S::HeroTurnInteracting
        }
        (S::ComputerTurnIdle | S::ComputerTurnInteracting, O::HeroDied) => S::AtGameOver,

        (S::AtGameOver | S::AtGameCompleted, O::GameEnded) => S::AtMainMenu,

        (state, outcome) => {
            tracing::warn!(%state, %outcome, "no transition for outcome");
            return None;
        }
    };
    Some(next)
}
