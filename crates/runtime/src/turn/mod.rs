//! Turn management.
//!
//! # Architecture
//!
//! - [`state`]: the states and the pure transition table
//! - [`manager`]: the event-driven machine with its input latch
//! - `hero` / `computer`: what each half of a round does
//! - `lifecycle`: menu, start, scene changes, game over
//! - [`mover`]: computer movement, planned then replayed

mod computer;
mod event;
mod hero;
mod lifecycle;
mod manager;
pub mod mover;
pub mod state;

pub use event::{EventDisposition, TurnEvent};
pub use manager::TurnManager;
pub use mover::ReplayableActorMover;
pub use state::{Outcome, TurnState, next_state};
