//! Async turn machinery for the dungeon crawler.
//!
//! This crate drives a [`GameSession`] through the turn state machine,
//! resolving interactions with the rules from `crawl-core` and talking to the
//! player only through the collaborator traits in [`api`].
//!
//! Modules are organized by responsibility:
//! - [`turn`] hosts the [`TurnManager`] state machine and actor movement
//! - [`interactions`] resolves fights, trades, discoveries, food and spells
//! - [`session`] and [`map`] hold the mutable state of a play-through
//! - [`api`] exposes the types front ends implement and consume
//! - [`repository`] persists the saved game
pub mod api;
pub mod config;
pub mod interactions;
pub mod map;
pub mod repository;
pub mod session;
pub mod turn;

pub use api::{
    ArtefactChoice, Collaborators, Dialogs, Direction, MainMenuChoice, Presenter, Result,
    RuntimeError, SoundCue, TradeOrder,
};
pub use config::RuntimeConfig;
pub use map::{GridMap, Route, RouteFinder, Tile, TileMap};
pub use repository::{
    FileSaveRepository, InMemorySaveRepository, RepositoryError, SaveRepository, SavedGame,
};
pub use session::GameSession;
pub use turn::{EventDisposition, TurnEvent, TurnManager, TurnState};
