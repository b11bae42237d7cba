//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate:
//! the error type and the collaborator traits a front end implements.

pub mod collaborators;
pub mod errors;
pub mod scripted;

pub use collaborators::{
    ArtefactChoice, Collaborators, Dialogs, MainMenuChoice, Presenter, SilentPresenter, SoundCue,
    TradeOrder,
};
pub use errors::{Direction, RepositoryError, Result, RuntimeError};
pub use scripted::{DialogGate, RecordingPresenter, ScriptedDialogs};
