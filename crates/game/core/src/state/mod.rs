//! Actors, artefacts, stores and the scene world.
//!
//! The runtime mutates this state directly through [`World`]; rule
//! calculations stay in [`crate::character`] and [`crate::combat`].
mod actor;
mod artefact;
mod common;
pub mod store;
mod template;
mod world;

pub use actor::{Actor, ActorRole, MoveType};
pub use artefact::{Artefact, ArtefactKind};
pub use common::{ActorId, GridPoint};
pub use store::{StoreManager, purchase};
pub use template::{ActorTemplate, Campaign, SceneDefinition};
pub use world::{DamageOutcome, World};
