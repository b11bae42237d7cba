//! Rules engine for a tile-grid dungeon crawler.
//!
//! `crawl-core` defines the trait bags every actor and item is made of, the
//! D&D-derived character rules built on them, combat resolution, and the
//! actors, stores and interaction kinds of a scene. It performs no I/O and
//! takes every random roll from an injected [`rand::Rng`]; the async turn
//! machinery lives in `crawl-runtime`.
pub mod chance;
pub mod character;
pub mod combat;
pub mod dice;
pub mod error;
pub mod interaction;
pub mod magic;
pub mod state;
pub mod traits;

pub use character::{Ability, AttackDetail, CharacterTraits, Equipment, ExperienceDelta};
pub use dice::DiceExpr;
pub use error::{DiceError, ErrorSeverity, GameError, StoreError, TraitsError, WorldError};
pub use interaction::Interaction;
pub use magic::MagicTraits;
pub use state::{
    Actor, ActorId, ActorRole, ActorTemplate, Artefact, ArtefactKind, Campaign, DamageOutcome,
    GridPoint, MoveType, SceneDefinition, StoreManager, World,
};
pub use traits::{Revivable, TraitValue, Traits, TraitsEnvelope, revive};
