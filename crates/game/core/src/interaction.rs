//! Interaction kinds carried by actors and artefacts.
//!
//! An [`Interaction`] is attached to the thing that *owns* it: an enemy owns
//! `Fight`, a trader owns `Trade`, a potion owns `ConsumeFood`. The owner
//! either *enacts* it on another actor (the owner starts the exchange) or
//! *reacts* when someone else engages with it. The direction rules live here;
//! executing an interaction needs dialogs and animation and is done by the
//! runtime.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::state::{ActorRole, ArtefactKind};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
pub enum Interaction {
    Fight,
    Trade,
    FindArtefact,
    Poison,
    CastSpell,
    ConsumeFood,
    InteractWithCorpse,
}

impl Interaction {
    /// Whether the owner may start this interaction itself.
    pub const fn can_enact(self) -> bool {
        matches!(self, Self::Fight | Self::Poison)
    }

    /// Whether the owner responds when another actor engages it.
    pub const fn can_react(self) -> bool {
        !matches!(self, Self::Poison)
    }

    /// Whether a hero moving away can break off this interaction.
    pub const fn respect_disengage(self) -> bool {
        matches!(self, Self::Fight)
    }

    /// Default interaction for an actor of `role`.
    pub fn for_role(role: ActorRole) -> Option<Self> {
        match role {
            ActorRole::Hero => None,
            ActorRole::Enemy => Some(Self::Fight),
            ActorRole::Trader => Some(Self::Trade),
            ActorRole::Prop | ActorRole::HiddenArtefact => Some(Self::FindArtefact),
        }
    }

    /// Interaction an artefact of `kind` carries.
    pub fn for_artefact(kind: ArtefactKind) -> Option<Self> {
        match kind {
            ArtefactKind::Consumable => Some(Self::ConsumeFood),
            ArtefactKind::Spell => Some(Self::CastSpell),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_rules() {
        assert!(Interaction::Fight.can_enact() && Interaction::Fight.can_react());
        assert!(Interaction::Poison.can_enact() && !Interaction::Poison.can_react());
        for reactive in [
            Interaction::Trade,
            Interaction::FindArtefact,
            Interaction::CastSpell,
            Interaction::ConsumeFood,
            Interaction::InteractWithCorpse,
        ] {
            assert!(!reactive.can_enact(), "{reactive}");
            assert!(reactive.can_react(), "{reactive}");
        }
    }

    #[test]
    fn only_fights_can_be_disengaged() {
        assert!(Interaction::Fight.respect_disengage());
        assert!(!Interaction::Poison.respect_disengage());
        assert!(!Interaction::Trade.respect_disengage());
    }

    #[test]
    fn defaults_by_role_and_kind() {
        assert_eq!(Interaction::for_role(ActorRole::Enemy), Some(Interaction::Fight));
        assert_eq!(Interaction::for_role(ActorRole::Hero), None);
        assert_eq!(
            Interaction::for_artefact(ArtefactKind::Spell),
            Some(Interaction::CastSpell)
        );
        assert_eq!(Interaction::for_artefact(ArtefactKind::Weapon), None);
    }
}
