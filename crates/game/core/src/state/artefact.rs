//! Carried items.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::interaction::Interaction;
use crate::magic::MagicTraits;
use crate::traits::Traits;

/// What an artefact is, read from its `KIND` trait.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum ArtefactKind {
    Weapon,
    Armour,
    Shield,
    Magic,
    Spell,
    Key,
    Consumable,
    #[default]
    Treasure,
}

impl ArtefactKind {
    pub fn of(traits: &Traits) -> Self {
        let Some(kind) = traits.get_text("KIND") else {
            return Self::default();
        };
        kind.parse().unwrap_or_else(|_| {
            tracing::warn!(name = %traits.name(), "unknown artefact KIND {}, treating as treasure", kind);
            Self::default()
        })
    }

    /// Kinds that can be equipped, or prepared in the case of spells.
    pub const fn is_equippable(self) -> bool {
        matches!(
            self,
            Self::Weapon | Self::Armour | Self::Shield | Self::Magic | Self::Spell
        )
    }
}

/// An item held in a store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artefact {
    pub traits: Traits,
    pub kind: ArtefactKind,
    #[serde(default)]
    pub equipped: bool,
    #[serde(default)]
    pub interaction: Option<Interaction>,
}

impl Artefact {
    pub fn new(traits: Traits) -> Self {
        let kind = ArtefactKind::of(&traits);
        Self {
            traits,
            kind,
            equipped: false,
            interaction: Interaction::for_artefact(kind),
        }
    }

    pub fn parse(definition: &str) -> Self {
        Self::new(Traits::parse(definition))
    }

    pub fn name(&self) -> String {
        self.traits.name()
    }

    /// Price in silver pieces.
    pub fn value(&self) -> i64 {
        self.traits.get_int("VALUE").max(0)
    }

    pub fn magic_traits(&self) -> MagicTraits {
        MagicTraits::from(self.traits.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_drives_interaction() {
        let potion = Artefact::parse("NAME:Potion, KIND:consumable, TYPE:POTION, HP_GAIN:2D4");
        assert_eq!(potion.kind, ArtefactKind::Consumable);
        assert_eq!(potion.interaction, Some(Interaction::ConsumeFood));

        let spell = Artefact::parse("NAME:Firebolt, KIND:SPELL, DMG:1D10");
        assert_eq!(spell.interaction, Some(Interaction::CastSpell));

        let gem = Artefact::parse("NAME:Gem, VALUE:50");
        assert_eq!(gem.kind, ArtefactKind::Treasure);
        assert_eq!(gem.interaction, None);
        assert_eq!(gem.value(), 50);
    }

    #[test]
    fn unknown_kind_is_treasure() {
        assert_eq!(Artefact::parse("KIND:GIZMO").kind, ArtefactKind::Treasure);
    }
}
