//! JSON envelope for the traits family.
//!
//! Every traits flavour serializes as `{"reviver": "<ClassName>", "data": ...}`
//! so a save file can be revived into the right type without knowing it in
//! advance.

use core::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{RawTrait, Traits};
use crate::character::CharacterTraits;
use crate::error::TraitsError;
use crate::magic::MagicTraits;

impl Serialize for Traits {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.display_key(), &entry.value)?;
        }
        map.end()
    }
}

struct TraitsVisitor;

impl<'de> Visitor<'de> for TraitsVisitor {
    type Value = Traits;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of trait keys to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut traits = Traits::new();
        while let Some((key, value)) = access.next_entry::<String, RawTrait>()? {
            traits.set(&key, value);
        }
        Ok(traits)
    }
}

impl<'de> Deserialize<'de> for Traits {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TraitsVisitor)
    }
}

/// A revived traits value of any flavour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reviver", content = "data")]
pub enum TraitsEnvelope {
    Traits(Traits),
    MagicTraits(MagicTraits),
    CharacterTraits(CharacterTraits),
}

impl TraitsEnvelope {
    pub const fn reviver(&self) -> &'static str {
        match self {
            Self::Traits(_) => Traits::REVIVER,
            Self::MagicTraits(_) => MagicTraits::REVIVER,
            Self::CharacterTraits(_) => CharacterTraits::REVIVER,
        }
    }
}

/// Revives any traits envelope.
pub fn revive(json: &str) -> Result<TraitsEnvelope, TraitsError> {
    Ok(serde_json::from_str(json)?)
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    reviver: &'static str,
    data: &'a T,
}

/// Types that round-trip through the traits envelope.
pub trait Revivable: Serialize + Sized {
    /// Discriminator written to the `reviver` field.
    const REVIVER: &'static str;

    fn from_envelope(envelope: TraitsEnvelope) -> Result<Self, TraitsError>;

    fn to_json(&self) -> Result<String, TraitsError> {
        Ok(serde_json::to_string(&EnvelopeRef {
            reviver: Self::REVIVER,
            data: self,
        })?)
    }

    fn from_json(json: &str) -> Result<Self, TraitsError> {
        Self::from_envelope(revive(json)?)
    }
}

fn wrong_reviver<T: Revivable>(found: &TraitsEnvelope) -> TraitsError {
    TraitsError::WrongReviver {
        expected: T::REVIVER,
        found: found.reviver(),
    }
}

impl Revivable for Traits {
    const REVIVER: &'static str = "Traits";

    fn from_envelope(envelope: TraitsEnvelope) -> Result<Self, TraitsError> {
        match envelope {
            TraitsEnvelope::Traits(t) => Ok(t),
            other => Err(wrong_reviver::<Self>(&other)),
        }
    }
}

impl Revivable for MagicTraits {
    const REVIVER: &'static str = "MagicTraits";

    fn from_envelope(envelope: TraitsEnvelope) -> Result<Self, TraitsError> {
        match envelope {
            TraitsEnvelope::MagicTraits(t) => Ok(t),
            other => Err(wrong_reviver::<Self>(&other)),
        }
    }
}

impl Revivable for CharacterTraits {
    const REVIVER: &'static str = "CharacterTraits";

    fn from_envelope(envelope: TraitsEnvelope) -> Result<Self, TraitsError> {
        match envelope {
            TraitsEnvelope::CharacterTraits(t) => Ok(t),
            other => Err(wrong_reviver::<Self>(&other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Equipment;

    #[test]
    fn traits_round_trip() {
        let traits = Traits::parse("NAME:Dagger, TYPE:SIMPLE MELEE LIGHT FINESSE, DMG:1D4, _HIDDEN:1, W:0.5");
        let json = traits.to_json().unwrap();
        assert!(json.starts_with(r#"{"reviver":"Traits","data":{"NAME":"Dagger""#));
        assert_eq!(Traits::from_json(&json).unwrap(), traits);
    }

    #[test]
    fn magic_traits_round_trip() {
        let spell = MagicTraits::parse("NAME:Firebolt, DMG:1D10, DMG_PER_LEVEL:1D10, LEVEL:1, MAX_LEVEL:5, RANGE:40");
        let json = spell.to_json().unwrap();
        assert_eq!(MagicTraits::from_json(&json).unwrap(), spell);
    }

    #[test]
    fn character_traits_round_trip() {
        let mut hero = CharacterTraits::parse(
            "NAME:Ann, STR:14, DEX:16, CON:12, EXP:900, HIT_DICE:1D8, PROF:SIMPLE & LIGHT ARMOUR",
        );
        hero.set("FX_STR", -2);
        let dagger = crate::Traits::parse("NAME:Dagger, TYPE:SIMPLE MELEE LIGHT FINESSE, DMG:1D4");
        hero.utilise_additional_traits(&Equipment {
            weapons: vec![&dagger],
            ..Equipment::default()
        });

        let json = hero.to_json().unwrap();
        let revived = CharacterTraits::from_json(&json).unwrap();
        assert_eq!(revived, hero);
    }

    #[test]
    fn revive_dispatches_on_reviver() {
        let json = MagicTraits::parse("NAME:Heal, HP_GAIN:1D8").to_json().unwrap();
        assert!(matches!(revive(&json).unwrap(), TraitsEnvelope::MagicTraits(_)));
        assert!(matches!(
            Traits::from_json(&json),
            Err(TraitsError::WrongReviver { expected: "Traits", found: "MagicTraits" })
        ));
        assert!(revive(r#"{"reviver":"Nope","data":{}}"#).is_err());
    }
}
