//! Armour class composition.

use strum::{Display, EnumString};

use crate::traits::Traits;

/// Armour class of an unarmoured character before DEX.
pub const UNARMOURED_AC: i64 = 10;

/// Highest DEX bonus medium armour allows.
pub const MEDIUM_ARMOUR_DEX_CAP: i64 = 2;

/// Weight class of a suit of armour, read from its `TYPE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum ArmourWeight {
    Light,
    Medium,
    Heavy,
}

impl ArmourWeight {
    pub fn of(armour: &Traits) -> Self {
        let kind = armour.get_text("TYPE").unwrap_or_default();
        let words: Vec<&str> = kind.split_whitespace().collect();
        if words.contains(&"HEAVY") {
            Self::Heavy
        } else if words.contains(&"MEDIUM") {
            Self::Medium
        } else {
            Self::Light
        }
    }

    /// DEX bonus this weight class lets through.
    pub fn dex_bonus(self, dex_modifier: i64) -> i64 {
        match self {
            Self::Light => dex_modifier,
            Self::Medium => dex_modifier.min(MEDIUM_ARMOUR_DEX_CAP),
            Self::Heavy => 0,
        }
    }
}

/// Best single armour base score, capped DEX, plus every `AC_BONUS`.
pub fn compose_armour_class(dex_modifier: i64, armour: &[&Traits], shields: &[&Traits]) -> i64 {
    let best = armour
        .iter()
        .filter(|a| a.get_int("AC") > 0)
        .max_by_key(|a| a.get_int("AC"));

    let (base, dex) = match best {
        Some(suit) => (
            suit.get_int("AC"),
            ArmourWeight::of(suit).dex_bonus(dex_modifier),
        ),
        None => (UNARMOURED_AC, dex_modifier),
    };

    let modifiers: i64 = armour
        .iter()
        .chain(shields.iter())
        .map(|item| item.get_int("AC_BONUS"))
        .sum();

    base + dex + modifiers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(def: &str) -> Traits {
        Traits::parse(def)
    }

    #[test]
    fn unarmoured_uses_full_dex() {
        assert_eq!(compose_armour_class(3, &[], &[]), 13);
        assert_eq!(compose_armour_class(-1, &[], &[]), 9);
    }

    #[test]
    fn light_armour_keeps_dex_uncapped() {
        let leather = t("NAME:Leather, TYPE:LIGHT ARMOUR, AC:11");
        assert_eq!(compose_armour_class(4, &[&leather], &[]), 15);
    }

    #[test]
    fn medium_armour_caps_dex_at_two() {
        let breastplate = t("NAME:Breastplate, TYPE:MEDIUM ARMOUR, AC:14");
        assert_eq!(compose_armour_class(4, &[&breastplate], &[]), 16);
        assert_eq!(compose_armour_class(1, &[&breastplate], &[]), 15);
        assert_eq!(compose_armour_class(-1, &[&breastplate], &[]), 13);
    }

    #[test]
    fn heavy_armour_ignores_dex() {
        let plate = t("NAME:Plate, TYPE:HEAVY ARMOUR, AC:18");
        assert_eq!(compose_armour_class(4, &[&plate], &[]), 18);
        assert_eq!(compose_armour_class(-2, &[&plate], &[]), 18);
    }

    #[test]
    fn best_armour_wins_and_modifiers_stack() {
        let leather = t("NAME:Leather, TYPE:LIGHT ARMOUR, AC:11, AC_BONUS:1");
        let chain = t("NAME:Chain mail, TYPE:HEAVY ARMOUR, AC:16");
        let shield = t("NAME:Shield, TYPE:SHIELD, AC_BONUS:2");
        let cursed = t("NAME:Rusty buckler, TYPE:SHIELD, AC_BONUS:-1");
        assert_eq!(
            compose_armour_class(3, &[&leather, &chain], &[&shield, &cursed]),
            16 + 1 + 2 - 1
        );
    }
}
