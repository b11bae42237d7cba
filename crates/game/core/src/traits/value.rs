//! Trait values and the ingestion rules that produce them.
//!
//! Raw input (definition strings, JSON payloads, programmatic `set` calls)
//! arrives as a [`RawTrait`]. [`ingest`] applies the key-family rules once so
//! downstream code pattern-matches a [`TraitValue`] instead of re-parsing.

use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize, Serializer};
use strum::{Display, EnumString};

use crate::dice::DiceExpr;

/// Hit dice used when a definition carries something unreadable.
pub const DEFAULT_HIT_DICE: DiceExpr = DiceExpr::new(1, 6, 0);

/// Unit appended to resolved `VALUE` traits.
pub const VALUE_UNIT: &str = "SP";

/// Keys whose values keep their original case.
pub const FREE_TEXT_KEYS: &[&str] = &[
    "NAME",
    "REWARD",
    "DESCRIPTION",
    "UNKNOWN_NAME",
    "UNKNOWN_DESCRIPTION",
    "ENGRAVING",
    "INTRO",
    "MESSAGE",
];

/// A parsed trait value.
#[derive(Clone, Debug, PartialEq)]
pub enum TraitValue {
    Int(i64),
    Float(f64),
    Flag(bool),
    Dice(DiceExpr),
    List(Vec<String>),
    Text(String),
}

impl TraitValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Float(f) => Some(f.trunc() as i64),
            Self::Text(t) => leading_int(t),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(t) => leading_float(t),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            Self::Flag(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Text(t) => t.eq_ignore_ascii_case("TRUE") || t.eq_ignore_ascii_case("YES"),
            _ => false,
        }
    }

    pub fn as_dice(&self) -> Option<DiceExpr> {
        match self {
            Self::Dice(d) => Some(*d),
            Self::Int(i) if *i > 0 => Some(DiceExpr::new(1, 1, (*i - 1) as i32)),
            _ => None,
        }
    }
}

impl fmt::Display for TraitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) if v.fract() == 0.0 && v.is_finite() => write!(f, "{v:.1}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Flag(true) => f.write_str("TRUE"),
            Self::Flag(false) => f.write_str("FALSE"),
            Self::Dice(d) => write!(f, "{d}"),
            Self::List(items) => f.write_str(&items.join(" & ")),
            Self::Text(t) => f.write_str(t),
        }
    }
}

impl Serialize for TraitValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::Flag(b) => serializer.serialize_bool(*b),
            Self::Dice(d) => serializer.collect_str(d),
            Self::List(items) => items.serialize(serializer),
            Self::Text(t) => serializer.serialize_str(t),
        }
    }
}

/// Unparsed input for a trait.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawTrait {
    Bool(bool),
    Int(i64),
    Float(f64),
    List(Vec<String>),
    Str(String),
}

impl From<&str> for RawTrait {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for RawTrait {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for RawTrait {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for RawTrait {
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<u32> for RawTrait {
    fn from(value: u32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<f64> for RawTrait {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for RawTrait {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<String>> for RawTrait {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<DiceExpr> for RawTrait {
    fn from(value: DiceExpr) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<TraitValue> for RawTrait {
    fn from(value: TraitValue) -> Self {
        match value {
            TraitValue::Int(i) => Self::Int(i),
            TraitValue::Float(f) => Self::Float(f),
            TraitValue::Flag(b) => Self::Bool(b),
            TraitValue::Dice(d) => Self::Str(d.to_string()),
            TraitValue::List(items) => Self::List(items),
            TraitValue::Text(t) => Self::Str(t),
        }
    }
}

/// Named difficulty classes accepted by the `DC` trait.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    VeryEasy,
    Easy,
    Medium,
    Hard,
    VeryHard,
    NearlyImpossible,
}

impl Difficulty {
    /// Difficulty class for a named band.
    pub const fn class(self) -> i64 {
        match self {
            Self::VeryEasy => 5,
            Self::Easy => 10,
            Self::Medium => 15,
            Self::Hard => 20,
            Self::VeryHard => 25,
            Self::NearlyImpossible => 30,
        }
    }
}

/// DC assigned to unrecognised difficulty names.
pub const UNKNOWN_DIFFICULTY_CLASS: i64 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KeyFamily {
    Damage,
    HitDice,
    DifficultyClass,
    Value,
    Proficiency,
    General,
}

impl KeyFamily {
    fn of(key: &str) -> Self {
        match key {
            "HIT_DICE" => Self::HitDice,
            "DC" => Self::DifficultyClass,
            "VALUE" => Self::Value,
            "PROF" => Self::Proficiency,
            k if k.starts_with("DMG") || k.starts_with("HP_GAIN") => Self::Damage,
            _ => Self::General,
        }
    }
}

pub(crate) fn is_free_text(key: &str) -> bool {
    FREE_TEXT_KEYS.contains(&key)
}

/// Converts raw input into a value according to the rules of `key`'s family.
///
/// `key` must already be normalized (uppercase, no leading underscore).
pub(crate) fn ingest<R: Rng + ?Sized>(key: &str, raw: RawTrait, rng: &mut R) -> TraitValue {
    match KeyFamily::of(key) {
        KeyFamily::Damage => ingest_damage(key, raw),
        KeyFamily::HitDice => ingest_hit_dice(raw),
        KeyFamily::DifficultyClass => ingest_difficulty(raw),
        KeyFamily::Value => ingest_value(raw, rng),
        KeyFamily::Proficiency => ingest_proficiency(raw),
        KeyFamily::General => ingest_general(key, raw),
    }
}

fn ingest_damage(key: &str, raw: RawTrait) -> TraitValue {
    match raw {
        RawTrait::Int(i) => TraitValue::Int(i),
        RawTrait::Float(f) => TraitValue::Int(f.trunc() as i64),
        RawTrait::Str(s) => {
            let s = s.trim();
            if let Some(i) = parse_int(s) {
                TraitValue::Int(i)
            } else if let Ok(dice) = DiceExpr::parse(s) {
                TraitValue::Dice(dice)
            } else {
                tracing::debug!("invalid dice '{}' for {}, using 0", s, key);
                TraitValue::Int(0)
            }
        }
        RawTrait::Bool(_) | RawTrait::List(_) => TraitValue::Int(0),
    }
}

fn ingest_hit_dice(raw: RawTrait) -> TraitValue {
    match raw {
        RawTrait::Str(s) => match DiceExpr::parse(&s) {
            Ok(dice) => TraitValue::Dice(dice),
            Err(_) => {
                tracing::debug!("invalid hit dice '{}', using {}", s, DEFAULT_HIT_DICE);
                TraitValue::Dice(DEFAULT_HIT_DICE)
            }
        },
        _ => TraitValue::Dice(DEFAULT_HIT_DICE),
    }
}

fn ingest_difficulty(raw: RawTrait) -> TraitValue {
    match raw {
        RawTrait::Int(i) => TraitValue::Int(i),
        RawTrait::Float(f) => TraitValue::Int(f.trunc() as i64),
        RawTrait::Str(s) => {
            let s = s.trim().to_ascii_uppercase();
            if let Some(i) = parse_int(&s) {
                TraitValue::Int(i)
            } else {
                let class = s
                    .parse::<Difficulty>()
                    .map(Difficulty::class)
                    .unwrap_or(UNKNOWN_DIFFICULTY_CLASS);
                TraitValue::Int(class)
            }
        }
        RawTrait::Bool(_) | RawTrait::List(_) => TraitValue::Int(UNKNOWN_DIFFICULTY_CLASS),
    }
}

fn ingest_value<R: Rng + ?Sized>(raw: RawTrait, rng: &mut R) -> TraitValue {
    let amount = match raw {
        RawTrait::Int(i) => i,
        RawTrait::Float(f) => f.trunc() as i64,
        RawTrait::Str(s) => {
            let s = s.trim().to_ascii_uppercase();
            if let Some(i) = parse_int(&s) {
                i
            } else if let Ok(dice) = DiceExpr::parse(&s) {
                dice.roll(rng).max(0)
            } else {
                return TraitValue::Text(s);
            }
        }
        RawTrait::Bool(_) | RawTrait::List(_) => 0,
    };
    TraitValue::Text(format!("{amount} {VALUE_UNIT}"))
}

fn ingest_proficiency(raw: RawTrait) -> TraitValue {
    let tags = match raw {
        RawTrait::Str(s) => s
            .split('&')
            .map(|tag| tag.trim().to_ascii_uppercase())
            .filter(|tag| !tag.is_empty())
            .collect(),
        RawTrait::List(items) => items
            .into_iter()
            .map(|tag| tag.trim().to_ascii_uppercase())
            .filter(|tag| !tag.is_empty())
            .collect(),
        other => vec![ingest_general("PROF", other).to_string()],
    };
    TraitValue::List(tags)
}

fn ingest_general(key: &str, raw: RawTrait) -> TraitValue {
    let free_text = is_free_text(key);
    match raw {
        RawTrait::Bool(b) => TraitValue::Flag(b),
        RawTrait::Int(i) => TraitValue::Int(i),
        RawTrait::Float(f) => TraitValue::Float(f),
        RawTrait::List(items) if free_text => TraitValue::List(items),
        RawTrait::List(items) => {
            TraitValue::List(items.into_iter().map(|i| i.to_ascii_uppercase()).collect())
        }
        RawTrait::Str(s) if free_text => TraitValue::Text(s.trim().to_string()),
        RawTrait::Str(s) => {
            let s = s.trim().to_ascii_uppercase();
            if let Some(i) = parse_int(&s) {
                TraitValue::Int(i)
            } else if let Some(f) = parse_float(&s) {
                TraitValue::Float(f)
            } else if let Some(b) = parse_flag(&s) {
                TraitValue::Flag(b)
            } else if let Ok(dice) = DiceExpr::parse(&s) {
                TraitValue::Dice(dice)
            } else {
                TraitValue::Text(s)
            }
        }
    }
}

fn parse_int(s: &str) -> Option<i64> {
    s.parse::<i64>().ok()
}

fn parse_float(s: &str) -> Option<f64> {
    let numeric = !s.is_empty()
        && s.contains('.')
        && s
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'));
    if numeric { s.parse::<f64>().ok() } else { None }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s {
        "TRUE" | "YES" => Some(true),
        "FALSE" | "NO" => Some(false),
        _ => None,
    }
}

/// Leading integer of a string, the way `"7 SP"` reads as 7.
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let end = s
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || (*i == 0 && matches!(*c, '-' | '+')))
        .map(|(i, c)| i + c.len_utf8())
        .last()?;
    s[..end].parse().ok()
}

fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let end = s
        .char_indices()
        .take_while(|(i, c)| {
            c.is_ascii_digit() || *c == '.' || (*i == 0 && matches!(*c, '-' | '+'))
        })
        .map(|(i, c)| i + c.len_utf8())
        .last()?;
    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ingest_str(key: &str, raw: &str) -> TraitValue {
        ingest(key, raw.into(), &mut StdRng::seed_from_u64(1))
    }

    #[test]
    fn general_values_are_typed_and_uppercased() {
        assert_eq!(ingest_str("STR", "14"), TraitValue::Int(14));
        assert_eq!(ingest_str("FX_STR", "+2"), TraitValue::Int(2));
        assert_eq!(ingest_str("WEIGHT", "1.5"), TraitValue::Float(1.5));
        assert_eq!(ingest_str("UNDEAD", "yes"), TraitValue::Flag(true));
        assert_eq!(ingest_str("TYPE", "simple melee"), TraitValue::Text("SIMPLE MELEE".into()));
        assert_eq!(
            ingest_str("FX_TOXIC_DMG", "1d4"),
            TraitValue::Dice(DiceExpr::new(1, 4, 0))
        );
    }

    #[test]
    fn free_text_keeps_case() {
        assert_eq!(ingest_str("NAME", " Grim Goblin "), TraitValue::Text("Grim Goblin".into()));
        assert_eq!(ingest_str("REWARD", "A shiny Key"), TraitValue::Text("A shiny Key".into()));
    }

    #[test]
    fn damage_family_falls_back_to_zero() {
        assert_eq!(ingest_str("DMG", "1D6 + 27"), TraitValue::Dice(DiceExpr::new(1, 6, 27)));
        assert_eq!(ingest_str("DMG2", "4"), TraitValue::Int(4));
        assert_eq!(ingest_str("DMG", "lots"), TraitValue::Int(0));
        assert_eq!(ingest_str("HP_GAIN", "2d4"), TraitValue::Dice(DiceExpr::new(2, 4, 0)));
    }

    #[test]
    fn hit_dice_fall_back_to_d6() {
        assert_eq!(ingest_str("HIT_DICE", "2D10"), TraitValue::Dice(DiceExpr::new(2, 10, 0)));
        assert_eq!(ingest_str("HIT_DICE", "rubbish"), TraitValue::Dice(DEFAULT_HIT_DICE));
    }

    #[test]
    fn difficulty_bands_map_to_classes() {
        let cases = [
            ("VERY_EASY", 5),
            ("easy", 10),
            ("MEDIUM", 15),
            ("HARD", 20),
            ("VERY_HARD", 25),
            ("NEARLY_IMPOSSIBLE", 30),
            ("TRIVIAL", 1),
            ("17", 17),
        ];
        for (raw, class) in cases {
            assert_eq!(ingest_str("DC", raw), TraitValue::Int(class), "{raw}");
        }
    }

    #[test]
    fn value_is_resolved_and_suffixed() {
        assert_eq!(ingest_str("VALUE", "12"), TraitValue::Text("12 SP".into()));
        assert_eq!(ingest_str("VALUE", "7 sp"), TraitValue::Text("7 SP".into()));
        match ingest_str("VALUE", "2D6") {
            TraitValue::Text(t) => {
                let amount = leading_int(&t).unwrap();
                assert!((2..=12).contains(&amount));
                assert!(t.ends_with(" SP"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn proficiency_splits_on_ampersand() {
        assert_eq!(
            ingest_str("PROF", "simple melee & Martial&LIGHT ARMOUR"),
            TraitValue::List(vec![
                "SIMPLE MELEE".into(),
                "MARTIAL".into(),
                "LIGHT ARMOUR".into()
            ])
        );
    }

    #[test]
    fn leading_numbers_follow_loose_parsing() {
        assert_eq!(leading_int("7 SP"), Some(7));
        assert_eq!(leading_int("-3 X"), Some(-3));
        assert_eq!(leading_int("SP"), None);
        assert_eq!(leading_float("2.5 FT"), Some(2.5));
    }
}
