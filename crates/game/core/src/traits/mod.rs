//! Typed key/value property bags.
//!
//! [`Traits`] underlies every actor, weapon, armour and spell. Definitions are
//! written as `KEY:VALUE` pairs (`"NAME:Goblin, STR:8, DMG:1D6"`) and parsed
//! once on ingestion; see [`value`] for the key-family rules.
//!
//! Keys are case-insensitive. A leading underscore marks a *hidden* trait: it
//! is left out of [`Traits::visible_traits`] but otherwise behaves like any
//! other key, so `has("PROP")` and `has("_PROP")` agree.

mod envelope;
pub mod value;

pub use envelope::{Revivable, TraitsEnvelope, revive};
pub use value::{Difficulty, RawTrait, TraitValue};

use std::collections::BTreeMap;
use std::str::FromStr;

use rand::Rng;

use crate::dice::DiceExpr;

/// Distance covered by one grid tile.
pub const FEET_PER_TILE: i64 = 10;

#[derive(Clone, Debug, PartialEq)]
struct TraitEntry {
    key: String,
    hidden: bool,
    value: TraitValue,
}

impl TraitEntry {
    fn display_key(&self) -> String {
        if self.hidden {
            format!("_{}", self.key)
        } else {
            self.key.clone()
        }
    }
}

/// An insertion-ordered bag of parsed traits.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Traits {
    entries: Vec<TraitEntry>,
}

/// Splits a raw key into its canonical form and hidden flag.
fn normalize_key(key: &str) -> (String, bool) {
    let upper = key.trim().to_ascii_uppercase();
    match upper.strip_prefix('_') {
        Some(stripped) => (stripped.to_string(), true),
        None => (upper, false),
    }
}

impl Traits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a definition string of comma-separated `KEY:VALUE` pairs.
    ///
    /// A bare `KEY` without a value is read as the flag `KEY:TRUE`.
    pub fn parse(definition: &str) -> Self {
        Self::parse_with_rng(definition, &mut rand::thread_rng())
    }

    pub fn parse_with_rng<R: Rng + ?Sized>(definition: &str, rng: &mut R) -> Self {
        let mut traits = Self::new();
        for pair in definition.split(',') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            match pair.split_once(':') {
                Some((key, value)) => traits.set_with_rng(key, value.trim(), rng),
                None => traits.set_with_rng(pair, true, rng),
            }
        }
        traits
    }

    /// Builds traits from key/value pairs in order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<RawTrait>,
    {
        let mut traits = Self::new();
        for (key, value) in pairs {
            traits.set(key.as_ref(), value);
        }
        traits
    }

    fn position(&self, key: &str) -> Option<usize> {
        let (canonical, _) = normalize_key(key);
        self.entries.iter().position(|e| e.key == canonical)
    }

    pub fn get(&self, key: &str) -> Option<&TraitValue> {
        self.position(key).map(|i| &self.entries[i].value)
    }

    pub fn get_or(&self, key: &str, default: TraitValue) -> TraitValue {
        self.get(key).cloned().unwrap_or(default)
    }

    pub fn has(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Integer value, or 0 when missing or non-numeric.
    pub fn get_int(&self, key: &str) -> i64 {
        self.get_int_or(key, 0)
    }

    pub fn get_int_or(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(TraitValue::as_int).unwrap_or(default)
    }

    /// Float value, or 0.0 when missing or non-numeric.
    pub fn get_float(&self, key: &str) -> f64 {
        self.get_float_or(key, 0.0)
    }

    pub fn get_float_or(&self, key: &str, default: f64) -> f64 {
        self.get(key)
            .and_then(TraitValue::as_float)
            .unwrap_or(default)
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).is_some_and(TraitValue::as_bool)
    }

    pub fn get_dice(&self, key: &str) -> Option<DiceExpr> {
        self.get(key).and_then(TraitValue::as_dice)
    }

    /// Display form of a value, if present.
    pub fn get_text(&self, key: &str) -> Option<String> {
        self.get(key).map(ToString::to_string)
    }

    pub fn get_list(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(TraitValue::List(items)) => items.clone(),
            Some(other) => vec![other.to_string()],
            None => Vec::new(),
        }
    }

    /// D&D ability modifier: `floor((value - 10) / 2)`.
    pub fn get_as_modifier(&self, key: &str) -> i64 {
        ability_modifier(self.get_int_or(key, 10))
    }

    /// Distance trait in feet converted to whole tiles.
    pub fn get_feet_as_tiles(&self, key: &str) -> i64 {
        (self.get_int(key) / FEET_PER_TILE).max(0)
    }

    /// The `NAME` trait, falling back to `"Unknown"`.
    pub fn name(&self) -> String {
        self.get_text("NAME").unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn set(&mut self, key: &str, value: impl Into<RawTrait>) {
        self.set_with_rng(key, value, &mut rand::thread_rng());
    }

    pub fn set_with_rng<R: Rng + ?Sized>(
        &mut self,
        key: &str,
        value: impl Into<RawTrait>,
        rng: &mut R,
    ) {
        let (canonical, hidden) = normalize_key(key);
        if canonical.is_empty() {
            return;
        }
        let value = value::ingest(&canonical, value.into(), rng);
        match self.entries.iter_mut().find(|e| e.key == canonical) {
            Some(entry) => {
                entry.value = value;
                entry.hidden |= hidden;
            }
            None => self.entries.push(TraitEntry {
                key: canonical,
                hidden,
                value,
            }),
        }
    }

    /// Adds `delta` to an integer trait, optionally clipping at zero.
    ///
    /// Returns the stored result.
    pub fn add_int(&mut self, key: &str, delta: i64, clip_to_zero: bool) -> i64 {
        let mut result = self.get_int(key) + delta;
        if clip_to_zero {
            result = result.max(0);
        }
        self.set(key, result);
        result
    }

    pub fn delete(&mut self, key: &str) -> Option<TraitValue> {
        self.position(key).map(|i| self.entries.remove(i).value)
    }

    /// Removes every trait whose key starts with `prefix`.
    pub fn delete_prefixed(&mut self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !e.key.starts_with(prefix));
        before - self.entries.len()
    }

    /// Snapshot of all traits in insertion order, hidden keys underscored.
    pub fn all_traits(&self) -> Vec<(String, TraitValue)> {
        self.entries
            .iter()
            .map(|e| (e.display_key(), e.value.clone()))
            .collect()
    }

    /// Snapshot of all traits sorted by canonical key.
    pub fn all_traits_sorted(&self) -> BTreeMap<String, TraitValue> {
        self.entries
            .iter()
            .map(|e| (e.key.clone(), e.value.clone()))
            .collect()
    }

    /// Traits suitable for display, excluding hidden keys.
    pub fn visible_traits(&self) -> Vec<(String, TraitValue)> {
        self.entries
            .iter()
            .filter(|e| !e.hidden)
            .map(|e| (e.key.clone(), e.value.clone()))
            .collect()
    }

    /// Canonical `KEY:VALUE, KEY:VALUE` rendering.
    pub fn values_to_string(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{}:{}", e.display_key(), e.value))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }
}

impl FromStr for Traits {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// D&D ability modifier for a score.
pub fn ability_modifier(score: i64) -> i64 {
    (score - 10).div_euclid(2)
}
