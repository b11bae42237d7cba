//! Artefact storage, money and equipping.
//!
//! Every actor that can carry things owns a [`StoreManager`]. Equipping is a
//! flag on the stored artefact; [`StoreManager::equipment`] groups the flagged
//! items for [`CharacterTraits::utilise_additional_traits`].
//!
//! [`CharacterTraits::utilise_additional_traits`]: crate::character::CharacterTraits::utilise_additional_traits

use serde::{Deserialize, Serialize};

use super::artefact::{Artefact, ArtefactKind};
use crate::character::Equipment;
use crate::error::StoreError;
use crate::traits::Traits;

/// Slots available when the owner has no `STORAGE` trait.
pub const DEFAULT_CAPACITY: usize = 10;

/// Weapons and shields share two hands.
pub const MAX_HANDS: usize = 2;
pub const MAX_ARMOUR: usize = 1;
/// Attunement limit for magic items.
pub const MAX_ATTUNED: usize = 3;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreManager {
    artefacts: Vec<Artefact>,
    capacity: usize,
    money: i64,
}

impl StoreManager {
    pub fn new(capacity: usize, money: i64) -> Self {
        Self {
            artefacts: Vec::new(),
            capacity,
            money: money.max(0),
        }
    }

    /// Capacity from `STORAGE`, money from `SP`.
    pub fn for_traits(traits: &Traits) -> Self {
        let capacity = traits.get_int_or("STORAGE", DEFAULT_CAPACITY as i64).max(0) as usize;
        Self::new(capacity, traits.get_int("SP"))
    }

    pub fn artefacts(&self) -> &[Artefact] {
        &self.artefacts
    }

    pub fn get(&self, slot: usize) -> Option<&Artefact> {
        self.artefacts.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Artefact> {
        self.artefacts.get_mut(slot)
    }

    pub fn len(&self) -> usize {
        self.artefacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artefacts.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn free_space(&self) -> usize {
        self.capacity.saturating_sub(self.artefacts.len())
    }

    pub fn is_full(&self) -> bool {
        self.free_space() == 0
    }

    pub fn money(&self) -> i64 {
        self.money
    }

    // ========================================================================
    // Artefacts
    // ========================================================================

    pub fn add(&mut self, artefact: Artefact) -> Result<usize, StoreError> {
        if self.is_full() {
            return Err(StoreError::StoreFull {
                capacity: self.capacity,
            });
        }
        self.artefacts.push(artefact);
        Ok(self.artefacts.len() - 1)
    }

    /// Removes the artefact in `slot`, unequipping it.
    pub fn take(&mut self, slot: usize) -> Result<Artefact, StoreError> {
        if slot >= self.artefacts.len() {
            return Err(StoreError::SlotOutOfRange(slot));
        }
        let mut artefact = self.artefacts.remove(slot);
        artefact.equipped = false;
        Ok(artefact)
    }

    /// Slot of the first artefact called `name`, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.artefacts
            .iter()
            .position(|a| a.name().eq_ignore_ascii_case(name))
    }

    pub fn take_by_name(&mut self, name: &str) -> Option<Artefact> {
        let slot = self.find_by_name(name)?;
        self.take(slot).ok()
    }

    // ========================================================================
    // Money
    // ========================================================================

    pub fn credit(&mut self, amount: i64) {
        self.money += amount.max(0);
    }

    pub fn debit(&mut self, amount: i64) -> Result<(), StoreError> {
        if amount > self.money {
            return Err(StoreError::InsufficientFunds {
                price: amount,
                available: self.money,
            });
        }
        self.money -= amount.max(0);
        Ok(())
    }

    // ========================================================================
    // Equipment
    // ========================================================================

    fn equipped_count(&self, kinds: &[ArtefactKind]) -> usize {
        self.artefacts
            .iter()
            .filter(|a| a.equipped && kinds.contains(&a.kind))
            .count()
    }

    /// Flips the equipped flag of `slot`. Returns the new state.
    pub fn toggle_equip(&mut self, slot: usize) -> Result<bool, StoreError> {
        let artefact = self.get(slot).ok_or(StoreError::SlotOutOfRange(slot))?;
        let (kind, name) = (artefact.kind, artefact.name());
        if artefact.equipped {
            self.artefacts[slot].equipped = false;
            return Ok(false);
        }

        let limit = match kind {
            ArtefactKind::Weapon | ArtefactKind::Shield => Some((
                self.equipped_count(&[ArtefactKind::Weapon, ArtefactKind::Shield]),
                MAX_HANDS,
                "both hands are full",
            )),
            ArtefactKind::Armour => Some((
                self.equipped_count(&[ArtefactKind::Armour]),
                MAX_ARMOUR,
                "already wearing armour",
            )),
            ArtefactKind::Magic => Some((
                self.equipped_count(&[ArtefactKind::Magic]),
                MAX_ATTUNED,
                "too many magic items attuned",
            )),
            ArtefactKind::Spell => None,
            _ => return Err(StoreError::NotEquippable(name)),
        };
        if let Some((in_use, max, reason)) = limit {
            if in_use >= max {
                return Err(StoreError::EquipLimit { name, reason });
            }
        }
        self.artefacts[slot].equipped = true;
        Ok(true)
    }

    pub fn unequip_all(&mut self) {
        for artefact in &mut self.artefacts {
            artefact.equipped = false;
        }
    }

    /// Equipped items grouped for trait recomputation.
    pub fn equipment(&self) -> Equipment<'_> {
        let mut equipment = Equipment::default();
        for artefact in self.artefacts.iter().filter(|a| a.equipped) {
            let slot = match artefact.kind {
                ArtefactKind::Weapon => &mut equipment.weapons,
                ArtefactKind::Armour => &mut equipment.armour,
                ArtefactKind::Shield => &mut equipment.shields,
                ArtefactKind::Magic => &mut equipment.magic,
                _ => continue,
            };
            slot.push(&artefact.traits);
        }
        equipment
    }

    /// Slots of prepared spells.
    pub fn prepared_spells(&self) -> Vec<usize> {
        self.artefacts
            .iter()
            .enumerate()
            .filter(|(_, a)| a.equipped && a.kind == ArtefactKind::Spell)
            .map(|(slot, _)| slot)
            .collect()
    }
}

/// Moves the artefact in `slot` from `seller` to `buyer` for its `VALUE`.
///
/// Nothing changes unless the buyer can both pay and carry it.
pub fn purchase(
    buyer: &mut StoreManager,
    seller: &mut StoreManager,
    slot: usize,
) -> Result<Artefact, StoreError> {
    let artefact = seller.get(slot).ok_or(StoreError::SlotOutOfRange(slot))?;
    let price = artefact.value();
    if buyer.is_full() {
        return Err(StoreError::StoreFull {
            capacity: buyer.capacity,
        });
    }
    buyer.debit(price)?;
    let artefact = seller.take(slot)?;
    seller.credit(price);
    buyer.artefacts.push(artefact.clone());
    Ok(artefact)
}
