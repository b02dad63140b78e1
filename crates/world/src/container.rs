//! Fixed-capacity item storage for container blocks.
//!
//! Slots are ordered and individually optional. Capacity is fixed at
//! construction; the trash block uses 27 slots (3 rows × 9 columns).

use serde::{Deserialize, Serialize};
use tutorial_core::ItemStack;

/// Default slot count for container blocks.
pub const DEFAULT_CONTAINER_CAPACITY: usize = 27;

/// Ordered, fixed-capacity sequence of optional item stacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemContainer {
    slots: Vec<Option<ItemStack>>,
}

impl Default for ItemContainer {
    fn default() -> Self {
        Self::new(DEFAULT_CONTAINER_CAPACITY)
    }
}

impl ItemContainer {
    /// Create an empty container with `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Get an item stack from a slot.
    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Set an item stack in a slot. Returns `false` if the slot is out of range.
    pub fn set(&mut self, slot: usize, stack: Option<ItemStack>) -> bool {
        match self.slots.get_mut(slot) {
            Some(entry) => {
                *entry = stack.filter(|s| s.count > 0);
                true
            }
            None => false,
        }
    }

    /// Take an item stack from a slot, leaving it empty.
    pub fn take(&mut self, slot: usize) -> Option<ItemStack> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Add a stack, merging into existing stacks first and then filling the
    /// first empty slot. Returns whatever did not fit.
    pub fn add_item(&mut self, mut stack: ItemStack) -> Option<ItemStack> {
        if stack.count == 0 {
            return None;
        }

        for existing in self.slots.iter_mut().flatten() {
            if existing.can_merge(&stack) && !existing.is_full() {
                stack.count = existing.add(stack.count);
                if stack.count == 0 {
                    return None;
                }
            }
        }

        match self.slots.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(stack);
                None
            }
            None => Some(stack),
        }
    }

    /// Number of non-empty slots.
    pub fn stack_count(&self) -> u32 {
        self.slots.iter().filter(|slot| slot.is_some()).count() as u32
    }

    /// Total item count across all slots.
    pub fn total_items(&self) -> u32 {
        self.slots
            .iter()
            .flatten()
            .map(|stack| u32::from(stack.count))
            .sum()
    }

    /// Check if the container holds nothing.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Empty every slot, returning how many stacks were removed.
    pub fn clear(&mut self) -> u32 {
        let removed = self.stack_count();
        self.slots.iter_mut().for_each(|slot| *slot = None);
        removed
    }
}
