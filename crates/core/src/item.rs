//! Item stacks held in container slots.

use serde::{Deserialize, Serialize};

/// Item identifier referencing the host's item table.
pub type ItemId = u16;

/// Maximum stack size for most items.
pub const DEFAULT_STACK_SIZE: u8 = 64;

/// A stack of identical items occupying one container slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item type identifier.
    pub item_id: ItemId,
    /// Number of items in this stack (1-64 typically).
    pub count: u8,
}

impl ItemStack {
    /// Create a new item stack.
    pub fn new(item_id: ItemId, count: u8) -> Self {
        Self { item_id, count }
    }

    /// Check if this stack can merge with another stack.
    pub fn can_merge(&self, other: &ItemStack) -> bool {
        self.item_id == other.item_id
    }

    /// Maximum stack size for this item.
    pub fn max_stack_size(&self) -> u8 {
        DEFAULT_STACK_SIZE
    }

    /// Check if this stack is at max capacity.
    pub fn is_full(&self) -> bool {
        self.count >= self.max_stack_size()
    }

    /// Try to add items to this stack, returning the amount that didn't fit.
    pub fn add(&mut self, amount: u8) -> u8 {
        let space = self.max_stack_size().saturating_sub(self.count);
        let added = amount.min(space);
        self.count += added;
        amount - added
    }

    /// Split this stack, taking the specified amount into a new stack.
    pub fn split(&mut self, amount: u8) -> Option<ItemStack> {
        if amount == 0 || amount > self.count {
            return None;
        }
        self.count -= amount;
        Some(ItemStack::new(self.item_id, amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_caps_at_stack_limit() {
        let mut stack = ItemStack::new(1, 60);
        assert_eq!(stack.add(10), 6);
        assert_eq!(stack.count, 64);
        assert!(stack.is_full());
    }

    #[test]
    fn split_takes_from_stack() {
        let mut stack = ItemStack::new(3, 10);
        let taken = stack.split(4).unwrap();
        assert_eq!(taken, ItemStack::new(3, 4));
        assert_eq!(stack.count, 6);
        assert!(stack.split(0).is_none());
        assert!(stack.split(7).is_none());
    }

    #[test]
    fn only_same_item_merges() {
        assert!(ItemStack::new(1, 1).can_merge(&ItemStack::new(1, 63)));
        assert!(!ItemStack::new(1, 1).can_merge(&ItemStack::new(2, 1)));
    }
}
