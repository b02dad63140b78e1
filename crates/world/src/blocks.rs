//! Registry of the tutorial blocks and what each one does.
//!
//! Three kinds of custom block are supported:
//! - custom UI blocks, which run a registered interaction on use,
//! - container blocks, which carry storage and session tracking,
//! - crafting benches, which are pure data and need no runtime state.

use crate::interaction::{BlockInteraction, EnchantTableInteraction};
use crate::trash::TrashBlock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::info;
use tutorial_core::{RegistryKey, RegistryKeyError};

/// How a registered block behaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockBehavior {
    /// Runs `interaction` when used.
    CustomUi {
        /// Registered interaction key.
        interaction: RegistryKey,
    },
    /// Holds items in `capacity` slots and tracks viewing sessions.
    Container {
        /// Slot count.
        capacity: usize,
    },
    /// Crafting bench; recipes are looked up by category by the host.
    Bench {
        /// Recipe categories offered at this bench.
        categories: Vec<String>,
        /// Bench tier gating recipes.
        tier: u8,
    },
}

/// A block definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorialBlock {
    /// Block id.
    pub key: RegistryKey,
    /// Behaviour.
    pub behavior: BlockBehavior,
}

/// Error registering a block.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A block with the same key is already registered.
    #[error("block {0} is already registered")]
    Duplicate(RegistryKey),
    /// A container block was declared with no slots.
    #[error("container block {0} must have at least one slot")]
    ZeroCapacity(RegistryKey),
    /// A custom UI block names an interaction nobody registered.
    #[error("block {block} references unknown interaction {interaction}")]
    UnknownInteraction {
        /// Offending block.
        block: RegistryKey,
        /// Missing interaction.
        interaction: RegistryKey,
    },
    /// A key failed to parse.
    #[error(transparent)]
    Key(#[from] RegistryKeyError),
}

/// Settings the tutorial blocks are built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSettings {
    /// Slot count of the trash block.
    pub trash_capacity: usize,
    /// Crafting bench tier.
    pub bench_tier: u8,
    /// Crafting bench recipe categories.
    pub bench_categories: Vec<String>,
}

impl Default for BlockSettings {
    fn default() -> Self {
        Self {
            trash_capacity: crate::container::DEFAULT_CONTAINER_CAPACITY,
            bench_tier: 1,
            bench_categories: vec!["tutorial".to_string()],
        }
    }
}

/// Registered interactions and blocks, iterated in key order.
#[derive(Default)]
pub struct BlockRegistry {
    interactions: BTreeMap<RegistryKey, Box<dyn BlockInteraction>>,
    blocks: BTreeMap<RegistryKey, TutorialBlock>,
}

impl BlockRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an interaction under its own key.
    pub fn register_interaction(
        &mut self,
        interaction: Box<dyn BlockInteraction>,
    ) -> Result<(), RegistryError> {
        let key = interaction.key();
        if self.interactions.contains_key(&key) {
            return Err(RegistryError::Duplicate(key));
        }
        info!(%key, "interaction registered");
        self.interactions.insert(key, interaction);
        Ok(())
    }

    /// Register a block definition.
    pub fn register_block(&mut self, block: TutorialBlock) -> Result<(), RegistryError> {
        if self.blocks.contains_key(&block.key) {
            return Err(RegistryError::Duplicate(block.key));
        }
        match &block.behavior {
            BlockBehavior::Container { capacity: 0 } => {
                return Err(RegistryError::ZeroCapacity(block.key));
            }
            BlockBehavior::CustomUi { interaction }
                if !self.interactions.contains_key(interaction) =>
            {
                return Err(RegistryError::UnknownInteraction {
                    block: block.key.clone(),
                    interaction: interaction.clone(),
                });
            }
            _ => {}
        }
        info!(key = %block.key, behavior = ?block.behavior, "block registered");
        self.blocks.insert(block.key.clone(), block);
        Ok(())
    }

    /// Look up a block definition.
    pub fn block(&self, key: &RegistryKey) -> Option<&TutorialBlock> {
        self.blocks.get(key)
    }

    /// Look up an interaction.
    pub fn interaction(&self, key: &RegistryKey) -> Option<&dyn BlockInteraction> {
        self.interactions.get(key).map(|interaction| interaction.as_ref())
    }

    /// Interaction run when `block` is used, if it has one.
    pub fn interaction_for(&self, block: &RegistryKey) -> Option<&dyn BlockInteraction> {
        match &self.blocks.get(block)?.behavior {
            BlockBehavior::CustomUi { interaction } => self.interaction(interaction),
            _ => None,
        }
    }

    /// Fresh container state for a newly placed container block.
    pub fn create_container(&self, block: &RegistryKey) -> Option<TrashBlock> {
        match self.blocks.get(block)?.behavior {
            BlockBehavior::Container { capacity } => Some(TrashBlock::trash(capacity)),
            _ => None,
        }
    }

    /// Registered blocks in key order.
    pub fn blocks(&self) -> impl Iterator<Item = &TutorialBlock> {
        self.blocks.values()
    }

    /// Number of registered blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether no blocks are registered.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Key of the enchant table block.
pub const ENCHANT_TABLE_BLOCK: &str = "tutorial:enchant_table";
/// Key of the trash block.
pub const TRASH_BLOCK: &str = "tutorial:trash_block";
/// Key of the crafting bench block.
pub const CRAFT_TABLE_BLOCK: &str = "tutorial:craft_table";

/// Build a registry holding the enchant table, the trash block and the
/// crafting bench.
pub fn tutorial_blocks(settings: &BlockSettings) -> Result<BlockRegistry, RegistryError> {
    let mut registry = BlockRegistry::new();
    let enchant = EnchantTableInteraction;
    let interaction = enchant.key();
    registry.register_interaction(Box::new(enchant))?;

    registry.register_block(TutorialBlock {
        key: RegistryKey::parse(ENCHANT_TABLE_BLOCK)?,
        behavior: BlockBehavior::CustomUi { interaction },
    })?;
    registry.register_block(TutorialBlock {
        key: RegistryKey::parse(TRASH_BLOCK)?,
        behavior: BlockBehavior::Container {
            capacity: settings.trash_capacity,
        },
    })?;
    registry.register_block(TutorialBlock {
        key: RegistryKey::parse(CRAFT_TABLE_BLOCK)?,
        behavior: BlockBehavior::Bench {
            categories: settings.bench_categories.clone(),
            tier: settings.bench_tier,
        },
    })?;
    Ok(registry)
}
