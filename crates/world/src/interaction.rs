//! Use-key interactions with blocks.
//!
//! Interactions are registered by key and run when a viewer presses the use
//! key on a block whose definition names them.

use crate::panel::{EnchantTablePanel, PageManager};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tutorial_core::{RegistryKey, ViewerId};

/// Integer block coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlockPos {
    /// X.
    pub x: i32,
    /// Y.
    pub y: i32,
    /// Z.
    pub z: i32,
}

impl BlockPos {
    /// Create a position.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Who triggered an interaction and where.
///
/// The viewer fields are optional because the triggering entity is not always
/// a connected player.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionContext {
    /// Triggering viewer.
    pub viewer: Option<ViewerId>,
    /// Display name of the triggering viewer.
    pub username: Option<String>,
    /// Block the interaction targets.
    pub target: BlockPos,
}

/// Behaviour run when a viewer uses a block.
pub trait BlockInteraction {
    /// Key block definitions use to reference this interaction.
    fn key(&self) -> RegistryKey;

    /// Run the interaction. Returns whether anything happened.
    fn interact_with_block(&self, ctx: &InteractionContext, pages: &mut PageManager) -> bool;
}

/// Opens the enchant table panel for the interacting viewer.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnchantTableInteraction;

/// Registry path of [`EnchantTableInteraction`].
pub const ENCHANT_TABLE_INTERACTION: &str = "enchant_table_interaction";

impl BlockInteraction for EnchantTableInteraction {
    fn key(&self) -> RegistryKey {
        RegistryKey::parse(ENCHANT_TABLE_INTERACTION)
            .unwrap_or_else(|err| unreachable!("static key is valid: {err}"))
    }

    fn interact_with_block(&self, ctx: &InteractionContext, pages: &mut PageManager) -> bool {
        let Some(viewer) = ctx.viewer else {
            warn!(pos = ?ctx.target, "enchant table used without a viewer");
            return false;
        };
        let Some(username) = ctx.username.as_deref() else {
            warn!(%viewer, "enchant table used by a viewer without a name");
            return false;
        };

        info!(%viewer, %username, "opening enchant panel");
        if pages
            .open_custom_page(EnchantTablePanel::new(viewer, username))
            .is_some()
        {
            info!(%viewer, "replaced previously open panel");
        }
        true
    }
}
