//! Block behaviours for the tutorial blocks: container sessions, the trash
//! block, the enchant table panel and the block registry.

mod blocks;
mod container;
mod interaction;
mod notice;
mod panel;
mod session;
mod trash;

pub use blocks::*;
pub use container::*;
pub use interaction::*;
pub use notice::*;
pub use panel::*;
pub use session::*;
pub use trash::*;
