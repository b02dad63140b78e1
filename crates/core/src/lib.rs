#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod item;
pub mod registry;

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use item::{ItemId, ItemStack, DEFAULT_STACK_SIZE};
pub use registry::{RegistryKey, RegistryKeyError, DEFAULT_NAMESPACE};

/// Fixed tick type (20 TPS => 50 ms per tick).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick in any deterministic timeline.
    pub const ZERO: Self = Self(0);

    /// Ticks simulated per second by the host loop.
    pub const PER_SECOND: u64 = 20;

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}

impl fmt::Display for SimTick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Opaque identity of an actor that can have a container or panel open.
///
/// Ordering is numeric so viewer sets iterate deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ViewerId(pub u64);

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "viewer#{}", self.0)
    }
}
