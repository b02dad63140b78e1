//! Edge-triggered session tracking for container blocks.
//!
//! A session is the run of consecutive ticks during which a container has at
//! least one viewer. The tracker is sampled once per tick with the current
//! viewer set and reports the open and close edges of each session.
//!
//! Closure is detected by polling: the tick that reports `Closed` is the first
//! tick on which no viewer is attached, so anything sampled alongside it (the
//! stack count in particular) reflects the container one tick after the last
//! viewer left.

use serde::{Deserialize, Serialize};
use tutorial_core::ViewerId;

/// Lifecycle event produced by [`ContainerSessionTracker::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    /// First tick with at least one viewer after a tick with none.
    Opened {
        /// Viewer the new session is attributed to.
        viewer: ViewerId,
    },
    /// First tick with no viewers after a tick with at least one.
    Closed {
        /// Last viewer seen during the session.
        viewer: ViewerId,
        /// Non-empty slots sampled on the closing tick.
        stack_count: u32,
    },
    /// No edge this tick.
    NoChange,
}

impl SessionEvent {
    /// Short label used in event logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionEvent::Opened { .. } => "SessionOpened",
            SessionEvent::Closed { .. } => "SessionClosed",
            SessionEvent::NoChange => "NoChange",
        }
    }

    /// Whether this event marks an edge.
    pub fn is_edge(&self) -> bool {
        !matches!(self, SessionEvent::NoChange)
    }
}

/// Two-state (open/closed) tracker owned by a single container block.
///
/// `last_viewer` is `None` before the first session and after every `Closed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSessionTracker {
    is_open: bool,
    last_viewer: Option<ViewerId>,
}

impl ContainerSessionTracker {
    /// Create a tracker with no session in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the previous observation saw at least one viewer.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Viewer the current session is attributed to, if one is open.
    pub fn last_viewer(&self) -> Option<ViewerId> {
        self.last_viewer
    }

    /// Sample this tick's viewers and container fill, returning exactly one event.
    ///
    /// Every viewer in `active_viewers` overwrites the attributed viewer in
    /// iteration order, so with several concurrent viewers the last one yielded
    /// wins. For ordered sets that is the highest id.
    pub fn observe<I>(&mut self, active_viewers: I, stack_count: u32) -> SessionEvent
    where
        I: IntoIterator<Item = ViewerId>,
    {
        let mut is_open_now = false;
        for viewer in active_viewers {
            self.last_viewer = Some(viewer);
            is_open_now = true;
        }

        let event = match (self.is_open, is_open_now) {
            (false, true) => match self.last_viewer {
                Some(viewer) => SessionEvent::Opened { viewer },
                None => SessionEvent::NoChange,
            },
            (true, false) => match self.last_viewer.take() {
                Some(viewer) => SessionEvent::Closed {
                    viewer,
                    stack_count,
                },
                None => SessionEvent::NoChange,
            },
            _ => SessionEvent::NoChange,
        };

        self.is_open = is_open_now;
        event
    }

    /// End any open session as if every viewer had left this tick.
    ///
    /// Used when the owning container disappears mid-session.
    pub fn force_close(&mut self, stack_count: u32) -> SessionEvent {
        self.observe(std::iter::empty(), stack_count)
    }
}
