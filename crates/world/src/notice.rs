//! Viewer-facing notices and the delivery capability the host provides.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;
use tutorial_core::ViewerId;

/// Message sent to a viewer in response to a block event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum Notice {
    /// A trash session started.
    TrashOpened,
    /// A trash session ended with items that were then destroyed.
    TrashEmptied {
        /// Non-empty slots at close.
        stack_count: u32,
    },
    /// Response to the enchant panel's hello button.
    PanelGreeting {
        /// Name shown in the greeting.
        username: String,
        /// Presses so far on this panel.
        clicks: u32,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::TrashOpened => {
                write!(f, "[Tutorial Trash] Container open! Items are counted on close.")
            }
            Notice::TrashEmptied { stack_count } => write!(
                f,
                "[Tutorial Trash] There were {stack_count} stack(s) in the container! All deleted!"
            ),
            Notice::PanelGreeting { username, clicks } => write!(
                f,
                "[Tutorial Table] Hello {username}! You have pressed it {clicks} time(s)."
            ),
        }
    }
}

/// Failure delivering a notice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    /// The viewer is no longer connected.
    #[error("{0} is no longer connected")]
    ViewerGone(ViewerId),
}

/// Host messaging channel.
pub trait Notifier {
    /// Deliver `notice` to `viewer`.
    fn notify(&mut self, viewer: ViewerId, notice: &Notice) -> Result<(), NotifyError>;
}

/// Deliver a notice, logging instead of propagating failures.
///
/// Returns whether the notice was delivered.
pub fn notify_best_effort(notifier: &mut dyn Notifier, viewer: ViewerId, notice: &Notice) -> bool {
    match notifier.notify(viewer, notice) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(%viewer, %err, "dropping notice");
            false
        }
    }
}

/// A delivered notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveredNotice {
    /// Recipient.
    pub viewer: ViewerId,
    /// Payload.
    pub notice: Notice,
}

/// In-memory notifier that records deliveries.
///
/// Viewers marked disconnected fail delivery with [`NotifyError::ViewerGone`].
#[derive(Debug, Clone, Default)]
pub struct NoticeLog {
    delivered: Vec<DeliveredNotice>,
    disconnected: BTreeSet<ViewerId>,
}

impl NoticeLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make future deliveries to `viewer` fail.
    pub fn disconnect(&mut self, viewer: ViewerId) {
        self.disconnected.insert(viewer);
    }

    /// Notices delivered so far, oldest first.
    pub fn delivered(&self) -> &[DeliveredNotice] {
        &self.delivered
    }

    /// Remove and return everything delivered so far.
    pub fn drain(&mut self) -> Vec<DeliveredNotice> {
        std::mem::take(&mut self.delivered)
    }
}

impl Notifier for NoticeLog {
    fn notify(&mut self, viewer: ViewerId, notice: &Notice) -> Result<(), NotifyError> {
        if self.disconnected.contains(&viewer) {
            return Err(NotifyError::ViewerGone(viewer));
        }
        self.delivered.push(DeliveredNotice {
            viewer,
            notice: notice.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_render_plain_text() {
        assert_eq!(
            Notice::TrashEmptied { stack_count: 3 }.to_string(),
            "[Tutorial Trash] There were 3 stack(s) in the container! All deleted!"
        );
        assert_eq!(
            Notice::PanelGreeting {
                username: "ana".into(),
                clicks: 2
            }
            .to_string(),
            "[Tutorial Table] Hello ana! You have pressed it 2 time(s)."
        );
    }

    #[test]
    fn disconnected_viewers_fail_delivery() {
        let mut log = NoticeLog::new();
        log.disconnect(ViewerId(4));

        assert!(!notify_best_effort(&mut log, ViewerId(4), &Notice::TrashOpened));
        assert!(notify_best_effort(&mut log, ViewerId(5), &Notice::TrashOpened));
        assert_eq!(
            log.notify(ViewerId(4), &Notice::TrashOpened),
            Err(NotifyError::ViewerGone(ViewerId(4)))
        );
        assert_eq!(log.delivered().len(), 1);
        assert_eq!(log.drain()[0].viewer, ViewerId(5));
        assert!(log.delivered().is_empty());
    }
}
