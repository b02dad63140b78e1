//! Container blocks driven by session edges, and the trash behaviour.
//!
//! A [`ContainerBlock`] owns its storage, the set of viewers with the container
//! window open, and a [`ContainerSessionTracker`]. Once per tick the host calls
//! [`ContainerBlock::tick`], which samples the window set, advances the tracker
//! and hands the resulting event to the block's [`SessionReaction`].

use crate::container::ItemContainer;
use crate::notice::{notify_best_effort, Notice, Notifier};
use crate::session::{ContainerSessionTracker, SessionEvent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};
use tutorial_core::{SimTick, ViewerId};

/// Behaviour plugged into a [`ContainerBlock`] that reacts to session edges.
///
/// The tracker transition has already been committed when this runs, so
/// nothing a reaction does can put the tracker out of step.
pub trait SessionReaction {
    /// Handle this tick's event.
    fn on_session_changed(
        &mut self,
        event: SessionEvent,
        container: &mut ItemContainer,
        notifier: &mut dyn Notifier,
    );
}

/// Destroys whatever was left in the container when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrashReaction;

impl SessionReaction for TrashReaction {
    fn on_session_changed(
        &mut self,
        event: SessionEvent,
        container: &mut ItemContainer,
        notifier: &mut dyn Notifier,
    ) {
        match event {
            SessionEvent::Opened { viewer } => {
                notify_best_effort(notifier, viewer, &Notice::TrashOpened);
                info!(%viewer, "trash container opened");
            }
            SessionEvent::Closed {
                viewer,
                stack_count,
            } if stack_count > 0 => {
                notify_best_effort(notifier, viewer, &Notice::TrashEmptied { stack_count });
                let cleared = container.clear();
                info!(%viewer, stack_count, cleared, "trash container emptied");
            }
            SessionEvent::Closed { viewer, .. } => {
                debug!(%viewer, "trash container closed empty");
            }
            SessionEvent::NoChange => {}
        }
    }
}

/// Container block state: storage, open windows, session tracking and behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerBlock<R> {
    container: ItemContainer,
    windows: BTreeSet<ViewerId>,
    session: ContainerSessionTracker,
    reaction: R,
}

/// The trash block.
pub type TrashBlock = ContainerBlock<TrashReaction>;

impl TrashBlock {
    /// Create a trash block with `capacity` slots.
    pub fn trash(capacity: usize) -> Self {
        ContainerBlock::new(capacity, TrashReaction)
    }
}

impl<R: SessionReaction> ContainerBlock<R> {
    /// Create a block with empty storage and no viewers.
    pub fn new(capacity: usize, reaction: R) -> Self {
        Self {
            container: ItemContainer::new(capacity),
            windows: BTreeSet::new(),
            session: ContainerSessionTracker::new(),
            reaction,
        }
    }

    /// Storage.
    pub fn container(&self) -> &ItemContainer {
        &self.container
    }

    /// Mutable storage, for viewers moving items in and out.
    pub fn container_mut(&mut self) -> &mut ItemContainer {
        &mut self.container
    }

    /// Session tracker state.
    pub fn session(&self) -> &ContainerSessionTracker {
        &self.session
    }

    /// Viewers with the container window open.
    pub fn windows(&self) -> &BTreeSet<ViewerId> {
        &self.windows
    }

    /// Record that `viewer` opened the container window.
    pub fn open_window(&mut self, viewer: ViewerId) -> bool {
        self.windows.insert(viewer)
    }

    /// Record that `viewer` closed the container window.
    pub fn close_window(&mut self, viewer: ViewerId) -> bool {
        self.windows.remove(&viewer)
    }

    /// Advance one tick: observe the open windows and react to any edge.
    pub fn tick(&mut self, tick: SimTick, notifier: &mut dyn Notifier) -> SessionEvent {
        let event = self.session.observe(
            self.windows.iter().copied(),
            self.container.stack_count(),
        );
        self.dispatch(tick, event, notifier)
    }

    /// The block is going away: drop every window and end the session as if
    /// the container were already gone (stack count 0).
    pub fn unload(&mut self, tick: SimTick, notifier: &mut dyn Notifier) -> SessionEvent {
        self.windows.clear();
        let event = self.session.force_close(0);
        self.dispatch(tick, event, notifier)
    }

    fn dispatch(
        &mut self,
        tick: SimTick,
        event: SessionEvent,
        notifier: &mut dyn Notifier,
    ) -> SessionEvent {
        if event.is_edge() {
            debug!(%tick, kind = event.kind(), "container session edge");
        }
        self.reaction
            .on_session_changed(event, &mut self.container, notifier);
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::{DeliveredNotice, NoticeLog};
    use tutorial_core::ItemStack;

    const ANA: ViewerId = ViewerId(1);
    const BEN: ViewerId = ViewerId(2);

    fn run(block: &mut TrashBlock, tick: &mut SimTick, log: &mut NoticeLog) -> SessionEvent {
        let event = block.tick(*tick, log);
        *tick = tick.advance(1);
        event
    }

    #[test]
    fn close_summarizes_then_clears() {
        let mut block = TrashBlock::trash(27);
        let mut log = NoticeLog::new();
        let mut tick = SimTick::ZERO;

        block.open_window(ANA);
        assert_eq!(run(&mut block, &mut tick, &mut log), SessionEvent::Opened { viewer: ANA });
        block.container_mut().add_item(ItemStack::new(1, 10));
        block.container_mut().add_item(ItemStack::new(2, 3));
        assert_eq!(run(&mut block, &mut tick, &mut log), SessionEvent::NoChange);

        block.close_window(ANA);
        assert_eq!(
            run(&mut block, &mut tick, &mut log),
            SessionEvent::Closed {
                viewer: ANA,
                stack_count: 2
            }
        );
        assert!(block.container().is_empty());
        assert_eq!(
            log.delivered(),
            &[
                DeliveredNotice {
                    viewer: ANA,
                    notice: Notice::TrashOpened
                },
                DeliveredNotice {
                    viewer: ANA,
                    notice: Notice::TrashEmptied { stack_count: 2 }
                },
            ]
        );
    }

    #[test]
    fn empty_close_sends_nothing() {
        let mut block = TrashBlock::trash(9);
        let mut log = NoticeLog::new();
        let mut tick = SimTick::ZERO;

        block.open_window(BEN);
        run(&mut block, &mut tick, &mut log);
        block.close_window(BEN);
        assert!(run(&mut block, &mut tick, &mut log).is_edge());
        assert_eq!(log.delivered().len(), 1);
    }

    #[test]
    fn items_left_while_nobody_watches_survive_until_next_close() {
        let mut block = TrashBlock::trash(9);
        let mut log = NoticeLog::new();
        let mut tick = SimTick::ZERO;

        block.container_mut().add_item(ItemStack::new(5, 1));
        for _ in 0..5 {
            assert_eq!(run(&mut block, &mut tick, &mut log), SessionEvent::NoChange);
        }
        assert_eq!(block.container().stack_count(), 1);
    }

    #[test]
    fn failed_notification_still_clears() {
        let mut block = TrashBlock::trash(9);
        let mut log = NoticeLog::new();
        let mut tick = SimTick::ZERO;

        block.open_window(ANA);
        run(&mut block, &mut tick, &mut log);
        block.container_mut().add_item(ItemStack::new(7, 7));
        block.close_window(ANA);
        log.disconnect(ANA);

        assert!(run(&mut block, &mut tick, &mut log).is_edge());
        assert!(block.container().is_empty());
        assert!(!block.session().is_open());
        assert_eq!(block.session().last_viewer(), None);
    }

    #[test]
    fn unload_mid_session_closes_silently() {
        let mut block = TrashBlock::trash(9);
        let mut log = NoticeLog::new();
        let mut tick = SimTick::ZERO;

        block.open_window(ANA);
        run(&mut block, &mut tick, &mut log);
        block.container_mut().add_item(ItemStack::new(3, 3));
        log.drain();

        assert_eq!(
            block.unload(tick, &mut log),
            SessionEvent::Closed {
                viewer: ANA,
                stack_count: 0
            }
        );
        assert!(block.windows().is_empty());
        assert!(log.delivered().is_empty());
        assert_eq!(block.unload(tick, &mut log), SessionEvent::NoChange);
    }

    #[test]
    fn session_survives_viewer_handoff() {
        let mut block = TrashBlock::trash(9);
        let mut log = NoticeLog::new();
        let mut tick = SimTick::ZERO;

        block.open_window(ANA);
        run(&mut block, &mut tick, &mut log);
        block.open_window(BEN);
        block.close_window(ANA);
        assert_eq!(run(&mut block, &mut tick, &mut log), SessionEvent::NoChange);
        block.container_mut().add_item(ItemStack::new(1, 1));
        block.close_window(BEN);
        assert_eq!(
            run(&mut block, &mut tick, &mut log),
            SessionEvent::Closed {
                viewer: BEN,
                stack_count: 1
            }
        );
    }
}
