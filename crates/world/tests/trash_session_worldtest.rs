//! Trash block worldtests.
//!
//! Drives a trash block through scripted viewer schedules and checks the
//! notices, the clearing behaviour and the tracker state tick by tick.

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tutorial_core::{ItemStack, RegistryKey, SimTick, ViewerId};
use tutorial_testkit::{run_tick_script, TickScriptConfig};
use tutorial_world::{
    tutorial_blocks, BlockSettings, NoticeLog, SessionEvent, TrashBlock, TRASH_BLOCK,
};

fn snapshot_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/snapshots")
        .join(name)
}

#[derive(Debug, Clone, Serialize)]
struct TickInput {
    viewers: Vec<u64>,
    insert: Option<ItemStack>,
}

impl TickInput {
    fn new(viewers: &[u64], insert: Option<ItemStack>) -> Self {
        Self {
            viewers: viewers.to_vec(),
            insert,
        }
    }
}

struct State {
    block: TrashBlock,
    log: NoticeLog,
    last_event: SessionEvent,
}

#[derive(Debug, Clone, Serialize)]
struct Snap {
    event: SessionEvent,
    last_viewer: Option<ViewerId>,
    notices: Vec<String>,
    open: bool,
    stack_count: u32,
}

fn apply(tick: SimTick, state: &mut State, input: &TickInput) {
    let wanted: BTreeSet<ViewerId> = input.viewers.iter().copied().map(ViewerId).collect();
    let current: Vec<ViewerId> = state.block.windows().iter().copied().collect();
    for viewer in current {
        if !wanted.contains(&viewer) {
            state.block.close_window(viewer);
        }
    }
    for viewer in wanted {
        state.block.open_window(viewer);
    }
    if let Some(stack) = input.insert {
        state.block.container_mut().add_item(stack);
    }
    state.last_event = state.block.tick(tick, &mut state.log);
}

fn snap(_tick: SimTick, state: &State) -> Snap {
    Snap {
        event: state.last_event,
        last_viewer: state.block.session().last_viewer(),
        notices: state
            .log
            .delivered()
            .iter()
            .map(|d| d.notice.to_string())
            .collect(),
        open: state.block.session().is_open(),
        stack_count: state.block.container().stack_count(),
    }
}

#[test]
fn trash_session_snapshot() {
    let state = State {
        block: TrashBlock::trash(27),
        log: NoticeLog::new(),
        last_event: SessionEvent::NoChange,
    };
    let inputs = vec![
        TickInput::new(&[], None),
        TickInput::new(&[1], None),
        TickInput::new(&[1], Some(ItemStack::new(4, 16))),
        TickInput::new(&[], None),
        TickInput::new(&[], None),
    ];

    run_tick_script(
        TickScriptConfig {
            name: "trash_session".into(),
            snapshot_path: snapshot_path("trash_session.json"),
        },
        state,
        inputs,
        |tick, state, input| {
            state.log.drain();
            apply(tick, state, input);
        },
        snap,
    )
    .expect("trash session snapshot matches");
}

#[test]
fn registry_built_trash_clears_on_every_session() {
    let registry = tutorial_blocks(&BlockSettings::default()).expect("registry");
    let mut block = registry
        .create_container(&RegistryKey::parse(TRASH_BLOCK).expect("valid key"))
        .expect("trash block is a container");
    let mut log = NoticeLog::new();
    let mut tick = SimTick::ZERO;
    let mut closes = 0;

    for session in 0..3u64 {
        let viewer = ViewerId(session + 10);
        block.open_window(viewer);
        block.tick(tick, &mut log);
        tick = tick.advance(1);

        for item in 0..=session as u16 {
            block.container_mut().add_item(ItemStack::new(item, 1));
        }
        block.close_window(viewer);
        if let SessionEvent::Closed {
            viewer: closed_by,
            stack_count,
        } = block.tick(tick, &mut log)
        {
            assert_eq!(closed_by, viewer);
            assert_eq!(stack_count, session as u32 + 1);
            closes += 1;
        }
        tick = tick.advance(1);
        assert!(block.container().is_empty());
    }

    assert_eq!(closes, 3);
    assert_eq!(log.delivered().len(), 6);
}
