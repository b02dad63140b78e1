//! Scripted tick harness for snapshot tests.
//!
//! A tick script feeds one scripted input per tick into a small simulation and
//! records the input alongside a snapshot of the resulting state. The report
//! is compared against a golden JSON file with [`assert_json_snapshot`].

use crate::snapshot::assert_json_snapshot;
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use tutorial_core::SimTick;

/// Configuration for a tick script run.
#[derive(Debug, Clone)]
pub struct TickScriptConfig {
    /// Name written into the report.
    pub name: String,
    /// Golden JSON file.
    pub snapshot_path: PathBuf,
}

/// One stepped tick.
#[derive(Debug, Clone, Serialize)]
pub struct TickFrame<I, S> {
    /// Tick the input was applied on.
    pub tick: u64,
    /// Scripted input.
    pub input: I,
    /// State after the step.
    pub snapshot: S,
}

/// Full report written to the golden file.
#[derive(Debug, Clone, Serialize)]
pub struct TickScriptReport<I, S> {
    /// Script name.
    pub name: String,
    /// Frames in tick order, starting at tick 0.
    pub frames: Vec<TickFrame<I, S>>,
}

/// Step `state` once per scripted input and collect the frames.
pub fn record_tick_script<State, Input, Snapshot, StepFn, SnapFn>(
    name: impl Into<String>,
    state: &mut State,
    inputs: impl IntoIterator<Item = Input>,
    mut step: StepFn,
    mut snapshot: SnapFn,
) -> TickScriptReport<Input, Snapshot>
where
    StepFn: FnMut(SimTick, &mut State, &Input),
    SnapFn: FnMut(SimTick, &State) -> Snapshot,
{
    let mut tick = SimTick::ZERO;
    let mut frames = Vec::new();
    for input in inputs {
        step(tick, state, &input);
        frames.push(TickFrame {
            tick: tick.0,
            input,
            snapshot: snapshot(tick, state),
        });
        tick = tick.advance(1);
    }
    TickScriptReport {
        name: name.into(),
        frames,
    }
}

/// Run a tick script and assert (or update) the golden at `config.snapshot_path`.
pub fn run_tick_script<State, Input, Snapshot, StepFn, SnapFn>(
    config: TickScriptConfig,
    mut state: State,
    inputs: impl IntoIterator<Item = Input>,
    step: StepFn,
    snapshot: SnapFn,
) -> Result<()>
where
    Input: Serialize,
    Snapshot: Serialize,
    StepFn: FnMut(SimTick, &mut State, &Input),
    SnapFn: FnMut(SimTick, &State) -> Snapshot,
{
    let report = record_tick_script(config.name, &mut state, inputs, step, snapshot);
    assert_json_snapshot(config.snapshot_path, &report)
}
