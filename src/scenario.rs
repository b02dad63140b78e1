//! Scripted headless replay of viewers using the tutorial blocks.
//!
//! A scenario is a JSON list of steps. Each step describes what the host saw
//! on one tick (optionally repeated): which viewers have the trash window
//! open, items dropped into it, enchant table uses and panel button presses.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::{fs, path::Path};
use tracing::{debug, info, warn};
use tutorial_core::{ItemStack, RegistryKey, SimTick, ViewerId};
use tutorial_testkit::{EventRecord, JsonlSink};
use tutorial_world::{
    notify_best_effort, BlockPos, InteractionContext, NoticeLog, PageManager, PanelResponse,
    SessionEvent, TrashBlock, ENCHANT_TABLE_BLOCK, TRASH_BLOCK,
};

use crate::plugin::TutorialPlugin;

/// A scripted scenario loaded from JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioFile {
    pub steps: Vec<ScenarioStep>,
}

/// What the host saw on one tick.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioStep {
    /// Number of ticks this step lasts.
    #[serde(default = "one")]
    pub repeat: u32,
    /// Viewers with the trash window open.
    #[serde(default)]
    pub viewers: Vec<u64>,
    /// Stacks dropped into the trash on the first tick of the step.
    #[serde(default)]
    pub insert: Vec<ItemStack>,
    /// Viewers whose connection drops before this step.
    #[serde(default)]
    pub disconnect: Vec<u64>,
    #[serde(default)]
    pub interact: Option<ScriptedInteraction>,
    #[serde(default)]
    pub panel_events: Vec<ScriptedPanelEvent>,
    /// Unload the trash block after this step.
    #[serde(default)]
    pub unload: bool,
}

fn one() -> u32 {
    1
}

/// A use of the enchant table block.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptedInteraction {
    pub viewer: Option<u64>,
    pub username: Option<String>,
}

/// A button press sent from a viewer's panel.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptedPanelEvent {
    pub viewer: u64,
    /// Raw UI payload, e.g. `{"ActionId":"HELLO"}`.
    pub payload: String,
}

impl ScenarioFile {
    /// Read and validate a scenario file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("Invalid scenario {}", path.display()))
    }

    /// Parse a scenario, rejecting one with no steps.
    pub fn from_json(contents: &str) -> Result<Self> {
        let file: ScenarioFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("scenario contains no steps");
        }
        Ok(file)
    }
}

/// Totals reported after a replay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScenarioSummary {
    pub ticks: u64,
    pub sessions_opened: u32,
    pub sessions_closed: u32,
    pub stacks_destroyed: u32,
    pub notices_delivered: usize,
    pub panel_clicks: u32,
}

/// Replays a scenario against one trash block and the enchant table panel.
pub struct ScenarioRunner<'a> {
    plugin: &'a TutorialPlugin,
    trash: Option<TrashBlock>,
    pages: PageManager,
    notices: NoticeLog,
    tick: SimTick,
    sink: Option<JsonlSink>,
    summary: ScenarioSummary,
}

impl<'a> ScenarioRunner<'a> {
    /// Place a fresh trash block; session events go to `sink` when given.
    pub fn new(plugin: &'a TutorialPlugin, sink: Option<JsonlSink>) -> Result<Self> {
        let trash_key = RegistryKey::parse(TRASH_BLOCK)?;
        let trash = plugin
            .registry()
            .create_container(&trash_key)
            .with_context(|| format!("{trash_key} is not a container block"))?;
        Ok(Self {
            plugin,
            trash: Some(trash),
            pages: PageManager::new(),
            notices: NoticeLog::new(),
            tick: SimTick::ZERO,
            sink,
            summary: ScenarioSummary::default(),
        })
    }

    /// Run every step in order and return the summary with all delivered notices.
    pub fn run(mut self, scenario: &ScenarioFile) -> Result<(ScenarioSummary, NoticeLog)> {
        for step in &scenario.steps {
            for repetition in 0..step.repeat.max(1) {
                self.step(step, repetition == 0)?;
            }
        }
        if let Some(sink) = self.sink.as_mut() {
            sink.flush()?;
        }
        self.summary.notices_delivered = self.notices.delivered().len();
        info!(summary = ?self.summary, "scenario finished");
        Ok((self.summary, self.notices))
    }

    fn step(&mut self, step: &ScenarioStep, first: bool) -> Result<()> {
        if first {
            for viewer in &step.disconnect {
                self.notices.disconnect(ViewerId(*viewer));
                self.pages.dismiss(ViewerId(*viewer));
            }
            if let Some(interact) = &step.interact {
                self.interact(interact)?;
            }
            for event in &step.panel_events {
                self.panel_event(event);
            }
        }

        let mut events = Vec::with_capacity(2);
        let mut unloaded = false;
        if let Some(trash) = self.trash.as_mut() {
            sync_windows(trash, &step.viewers);
            if first {
                for stack in &step.insert {
                    if let Some(rest) = trash.container_mut().add_item(*stack) {
                        warn!(?rest, "trash full, stack dropped");
                    }
                }
            }
            events.push(trash.tick(self.tick, &mut self.notices));

            if step.unload && first {
                events.push(trash.unload(self.tick, &mut self.notices));
                unloaded = true;
            }
        }
        if unloaded {
            self.trash = None;
            info!(tick = %self.tick, "trash block unloaded");
        }
        for event in events {
            self.record(event)?;
        }

        self.tick = self.tick.advance(1);
        self.summary.ticks += 1;
        Ok(())
    }

    fn interact(&mut self, interact: &ScriptedInteraction) -> Result<()> {
        let key = RegistryKey::parse(ENCHANT_TABLE_BLOCK)?;
        let Some(interaction) = self.plugin.registry().interaction_for(&key) else {
            anyhow::bail!("{key} has no interaction registered");
        };
        let ctx = InteractionContext {
            viewer: interact.viewer.map(ViewerId),
            username: interact.username.clone(),
            target: BlockPos::new(0, 64, 0),
        };
        interaction.interact_with_block(&ctx, &mut self.pages);
        Ok(())
    }

    fn panel_event(&mut self, event: &ScriptedPanelEvent) {
        let viewer = ViewerId(event.viewer);
        match self.pages.dispatch(viewer, &event.payload) {
            Ok(PanelResponse::Update {
                status_text,
                notice,
            }) => {
                debug!(%viewer, %status_text, "panel status updated");
                self.summary.panel_clicks += 1;
                notify_best_effort(&mut self.notices, viewer, &notice);
            }
            Ok(PanelResponse::Dismiss) => debug!(%viewer, "panel closed by button"),
            Err(err) => warn!(%viewer, %err, "panel event ignored"),
        }
    }

    fn record(&mut self, event: SessionEvent) -> Result<()> {
        match event {
            SessionEvent::NoChange => return Ok(()),
            SessionEvent::Opened { viewer } => {
                self.summary.sessions_opened += 1;
                info!(tick = %self.tick, %viewer, "trash session opened");
            }
            SessionEvent::Closed {
                viewer,
                stack_count,
            } => {
                self.summary.sessions_closed += 1;
                self.summary.stacks_destroyed += stack_count;
                info!(tick = %self.tick, %viewer, stack_count, "trash session closed");
            }
        }
        if let Some(sink) = self.sink.as_mut() {
            sink.write(&EventRecord::new(self.tick, event.kind(), &event)?)?;
        }
        Ok(())
    }
}

fn sync_windows(trash: &mut TrashBlock, viewers: &[u64]) {
    let wanted: BTreeSet<ViewerId> = viewers.iter().copied().map(ViewerId).collect();
    let stale: Vec<ViewerId> = trash.windows().difference(&wanted).copied().collect();
    for viewer in stale {
        trash.close_window(viewer);
    }
    for viewer in wanted {
        trash.open_window(viewer);
    }
}
