//! Enchant table custom UI page.
//!
//! The client sends button presses as a JSON payload carrying an `ActionId`.
//! The payload is resolved into a [`PanelAction`] once, here, and the rest of
//! the page logic only sees the enum.

use crate::notice::Notice;
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{info, warn};
use tutorial_core::ViewerId;

/// Layout file the client loads for the enchant panel.
pub const ENCHANT_PANEL_LAYOUT: &str = "Pages/EnchantTable/EnchantTablePanel.ui";

/// A button in the layout and the action id it sends when activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventBinding {
    /// Element selector in the layout.
    pub selector: &'static str,
    /// Action sent back to the server.
    pub action: PanelAction,
}

/// Buttons bound when the panel is built.
pub const ENCHANT_PANEL_BINDINGS: &[EventBinding] = &[
    EventBinding {
        selector: "#BtnHello",
        action: PanelAction::Hello,
    },
    EventBinding {
        selector: "#CloseButton",
        action: PanelAction::Close,
    },
];

/// Actions the enchant panel understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    /// Greet the viewer and bump the click counter.
    Hello,
    /// Close the panel.
    Close,
}

impl PanelAction {
    /// Wire id for this action.
    pub fn action_id(self) -> &'static str {
        match self {
            PanelAction::Hello => "HELLO",
            PanelAction::Close => "CLOSE",
        }
    }

    /// Resolve a raw UI event payload such as `{"ActionId":"HELLO"}`.
    pub fn from_payload(raw: &str) -> Result<Self, PanelEventError> {
        #[derive(Deserialize)]
        struct Payload {
            #[serde(rename = "ActionId")]
            action_id: String,
        }

        let payload: Payload = serde_json::from_str(raw)?;
        match payload.action_id.as_str() {
            "HELLO" => Ok(PanelAction::Hello),
            "CLOSE" => Ok(PanelAction::Close),
            _ => Err(PanelEventError::UnknownAction(payload.action_id)),
        }
    }
}

/// Failure resolving or routing a UI event.
#[derive(Debug, Error)]
pub enum PanelEventError {
    /// Payload was not valid JSON or lacked `ActionId`.
    #[error("malformed panel event payload: {0}")]
    Malformed(#[from] serde_json::Error),
    /// `ActionId` named no known action.
    #[error("unknown panel action {0:?}")]
    UnknownAction(String),
    /// Event arrived for a viewer with no open page.
    #[error("{0} has no open page")]
    NoOpenPage(ViewerId),
}

/// What the host should do after a panel handled an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelResponse {
    /// Push new status text to the open page and send a notice.
    Update {
        /// New value for the status label.
        status_text: String,
        /// Notice for the viewer.
        notice: Notice,
    },
    /// Close the page.
    Dismiss,
}

/// Per-viewer enchant panel state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnchantTablePanel {
    viewer: ViewerId,
    username: String,
    click_count: u32,
}

impl EnchantTablePanel {
    /// Build a fresh panel for `viewer`.
    pub fn new(viewer: ViewerId, username: impl Into<String>) -> Self {
        let username = username.into();
        info!(%viewer, %username, layout = ENCHANT_PANEL_LAYOUT, "enchant panel built");
        Self {
            viewer,
            username,
            click_count: 0,
        }
    }

    /// Viewer the panel belongs to.
    pub fn viewer(&self) -> ViewerId {
        self.viewer
    }

    /// Hello presses so far.
    pub fn click_count(&self) -> u32 {
        self.click_count
    }

    /// Apply an action.
    pub fn handle_action(&mut self, action: PanelAction) -> PanelResponse {
        match action {
            PanelAction::Hello => {
                self.click_count += 1;
                PanelResponse::Update {
                    status_text: format!("Clicked {} time(s)!", self.click_count),
                    notice: Notice::PanelGreeting {
                        username: self.username.clone(),
                        clicks: self.click_count,
                    },
                }
            }
            PanelAction::Close => PanelResponse::Dismiss,
        }
    }
}

/// Open custom pages, at most one per viewer.
#[derive(Debug, Default)]
pub struct PageManager {
    pages: BTreeMap<ViewerId, EnchantTablePanel>,
}

impl PageManager {
    /// Create a manager with no open pages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `panel` for its viewer, replacing any page already open.
    pub fn open_custom_page(&mut self, panel: EnchantTablePanel) -> Option<EnchantTablePanel> {
        self.pages.insert(panel.viewer(), panel)
    }

    /// Whether `viewer` has a page open.
    pub fn is_open(&self, viewer: ViewerId) -> bool {
        self.pages.contains_key(&viewer)
    }

    /// Page open for `viewer`.
    pub fn page(&self, viewer: ViewerId) -> Option<&EnchantTablePanel> {
        self.pages.get(&viewer)
    }

    /// Close `viewer`'s page (the viewer pressed escape or disconnected).
    pub fn dismiss(&mut self, viewer: ViewerId) -> Option<EnchantTablePanel> {
        let page = self.pages.remove(&viewer);
        if page.is_some() {
            info!(%viewer, "enchant panel dismissed");
        }
        page
    }

    /// Route a raw UI event from `viewer` to its open page.
    ///
    /// A [`PanelResponse::Dismiss`] also removes the page.
    pub fn dispatch(
        &mut self,
        viewer: ViewerId,
        raw: &str,
    ) -> Result<PanelResponse, PanelEventError> {
        let action = PanelAction::from_payload(raw).inspect_err(|err| {
            warn!(%viewer, %err, "rejected panel event");
        })?;
        let page = self
            .pages
            .get_mut(&viewer)
            .ok_or(PanelEventError::NoOpenPage(viewer))?;

        let response = page.handle_action(action);
        if response == PanelResponse::Dismiss {
            self.dismiss(viewer);
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANA: ViewerId = ViewerId(1);

    #[test]
    fn payload_resolves_known_actions() {
        assert_eq!(
            PanelAction::from_payload(r#"{"ActionId":"HELLO"}"#).unwrap(),
            PanelAction::Hello
        );
        assert_eq!(
            PanelAction::from_payload(r#"{"ActionId":"CLOSE","Extra":1}"#).unwrap(),
            PanelAction::Close
        );
        for binding in ENCHANT_PANEL_BINDINGS {
            let raw = format!(r#"{{"ActionId":"{}"}}"#, binding.action.action_id());
            assert_eq!(PanelAction::from_payload(&raw).unwrap(), binding.action);
        }
    }

    #[test]
    fn payload_rejects_unknown_and_malformed() {
        assert!(matches!(
            PanelAction::from_payload(r#"{"ActionId":"DANCE"}"#),
            Err(PanelEventError::UnknownAction(id)) if id == "DANCE"
        ));
        assert!(matches!(
            PanelAction::from_payload(r#"{"Other":"HELLO"}"#),
            Err(PanelEventError::Malformed(_))
        ));
        assert!(matches!(
            PanelAction::from_payload("not json"),
            Err(PanelEventError::Malformed(_))
        ));
    }

    #[test]
    fn hello_counts_clicks() {
        let mut panel = EnchantTablePanel::new(ANA, "ana");
        panel.handle_action(PanelAction::Hello);
        let response = panel.handle_action(PanelAction::Hello);

        assert_eq!(
            response,
            PanelResponse::Update {
                status_text: "Clicked 2 time(s)!".into(),
                notice: Notice::PanelGreeting {
                    username: "ana".into(),
                    clicks: 2
                },
            }
        );
        assert_eq!(panel.click_count(), 2);
    }

    #[test]
    fn close_dismisses_page() {
        let mut pages = PageManager::new();
        pages.open_custom_page(EnchantTablePanel::new(ANA, "ana"));

        pages.dispatch(ANA, r#"{"ActionId":"HELLO"}"#).unwrap();
        assert_eq!(
            pages.dispatch(ANA, r#"{"ActionId":"CLOSE"}"#).unwrap(),
            PanelResponse::Dismiss
        );
        assert!(!pages.is_open(ANA));
        assert!(matches!(
            pages.dispatch(ANA, r#"{"ActionId":"HELLO"}"#),
            Err(PanelEventError::NoOpenPage(ANA))
        ));
    }

    #[test]
    fn bad_event_leaves_page_untouched() {
        let mut pages = PageManager::new();
        pages.open_custom_page(EnchantTablePanel::new(ANA, "ana"));

        assert!(pages.dispatch(ANA, r#"{"ActionId":"NOPE"}"#).is_err());
        assert!(pages.is_open(ANA));
        assert_eq!(pages.page(ANA).unwrap().click_count(), 0);
    }
}
