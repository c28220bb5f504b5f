//! Application state management structures.
//!
//! This module contains the state structures that track the editor's current
//! UI state: canvas navigation, selection and drag gestures, the label editor,
//! persisted preferences and the status line.

use crate::changes::ChangeLogger;
use crate::types::*;
use eframe::egui;
use log::warn;
use serde::{Deserialize, Serialize};

/// Storage key under which [`Settings`] are persisted.
pub const SETTINGS_KEY: &str = "settings";

/// User preferences remembered between sessions.
///
/// Only these are persisted; the map itself is never saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Whether dark mode visuals are enabled
    pub dark_mode: bool,
    /// Whether the dotted background is drawn
    pub show_background: bool,
    /// Whether the minimap overlay is shown
    pub show_minimap: bool,
    /// Whether the zoom/fit/lock controls are shown
    pub show_controls: bool,
    /// Whether node changes are written to the change log
    pub log_changes: bool,
    /// Whether the change log window is open
    pub show_change_log: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: true,
            show_background: true,
            show_minimap: true,
            show_controls: true,
            log_changes: true,
            show_change_log: false,
        }
    }
}

impl Settings {
    /// Serializes the settings to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Loads settings from eframe storage, falling back to defaults.
    pub fn load(storage: Option<&dyn eframe::Storage>) -> Self {
        let Some(json) = storage.and_then(|s| s.get_string(SETTINGS_KEY)) else {
            return Self::default();
        };
        match Self::from_json(&json) {
            Ok(settings) => settings,
            Err(err) => {
                warn!("Ignoring invalid persisted settings: {err}");
                Self::default()
            }
        }
    }
}

/// State related to canvas navigation.
#[derive(Debug, Clone)]
pub struct CanvasState {
    /// Current canvas pan offset (in screen space)
    pub offset: egui::Vec2,
    /// Current zoom level (1.0 = normal, 2.0 = 2x zoom, 0.5 = 50% zoom)
    pub zoom_factor: f32,
    /// Fit all nodes into view on the next frame
    pub fit_requested: bool,
    /// Screen rectangle of the canvas in the last frame
    pub rect: Option<egui::Rect>,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            offset: egui::Vec2::ZERO,
            zoom_factor: 1.0,
            fit_requested: true,
            rect: None,
        }
    }
}

/// State related to user interactions with nodes and canvas.
///
/// Tracks selection, dragging and connection drawing.
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    /// Selected nodes in the order they were selected
    pub selected_nodes: Vec<NodeId>,
    /// Currently selected edge, if any
    pub selected_edge: Option<EdgeId>,
    /// Node currently being dragged by the user
    pub dragging_node: Option<NodeId>,
    /// Positions of all dragged nodes when the drag started
    pub drag_original_positions: Vec<(NodeId, (f32, f32))>,
    /// Offset from mouse to node center during dragging
    pub node_drag_offset: egui::Vec2,
    /// Whether the user is currently panning the canvas
    pub is_panning: bool,
    /// Last mouse position during panning operation
    pub last_pan_pos: Option<egui::Pos2>,
    /// Screen position where the marquee drag started
    pub marquee_start: Option<egui::Pos2>,
    /// Current opposite marquee corner in screen space
    pub marquee_end: Option<egui::Pos2>,
    /// Whether the current marquee adds to the existing selection (Shift held)
    pub marquee_additive: bool,
    /// Node from which a connection is being drawn (shift-drag)
    pub drawing_connection_from: Option<NodeId>,
    /// Current mouse position while drawing connection
    pub connection_draw_pos: Option<egui::Pos2>,
    /// Shift-press on a node that becomes a connection once dragged past the threshold
    pub pending_shift_connection_from: Option<NodeId>,
    /// Screen position of that shift-press, for the drag threshold
    pub pending_shift_start_screen_pos: Option<egui::Pos2>,
    /// When locked, nodes can be selected but not dragged or connected
    pub locked: bool,
}

impl InteractionState {
    /// Returns the selected node when exactly one is selected.
    pub fn single_selected(&self) -> Option<NodeId> {
        match self.selected_nodes.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Returns true if `id` is part of the node selection.
    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selected_nodes.contains(&id)
    }

    /// Replaces the selection with a single node.
    pub fn select_only(&mut self, id: NodeId) {
        self.selected_nodes.clear();
        self.selected_nodes.push(id);
        self.selected_edge = None;
    }

    /// Adds or removes `id` from the node selection.
    pub fn toggle(&mut self, id: NodeId) {
        if let Some(pos) = self.selected_nodes.iter().position(|n| *n == id) {
            self.selected_nodes.remove(pos);
        } else {
            self.selected_nodes.push(id);
        }
        self.selected_edge = None;
    }

    /// Clears node and edge selection.
    pub fn clear_selection(&mut self) {
        self.selected_nodes.clear();
        self.selected_edge = None;
    }

    /// Drops any selected IDs that no longer exist in `map`.
    pub fn retain_existing(&mut self, map: &MindMap) {
        self.selected_nodes.retain(|id| map.contains(*id));
        if let Some(edge_id) = self.selected_edge {
            if !map.edges.iter().any(|e| e.id == edge_id) {
                self.selected_edge = None;
            }
        }
    }
}

/// Label editor state for the rename dialog.
#[derive(Debug, Clone, Default)]
pub struct RenameState {
    /// Node whose label is being edited, if the dialog is open
    pub node: Option<NodeId>,
    /// Text being edited
    pub text: String,
    /// Whether focus was already requested for this edit session
    pub focus_requested: bool,
}

/// A message shown in the status bar.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    /// Text to display
    pub text: String,
    /// Errors are highlighted
    pub is_error: bool,
    /// Input time (seconds) at which the message was posted
    pub posted_at: f64,
}

/// The main application structure containing UI state and the mind map.
///
/// This struct implements the `eframe::App` trait and handles all user interface
/// rendering and interaction logic.
pub struct MindMapApp {
    /// The map being edited
    pub map: MindMap,
    /// Persisted user preferences
    pub settings: Settings,
    /// Canvas navigation state
    pub canvas: CanvasState,
    /// User interaction state
    pub interaction: InteractionState,
    /// Label editor state
    pub rename: RenameState,
    /// Recorder for node changes
    pub changes: ChangeLogger,
    /// Latest status bar message
    pub status: Option<StatusMessage>,
    /// Input time of the current frame, in seconds
    pub now: f64,
}

impl Default for MindMapApp {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

impl MindMapApp {
    /// Creates the application, restoring persisted settings when available.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        Self::with_settings(Settings::load(cc.storage))
    }

    /// Creates the application with the given preferences and a fresh map.
    pub fn with_settings(settings: Settings) -> Self {
        let changes = ChangeLogger::new(settings.log_changes);
        Self {
            map: MindMap::with_root(),
            settings,
            canvas: CanvasState::default(),
            interaction: InteractionState::default(),
            rename: RenameState::default(),
            changes,
            status: None,
            now: 0.0,
        }
    }

    /// Posts an informational status message.
    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
            posted_at: self.now,
        });
    }

    /// Posts an error status message and logs it.
    pub fn set_error(&mut self, text: impl Into<String>) {
        let text = text.into();
        warn!("{text}");
        self.status = Some(StatusMessage {
            text,
            is_error: true,
            posted_at: self.now,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_roundtrip_fills_missing_fields() {
        let settings = Settings::from_json(r#"{"dark_mode": false}"#).unwrap();
        assert!(!settings.dark_mode);
        assert!(settings.show_minimap);
        assert!(settings.log_changes);

        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_settings_load_without_storage() {
        assert_eq!(Settings::load(None), Settings::default());
    }

    #[test]
    fn test_selection_helpers() {
        let mut interaction = InteractionState::default();
        let a = uuid::Uuid::new_v4();
        let b = uuid::Uuid::new_v4();

        interaction.select_only(a);
        assert_eq!(interaction.single_selected(), Some(a));

        interaction.toggle(b);
        assert_eq!(interaction.selected_nodes, vec![a, b]);
        assert_eq!(interaction.single_selected(), None);

        interaction.toggle(a);
        assert_eq!(interaction.selected_nodes, vec![b]);

        let map = MindMap::new();
        interaction.retain_existing(&map);
        assert!(interaction.selected_nodes.is_empty());
    }
}
