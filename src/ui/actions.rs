//! Editing actions triggered by shortcuts, toolbar buttons and canvas gestures.
//!
//! Each action goes through the guarded [`MindMap`] methods, reports
//! rejections in the status bar and records node changes.

use super::state::MindMapApp;
use crate::changes::NodeChange;
use crate::constants::{DEFAULT_NODE_LABEL, NEW_NODE_SCREEN_POS};
use crate::types::*;
use eframe::egui;

impl MindMapApp {
    /// Creates a detached node at a fixed spot near the canvas' top-left corner.
    pub fn create_detached_node(&mut self) -> NodeId {
        let origin = self
            .canvas
            .rect
            .map(|r| r.min)
            .unwrap_or(egui::Pos2::ZERO);
        let screen = origin + egui::vec2(NEW_NODE_SCREEN_POS.0, NEW_NODE_SCREEN_POS.1);
        let world = self.screen_to_world(screen);
        self.create_node_at((world.x, world.y))
    }

    /// Creates a detached node at a world position and selects it.
    pub fn create_node_at(&mut self, position: (f32, f32)) -> NodeId {
        let node = MindMapNode::new(DEFAULT_NODE_LABEL, position);
        let id = self.map.add_node(node);
        self.changes.record(NodeChange::Added {
            id,
            label: DEFAULT_NODE_LABEL.to_string(),
        });
        self.interaction.select_only(id);
        id
    }

    /// Adds a child to the single selected node.
    pub fn add_child_to_selection(&mut self) -> Option<NodeId> {
        let Some(parent) = self.interaction.single_selected() else {
            self.set_error("Select exactly one node to add a child");
            return None;
        };
        match self.map.add_child(parent, DEFAULT_NODE_LABEL) {
            Ok(id) => {
                self.changes.record(NodeChange::Added {
                    id,
                    label: DEFAULT_NODE_LABEL.to_string(),
                });
                self.interaction.select_only(id);
                Some(id)
            }
            Err(err) => {
                self.set_error(err.to_string());
                None
            }
        }
    }

    /// Deletes the selected nodes with their subtrees, or else the selected edge.
    pub fn delete_selection(&mut self) {
        if !self.interaction.selected_nodes.is_empty() {
            let selected = std::mem::take(&mut self.interaction.selected_nodes);
            let removed = self.map.remove_nodes(&selected);
            if removed.len() > selected.len() {
                self.set_status(format!("Deleted {} nodes", removed.len()));
            }
            self.changes
                .record_all(removed.into_iter().map(|id| NodeChange::Removed { id }));
            if self.rename.node.is_some_and(|id| !self.map.contains(id)) {
                self.cancel_rename();
            }
        } else if let Some(edge_id) = self.interaction.selected_edge.take() {
            if let Some(edge) = self.map.remove_edge(edge_id) {
                let child = self.node_label(edge.target);
                self.set_status(format!("Removed edge; \"{child}\" is now a root"));
            }
        }
        self.interaction.retain_existing(&self.map);
    }

    /// Moves the first selected node under the second one.
    ///
    /// Requires exactly two selected nodes.
    pub fn move_selected_under(&mut self) {
        let (node, new_parent) = match self.interaction.selected_nodes.as_slice() {
            [node, new_parent] => (*node, *new_parent),
            _ => {
                self.set_error("Select exactly two nodes: the node to move, then its new parent");
                return;
            }
        };
        match self.map.reparent(node, new_parent) {
            Ok(moved) => {
                self.changes
                    .record_all(moved.into_iter().map(|id| NodeChange::Moved { id }));
            }
            Err(err) => self.set_error(err.to_string()),
        }
    }

    /// Cuts `node` loose from its parent so it becomes a root.
    pub fn detach_node(&mut self, node: NodeId) {
        if let Some(edge) = self.map.detach(node) {
            let child = self.node_label(node);
            let parent = self.node_label(edge.source);
            self.set_status(format!("Detached \"{child}\" from \"{parent}\""));
        }
    }

    /// Label of `node` for messages and panels.
    pub(super) fn node_label(&self, node: NodeId) -> String {
        self.map
            .nodes
            .get(&node)
            .map(|n| n.label.clone())
            .unwrap_or_else(|| "(missing)".to_string())
    }

    /// Connects `source` as the parent of `target` if the tree allows it.
    pub fn try_connect(&mut self, source: NodeId, target: NodeId) -> bool {
        match self.map.connect(source, target) {
            Ok(_) => true,
            Err(err) => {
                self.set_error(err.to_string());
                false
            }
        }
    }

    /// Removes every node and edge.
    pub fn clear_all(&mut self) {
        let removed: Vec<NodeId> = self.map.nodes.keys().copied().collect();
        self.map.clear();
        self.changes
            .record_all(removed.into_iter().map(|id| NodeChange::Removed { id }));
        self.interaction.clear_selection();
        self.cancel_rename();
    }

    /// Opens the label editor for `node`.
    pub fn begin_rename(&mut self, node: NodeId) {
        if let Some(n) = self.map.nodes.get(&node) {
            self.rename.node = Some(node);
            self.rename.text = n.label.clone();
            self.rename.focus_requested = false;
        }
    }

    /// Applies the edited label and closes the editor.
    pub fn commit_rename(&mut self) {
        let Some(node) = self.rename.node.take() else {
            return;
        };
        let label = std::mem::take(&mut self.rename.text);
        match self.map.rename(node, label.clone()) {
            Ok(old) if old != label => {
                self.changes.record(NodeChange::TextChanged { id: node, label });
            }
            Ok(_) => {}
            Err(err) => self.set_error(err.to_string()),
        }
    }

    /// Closes the label editor without changing anything.
    pub fn cancel_rename(&mut self) {
        self.rename.node = None;
        self.rename.text.clear();
    }

    /// Applies the change-log preference to the logger.
    pub fn sync_change_logging(&mut self) {
        self.changes.enabled = self.settings.log_changes;
    }
}
