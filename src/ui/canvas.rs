//! Canvas interaction and navigation functionality.
//!
//! This module handles canvas panning, zooming, selection, node dragging,
//! connection drawing and coordinate transformations between screen and
//! world space.

use super::state::MindMapApp;
use crate::changes::NodeChange;
use crate::constants::*;
use crate::types::*;
use eframe::egui;

impl MindMapApp {
    /// Converts screen coordinates to world coordinates accounting for zoom and pan.
    pub fn screen_to_world(&self, screen_pos: egui::Pos2) -> egui::Pos2 {
        (screen_pos - self.canvas.offset) / self.canvas.zoom_factor
    }

    /// Converts world coordinates to screen coordinates accounting for zoom and pan.
    pub fn world_to_screen(&self, world_pos: egui::Pos2) -> egui::Pos2 {
        world_pos * self.canvas.zoom_factor + self.canvas.offset
    }

    /// World-space rectangle covered by a node.
    pub fn node_world_rect(&self, node: &MindMapNode) -> egui::Rect {
        egui::Rect::from_center_size(
            egui::pos2(node.position.0, node.position.1),
            egui::vec2(NODE_WIDTH, NODE_HEIGHT),
        )
    }

    /// Bounding box of all nodes in world space, or `None` for an empty map.
    pub fn nodes_world_bounds(&self) -> Option<egui::Rect> {
        self.map
            .nodes
            .values()
            .map(|n| self.node_world_rect(n))
            .reduce(|a, b| a.union(b))
    }

    /// Sets the zoom level while keeping `anchor` (screen space) fixed over
    /// the same world point.
    pub fn zoom_about(&mut self, anchor: egui::Pos2, zoom: f32) {
        let world_anchor = self.screen_to_world(anchor);
        let old_zoom = self.canvas.zoom_factor;
        self.canvas.zoom_factor = zoom.clamp(MIN_ZOOM, MAX_ZOOM);

        // Only adjust offset if zoom actually changed
        if (self.canvas.zoom_factor - old_zoom).abs() > f32::EPSILON {
            let moved_to = self.world_to_screen(world_anchor);
            self.canvas.offset += anchor - moved_to;
        }
    }

    /// Zooms in or out by `factor` around the canvas centre.
    pub fn zoom_by(&mut self, factor: f32) {
        let center = self
            .canvas
            .rect
            .map(|r| r.center())
            .unwrap_or(egui::Pos2::ZERO);
        self.zoom_about(center, self.canvas.zoom_factor * factor);
    }

    /// Adjusts zoom and pan so every node is visible inside `canvas_rect`.
    pub fn fit_view(&mut self, canvas_rect: egui::Rect) {
        let Some(bounds) = self.nodes_world_bounds() else {
            self.canvas.zoom_factor = 1.0;
            self.canvas.offset = canvas_rect.center().to_vec2();
            return;
        };

        let avail_w = (canvas_rect.width() - 2.0 * FIT_VIEW_PADDING).max(1.0);
        let avail_h = (canvas_rect.height() - 2.0 * FIT_VIEW_PADDING).max(1.0);
        let zoom = (avail_w / bounds.width())
            .min(avail_h / bounds.height())
            .clamp(MIN_ZOOM, FIT_VIEW_MAX_ZOOM);

        self.canvas.zoom_factor = zoom;
        self.canvas.offset = canvas_rect.center().to_vec2() - bounds.center().to_vec2() * zoom;
    }

    /// Pans so that `world_pos` ends up in the middle of the canvas.
    pub fn center_on(&mut self, world_pos: egui::Pos2) {
        if let Some(rect) = self.canvas.rect {
            self.canvas.offset =
                rect.center().to_vec2() - world_pos.to_vec2() * self.canvas.zoom_factor;
        }
    }

    /// Handles middle-click or Cmd/Ctrl+left-click canvas panning.
    pub fn handle_canvas_panning(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        // modifiers.command automatically uses Cmd on macOS and Ctrl elsewhere
        let should_pan = ui.input(|i| {
            i.pointer.middle_down() || (i.pointer.primary_down() && i.modifiers.command)
        });

        if should_pan {
            if let Some(current_pos) = response.interact_pointer_pos() {
                if !self.interaction.is_panning {
                    self.interaction.is_panning = true;
                    self.interaction.last_pan_pos = Some(current_pos);
                } else if let Some(last_pos) = self.interaction.last_pan_pos {
                    self.canvas.offset += current_pos - last_pos;
                    self.interaction.last_pan_pos = Some(current_pos);
                }
            }
        } else {
            self.interaction.is_panning = false;
            self.interaction.last_pan_pos = None;
        }
    }

    /// Handles scroll wheel zooming, keeping the world point under the cursor fixed.
    pub fn handle_canvas_zoom(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll_delta == 0.0 {
            return;
        }

        let mouse_pos = ui
            .input(|i| i.pointer.hover_pos())
            .or_else(|| response.interact_pointer_pos());

        if let Some(mouse_pos) = mouse_pos {
            // Only zoom if the cursor is over the canvas
            if !response.rect.contains(mouse_pos) {
                return;
            }
            let step = if scroll_delta > 0.0 {
                SCROLL_ZOOM_STEP
            } else {
                -SCROLL_ZOOM_STEP
            };
            self.zoom_about(mouse_pos, self.canvas.zoom_factor + step);
        }
    }

    /// Handles click selection, double-click renaming and marquee selection.
    ///
    /// Runs before [`Self::handle_node_dragging`] so a marquee started on
    /// empty space takes priority over node drags.
    pub fn handle_canvas_interactions(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let primary_down = ui.input(|i| i.pointer.primary_down());
        let shift = ui.input(|i| i.modifiers.shift);

        if primary_down
            && !self.interaction.is_panning
            && self.interaction.dragging_node.is_none()
            && self.interaction.drawing_connection_from.is_none()
            && self.interaction.pending_shift_connection_from.is_none()
        {
            if let Some(pos) = response.interact_pointer_pos() {
                if self.interaction.marquee_start.is_some() {
                    self.interaction.marquee_end = Some(pos);
                } else {
                    let world_pos = self.screen_to_world(pos);
                    let over_node = self.find_node_at_position(world_pos).is_some();
                    let over_edge = self.find_edge_at_position(world_pos).is_some();
                    if !over_node && !over_edge {
                        self.interaction.marquee_start = Some(pos);
                        self.interaction.marquee_end = Some(pos);
                        self.interaction.marquee_additive = shift;
                        if !shift {
                            self.interaction.clear_selection();
                        }
                    }
                }
            }
        } else if let (Some(start), Some(end)) =
            (self.interaction.marquee_start, self.interaction.marquee_end)
        {
            self.finish_marquee(start, end);
        }

        if response.double_clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                if let Some(node_id) = self.find_node_at_position(self.screen_to_world(pos)) {
                    self.interaction.select_only(node_id);
                    self.begin_rename(node_id);
                    return;
                }
            }
        }

        if response.clicked()
            && !self.interaction.is_panning
            && self.interaction.dragging_node.is_none()
            && self.interaction.pending_shift_connection_from.is_none()
        {
            if let Some(pos) = response.interact_pointer_pos() {
                let world_pos = self.screen_to_world(pos);
                if let Some(node_id) = self.find_node_at_position(world_pos) {
                    if shift {
                        self.interaction.toggle(node_id);
                    } else {
                        self.interaction.select_only(node_id);
                    }
                } else if let Some(edge_id) = self.find_edge_at_position(world_pos) {
                    self.interaction.selected_nodes.clear();
                    self.interaction.selected_edge = Some(edge_id);
                } else {
                    self.interaction.clear_selection();
                }
            }
        }
    }

    /// Selects every node whose centre lies inside the marquee rectangle.
    fn finish_marquee(&mut self, start: egui::Pos2, end: egui::Pos2) {
        let rect_screen = egui::Rect::from_two_pos(start, end);
        let world_rect = egui::Rect::from_min_max(
            self.screen_to_world(rect_screen.min),
            self.screen_to_world(rect_screen.max),
        );

        if !self.interaction.marquee_additive {
            self.interaction.selected_nodes.clear();
        }
        let mut inside: Vec<&MindMapNode> = self
            .map
            .nodes
            .values()
            .filter(|n| world_rect.contains(egui::pos2(n.position.0, n.position.1)))
            .collect();
        // Stable order: left to right, then top to bottom
        inside.sort_by(|a, b| {
            a.position
                .0
                .total_cmp(&b.position.0)
                .then(a.position.1.total_cmp(&b.position.1))
        });
        let ids: Vec<NodeId> = inside.into_iter().map(|n| n.id).collect();
        for id in ids {
            if !self.interaction.is_selected(id) {
                self.interaction.selected_nodes.push(id);
            }
        }
        if !self.interaction.selected_nodes.is_empty() {
            self.interaction.selected_edge = None;
        }

        self.interaction.marquee_start = None;
        self.interaction.marquee_end = None;
        self.interaction.marquee_additive = false;
    }

    /// Handles node dragging with the left mouse button and shift-drag connections.
    pub fn handle_node_dragging(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        if self.interaction.marquee_start.is_some() {
            return;
        }
        if ui.input(|i| i.pointer.primary_down()) && !self.interaction.is_panning {
            let Some(current_pos) = response.interact_pointer_pos() else {
                return;
            };
            let world_pos = self.screen_to_world(current_pos);
            let shift_held = ui.input(|i| i.modifiers.shift);

            if self.interaction.dragging_node.is_none()
                && self.interaction.drawing_connection_from.is_none()
                && self.interaction.pending_shift_connection_from.is_none()
            {
                if self.interaction.locked {
                    return;
                }
                if let Some(node_id) = self.find_node_at_position(world_pos) {
                    if shift_held {
                        // Becomes a connection once dragged far enough, else a toggle-select
                        self.interaction.pending_shift_connection_from = Some(node_id);
                        self.interaction.pending_shift_start_screen_pos = Some(current_pos);
                    } else {
                        self.start_node_drag(node_id, world_pos);
                    }
                }
            } else if let Some(dragging_id) = self.interaction.dragging_node {
                self.update_dragged_node_position(dragging_id, world_pos);
            } else if self.interaction.drawing_connection_from.is_some() {
                self.interaction.connection_draw_pos = Some(current_pos);
            } else if let (Some(from_id), Some(start_pos)) = (
                self.interaction.pending_shift_connection_from,
                self.interaction.pending_shift_start_screen_pos,
            ) {
                let dist_world = (world_pos - self.screen_to_world(start_pos)).length();
                if dist_world >= CLICK_THRESHOLD {
                    self.interaction.drawing_connection_from = Some(from_id);
                    self.interaction.connection_draw_pos = Some(current_pos);
                    self.interaction.pending_shift_connection_from = None;
                    self.interaction.pending_shift_start_screen_pos = None;
                }
            }
        } else {
            if self.interaction.drawing_connection_from.is_some() {
                let release_pos = response
                    .interact_pointer_pos()
                    .or(self.interaction.connection_draw_pos);
                if let Some(pos) = release_pos {
                    self.finalize_connection(self.screen_to_world(pos));
                }
            }

            // Shift-press that never turned into a connection toggles selection
            if let Some(node_id) = self.interaction.pending_shift_connection_from.take() {
                self.interaction.toggle(node_id);
            }
            self.interaction.pending_shift_start_screen_pos = None;

            if self.interaction.dragging_node.is_some() {
                self.record_drag_moves();
            }

            self.interaction.dragging_node = None;
            self.interaction.drag_original_positions.clear();
            self.interaction.drawing_connection_from = None;
            self.interaction.connection_draw_pos = None;
        }
    }

    /// Starts dragging `node_id` along with the rest of the selection.
    fn start_node_drag(&mut self, node_id: NodeId, world_pos: egui::Pos2) {
        self.interaction.dragging_node = Some(node_id);

        if !self.interaction.is_selected(node_id) {
            self.interaction.select_only(node_id);
        }

        self.interaction.drag_original_positions = self
            .interaction
            .selected_nodes
            .iter()
            .filter_map(|id| self.map.nodes.get(id).map(|n| (*id, n.position)))
            .collect();

        if let Some(node) = self.map.nodes.get(&node_id) {
            let node_center = egui::pos2(node.position.0, node.position.1);
            self.interaction.node_drag_offset = node_center - world_pos;
        }
    }

    /// Moves the dragged node to follow the pointer; other selected nodes follow by the same delta.
    fn update_dragged_node_position(&mut self, node_id: NodeId, world_pos: egui::Pos2) {
        let target = world_pos + self.interaction.node_drag_offset;
        let Some(current) = self.map.nodes.get(&node_id).map(|n| n.position) else {
            return;
        };
        let delta = (target.x - current.0, target.y - current.1);

        for (id, _) in &self.interaction.drag_original_positions {
            if let Some(n) = self.map.nodes.get_mut(id) {
                n.position.0 += delta.0;
                n.position.1 += delta.1;
            }
        }
    }

    /// Records a move for every dragged node whose position changed.
    fn record_drag_moves(&mut self) {
        let moved: Vec<NodeId> = self
            .interaction
            .drag_original_positions
            .iter()
            .filter(|(id, old)| self.map.nodes.get(id).is_some_and(|n| n.position != *old))
            .map(|(id, _)| *id)
            .collect();
        self.changes
            .record_all(moved.into_iter().map(|id| NodeChange::Moved { id }));
    }

    /// Commits the connection being drawn if released over another node.
    fn finalize_connection(&mut self, world_pos: egui::Pos2) {
        let Some(from_id) = self.interaction.drawing_connection_from else {
            return;
        };
        match self.find_node_at_position(world_pos) {
            Some(to_id) if to_id != from_id => {
                self.try_connect(from_id, to_id);
            }
            _ => {}
        }
    }

    /// Finds the node at the given world position, if any.
    pub fn find_node_at_position(&self, pos: egui::Pos2) -> Option<NodeId> {
        self.map
            .nodes
            .values()
            .find(|n| self.node_world_rect(n).contains(pos))
            .map(|n| n.id)
    }

    /// Finds the edge passing within the click threshold of `pos`, if any.
    pub fn find_edge_at_position(&self, pos: egui::Pos2) -> Option<EdgeId> {
        self.map
            .edges
            .iter()
            .find(|edge| {
                match (self.map.nodes.get(&edge.source), self.map.nodes.get(&edge.target)) {
                    (Some(from), Some(to)) => {
                        let start = egui::pos2(from.position.0, from.position.1);
                        let end = egui::pos2(to.position.0, to.position.1);
                        point_to_segment_distance(pos, start, end) < CLICK_THRESHOLD
                    }
                    _ => false,
                }
            })
            .map(|edge| edge.id)
    }
}

/// Distance from a point to a line segment.
pub(crate) fn point_to_segment_distance(
    point: egui::Pos2,
    line_start: egui::Pos2,
    line_end: egui::Pos2,
) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;
    let line_len_sq = line_vec.length_sq();

    if line_len_sq < 0.0001 {
        return point_vec.length();
    }

    // Project onto the segment, clamped to its endpoints
    let t = (point_vec.dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
    let projection = line_start + line_vec * t;
    (point - projection).length()
}
