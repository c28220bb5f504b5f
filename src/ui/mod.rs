//! User interface components and rendering logic for the mind map editor.
//!
//! This module contains all the UI-related code including the main application struct,
//! canvas rendering, overlays, the properties panel and keyboard handling.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main MindMapApp
//! - `actions` - Guarded editing actions shared by shortcuts, buttons and gestures
//! - `canvas` - Canvas navigation, zooming, panning, selection and dragging
//! - `rendering` - Drawing nodes, edges, background and minimap

mod actions;
mod canvas;
mod rendering;
mod state;

pub use state::{MindMapApp, Settings};

use self::state::SETTINGS_KEY;
use crate::constants::*;
use crate::types::*;
use eframe::egui;
use log::warn;
use std::time::Duration;

/// Shortcut help shown in the actions overlay.
const SHORTCUT_HELP: &[(&str, &str)] = &[
    ("Double Click / F2", "Edit Node Label"),
    ("Ctrl + C", "Add Node"),
    ("Tab", "Add Child Node"),
    ("Delete", "Delete Selected Node(s)"),
    ("Ctrl + M", "Move First Selected Under Second"),
    ("Shift + Drag", "Connect Nodes"),
];

impl eframe::App for MindMapApp {
    /// Persist user preferences between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.settings.to_json() {
            Ok(json) => storage.set_string(SETTINGS_KEY, json),
            Err(err) => warn!("Failed to serialize settings: {err}"),
        }
    }

    /// Main update function called by egui for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.draw_frame(ctx);
    }
}

impl MindMapApp {
    /// Draws one full frame: shortcuts, panels, canvas and dialogs.
    pub fn draw_frame(&mut self, ctx: &egui::Context) {
        self.now = ctx.input(|i| i.time);

        let visuals = if self.settings.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.draw_status_bar(ui);
        });

        egui::SidePanel::right("properties_panel")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                self.draw_properties_panel(ui);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.draw_canvas(ui);
            });

        self.draw_rename_dialog(ctx);
        self.draw_change_log_window(ctx);
    }

    /// Handles the editor's keyboard shortcuts.
    ///
    /// Ignored while the label editor is open, since its text field is the
    /// only widget that takes keyboard input.
    pub fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if self.rename.node.is_some() {
            return;
        }

        // Tab would otherwise move egui focus onto a toolbar widget, where
        // Space and Enter toggle it. Keyboard focus belongs to the canvas.
        ctx.memory_mut(|m| {
            m.move_focus(egui::FocusDirection::None);
            if let Some(focused) = m.focused() {
                m.surrender_focus(focused);
            }
        });

        let (add_node, delete, move_under, add_child, rename) = ctx.input(|i| {
            // Native backends turn Ctrl+C into a Copy event rather than a key press
            let copy_event = i.events.iter().any(|e| matches!(e, egui::Event::Copy));
            (
                copy_event || (i.modifiers.command && i.key_pressed(egui::Key::C)),
                i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
                i.modifiers.command && i.key_pressed(egui::Key::M),
                i.key_pressed(egui::Key::Tab),
                i.key_pressed(egui::Key::F2),
            )
        });

        if add_node {
            self.create_detached_node();
        }
        if delete {
            self.delete_selection();
        }
        if move_under {
            self.move_selected_under();
        }
        if add_child {
            self.add_child_to_selection();
        }
        if rename {
            if let Some(id) = self.interaction.single_selected() {
                self.begin_rename(id);
            }
        }
    }

    /// Renders the toolbar with view options and map statistics.
    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.checkbox(&mut self.settings.show_background, "Background");
            ui.checkbox(&mut self.settings.show_minimap, "MiniMap");
            ui.checkbox(&mut self.settings.show_controls, "Controls");
            ui.separator();
            ui.checkbox(&mut self.settings.dark_mode, "Dark Mode");
            ui.separator();
            if ui.checkbox(&mut self.settings.log_changes, "Log Changes").changed() {
                self.sync_change_logging();
            }
            ui.checkbox(&mut self.settings.show_change_log, "Change Log");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!(
                    "Nodes: {}  Edges: {}",
                    self.map.nodes.len(),
                    self.map.edges.len()
                ));
            });
        });
    }

    /// Renders the latest status message while it is fresh, and the zoom level.
    fn draw_status_bar(&mut self, ui: &mut egui::Ui) {
        if let Some(status) = &self.status {
            let age = self.now - status.posted_at;
            if age > STATUS_MESSAGE_SECONDS {
                self.status = None;
            } else {
                ui.ctx()
                    .request_repaint_after(Duration::from_secs_f64(STATUS_MESSAGE_SECONDS - age));
            }
        }

        ui.horizontal(|ui| {
            match &self.status {
                Some(status) if status.is_error => {
                    ui.colored_label(egui::Color32::from_rgb(255, 100, 100), &status.text);
                }
                Some(status) => {
                    ui.label(&status.text);
                }
                None => {
                    ui.label("Ready");
                }
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("Zoom: {:.0}%", self.canvas.zoom_factor * 100.0));
                if self.interaction.locked {
                    ui.separator();
                    ui.label("Locked");
                }
            });
        });
    }

    /// Renders the properties panel for the current selection.
    fn draw_properties_panel(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                ui.heading("Properties");
                ui.separator();

                if let Some(id) = self.interaction.single_selected() {
                    self.draw_node_properties(ui, id);
                } else if self.interaction.selected_nodes.len() > 1 {
                    self.draw_multi_selection_info(ui);
                } else if let Some(edge_id) = self.interaction.selected_edge {
                    self.draw_edge_properties(ui, edge_id);
                } else {
                    self.draw_no_selection_info(ui);
                }
            });
    }

    /// Renders details and tree actions for a single node.
    fn draw_node_properties(&mut self, ui: &mut egui::Ui, id: NodeId) {
        let Some(node) = self.map.nodes.get(&id).cloned() else {
            ui.label("Node not found");
            return;
        };

        ui.label("Label:");
        if ui.button(&node.label).on_hover_text("Click to edit").clicked() {
            self.begin_rename(id);
        }
        ui.separator();

        let parent = self.map.parent_of(id);
        match parent {
            Some(p) => ui.label(format!("Parent: {}", self.node_label(p))),
            None => ui.label("Parent: (root)"),
        };
        ui.label(format!("Children: {}", self.map.children_of(id).len()));
        ui.label(format!("Subtree size: {}", self.map.descendants(id).len() + 1));
        ui.label(format!(
            "Position: ({:.1}, {:.1})",
            node.position.0, node.position.1
        ));
        ui.separator();

        ui.horizontal_wrapped(|ui| {
            if ui.button("Add Child").clicked() {
                self.add_child_to_selection();
            }
            if parent.is_some() && ui.button("Detach").clicked() {
                self.detach_node(id);
            }
            if ui.button("Delete Subtree").clicked() {
                self.delete_selection();
            }
        });
    }

    fn draw_multi_selection_info(&self, ui: &mut egui::Ui) {
        ui.label(format!("{} nodes selected", self.interaction.selected_nodes.len()));
        if let [first, second] = self.interaction.selected_nodes.as_slice() {
            ui.separator();
            ui.label(format!(
                "Ctrl+M moves \"{}\" under \"{}\"",
                self.node_label(*first),
                self.node_label(*second)
            ));
        }
        ui.separator();
        ui.colored_label(egui::Color32::GRAY, "Press Delete to remove with subtrees");
    }

    fn draw_edge_properties(&self, ui: &mut egui::Ui, edge_id: EdgeId) {
        let Some(edge) = self.map.edges.iter().find(|e| e.id == edge_id) else {
            ui.label("Edge not found");
            return;
        };
        ui.label("Type: Edge");
        ui.separator();
        ui.label(format!("Parent: {}", self.node_label(edge.source)));
        ui.label(format!("Child: {}", self.node_label(edge.target)));
        ui.separator();
        ui.colored_label(egui::Color32::GRAY, "Press Delete to remove");
    }

    fn draw_no_selection_info(&self, ui: &mut egui::Ui) {
        ui.label("No node selected");
        ui.separator();
        ui.label(format!("Trees: {}", self.map.roots().len()));
        ui.separator();
        ui.label("Left-click on a node to select it");
        ui.label("Shift-click to add to the selection");
        ui.label("Middle-click and drag to pan");
    }

    /// Renders the main canvas area with its overlays and handles interactions.
    fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let canvas_rect = response.rect;
        self.canvas.rect = Some(canvas_rect);

        if self.canvas.fit_requested {
            self.fit_view(canvas_rect);
            self.canvas.fit_requested = false;
        }

        self.handle_canvas_panning(ui, &response);
        self.handle_canvas_zoom(ui, &response);
        self.handle_canvas_interactions(ui, &response);
        self.handle_node_dragging(ui, &response);

        painter.rect_filled(canvas_rect, 0.0, ui.visuals().extreme_bg_color);
        self.render_map_elements(&painter, canvas_rect);

        let ctx = ui.ctx().clone();
        self.draw_actions_overlay(&ctx, canvas_rect);
        if self.settings.show_controls {
            self.draw_controls_overlay(&ctx, canvas_rect);
        }
        if self.settings.show_minimap {
            self.draw_minimap_overlay(&ctx, canvas_rect);
        }
    }

    /// Top-left panel with the main actions and the shortcut help.
    fn draw_actions_overlay(&mut self, ctx: &egui::Context, canvas_rect: egui::Rect) {
        let pos = canvas_rect.min + egui::vec2(OVERLAY_MARGIN, OVERLAY_MARGIN);
        egui::Area::new(egui::Id::new("actions_overlay"))
            .fixed_pos(pos)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_min_width(160.0);
                    if ui.button("Add Node").clicked() {
                        self.create_detached_node();
                    }
                    let single = self.interaction.single_selected().is_some();
                    if ui.add_enabled(single, egui::Button::new("Add Child")).clicked() {
                        self.add_child_to_selection();
                    }
                    let can_delete = !self.interaction.selected_nodes.is_empty()
                        || self.interaction.selected_edge.is_some();
                    if ui.add_enabled(can_delete, egui::Button::new("Delete")).clicked() {
                        self.delete_selection();
                    }
                    let pair = self.interaction.selected_nodes.len() == 2;
                    if ui.add_enabled(pair, egui::Button::new("Move Under")).clicked() {
                        self.move_selected_under();
                    }
                    let non_empty = !self.map.is_empty();
                    if ui.add_enabled(non_empty, egui::Button::new("Clear All")).clicked() {
                        self.clear_all();
                    }

                    ui.separator();
                    for (keys, action) in SHORTCUT_HELP {
                        ui.small(format!("{keys} - {action}"));
                    }
                });
            });
    }

    /// Bottom-left zoom, fit and lock controls.
    fn draw_controls_overlay(&mut self, ctx: &egui::Context, canvas_rect: egui::Rect) {
        let pos = egui::pos2(
            canvas_rect.min.x + OVERLAY_MARGIN,
            canvas_rect.max.y - OVERLAY_MARGIN,
        );
        egui::Area::new(egui::Id::new("controls_overlay"))
            .fixed_pos(pos)
            .pivot(egui::Align2::LEFT_BOTTOM)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    if ui.button("+").on_hover_text("Zoom in").clicked() {
                        self.zoom_by(CONTROL_ZOOM_FACTOR);
                    }
                    if ui.button("-").on_hover_text("Zoom out").clicked() {
                        self.zoom_by(1.0 / CONTROL_ZOOM_FACTOR);
                    }
                    if ui.button("Fit").on_hover_text("Fit view").clicked() {
                        self.fit_view(canvas_rect);
                    }
                    let lock_label = if self.interaction.locked { "Unlock" } else { "Lock" };
                    if ui
                        .button(lock_label)
                        .on_hover_text("Toggle interactivity")
                        .clicked()
                    {
                        self.interaction.locked = !self.interaction.locked;
                    }
                });
            });
    }

    /// Bottom-right overview; clicking or dragging inside it recentres the canvas.
    fn draw_minimap_overlay(&mut self, ctx: &egui::Context, canvas_rect: egui::Rect) {
        let size = egui::vec2(MINIMAP_SIZE.0, MINIMAP_SIZE.1);
        let pos = canvas_rect.max - size - egui::vec2(OVERLAY_MARGIN, OVERLAY_MARGIN);
        egui::Area::new(egui::Id::new("minimap_overlay"))
            .fixed_pos(pos)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
                self.draw_minimap(&painter, response.rect);

                if response.clicked() || response.dragged() {
                    if let (Some(pointer), Some(transform)) = (
                        response.interact_pointer_pos(),
                        self.minimap_transform(response.rect),
                    ) {
                        self.center_on(transform.to_world(pointer));
                    }
                }
            });
    }

    /// Modal label editor shown while a rename is in progress.
    fn draw_rename_dialog(&mut self, ctx: &egui::Context) {
        if self.rename.node.is_none() {
            return;
        }
        let mut commit = false;
        let mut cancel = false;

        egui::Window::new("Edit Label")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label("Enter new label:");
                let response = ui.text_edit_singleline(&mut self.rename.text);
                if !self.rename.focus_requested {
                    response.request_focus();
                    self.rename.focus_requested = true;
                }
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    commit = true;
                }
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    cancel = true;
                }
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        commit = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if commit {
            self.commit_rename();
        } else if cancel {
            self.cancel_rename();
        }
    }

    /// Window listing the most recent node changes.
    fn draw_change_log_window(&mut self, ctx: &egui::Context) {
        let mut open = self.settings.show_change_log;
        let mut clear = false;
        egui::Window::new("Change Log")
            .open(&mut open)
            .default_width(360.0)
            .show(ctx, |ui| {
                if !self.changes.enabled {
                    ui.colored_label(egui::Color32::GRAY, "Logging is disabled");
                }
                if ui.button("Clear").clicked() {
                    clear = true;
                }
                ui.separator();
                egui::ScrollArea::vertical()
                    .max_height(300.0)
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in self.changes.recent() {
                            ui.monospace(line);
                        }
                    });
            });
        self.settings.show_change_log = open;
        if clear {
            self.changes.clear();
        }
    }
}
