//! Canvas rendering functionality for nodes, edges, background and minimap.
//!
//! Elements are drawn in layers: background dots first, then edges, then
//! nodes, then transient overlays (connection preview, marquee).

use super::state::MindMapApp;
use crate::constants::*;
use crate::types::*;
use eframe::egui;
use eframe::epaint::StrokeKind;

/// Accent used for selection and valid previews.
const ACCENT: egui::Color32 = egui::Color32::from_rgb(100, 150, 255);
/// Colour for rejected connection previews.
const INVALID: egui::Color32 = egui::Color32::from_rgb(255, 80, 80);
/// Border colour of a node being dragged.
const DRAGGING: egui::Color32 = egui::Color32::from_rgb(255, 165, 0);

impl MindMapApp {
    /// Renders all mind map elements on the canvas.
    pub fn render_map_elements(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        if self.settings.show_background {
            self.draw_background_dots(painter, canvas_rect);
        }

        for edge in &self.map.edges {
            let is_selected = self.interaction.selected_edge == Some(edge.id);
            self.draw_edge(painter, edge, is_selected);
        }

        if let (Some(from), Some(pos)) = (
            self.interaction.drawing_connection_from,
            self.interaction.connection_draw_pos,
        ) {
            self.draw_connection_preview(painter, from, pos);
        }

        for node in self.map.nodes.values() {
            self.draw_node(painter, node);
        }

        if let (Some(start), Some(end)) =
            (self.interaction.marquee_start, self.interaction.marquee_end)
        {
            let rect = egui::Rect::from_two_pos(start, end);
            let fill = egui::Color32::from_rgba_unmultiplied(100, 150, 255, 40);
            painter.rect_filled(rect, 0.0, fill);
            painter.rect_stroke(rect, 0.0, egui::Stroke::new(1.5, ACCENT), StrokeKind::Inside);
        }
    }

    /// Draws the dotted background. Dots are skipped when zoomed out so far
    /// that they would merge into noise.
    pub fn draw_background_dots(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let screen_gap = DOT_GAP * self.canvas.zoom_factor;
        if screen_gap < 4.0 {
            return;
        }
        let color = if self.settings.dark_mode {
            egui::Color32::from_gray(70)
        } else {
            egui::Color32::from_gray(180)
        };

        let top_left = self.screen_to_world(canvas_rect.min);
        let bottom_right = self.screen_to_world(canvas_rect.max);
        let start_x = (top_left.x / DOT_GAP).floor() * DOT_GAP;
        let start_y = (top_left.y / DOT_GAP).floor() * DOT_GAP;

        let mut y = start_y;
        while y <= bottom_right.y {
            let mut x = start_x;
            while x <= bottom_right.x {
                let screen = self.world_to_screen(egui::pos2(x, y));
                if canvas_rect.contains(screen) {
                    painter.circle_filled(screen, DOT_RADIUS, color);
                }
                x += DOT_GAP;
            }
            y += DOT_GAP;
        }
    }

    /// Screen-space rectangle of a node.
    fn node_screen_rect(&self, node: &MindMapNode) -> egui::Rect {
        let world = self.node_world_rect(node);
        egui::Rect::from_min_max(self.world_to_screen(world.min), self.world_to_screen(world.max))
    }

    /// Renders an edge from the parent's border to the child's border with an arrow at the child.
    pub fn draw_edge(&self, painter: &egui::Painter, edge: &Edge, is_selected: bool) {
        let (Some(from), Some(to)) = (
            self.map.nodes.get(&edge.source),
            self.map.nodes.get(&edge.target),
        ) else {
            return;
        };
        let from_rect = self.node_screen_rect(from);
        let to_rect = self.node_screen_rect(to);

        let (color, width) = if is_selected {
            (ACCENT, 3.0)
        } else if self.settings.dark_mode {
            (egui::Color32::from_gray(170), 2.0)
        } else {
            (egui::Color32::DARK_GRAY, 2.0)
        };

        let start = rect_border_toward(from_rect, to_rect.center());
        let end = rect_border_toward(to_rect, from_rect.center());
        painter.line_segment([start, end], egui::Stroke::new(width, color));
        self.draw_arrow_head(painter, start, end, color);
    }

    /// Draws a filled triangle pointing at `tip`, scaled with zoom.
    fn draw_arrow_head(
        &self,
        painter: &egui::Painter,
        from: egui::Pos2,
        tip: egui::Pos2,
        color: egui::Color32,
    ) {
        let delta = tip - from;
        if delta.length_sq() < 0.0001 {
            return;
        }
        let direction = delta.normalized();
        let perpendicular = egui::vec2(-direction.y, direction.x);
        let length = 10.0 * self.canvas.zoom_factor;
        let half_width = 5.0 * self.canvas.zoom_factor;

        let base = tip - direction * length;
        painter.add(egui::Shape::convex_polygon(
            vec![tip, base + perpendicular * half_width, base - perpendicular * half_width],
            color,
            egui::Stroke::NONE,
        ));
    }

    /// Renders the line from the source node to the pointer while connecting.
    ///
    /// The line is red when hovering a node the tree would not accept as a child.
    pub fn draw_connection_preview(
        &self,
        painter: &egui::Painter,
        from_id: NodeId,
        to_screen_pos: egui::Pos2,
    ) {
        let Some(from_node) = self.map.nodes.get(&from_id) else {
            return;
        };
        let from_screen =
            self.world_to_screen(egui::pos2(from_node.position.0, from_node.position.1));

        let is_valid = match self.find_node_at_position(self.screen_to_world(to_screen_pos)) {
            Some(to_id) if to_id == from_id => false,
            Some(to_id) => self.map.can_connect(from_id, to_id).is_ok(),
            None => true,
        };
        let color = if is_valid { ACCENT } else { INVALID };

        painter.line_segment([from_screen, to_screen_pos], egui::Stroke::new(2.0, color));
        painter.circle_filled(to_screen_pos, 4.0, color);
    }

    /// Renders a single node: rounded box, highlighted border, wrapped label.
    pub fn draw_node(&self, painter: &egui::Painter, node: &MindMapNode) {
        let rect = self.node_screen_rect(node);
        let radius = NODE_CORNER_RADIUS * self.canvas.zoom_factor;

        let (fill, text_color) = if self.settings.dark_mode {
            (egui::Color32::from_gray(45), egui::Color32::from_gray(230))
        } else {
            (egui::Color32::WHITE, egui::Color32::BLACK)
        };
        painter.rect_filled(rect, radius, fill);

        let (stroke_color, stroke_width) = if Some(node.id) == self.interaction.dragging_node {
            (DRAGGING, 2.5)
        } else if self.interaction.is_selected(node.id) {
            (ACCENT, 2.5)
        } else if self.settings.dark_mode {
            (egui::Color32::from_gray(140), 1.0)
        } else {
            (egui::Color32::from_gray(30), 1.0)
        };
        painter.rect_stroke(
            rect,
            radius,
            egui::Stroke::new(stroke_width, stroke_color),
            StrokeKind::Outside,
        );

        let font_size = (12.0 * self.canvas.zoom_factor).clamp(6.0, 48.0);
        let padding = 6.0 * self.canvas.zoom_factor;
        let galley = painter.layout(
            node.label.clone(),
            egui::FontId::proportional(font_size),
            text_color,
            (rect.width() - 2.0 * padding).max(1.0),
        );
        let text_pos = rect.center() - galley.size() / 2.0;
        painter
            .with_clip_rect(rect.intersect(painter.clip_rect()))
            .galley(text_pos, galley, text_color);
    }

    /// Draws the minimap into `rect`: every node plus the visible viewport.
    pub fn draw_minimap(&self, painter: &egui::Painter, rect: egui::Rect) {
        let (bg, node_color, frame) = if self.settings.dark_mode {
            (
                egui::Color32::from_rgba_unmultiplied(20, 20, 20, 220),
                egui::Color32::from_gray(120),
                egui::Color32::from_gray(90),
            )
        } else {
            (
                egui::Color32::from_rgba_unmultiplied(250, 250, 250, 230),
                egui::Color32::from_gray(190),
                egui::Color32::from_gray(160),
            )
        };
        painter.rect_filled(rect, 4.0, bg);
        painter.rect_stroke(rect, 4.0, egui::Stroke::new(1.0, frame), StrokeKind::Inside);

        let Some(transform) = self.minimap_transform(rect) else {
            return;
        };
        for node in self.map.nodes.values() {
            let world = self.node_world_rect(node);
            let mini = egui::Rect::from_min_max(
                transform.to_mini(world.min),
                transform.to_mini(world.max),
            );
            let color = if self.interaction.is_selected(node.id) { ACCENT } else { node_color };
            painter.rect_filled(mini, 1.0, color);
        }
        if let Some(viewport) = self.viewport_world_rect() {
            let mini = egui::Rect::from_min_max(
                transform.to_mini(viewport.min),
                transform.to_mini(viewport.max),
            );
            painter.rect_stroke(
                mini.intersect(rect),
                0.0,
                egui::Stroke::new(1.5, ACCENT),
                StrokeKind::Inside,
            );
        }
    }

    /// World rectangle currently visible on the canvas.
    pub fn viewport_world_rect(&self) -> Option<egui::Rect> {
        self.canvas
            .rect
            .map(|r| {
                egui::Rect::from_min_max(self.screen_to_world(r.min), self.screen_to_world(r.max))
            })
    }

    /// Mapping between world space and a minimap drawn into `rect`.
    pub fn minimap_transform(&self, rect: egui::Rect) -> Option<MinimapTransform> {
        let nodes = self.nodes_world_bounds();
        let world = match (nodes, self.viewport_world_rect()) {
            (Some(n), Some(v)) => n.union(v),
            (Some(n), None) => n,
            (None, Some(v)) => v,
            (None, None) => return None,
        };
        MinimapTransform::new(world, rect.shrink(4.0))
    }
}

/// Uniform scale-and-translate between world space and minimap space.
#[derive(Debug, Clone, Copy)]
pub struct MinimapTransform {
    world_min: egui::Pos2,
    origin: egui::Pos2,
    scale: f32,
}

impl MinimapTransform {
    /// Fits `world` into `target`, centred, preserving aspect ratio.
    pub fn new(world: egui::Rect, target: egui::Rect) -> Option<Self> {
        if world.width() <= 0.0 || world.height() <= 0.0 {
            return None;
        }
        let scale = (target.width() / world.width()).min(target.height() / world.height());
        let used = world.size() * scale;
        let origin = target.min + (target.size() - used) / 2.0;
        Some(Self {
            world_min: world.min,
            origin,
            scale,
        })
    }

    /// World → minimap.
    pub fn to_mini(&self, world: egui::Pos2) -> egui::Pos2 {
        self.origin + (world - self.world_min) * self.scale
    }

    /// Minimap → world.
    pub fn to_world(&self, mini: egui::Pos2) -> egui::Pos2 {
        self.world_min + (mini - self.origin) / self.scale
    }
}

/// Point where the ray from `rect`'s centre toward `toward` leaves the rectangle.
fn rect_border_toward(rect: egui::Rect, toward: egui::Pos2) -> egui::Pos2 {
    let center = rect.center();
    let d = toward - center;
    if d.x.abs() < f32::EPSILON && d.y.abs() < f32::EPSILON {
        return center;
    }
    let half = rect.size() / 2.0;
    let tx = if d.x.abs() > f32::EPSILON { half.x / d.x.abs() } else { f32::INFINITY };
    let ty = if d.y.abs() > f32::EPSILON { half.y / d.y.abs() } else { f32::INFINITY };
    center + d * tx.min(ty).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_border_toward() {
        let rect = egui::Rect::from_center_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 40.0));
        assert_eq!(rect_border_toward(rect, egui::pos2(200.0, 0.0)), egui::pos2(50.0, 0.0));
        assert_eq!(rect_border_toward(rect, egui::pos2(0.0, -100.0)), egui::pos2(0.0, -20.0));
        assert_eq!(rect_border_toward(rect, egui::pos2(0.0, 0.0)), egui::pos2(0.0, 0.0));
    }

    #[test]
    fn test_minimap_transform_roundtrip_point() {
        let world = egui::Rect::from_min_max(egui::pos2(-100.0, -50.0), egui::pos2(300.0, 150.0));
        let target = egui::Rect::from_min_size(egui::pos2(10.0, 10.0), egui::vec2(200.0, 100.0));
        let t = MinimapTransform::new(world, target).unwrap();

        assert_eq!(t.to_mini(world.min), target.min);
        let back = t.to_world(t.to_mini(egui::pos2(100.0, 50.0)));
        assert!((back - egui::pos2(100.0, 50.0)).length() < 0.001);
    }

    #[test]
    fn test_minimap_transform_rejects_degenerate_world() {
        let world = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(0.0, 10.0));
        let target = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(10.0, 10.0));
        assert!(MinimapTransform::new(world, target).is_none());
    }
}
