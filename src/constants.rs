//! Shared application-wide constants.
//! Centralizes tweakable values used across the model, rendering and interactions.

// Node dimensions
/// Default node width in world units.
pub const NODE_WIDTH: f32 = 150.0;
/// Default node height in world units.
pub const NODE_HEIGHT: f32 = 40.0;
/// Corner radius of node rectangles (in screen pixels at zoom 1.0).
pub const NODE_CORNER_RADIUS: f32 = 4.0;

// Tree placement
/// Horizontal offset of a newly created child relative to its parent.
pub const CHILD_OFFSET: (f32, f32) = (200.0, 0.0);
/// Offset of a re-parented node relative to its new parent.
pub const REPARENT_OFFSET: (f32, f32) = (200.0, 100.0);
/// Screen position (relative to the canvas) where detached nodes are created.
pub const NEW_NODE_SCREEN_POS: (f32, f32) = (100.0, 100.0);
/// Label given to freshly created nodes.
pub const DEFAULT_NODE_LABEL: &str = "New Node";
/// Label of the node present in a fresh map.
pub const ROOT_NODE_LABEL: &str = "Main Node";

// Background
/// Spacing between background dots in world units.
pub const DOT_GAP: f32 = 12.0;
/// Radius of background dots in screen pixels.
pub const DOT_RADIUS: f32 = 1.0;

// Canvas interactions
/// Click threshold in world units used for distinguishing click vs drag.
pub const CLICK_THRESHOLD: f32 = 10.0;
/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f32 = 0.25;
/// Largest allowed zoom factor.
pub const MAX_ZOOM: f32 = 5.0;
/// Zoom increment applied per scroll notch.
pub const SCROLL_ZOOM_STEP: f32 = 0.025;
/// Zoom multiplier applied by the zoom in/out controls.
pub const CONTROL_ZOOM_FACTOR: f32 = 1.2;
/// Screen-space margin kept around the nodes when fitting the view.
pub const FIT_VIEW_PADDING: f32 = 40.0;
/// Fitting the view never zooms in further than this.
pub const FIT_VIEW_MAX_ZOOM: f32 = 1.5;

// Minimap
/// Size of the minimap overlay in screen pixels.
pub const MINIMAP_SIZE: (f32, f32) = (200.0, 150.0);
/// Distance of overlays (minimap, controls) from the canvas edge.
pub const OVERLAY_MARGIN: f32 = 10.0;

// Change log
/// Number of recent change entries kept for the log panel.
pub const CHANGE_LOG_CAPACITY: usize = 50;
/// Seconds a status message stays visible.
pub const STATUS_MESSAGE_SECONDS: f64 = 4.0;
