//! # Mind Map Tool
//!
//! An interactive mind-map editor. Users create nodes, connect them with
//! directed parent → child edges, drag them around and edit their labels.
//!
//! The map is always kept a forest:
//! - every node has at most one parent
//! - connections that would close a cycle are rejected
//! - deleting a node deletes its whole subtree
//! - a node can never be moved beneath one of its own descendants
//!
//! ## Features
//! - Canvas panning and zooming with a minimap and zoom controls
//! - Keyboard shortcuts for adding, deleting, re-parenting and renaming nodes
//! - Shift-drag between nodes to connect them
//! - Optional change log of node edits
//!
//! The editor runs natively through [`run_app`] and in the browser through
//! `start_web` on `wasm32` targets.

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod changes;
mod constants;
mod error;
pub mod tree;
mod types;
mod ui;

// Re-export public types and functions
pub use changes::{ChangeLogger, NodeChange, CHANGE_LOG_TARGET};
pub use error::TreeError;
pub use types::*;
pub use ui::{MindMapApp, Settings};

/// Window and document title.
const APP_TITLE: &str = "Mind Map";

/// Runs the mind map application with default settings.
///
/// This function initializes the egui application window and starts the main event loop.
///
/// # Returns
///
/// Returns `Ok(())` if the application runs successfully, or an `eframe::Error` if
/// initialization fails.
///
/// # Example
///
/// ```no_run
/// use mindmap_tool::run_app;
///
/// fn main() -> Result<(), eframe::Error> {
///     run_app()
/// }
/// ```
#[cfg(not(target_arch = "wasm32"))]
pub fn run_app() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(|cc| Ok(Box::new(MindMapApp::new(cc)))),
    )
}

/// Id of the `<canvas>` element the web build attaches to.
#[cfg(target_arch = "wasm32")]
pub const WEB_CANVAS_ID: &str = "mindmap_canvas";

/// Starts the application inside the page's `<canvas id="mindmap_canvas">`.
#[cfg(target_arch = "wasm32")]
pub fn start_web() {
    use eframe::wasm_bindgen::JsCast;

    // Fails only if a logger is already installed.
    eframe::WebLogger::init(log::LevelFilter::Info).ok();

    wasm_bindgen_futures::spawn_local(async {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("{APP_TITLE}: no document available");
            return;
        };
        let canvas = match document
            .get_element_by_id(WEB_CANVAS_ID)
            .and_then(|el| el.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        {
            Some(canvas) => canvas,
            None => {
                log::error!("{APP_TITLE}: missing <canvas id=\"{WEB_CANVAS_ID}\">");
                return;
            }
        };

        let result = eframe::WebRunner::new()
            .start(
                canvas,
                eframe::WebOptions::default(),
                Box::new(|cc| Ok(Box::new(MindMapApp::new(cc)))),
            )
            .await;
        if let Err(err) = result {
            log::error!("Failed to start {APP_TITLE}: {err:?}");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mind_map_default() {
        let map = MindMap::default();
        assert!(map.nodes.is_empty());
        assert!(map.edges.is_empty());
    }

    #[test]
    fn test_app_starts_with_main_node() {
        let app = MindMapApp::default();
        assert_eq!(app.map.nodes.len(), 1);
        assert!(app.map.check_tree().is_ok());
    }
}
