#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), eframe::Error> {
    // Set up logging; RUST_LOG=mindmap_tool::changes=info shows node edits
    env_logger::init();

    // Run the mind map application
    mindmap_tool::run_app()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    mindmap_tool::start_web();
}
