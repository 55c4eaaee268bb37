pub mod recorder;
pub mod renderer;

// Re-export main types
pub use recorder::RecordingRenderer;
pub use renderer::MapRenderer;
