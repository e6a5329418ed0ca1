//! Rendering module
//!
//! The game screen is rasterized on the CPU into a 320x240 framebuffer
//! (`canvas`, `screen`) and presented on the handheld model through WebGPU
//! (`pipeline`).

pub mod canvas;
pub mod font;
pub mod pipeline;
pub mod screen;
pub mod vertex;

pub use canvas::{Canvas, Color};
pub use pipeline::Presenter;
pub use screen::{draw_game, hint_visible};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("could not create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}
