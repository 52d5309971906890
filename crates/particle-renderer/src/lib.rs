//! # Particle Renderer
//!
//! wgpu context acquisition, shader/pipeline bootstrap with diagnostics and
//! the point-sprite renderer.

pub mod context;
pub mod error;
pub mod pipeline;
pub mod renderer;

pub use context::*;
pub use error::*;
pub use pipeline::{compile_shader, link_pipeline, validate_wgsl, ViewportUniform, POINT_SHADER};
pub use renderer::*;
