//! Error types for context acquisition and rendering.

use std::fmt;

/// Errors that can occur while bootstrapping the graphics pipeline.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for the window.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No adapter alias yielded a usable adapter and device.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// Shader source failed to parse or validate.
    ShaderCompile { stage: &'static str, log: String },
    /// Render pipeline creation was rejected by the device.
    PipelineLink { log: String },
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(
                f,
                "No compatible GPU adapter found. Ensure your system has Vulkan/Metal/DX12/GL support."
            ),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            GpuError::ShaderCompile { stage, log } => {
                write!(f, "Failed to compile {} shader: {}", stage, log)
            }
            GpuError::PipelineLink { log } => write!(f, "Failed to link render pipeline: {}", log),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur while drawing a frame.
#[derive(Debug)]
pub enum RenderError {
    /// Pipeline or buffers were released or never created.
    ResourcesUnavailable,
    /// The surface could not provide a texture to draw into.
    Surface(wgpu::SurfaceError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::ResourcesUnavailable => write!(f, "Render resources are not available"),
            RenderError::Surface(e) => write!(f, "Surface error: {}", e),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Surface(e) => Some(e),
            RenderError::ResourcesUnavailable => None,
        }
    }
}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(e: wgpu::SurfaceError) -> Self {
        RenderError::Surface(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_diagnostics() {
        let err = GpuError::ShaderCompile {
            stage: "vertex",
            log: "unknown identifier `foo`".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("vertex"));
        assert!(message.contains("unknown identifier"));

        let err = RenderError::from(wgpu::SurfaceError::Lost);
        assert!(std::error::Error::source(&err).is_some());
    }
}
