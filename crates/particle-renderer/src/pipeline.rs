//! Shader compilation and pipeline linking with diagnostics.
//!
//! WGSL is parsed and validated with naga before it reaches the device so a
//! bad shader surfaces as an error string instead of a device panic. Device
//! creation calls run inside a validation error scope for the same reason.

use crate::error::GpuError;
use bytemuck::{Pod, Zeroable};
use naga::front::wgsl;
use naga::valid::{Capabilities, ValidationFlags, Validator};

pub const POINT_SHADER: &str = include_str!("shaders/point.wgsl");

pub const VERTEX_ENTRY: &str = "vertex";
pub const FRAGMENT_ENTRY: &str = "fragment";

/// Attribute locations shared with `point.wgsl`.
pub const POSITION_LOCATION: u32 = 0;
pub const COLOR_LOCATION: u32 = 1;
pub const POINT_SIZE_LOCATION: u32 = 2;

/// Uniform at group 0 binding 0.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ViewportUniform {
    pub size: [f32; 2],
    pub _padding: [f32; 2],
}

impl ViewportUniform {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: [width.max(1) as f32, height.max(1) as f32],
            _padding: [0.0; 2],
        }
    }
}

/// One instance-stepped buffer per sprite attribute.
pub fn vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 3] {
    const POSITION: &[wgpu::VertexAttribute] = &[
        // position: vec2<f32> at location 0
        wgpu::VertexAttribute {
            offset: 0,
            shader_location: POSITION_LOCATION,
            format: wgpu::VertexFormat::Float32x2,
        },
    ];
    const COLOR: &[wgpu::VertexAttribute] = &[
        // color: vec4<f32> at location 1
        wgpu::VertexAttribute {
            offset: 0,
            shader_location: COLOR_LOCATION,
            format: wgpu::VertexFormat::Float32x4,
        },
    ];
    const SIZE: &[wgpu::VertexAttribute] = &[
        // point_size: f32 at location 2
        wgpu::VertexAttribute {
            offset: 0,
            shader_location: POINT_SIZE_LOCATION,
            format: wgpu::VertexFormat::Float32,
        },
    ];

    [
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: POSITION,
        },
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: COLOR,
        },
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<f32>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: SIZE,
        },
    ]
}

/// Parse and validate WGSL, requiring the given entry points.
pub fn validate_wgsl(source: &str, entry_points: &[&str]) -> Result<naga::Module, GpuError> {
    let module = wgsl::parse_str(source).map_err(|err| GpuError::ShaderCompile {
        stage: "parse",
        log: err.emit_to_string(source),
    })?;

    let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
    validator
        .validate(&module)
        .map_err(|err| GpuError::ShaderCompile {
            stage: "validate",
            log: format!("{}", err),
        })?;

    for name in entry_points {
        if !module.entry_points.iter().any(|ep| ep.name == *name) {
            return Err(GpuError::ShaderCompile {
                stage: "link",
                log: format!("missing entry point `{}`", name),
            });
        }
    }

    Ok(module)
}

/// Compile a WGSL module on `device`.
pub async fn compile_shader(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> Result<wgpu::ShaderModule, GpuError> {
    if let Err(err) = validate_wgsl(source, &[VERTEX_ENTRY, FRAGMENT_ENTRY]) {
        log::error!("{} rejected: {}", label, err);
        return Err(err);
    }

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    if let Some(err) = device.pop_error_scope().await {
        log::error!("{} rejected by device: {}", label, err);
        return Err(GpuError::ShaderCompile {
            stage: "device",
            log: err.to_string(),
        });
    }

    Ok(module)
}

/// Build the point-sprite render pipeline from a compiled shader.
///
/// A pipeline the device rejects is dropped before the error is returned.
pub async fn link_pipeline(
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    bind_group_layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
) -> Result<wgpu::RenderPipeline, GpuError> {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Point Pipeline Layout"),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    let buffers = vertex_layouts();

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Point Render Pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(VERTEX_ENTRY),
            buffers: &buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(FRAGMENT_ENTRY),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    if let Some(err) = device.pop_error_scope().await {
        drop(pipeline);
        log::error!("Point pipeline rejected: {}", err);
        return Err(GpuError::PipelineLink {
            log: err.to_string(),
        });
    }

    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_shader_validates() {
        let module = validate_wgsl(POINT_SHADER, &[VERTEX_ENTRY, FRAGMENT_ENTRY])
            .expect("point shader should validate");

        let vertex = module
            .entry_points
            .iter()
            .find(|ep| ep.name == VERTEX_ENTRY)
            .expect("vertex entry point");
        // vertex_index plus the three sprite attributes
        assert_eq!(vertex.function.arguments.len(), 4);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = validate_wgsl("fn vertex( {", &[]).unwrap_err();
        match err {
            GpuError::ShaderCompile { stage, log } => {
                assert_eq!(stage, "parse");
                assert!(!log.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_entry_point_is_reported() {
        let source = "@fragment fn fragment() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";
        let err = validate_wgsl(source, &[VERTEX_ENTRY, FRAGMENT_ENTRY]).unwrap_err();
        assert!(err.to_string().contains("vertex"));
    }

    #[test]
    fn test_vertex_layouts_match_locations() {
        let layouts = vertex_layouts();
        let locations: Vec<u32> = layouts
            .iter()
            .flat_map(|l| l.attributes.iter().map(|a| a.shader_location))
            .collect();
        assert_eq!(locations, vec![0, 1, 2]);
        assert_eq!(layouts[0].array_stride, 8);
        assert_eq!(layouts[1].array_stride, 16);
        assert_eq!(layouts[2].array_stride, 4);
        assert!(layouts
            .iter()
            .all(|l| l.step_mode == wgpu::VertexStepMode::Instance));
        assert_eq!(std::mem::size_of::<ViewportUniform>(), 16);
    }
}
