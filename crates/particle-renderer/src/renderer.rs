//! Point-sprite rendering system

use crate::error::{GpuError, RenderError};
use crate::pipeline::{self, ViewportUniform};
use glam::Vec4;
use particle_physics::PointBatch;

/// GPU half of the shared sprite buffers, allocated once at mount.
struct GpuResources {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    viewport_buffer: wgpu::Buffer,
    position_buffer: wgpu::Buffer,
    color_buffer: wgpu::Buffer,
    size_buffer: wgpu::Buffer,
}

impl GpuResources {
    fn destroy(self) {
        self.viewport_buffer.destroy();
        self.position_buffer.destroy();
        self.color_buffer.destroy();
        self.size_buffer.destroy();
    }
}

pub struct PointRenderer {
    resources: Option<GpuResources>,
    batch: PointBatch,
    clear_color: wgpu::Color,
}

impl PointRenderer {
    /// Compile the point shader, link the pipeline and allocate buffers for
    /// `capacity` sprites.
    pub async fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        capacity: usize,
    ) -> Result<Self, GpuError> {
        let shader = pipeline::compile_shader(device, "Point Shader", pipeline::POINT_SHADER).await?;

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Point Bind Group Layout"),
            entries: &[
                // Viewport (Uniform) - Binding 0
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let render_pipeline =
            pipeline::link_pipeline(device, &shader, &bind_group_layout, format).await?;

        let viewport_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Viewport Buffer"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Point Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_buffer.as_entire_binding(),
            }],
        });

        // Never zero-sized, so binding an empty frame stays valid
        let slots = capacity.max(1) as u64;
        let vertex_buffer = |label: &str, components: u64| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: slots * components * std::mem::size_of::<f32>() as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let position_buffer = vertex_buffer("Point Position Buffer", 2);
        let color_buffer = vertex_buffer("Point Color Buffer", 4);
        let size_buffer = vertex_buffer("Point Size Buffer", 1);

        log::info!("✓ Point renderer initialized ({} sprite slots)", capacity);

        Ok(Self {
            resources: Some(GpuResources {
                pipeline: render_pipeline,
                bind_group,
                viewport_buffer,
                position_buffer,
                color_buffer,
                size_buffer,
            }),
            batch: PointBatch::with_capacity(capacity),
            clear_color: wgpu::Color::BLACK,
        })
    }

    /// Pipeline and buffers are present.
    pub fn is_ready(&self) -> bool {
        self.resources.is_some()
    }

    /// Start a frame: empty the batch and remember the clear color.
    pub fn begin_frame(&mut self, clear: Vec4) {
        self.batch.clear();
        self.clear_color = wgpu::Color {
            r: clear.x as f64,
            g: clear.y as f64,
            b: clear.z as f64,
            a: clear.w as f64,
        };
    }

    pub fn batch(&self) -> &PointBatch {
        &self.batch
    }

    pub fn batch_mut(&mut self) -> &mut PointBatch {
        &mut self.batch
    }

    /// Upload the batch into the shared buffers and draw one sprite per call.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_view: &wgpu::TextureView,
        viewport: (u32, u32),
    ) -> Result<(), RenderError> {
        let resources = self
            .resources
            .as_ref()
            .ok_or(RenderError::ResourcesUnavailable)?;

        queue.write_buffer(
            &resources.viewport_buffer,
            0,
            bytemuck::cast_slice(&[ViewportUniform::new(viewport.0, viewport.1)]),
        );

        let count = self.batch.len() as u32;
        if count > 0 {
            queue.write_buffer(
                &resources.position_buffer,
                0,
                bytemuck::cast_slice(&self.batch.position_data()),
            );
            queue.write_buffer(
                &resources.color_buffer,
                0,
                bytemuck::cast_slice(&self.batch.color_data()),
            );
            queue.write_buffer(
                &resources.size_buffer,
                0,
                bytemuck::cast_slice(self.batch.size_data()),
            );
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Point Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Point Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&resources.pipeline);
            render_pass.set_bind_group(0, &resources.bind_group, &[]);
            render_pass.set_vertex_buffer(0, resources.position_buffer.slice(..));
            render_pass.set_vertex_buffer(1, resources.color_buffer.slice(..));
            render_pass.set_vertex_buffer(2, resources.size_buffer.slice(..));

            // One draw per sprite, in submission order
            for instance in 0..count {
                render_pass.draw(0..6, instance..instance + 1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    /// Destroy buffers and drop the pipeline. Further renders fail with
    /// `ResourcesUnavailable`.
    pub fn release(&mut self) {
        if let Some(resources) = self.resources.take() {
            resources.destroy();
            log::debug!("Point renderer resources released");
        }
        self.batch.clear();
    }
}

impl Drop for PointRenderer {
    fn drop(&mut self) {
        self.release();
    }
}
