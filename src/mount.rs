//! Lifecycle of one simulation instance bound to the window.

use glam::{Vec2, Vec4};
use particle_physics::{PointSink, SurfaceRect};
use particle_renderer::{GpuContext, GpuError, PointRenderer, RenderError};
use particle_simulation::{
    FrameLoop, FrameRequest, FrameScheduler, FrameStatus, FrameTarget, Simulation,
    SimulationParams,
};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use winit::event::WindowEvent;
use winit::window::Window;

use crate::input;

/// Errors that leave the window without a simulation.
#[derive(Debug)]
pub enum MountError {
    /// Failed to create the window.
    WindowCreation(winit::error::OsError),
    /// Context acquisition, shader compile or pipeline link failed.
    Gpu(GpuError),
}

impl fmt::Display for MountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MountError::WindowCreation(e) => write!(f, "Failed to create window: {}", e),
            MountError::Gpu(e) => write!(f, "Failed to mount simulation: {}", e),
        }
    }
}

impl std::error::Error for MountError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MountError::WindowCreation(e) => Some(e),
            MountError::Gpu(e) => Some(e),
        }
    }
}

impl From<winit::error::OsError> for MountError {
    fn from(e: winit::error::OsError) -> Self {
        MountError::WindowCreation(e)
    }
}

impl From<GpuError> for MountError {
    fn from(e: GpuError) -> Self {
        MountError::Gpu(e)
    }
}

/// Frame scheduling through winit redraw requests.
///
/// A redraw request cannot be revoked; a cancelled loop ignores the redraw
/// when it arrives.
pub struct WinitScheduler {
    window: Arc<Window>,
    next: u64,
}

impl WinitScheduler {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window, next: 0 }
    }
}

impl FrameScheduler for WinitScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        self.next += 1;
        self.window.request_redraw();
        FrameRequest(self.next)
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        log::trace!("Cancelled frame request {:?}", request);
    }
}

/// Rendering context plus the shared sprite buffers.
struct Canvas {
    context: GpuContext,
    renderer: PointRenderer,
}

impl Canvas {
    fn present(&self) -> Result<(), RenderError> {
        let output = self.context.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.render(
            &self.context.device,
            &self.context.queue,
            &view,
            self.context.size(),
        )?;

        output.present();
        Ok(())
    }
}

impl PointSink for Canvas {
    fn draw_point(&mut self, position: Vec2, color: Vec4, size: f32) {
        self.renderer.batch_mut().draw_point(position, color, size);
    }
}

impl FrameTarget for Canvas {
    fn is_ready(&self) -> bool {
        self.renderer.is_ready()
    }

    fn clear(&mut self, color: Vec4) {
        self.renderer.begin_frame(color);
    }

    fn surface_width(&self) -> f32 {
        self.context.config.width as f32
    }
}

pub struct Mount {
    canvas: Canvas,
    simulation: Simulation,
    frame_loop: FrameLoop<WinitScheduler>,
}

impl Mount {
    /// Acquire a context, build the renderer, seed entities and start the loop.
    pub fn new(window: Arc<Window>, params: SimulationParams) -> Result<Self, MountError> {
        let size = window.inner_size();
        log::info!(
            "Mounting {}x{} canvas ({} particles)",
            size.width,
            size.height,
            params.particle_count
        );

        let context = pollster::block_on(GpuContext::acquire(
            window.clone(),
            size.width,
            size.height,
        ))?;
        let renderer = pollster::block_on(PointRenderer::new(
            &context.device,
            context.format(),
            params.sprite_capacity(),
        ))?;

        let simulation = Simulation::new(params, Instant::now());
        let mut frame_loop = FrameLoop::new(WinitScheduler::new(window));
        frame_loop.start();

        Ok(Self {
            canvas: Canvas { context, renderer },
            simulation,
            frame_loop,
        })
    }

    /// Stop the loop and release everything the mount owns.
    pub fn unmount(mut self) {
        let state = self.frame_loop.state();
        self.frame_loop.cancel();
        self.canvas.renderer.release();
        log::info!(
            "Unmounted after {} frames (loop was {:?})",
            self.frame_loop.frames(),
            state
        );
    }

    /// Answer a redraw: run one frame if the loop has one pending.
    ///
    /// A failed present stalls the loop and is returned to the caller.
    pub fn redraw(&mut self) -> Result<(), RenderError> {
        let Self {
            canvas,
            simulation,
            frame_loop,
        } = self;

        let mut failure = None;
        frame_loop.dispatch(|| {
            if simulation.frame(Instant::now(), &mut *canvas) == FrameStatus::Stalled {
                return FrameStatus::Stalled;
            }
            match canvas.present() {
                Ok(()) => FrameStatus::Rendered,
                Err(e) => {
                    failure = Some(e);
                    FrameStatus::Stalled
                }
            }
        });

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Feed a pointer or touch event to this instance. Returns true if consumed.
    pub fn handle_pointer(&mut self, event: &WindowEvent) -> bool {
        let (width, height) = self.canvas.context.size();
        let rect = SurfaceRect::from_size(width as f32, height as f32);
        input::route_pointer(event, self.simulation.pointer_mut(), &rect)
    }

    /// Fresh random entities without touching the GPU side.
    pub fn reseed(&mut self) {
        self.simulation.reseed();
    }

    /// Particles per role, indexed by role.
    pub fn role_counts(&self) -> [usize; 3] {
        self.simulation.role_counts()
    }

    /// Surface size this mount was built for.
    pub fn size(&self) -> (u32, u32) {
        self.canvas.context.size()
    }
}
