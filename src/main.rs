//! 2D Particle Canvas
//!
//! Bouncing particles pulled toward the pointer, or three roles chasing,
//! fleeing and converting each other around static obstacles.

mod input;
mod mount;

use clap::{Parser, ValueEnum};
use mount::{Mount, MountError};
use particle_renderer::RenderError;
use particle_simulation::{Preset, SimulationParams};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

/// Quiet period after the last resize before remounting.
const RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PresetArg {
    Bounce,
    Chase,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Bounce => Preset::BounceAndAttract,
            PresetArg::Chase => Preset::ChaseFleeConvert,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "2D particle simulation presets")]
struct Args {
    /// Which simulation to run
    #[arg(long, value_enum, default_value_t = PresetArg::Chase)]
    preset: PresetArg,
    /// Override the preset's particle count
    #[arg(long)]
    particles: Option<usize>,
    /// Seed for reproducible initial conditions
    #[arg(long)]
    seed: Option<u64>,
    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 600)]
    width: u32,
    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 600)]
    height: u32,
}

struct App {
    args: Args,
    preset: Preset,
    window: Option<Arc<Window>>,
    mount: Option<Mount>,
    /// Remount once this instant passes without another resize.
    remount_at: Option<Instant>,
    title: String,
}

impl App {
    fn new(args: Args) -> Self {
        Self {
            preset: args.preset.into(),
            args,
            window: None,
            mount: None,
            remount_at: None,
            title: String::new(),
        }
    }

    fn params(&self) -> SimulationParams {
        let mut params = self.preset.params();
        if let Some(count) = self.args.particles {
            params = params.with_particle_count(count);
        }
        if let Some(seed) = self.args.seed {
            params = params.with_seed(seed);
        }
        params
    }

    fn mount(&mut self) {
        let Some(window) = self.window.clone() else {
            return;
        };

        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            log::debug!("Surface has zero area; deferring mount");
            return;
        }

        match Mount::new(window.clone(), self.params()) {
            Ok(mount) => {
                self.mount = Some(mount);
                self.refresh_title();
            }
            Err(e) => {
                log::error!("{}", e);
                window.set_title("Particles - unavailable");
            }
        }
    }

    /// Preset name, plus the population per role when roles exist.
    fn refresh_title(&mut self) {
        let (Some(window), Some(mount)) = (&self.window, &self.mount) else {
            return;
        };

        let title = format_title(self.preset, mount.role_counts());
        if title != self.title {
            window.set_title(&title);
            self.title = title;
        }
    }

    fn unmount(&mut self) {
        if let Some(mount) = self.mount.take() {
            mount.unmount();
        }
    }

    fn switch_preset(&mut self, preset: Preset) {
        log::info!("Switching to {}", preset.name());
        self.preset = preset;
        self.unmount();
        self.mount();
    }

    fn schedule_remount(&mut self, event_loop: &ActiveEventLoop) {
        self.unmount();
        if let Some(window) = &self.window {
            window.set_title("Resizing...");
        }
        self.title.clear();
        let deadline = Instant::now() + RESIZE_DEBOUNCE;
        self.remount_at = Some(deadline);
        event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode) {
        match code {
            KeyCode::Escape => {
                self.unmount();
                event_loop.exit();
            }
            KeyCode::KeyR => {
                if let Some(mount) = &mut self.mount {
                    mount.reseed();
                }
            }
            KeyCode::Digit1 => self.switch_preset(Preset::BounceAndAttract),
            KeyCode::Digit2 => self.switch_preset(Preset::ChaseFleeConvert),
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title("Particles")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.args.width,
                self.args.height,
            ));

        match event_loop.create_window(window_attributes) {
            Ok(window) => {
                self.window = Some(Arc::new(window));
                self.mount();
            }
            Err(e) => {
                log::error!("{}", MountError::from(e));
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(mount) = &mut self.mount {
            if mount.handle_pointer(&event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                self.unmount();
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, code),

            WindowEvent::Resized(physical_size) => {
                let unchanged = self
                    .mount
                    .as_ref()
                    .is_some_and(|m| m.size() == (physical_size.width, physical_size.height));
                if !unchanged {
                    self.schedule_remount(event_loop);
                }
            }

            WindowEvent::RedrawRequested => {
                if let Some(mount) = &mut self.mount {
                    match mount.redraw() {
                        Ok(()) => self.refresh_title(),
                        Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                            log::error!("Surface out of memory");
                            event_loop.exit();
                        }
                        Err(e) => log::warn!("Frame loop stalled: {}", e),
                    }
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(deadline) = self.remount_at else {
            return;
        };

        if Instant::now() >= deadline {
            self.remount_at = None;
            event_loop.set_control_flow(ControlFlow::Wait);
            self.mount();
        } else {
            event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
        }
    }
}

fn format_title(preset: Preset, [blue, green, red]: [usize; 3]) -> String {
    if blue + green + red == 0 {
        format!("Particles - {}", preset.name())
    } else {
        format!(
            "Particles - {} - blue {} / green {} / red {}",
            preset.name(),
            blue,
            green,
            red
        )
    }
}

fn main() {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Starting particle canvas ({:?} preset)", args.preset);

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            std::process::exit(1);
        }
    };
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(args);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
        std::process::exit(1);
    }
}
