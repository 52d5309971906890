//! CPU particle simulation manager
//!
//! Owns the entities of one mounted instance and advances them once per frame:
//! every pair interacts first, then each particle handles the walls, its
//! environment force, integrates and renders. Obstacles draw last.

use crate::clock::FrameClock;
use crate::frame_loop::FrameStatus;
use crate::params::{Coloring, Environment, RadiusRange, SimulationParams};
use glam::{Vec2, Vec4};
use particle_physics::vecmath::{normalize_vec2, vec4};
use particle_physics::{
    interact_pairs, Obstacle, Particle, PointSink, PointerState, Role, OBSTACLE_COLOR,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

/// Where a frame is drawn: the shared sprite buffers plus a clearable surface.
pub trait FrameTarget: PointSink {
    /// Context, program and buffers are all present.
    fn is_ready(&self) -> bool;
    fn clear(&mut self, color: Vec4);
    /// Surface width in pixels; sprite sizes scale with it.
    fn surface_width(&self) -> f32;
}

pub struct Simulation {
    params: SimulationParams,
    particles: Vec<Particle>,
    obstacles: Vec<Obstacle>,
    pointer: PointerState,
    clock: FrameClock,
    rng: StdRng,
}

impl Simulation {
    pub fn new(params: SimulationParams, mounted_at: Instant) -> Self {
        log::info!(
            "Seeding simulation: {} particles, {} obstacles",
            params.particle_count,
            params.obstacle_count()
        );

        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        let clock = FrameClock::new(mounted_at, params.time_scale);

        let mut simulation = Self {
            params,
            particles: Vec::new(),
            obstacles: Vec::new(),
            pointer: PointerState::default(),
            clock,
            rng,
        };
        simulation.seed_entities();
        simulation
    }

    /// Replace every entity with a fresh random population.
    pub fn reseed(&mut self) {
        self.seed_entities();
        log::debug!("Reseeded {} particles", self.particles.len());
    }

    fn seed_entities(&mut self) {
        let count = self.params.particle_count;
        let particles: Vec<Particle> = (0..count).map(|i| self.spawn_particle(i, count)).collect();

        let obstacles: Vec<Obstacle> = (0..self.params.obstacle_count())
            .map(|_| {
                let position = random_position(&mut self.rng);
                Obstacle::new(position, vec4(&OBSTACLE_COLOR))
            })
            .collect();

        self.particles = particles;
        self.obstacles = obstacles;
    }

    fn spawn_particle(&mut self, index: usize, count: usize) -> Particle {
        let position = random_position(&mut self.rng);
        let velocity = normalize_vec2(Vec2::new(
            self.rng.random::<f32>() - 0.5,
            self.rng.random::<f32>() - 0.5,
        ));
        let radius = match self.params.radius {
            RadiusRange::Fixed(radius) => radius,
            RadiusRange::Uniform { min, spread } => min + self.rng.random::<f32>() * spread,
        };

        match self.params.coloring {
            Coloring::Shaded { floor } => {
                let brightness = self.rng.random::<f32>().max(floor);
                let color = vec4(&[0.4 * brightness, 0.4 * brightness, brightness]);
                Particle::new(position, velocity, color, radius)
            }
            Coloring::Roles => {
                let role = Role::from_index((index * 3 / count.max(1)) as u32);
                Particle::with_role(position, velocity, role, radius)
            }
        }
    }

    /// Advance by `dt` simulation-seconds and draw into `sink`.
    pub fn step<S: PointSink + ?Sized>(&mut self, dt: f32, sink: &mut S, surface_width: f32) {
        interact_pairs(&mut self.particles, &self.params.interaction);

        let params = &self.params;
        for particle in &mut self.particles {
            particle.handle_wall_collisions(params.wall_restitution);
            match params.environment {
                Environment::Pointer { strength } => {
                    particle.handle_pointer_force(dt, &self.pointer, strength);
                }
                Environment::Obstacles { repulsion, .. } => {
                    particle.handle_obstacle_force(&self.obstacles, repulsion);
                }
            }
            particle.update(dt, params.gravity);
            particle.render(&mut *sink, surface_width, params.sprite_style);
        }

        for obstacle in &self.obstacles {
            obstacle.render(&mut *sink);
        }
    }

    /// One frame callback: clear, tick the clock, step.
    ///
    /// Returns `Stalled` without touching any state if the target is not ready.
    pub fn frame<T: FrameTarget + ?Sized>(&mut self, now: Instant, target: &mut T) -> FrameStatus {
        if !target.is_ready() {
            log::warn!("Render target not ready; skipping frame");
            return FrameStatus::Stalled;
        }

        target.clear(self.params.clear_color);
        let dt = self.clock.tick(now);
        let width = target.surface_width();
        self.step(dt, target, width);
        FrameStatus::Rendered
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn pointer_mut(&mut self) -> &mut PointerState {
        &mut self.pointer
    }

    /// Count of particles per role, indexed by `Role::index`.
    pub fn role_counts(&self) -> [usize; 3] {
        let mut counts = [0; 3];
        for role in self.particles.iter().filter_map(|p| p.role) {
            counts[role.index() as usize] += 1;
        }
        counts
    }
}

/// Uniform in `[-1, 1)` on both axes.
fn random_position(rng: &mut StdRng) -> Vec2 {
    Vec2::new(
        rng.random::<f32>() * 2.0 - 1.0,
        rng.random::<f32>() * 2.0 - 1.0,
    )
}
