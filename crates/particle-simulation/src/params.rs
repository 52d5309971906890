//! Simulation parameters and named presets

use glam::Vec4;
use particle_physics::*;

/// Named parameter sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Colliding particles under gravity, pulled toward the pointer.
    BounceAndAttract,
    /// Three roles hunting each other around static obstacles.
    ChaseFleeConvert,
}

impl Preset {
    pub fn name(self) -> &'static str {
        match self {
            Preset::BounceAndAttract => "bounce-and-attract",
            Preset::ChaseFleeConvert => "chase-flee-convert",
        }
    }

    pub fn params(self) -> SimulationParams {
        match self {
            Preset::BounceAndAttract => SimulationParams::bounce_and_attract(),
            Preset::ChaseFleeConvert => SimulationParams::chase_flee_convert(),
        }
    }
}

/// Particle radius policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RadiusRange {
    Fixed(f32),
    /// Uniform in `[min, min + spread)`
    Uniform { min: f32, spread: f32 },
}

/// How particles are colored at seeding time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coloring {
    /// Blue shade with brightness `max(rand, floor)`; no roles
    Shaded { floor: f32 },
    /// Population split in thirds across the roles
    Roles,
}

/// Forces from the environment, applied per particle after wall handling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Environment {
    Pointer { strength: f32 },
    Obstacles { count: usize, repulsion: f32 },
}

/// Every tunable of one simulation instance.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    pub particle_count: usize,
    pub radius: RadiusRange,
    pub coloring: Coloring,
    /// Downward acceleration
    pub gravity: f32,
    pub wall_restitution: f32,
    pub interaction: PairInteraction,
    pub environment: Environment,
    pub sprite_style: SpriteStyle,
    pub clear_color: Vec4,
    /// Simulation-seconds per real second
    pub time_scale: f32,
    /// Fixed RNG seed for reproducible seeding
    pub seed: Option<u64>,
}

/// 0.0004 simulation-seconds per millisecond.
pub const TIME_SCALE: f32 = 0.4;

impl SimulationParams {
    pub fn bounce_and_attract() -> Self {
        Self {
            particle_count: 200,
            radius: RadiusRange::Uniform {
                min: BOUNCE_RADIUS_MIN,
                spread: BOUNCE_RADIUS_SPREAD,
            },
            coloring: Coloring::Shaded { floor: 0.4 },
            gravity: GRAVITY,
            wall_restitution: WALL_RESTITUTION,
            interaction: PairInteraction::Collide {
                restitution: COLLISION_RESTITUTION,
            },
            environment: Environment::Pointer {
                strength: POINTER_STRENGTH,
            },
            sprite_style: SpriteStyle::Scaled,
            clear_color: Vec4::new(0.85, 0.85, 0.95, 1.0),
            time_scale: TIME_SCALE,
            seed: None,
        }
    }

    pub fn chase_flee_convert() -> Self {
        Self {
            particle_count: 75,
            radius: RadiusRange::Fixed(PREY_RADIUS),
            coloring: Coloring::Roles,
            gravity: 0.0,
            // Speed is conserved everywhere else in this preset
            wall_restitution: 1.0,
            interaction: PairInteraction::ChaseFlee {
                steering: STEERING_STRENGTH,
                conversion_factor: CONVERSION_RADIUS_FACTOR,
            },
            environment: Environment::Obstacles {
                count: 4,
                repulsion: OBSTACLE_REPULSION,
            },
            sprite_style: SpriteStyle::BodyAndHead {
                head_distance: HEAD_DISTANCE,
            },
            clear_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            time_scale: TIME_SCALE,
            seed: None,
        }
    }

    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn obstacle_count(&self) -> usize {
        match self.environment {
            Environment::Obstacles { count, .. } => count,
            Environment::Pointer { .. } => 0,
        }
    }

    /// Upper bound on sprites drawn per frame; sizes the shared buffers.
    pub fn sprite_capacity(&self) -> usize {
        let per_particle = match self.sprite_style {
            SpriteStyle::Scaled => 1,
            SpriteStyle::BodyAndHead { .. } => 2,
        };
        self.particle_count * per_particle + self.obstacle_count() * 2
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self::chase_flee_convert()
    }
}
