//! Simulation constants
//!
//! All distances are in clip space, where the visible surface spans [-1, 1]
//! on both axes.

/// Half-extent of the simulation box
pub const BOUNDARY: f32 = 1.0;

/// Interaction range as a multiple of the particle radius
pub const SENSE_RADIUS_FACTOR: f32 = 10.0;

/// Distance below which a pair is treated as coincident in collision response
pub const MIN_SEPARATION: f32 = 0.001;

// Bounce-and-attract preset

/// Downward acceleration applied before integration
pub const GRAVITY: f32 = 3.0;

/// Velocity fraction kept after hitting a wall
pub const WALL_RESTITUTION: f32 = 0.8;

/// Velocity fraction kept along the normal in particle-particle collisions
pub const COLLISION_RESTITUTION: f32 = 0.8;

/// Pointer attraction strength
pub const POINTER_STRENGTH: f32 = 1.0;

/// Smallest randomized radius
pub const BOUNCE_RADIUS_MIN: f32 = 0.015;

/// Width of the randomized radius range
pub const BOUNCE_RADIUS_SPREAD: f32 = 0.03;

// Chase-flee-convert preset

/// Radius shared by every predator/prey particle
pub const PREY_RADIUS: f32 = 0.02;

/// Distance of the "head" sprite ahead of the body
pub const HEAD_DISTANCE: f32 = 0.04;

/// Magnitude of the chase/flee velocity nudge
pub const STEERING_STRENGTH: f32 = 0.0001;

/// Conversion range as a multiple of the particle radius
pub const CONVERSION_RADIUS_FACTOR: f32 = 2.5;

/// Magnitude of the obstacle repulsion nudge
pub const OBSTACLE_REPULSION: f32 = 0.0005;

/// Halo sprite size in pixels
pub const OBSTACLE_HALO_SIZE: f32 = 70.0;

/// Halo alpha
pub const OBSTACLE_HALO_ALPHA: f32 = 0.1;

/// Core sprite size in pixels
pub const OBSTACLE_CORE_SIZE: f32 = 22.0;

/// Obstacle tint (RGBA)
pub const OBSTACLE_COLOR: [f32; 4] = [0.95, 0.5, 0.85, 1.0];

/// Body sprite size as a fraction of the surface width
pub const BODY_SIZE_FRACTION: f32 = 1.0 / 20.0;

/// Head sprite size as a fraction of the surface width
pub const HEAD_SIZE_FRACTION: f32 = 1.0 / 30.0;
