//! Particle and obstacle entities

use crate::constants::*;
use crate::forces::{self, PairInteraction};
use crate::pointer::PointerState;
use crate::sprite::PointSink;
use crate::vecmath::{normalize_vec2, vec4, with_speed};
use glam::{Vec2, Vec4};

/// Predator/prey role. Each role chases the next one (cyclically) and flees
/// the previous one.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Blue = 0,
    Green = 1,
    Red = 2,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Blue, Role::Green, Role::Red];

    pub fn index(self) -> u32 {
        self as u32
    }

    /// Role for `index`, wrapping modulo 3.
    pub fn from_index(index: u32) -> Self {
        match index % 3 {
            0 => Role::Blue,
            1 => Role::Green,
            _ => Role::Red,
        }
    }

    /// Display color; the role's own channel is 1.0, the others 0.2.
    pub fn color(self) -> Vec4 {
        match self {
            Role::Blue => vec4(&[0.2, 0.2, 1.0]),
            Role::Green => vec4(&[0.2, 1.0, 0.2]),
            Role::Red => vec4(&[1.0, 0.2, 0.2]),
        }
    }

    /// True if `self` hunts `other`.
    pub fn chases(self, other: Role) -> bool {
        (self.index() + 1) % 3 == other.index()
    }
}

/// How a particle is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpriteStyle {
    /// One sprite whose pixel size is `surface_width * radius`.
    Scaled,
    /// A body sprite plus a smaller head sprite `head_distance` ahead along
    /// the velocity.
    BodyAndHead { head_distance: f32 },
}

/// A point particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Clip-space position
    pub position: Vec2,
    /// Clip-space units per simulation-second
    pub velocity: Vec2,
    /// Render color (RGBA)
    pub color: Vec4,
    /// Collision / visual radius, strictly positive
    pub radius: f32,
    /// Predator/prey role; `None` when color is purely cosmetic
    pub role: Option<Role>,
}

impl Particle {
    /// A particle with a cosmetic color and no role.
    pub fn new(position: Vec2, velocity: Vec2, color: Vec4, radius: f32) -> Self {
        debug_assert!(radius > 0.0, "particle radius must be positive");
        Self {
            position,
            velocity,
            color,
            radius,
            role: None,
        }
    }

    /// A predator/prey particle colored by its role.
    pub fn with_role(position: Vec2, velocity: Vec2, role: Role, radius: f32) -> Self {
        let mut particle = Self::new(position, velocity, role.color(), radius);
        particle.role = Some(role);
        particle
    }

    /// Convert to `role`; color follows.
    pub fn set_role(&mut self, role: Role) {
        self.role = Some(role);
        self.color = role.color();
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Range within which other entities are noticed.
    pub fn sense_radius(&self) -> f32 {
        self.radius * SENSE_RADIUS_FACTOR
    }

    /// Euler step. `gravity` is subtracted from the vertical velocity first.
    pub fn update(&mut self, dt: f32, gravity: f32) {
        self.velocity.y -= gravity * dt;
        self.position += self.velocity * dt;
    }

    /// Clamp inside the box and reflect the outward velocity component,
    /// keeping `restitution` of it.
    pub fn handle_wall_collisions(&mut self, restitution: f32) {
        let min = -BOUNDARY + self.radius;
        let max = BOUNDARY - self.radius;

        for axis in 0..2 {
            if self.position[axis] <= min {
                self.position[axis] = min;
                if self.velocity[axis] < 0.0 {
                    self.velocity[axis] = -self.velocity[axis] * restitution;
                }
            } else if self.position[axis] >= max {
                self.position[axis] = max;
                if self.velocity[axis] > 0.0 {
                    self.velocity[axis] = -self.velocity[axis] * restitution;
                }
            }
        }
    }

    /// Resolve the interaction between this particle and `other`.
    pub fn handle_particle_collisions(&mut self, other: &mut Particle, interaction: &PairInteraction) {
        forces::interact(self, other, interaction);
    }

    /// Pull toward the pointer while it hovers within sensing range.
    pub fn handle_pointer_force(&mut self, dt: f32, pointer: &PointerState, strength: f32) {
        if !pointer.over_surface {
            return;
        }

        let delta = pointer.position - self.position;
        let distance = delta.length();
        if distance > self.sense_radius() || distance == 0.0 {
            return;
        }

        self.velocity += normalize_vec2(delta) / distance * strength * dt;
    }

    /// Push away from every obstacle in range, then restore the original speed.
    pub fn handle_obstacle_force(&mut self, obstacles: &[Obstacle], repulsion: f32) {
        let speed = self.speed();
        let mut pushed = false;

        for obstacle in obstacles {
            let delta = self.position - obstacle.position;
            let distance = delta.length();
            if distance > self.sense_radius() || distance == 0.0 {
                continue;
            }

            self.velocity += normalize_vec2(delta) / distance * repulsion;
            pushed = true;
        }

        if pushed {
            self.velocity = with_speed(self.velocity, speed);
        }
    }

    /// Where the head sprite sits; the body position when stationary.
    pub fn head_position(&self, head_distance: f32) -> Vec2 {
        let speed = self.speed();
        if speed == 0.0 {
            return self.position;
        }
        self.position + self.velocity / speed * head_distance
    }

    pub fn render<S: PointSink + ?Sized>(&self, sink: &mut S, surface_width: f32, style: SpriteStyle) {
        match style {
            SpriteStyle::Scaled => {
                sink.draw_point(self.position, self.color, surface_width * self.radius);
            }
            SpriteStyle::BodyAndHead { head_distance } => {
                sink.draw_point(
                    self.position,
                    self.color,
                    surface_width * BODY_SIZE_FRACTION,
                );
                sink.draw_point(
                    self.head_position(head_distance),
                    self.color,
                    surface_width * HEAD_SIZE_FRACTION,
                );
            }
        }
    }
}

/// A static repulsor. Immutable after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub position: Vec2,
    pub color: Vec4,
}

impl Obstacle {
    pub fn new(position: Vec2, color: Vec4) -> Self {
        Self { position, color }
    }

    /// Translucent sensing halo, then the opaque core.
    pub fn render<S: PointSink + ?Sized>(&self, sink: &mut S) {
        let halo = self.color.truncate().extend(OBSTACLE_HALO_ALPHA);
        sink.draw_point(self.position, halo, OBSTACLE_HALO_SIZE);

        let core = self.color.truncate().extend(1.0);
        sink.draw_point(self.position, core, OBSTACLE_CORE_SIZE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::{PointBatch, PointSprite};

    const EPS: f32 = 1e-5;

    #[test]
    fn test_role_cycle() {
        assert!(Role::Blue.chases(Role::Green));
        assert!(Role::Green.chases(Role::Red));
        assert!(Role::Red.chases(Role::Blue));
        assert!(!Role::Green.chases(Role::Blue));
        assert!(!Role::Red.chases(Role::Red));
        assert_eq!(Role::from_index(4), Role::Green);
        assert_eq!(Role::Blue.color(), Vec4::new(0.2, 0.2, 1.0, 1.0));
        assert_eq!(Role::Red.color(), Vec4::new(1.0, 0.2, 0.2, 1.0));
    }

    #[test]
    fn test_update_integrates_with_gravity() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::new(1.0, 0.0), Vec4::ONE, 0.02);
        p.update(0.5, 2.0);

        assert_eq!(p.velocity, Vec2::new(1.0, -1.0));
        assert_eq!(p.position, Vec2::new(0.5, -0.5));
    }

    #[test]
    fn test_wall_collision_clamps_and_reflects() {
        let mut p = Particle::new(Vec2::new(0.99, -1.2), Vec2::new(0.5, -0.25), Vec4::ONE, 0.03);
        p.handle_wall_collisions(0.8);

        assert_eq!(p.position.x, 1.0 - 0.03);
        assert_eq!(p.position.y, -1.0 + 0.03);
        assert!((p.velocity.x + 0.4).abs() < EPS);
        assert!((p.velocity.y - 0.2).abs() < EPS);
        assert!(p.position.x.abs() + p.radius <= 1.0 + EPS);
        assert!(p.position.y.abs() + p.radius <= 1.0 + EPS);
    }

    #[test]
    fn test_wall_collision_keeps_inward_velocity() {
        let mut p = Particle::new(Vec2::new(-0.99, 0.0), Vec2::new(0.3, 0.0), Vec4::ONE, 0.02);
        p.handle_wall_collisions(0.8);

        assert_eq!(p.position.x, -1.0 + 0.02);
        assert_eq!(p.velocity.x, 0.3);
    }

    #[test]
    fn test_obstacle_force_conserves_speed() {
        let obstacles = [
            Obstacle::new(Vec2::new(0.05, 0.0), Vec4::ONE),
            Obstacle::new(Vec2::new(0.0, -0.1), Vec4::ONE),
            Obstacle::new(Vec2::new(0.9, 0.9), Vec4::ONE),
        ];
        let mut p = Particle::new(Vec2::ZERO, Vec2::new(0.6, 0.8), Vec4::ONE, 0.02);
        let before = p.velocity;

        p.handle_obstacle_force(&obstacles, 0.0005);

        assert_ne!(p.velocity, before);
        assert!((p.speed() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_obstacle_out_of_range_is_ignored() {
        let obstacles = [Obstacle::new(Vec2::new(0.5, 0.5), Vec4::ONE)];
        let mut p = Particle::new(Vec2::ZERO, Vec2::new(0.0, 1.0), Vec4::ONE, 0.02);
        p.handle_obstacle_force(&obstacles, 0.0005);

        assert_eq!(p.velocity, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_pointer_attracts_only_when_over_surface() {
        let mut pointer = PointerState {
            position: Vec2::new(0.1, 0.0),
            over_surface: false,
        };
        let mut p = Particle::new(Vec2::ZERO, Vec2::ZERO, Vec4::ONE, 0.02);

        p.handle_pointer_force(0.1, &pointer, 1.0);
        assert_eq!(p.velocity, Vec2::ZERO);

        pointer.entered();
        p.handle_pointer_force(0.1, &pointer, 1.0);
        assert!(p.velocity.x > 0.0);
        assert!((p.velocity.x - 1.0).abs() < EPS);
        assert_eq!(p.velocity.y, 0.0);

        // Out of sensing range
        let mut far = Particle::new(Vec2::new(-0.9, 0.0), Vec2::ZERO, Vec4::ONE, 0.02);
        far.handle_pointer_force(0.1, &pointer, 1.0);
        assert_eq!(far.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_render_styles() {
        let mut batch = PointBatch::with_capacity(8);
        let p = Particle::with_role(Vec2::ZERO, Vec2::new(0.0, 2.0), Role::Red, 0.02);

        p.render(&mut batch, 300.0, SpriteStyle::Scaled);
        p.render(&mut batch, 300.0, SpriteStyle::BodyAndHead { head_distance: 0.04 });

        let sprites: Vec<PointSprite> = batch.sprites().collect();
        assert_eq!(sprites.len(), 3);
        assert!((sprites[0].size - 6.0).abs() < EPS);
        assert!((sprites[1].size - 15.0).abs() < EPS);
        assert!((sprites[2].size - 10.0).abs() < EPS);
        assert!((sprites[2].position - Vec2::new(0.0, 0.04)).length() < EPS);
        assert_eq!(sprites[2].color, Role::Red.color());
    }

    #[test]
    fn test_obstacle_renders_halo_then_core() {
        let mut batch = PointBatch::with_capacity(2);
        let obstacle = Obstacle::new(Vec2::new(0.3, -0.3), Vec4::from_array(OBSTACLE_COLOR));
        obstacle.render(&mut batch);

        let halo = batch.sprite(0).expect("halo sprite");
        let core = batch.sprite(1).expect("core sprite");
        assert_eq!(halo.size, OBSTACLE_HALO_SIZE);
        assert_eq!(halo.color.w, OBSTACLE_HALO_ALPHA);
        assert_eq!(core.size, OBSTACLE_CORE_SIZE);
        assert_eq!(core.color.w, 1.0);
        assert_eq!(core.position, obstacle.position);
    }
}
