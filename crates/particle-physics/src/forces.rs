//! Pairwise particle interactions
//!
//! Every unordered pair is visited once per frame, before any particle
//! integrates its motion, so forces are computed on pre-update positions.

use crate::constants::{MIN_SEPARATION, SENSE_RADIUS_FACTOR};
use crate::particle::{Particle, Role};
use crate::vecmath::{normalize_vec2, with_speed};
use glam::Vec2;

/// What happens when two particles meet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PairInteraction {
    /// Overlapping discs exchange an equal-mass impulse and are pushed apart.
    Collide { restitution: f32 },
    /// Roles steer toward prey and away from predators at constant speed;
    /// within `conversion_factor * radius` the predator converts its prey.
    ChaseFlee {
        steering: f32,
        conversion_factor: f32,
    },
}

/// How the first particle of a pair relates to the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Chases,
    Flees,
    Neutral,
}

impl Relation {
    pub fn between(this: Role, other: Role) -> Self {
        if this.chases(other) {
            Relation::Chases
        } else if other.chases(this) {
            Relation::Flees
        } else {
            Relation::Neutral
        }
    }
}

pub fn interact(a: &mut Particle, b: &mut Particle, interaction: &PairInteraction) {
    match *interaction {
        PairInteraction::Collide { restitution } => collide(a, b, restitution),
        PairInteraction::ChaseFlee {
            steering,
            conversion_factor,
        } => chase_flee(a, b, steering, conversion_factor),
    }
}

/// Run `interaction` over every unordered pair, in index order.
pub fn interact_pairs(particles: &mut [Particle], interaction: &PairInteraction) {
    for i in 0..particles.len() {
        let (head, tail) = particles.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail {
            interact(a, b, interaction);
        }
    }
}

/// Impulse-based response for two equal-mass discs.
pub fn collide(a: &mut Particle, b: &mut Particle, restitution: f32) {
    let delta = a.position - b.position;
    let distance = delta.length();
    let min_distance = a.radius + b.radius;
    if distance >= min_distance {
        return;
    }

    // Coincident centers have no direction; push apart along x
    let normal = if distance > MIN_SEPARATION {
        delta / distance
    } else {
        Vec2::X
    };

    // Already separating
    let relative_normal = (a.velocity - b.velocity).dot(normal);
    if relative_normal > 0.0 {
        return;
    }

    let impulse = normal * (-(1.0 + restitution) * relative_normal / 2.0);
    a.velocity += impulse;
    b.velocity -= impulse;

    let separation = normal * ((min_distance - distance) / 2.0);
    a.position += separation;
    b.position -= separation;
}

/// Predator/prey steering and conversion.
pub fn chase_flee(a: &mut Particle, b: &mut Particle, steering: f32, conversion_factor: f32) {
    let delta = a.position - b.position;
    let distance = delta.length();
    if distance > a.radius * SENSE_RADIUS_FACTOR {
        return;
    }

    let (Some(role_a), Some(role_b)) = (a.role, b.role) else {
        return;
    };
    let relation = Relation::between(role_a, role_b);
    if relation == Relation::Neutral {
        return;
    }

    if distance > 0.0 {
        let sign = if relation == Relation::Chases { -1.0 } else { 1.0 };
        let nudge = normalize_vec2(delta) / (distance * distance) * steering * sign;

        let speed_a = a.speed();
        let speed_b = b.speed();
        a.velocity = with_speed(a.velocity + nudge, speed_a);
        b.velocity = with_speed(b.velocity + nudge, speed_b);
    }

    if distance <= a.radius * conversion_factor {
        match relation {
            Relation::Chases => b.set_role(role_a),
            Relation::Flees => a.set_role(role_b),
            Relation::Neutral => {}
        }
    }
}
