//! # Particle Physics
//!
//! CPU-side 2D particle model: vector math, particles and obstacles, pairwise
//! interactions, pointer state and the shared point-sprite buffer entities
//! render into.

pub mod constants;
pub mod forces;
pub mod particle;
pub mod pointer;
pub mod sprite;
pub mod vecmath;

pub use constants::*;
pub use forces::*;
pub use particle::*;
pub use pointer::*;
pub use sprite::*;
pub use vecmath::{Flatten, MathError};
