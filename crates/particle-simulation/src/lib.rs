//! # Particle Simulation Engine
//!
//! Seeds and steps the particle presets on the CPU, converts host timestamps
//! into simulation time and drives the self-rescheduling frame loop.

pub mod clock;
pub mod frame_loop;
pub mod params;
pub mod simulation;

pub use clock::*;
pub use frame_loop::*;
pub use params::*;
pub use simulation::*;
