//! Per-frame simulation for a drifting smoke emitter and hotspot labels.
//!
//! [`particle::ParticleSystem`] spawns and retires smoke puffs,
//! [`anchor::AnchorProjector`] maps world-space hotspots to overlay pixels, and
//! [`simulation::Simulation`] drives both once per frame.

pub mod anchor;
pub mod camera;
pub mod clock;
pub mod emitter;
pub mod entity;
pub mod overlay;
pub mod particle;
pub mod simulation;
pub mod window;
