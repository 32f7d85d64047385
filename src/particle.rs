//! Short-lived smoke puffs: spawn, integrate, retire.

use glam::Vec3;
use log::{debug, warn};

use crate::clock::sanitize_delta;

/// Smoke tuning. Rates are per reference step; a frame of `delta` seconds
/// counts as `delta * reference_rate` steps.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SmokeConfig {
    pub initial_opacity: f32,
    pub initial_scale: f32,
    pub rise_per_step: f32,
    pub fade_per_step: f32,
    /// Relative scale growth per step, compounded.
    pub growth_per_step: f32,
    pub reference_rate: f32,
    /// Upper bound on live particles. `None` means unbounded.
    pub max_count: Option<usize>,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            initial_opacity: 0.6,
            initial_scale: 1.0,
            rise_per_step: 0.02,
            fade_per_step: 0.008,
            growth_per_step: 0.02,
            reference_rate: 60.0,
            max_count: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub opacity: f32,
    pub scale: f32,
}

impl Particle {
    pub fn is_expired(&self) -> bool {
        self.opacity <= 0.0
    }
}

/// The set of live particles.
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    config: SmokeConfig,
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new(config: SmokeConfig) -> Self {
        Self {
            config,
            particles: Vec::new(),
        }
    }

    pub fn config(&self) -> &SmokeConfig {
        &self.config
    }

    /// Adds a particle at `position` with the configured initial opacity and
    /// scale. Returns `false` when the position is not finite or the system is
    /// at `max_count`.
    pub fn spawn(&mut self, position: Vec3) -> bool {
        if !position.is_finite() {
            warn!("Rejecting particle with non-finite position {:?}", position);
            return false;
        }
        if let Some(max_count) = self.config.max_count {
            if self.particles.len() >= max_count {
                return false;
            }
        }

        self.particles.push(Particle {
            position,
            opacity: self.config.initial_opacity,
            scale: self.config.initial_scale,
        });
        true
    }

    /// Integrates every particle by `delta_seconds` and drops the ones that
    /// faded out. Returns how many were dropped.
    ///
    /// Traverses from the back so a `swap_remove` only ever moves an element
    /// that was already updated this pass.
    pub fn advance(&mut self, delta_seconds: f32) -> usize {
        let delta = sanitize_delta(delta_seconds);
        if delta == 0.0 {
            return 0;
        }

        let steps = delta * self.config.reference_rate;
        let rise = self.config.rise_per_step * steps;
        let fade = self.config.fade_per_step * steps;
        let growth = (1.0 + self.config.growth_per_step).powf(steps);

        let mut evicted = 0;
        for i in (0..self.particles.len()).rev() {
            let expired = {
                let particle = &mut self.particles[i];
                particle.position.y += rise;
                particle.opacity -= fade;
                particle.scale = (particle.scale * growth).min(f32::MAX);
                particle.is_expired() || !particle.opacity.is_finite()
            };
            if expired {
                self.particles.swap_remove(i);
                evicted += 1;
            }
        }

        if evicted > 0 {
            debug!(
                "Evicted {} particles, {} remaining",
                evicted,
                self.particles.len()
            );
        }
        evicted
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new(SmokeConfig::default())
    }
}
