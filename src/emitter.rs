use std::f32::consts::{PI, TAU};

use glam::{vec3, Quat, Vec3};
use log::warn;
use rand::Rng;

use crate::{clock::sanitize_delta, particle::ParticleSystem};

/// Decides where and when particles are spawned each frame.
pub trait Emitter {
    /// Runs one frame of emission and returns how many particles were added.
    fn emit<R: Rng + ?Sized>(
        &mut self,
        delta_seconds: f32,
        rng: &mut R,
        particles: &mut ParticleSystem,
    ) -> usize;
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriftConfig {
    pub center: Vec3,
    pub radius: f32,
    /// Radians per reference step.
    pub angular_speed: f32,
    pub reference_rate: f32,
    /// Extra yaw applied on top of the direction of travel.
    pub heading_offset: f32,
    /// Trail points in the emitter's local frame.
    pub trail_offsets: Vec<Vec3>,
    /// Chance of spawning at each trail point per frame.
    pub spawn_probability: f64,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 5.0,
            angular_speed: 0.02,
            reference_rate: 60.0,
            heading_offset: PI / 8.0,
            trail_offsets: vec![vec3(-0.5, 0.2, 0.8), vec3(0.5, 0.2, 0.8)],
            spawn_probability: 0.6,
        }
    }
}

/// An object circling `center` that leaves smoke at its trail offsets.
#[derive(Debug, Clone)]
pub struct DriftEmitter {
    config: DriftConfig,
    angle: f32,
}

impl DriftEmitter {
    pub fn new(mut config: DriftConfig) -> Self {
        if !(0.0..=1.0).contains(&config.spawn_probability) {
            warn!(
                "Spawn probability {} out of range, clamping",
                config.spawn_probability
            );
            config.spawn_probability = if config.spawn_probability.is_nan() {
                0.0
            } else {
                config.spawn_probability.clamp(0.0, 1.0)
            };
        }
        Self { config, angle: 0.0 }
    }

    pub fn config(&self) -> &DriftConfig {
        &self.config
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn position(&self) -> Vec3 {
        let (sin, cos) = self.angle.sin_cos();
        self.config.center + vec3(cos, 0.0, sin) * self.config.radius
    }

    /// Yaw of the emitter in radians.
    pub fn heading(&self) -> f32 {
        -self.angle - self.config.heading_offset
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.heading())
    }

    /// Trail offsets rotated by the heading and moved to the current position.
    pub fn trail_points(&self) -> impl Iterator<Item = Vec3> + '_ {
        let position = self.position();
        let rotation = self.rotation();
        self.config
            .trail_offsets
            .iter()
            .map(move |offset| position + rotation * *offset)
    }

    /// Moves the emitter along its circle.
    pub fn advance(&mut self, delta_seconds: f32) {
        let steps = sanitize_delta(delta_seconds) * self.config.reference_rate;
        self.angle = (self.angle + self.config.angular_speed * steps).rem_euclid(TAU);
    }
}

impl Default for DriftEmitter {
    fn default() -> Self {
        Self::new(DriftConfig::default())
    }
}

impl Emitter for DriftEmitter {
    fn emit<R: Rng + ?Sized>(
        &mut self,
        delta_seconds: f32,
        rng: &mut R,
        particles: &mut ParticleSystem,
    ) -> usize {
        self.advance(delta_seconds);

        let probability = self.config.spawn_probability;
        let mut spawned = 0;
        for point in self.trail_points() {
            if rng.gen_bool(probability) && particles.spawn(point) {
                spawned += 1;
            }
        }
        spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn test_starts_on_circle() {
        let emitter = DriftEmitter::default();
        assert_eq!(emitter.position(), vec3(5.0, 0.0, 0.0));
        assert_abs_diff_eq!(emitter.heading(), -PI / 8.0);
    }

    #[test]
    fn test_advance_is_time_scaled() {
        let mut emitter = DriftEmitter::default();
        emitter.advance(0.5);
        assert_abs_diff_eq!(emitter.angle(), 0.6, epsilon = 1e-5);

        emitter.advance(-1.0);
        assert_abs_diff_eq!(emitter.angle(), 0.6, epsilon = 1e-5);

        let position = emitter.position();
        assert_abs_diff_eq!(position.length(), 5.0, epsilon = 1e-4);
        assert_abs_diff_eq!(position.x, 5.0 * 0.6f32.cos(), epsilon = 1e-4);
        assert_abs_diff_eq!(position.z, 5.0 * 0.6f32.sin(), epsilon = 1e-4);
    }

    #[test]
    fn test_trail_points_follow_heading() {
        let emitter = DriftEmitter::default();
        let rotation = Quat::from_rotation_y(-PI / 8.0);
        let expected: Vec<_> = [vec3(-0.5, 0.2, 0.8), vec3(0.5, 0.2, 0.8)]
            .iter()
            .map(|offset| vec3(5.0, 0.0, 0.0) + rotation * *offset)
            .collect();

        let points: Vec<_> = emitter.trail_points().collect();
        assert_eq!(points.len(), 2);
        for (point, expected) in points.iter().zip(expected) {
            assert!(point.abs_diff_eq(expected, 1e-5));
            assert_abs_diff_eq!(point.y, 0.2, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_emit_probability_bounds() {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        let mut particles = ParticleSystem::default();

        let mut always = DriftEmitter::new(DriftConfig {
            spawn_probability: 1.0,
            ..Default::default()
        });
        for _ in 0..10 {
            assert_eq!(always.emit(0.016, &mut rng, &mut particles), 2);
        }
        assert_eq!(particles.len(), 20);

        let mut never = DriftEmitter::new(DriftConfig {
            spawn_probability: 0.0,
            ..Default::default()
        });
        for _ in 0..10 {
            assert_eq!(never.emit(0.016, &mut rng, &mut particles), 0);
        }
        assert_eq!(particles.len(), 20);
    }

    #[test]
    fn test_emit_is_deterministic_for_seed() {
        let run = |seed| {
            let mut rng = Pcg64Mcg::seed_from_u64(seed);
            let mut emitter = DriftEmitter::default();
            let mut particles = ParticleSystem::default();
            (0..100)
                .map(|_| emitter.emit(0.016, &mut rng, &mut particles))
                .collect::<Vec<_>>()
        };

        let counts = run(42);
        assert_eq!(counts, run(42));
        let total: usize = counts.iter().sum();
        assert!(total > 60 && total < 180, "unexpected total {}", total);
    }

    #[test]
    fn test_invalid_probability_is_clamped() {
        let emitter = DriftEmitter::new(DriftConfig {
            spawn_probability: 3.0,
            ..Default::default()
        });
        assert_eq!(emitter.config().spawn_probability, 1.0);

        let emitter = DriftEmitter::new(DriftConfig {
            spawn_probability: f64::NAN,
            ..Default::default()
        });
        assert_eq!(emitter.config().spawn_probability, 0.0);
    }

    #[test]
    fn test_emit_respects_particle_cap() {
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let mut particles = ParticleSystem::new(crate::particle::SmokeConfig {
            max_count: Some(3),
            ..Default::default()
        });
        let mut emitter = DriftEmitter::new(DriftConfig {
            spawn_probability: 1.0,
            ..Default::default()
        });

        assert_eq!(emitter.emit(0.016, &mut rng, &mut particles), 2);
        assert_eq!(emitter.emit(0.016, &mut rng, &mut particles), 1);
        assert_eq!(emitter.emit(0.016, &mut rng, &mut particles), 0);
    }
}
