use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, info, warn};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

use crate::{
    anchor::{AnchorId, AnchorProjector, Projection},
    camera::CameraTransform,
    emitter::{DriftEmitter, Emitter},
    particle::ParticleSystem,
    window::Size,
};

/// What happened during one [`Simulation::tick`].
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub evicted: usize,
    pub spawned: usize,
    pub projections: Vec<Projection>,
}

/// Frame driver owning both per-frame subsystems.
///
/// A tick always runs in the same order: particles advance, the emitter
/// spawns, anchors are projected.
#[derive(Debug, Clone)]
pub struct Simulation<M> {
    pub particles: ParticleSystem,
    pub anchors: AnchorProjector<M>,
    pub emitter: DriftEmitter,
    follower: Option<AnchorId>,
    rng: Pcg64Mcg,
}

impl<M> Simulation<M> {
    pub fn new(particles: ParticleSystem, emitter: DriftEmitter, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(clock_seed);
        info!("Seeded RNG with {}", seed);

        Self {
            particles,
            anchors: AnchorProjector::new(),
            emitter,
            follower: None,
            rng: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Registers an anchor that is moved to the emitter's position on every
    /// tick.
    pub fn attach_to_emitter(&mut self, metadata: M) -> AnchorId {
        let id = self.anchors.register(self.emitter.position(), metadata);
        self.follower = Some(id);
        id
    }

    pub fn tick(
        &mut self,
        delta_seconds: f32,
        camera: &CameraTransform,
        viewport: Size,
    ) -> FrameReport {
        let evicted = self.particles.advance(delta_seconds);
        let spawned = self
            .emitter
            .emit(delta_seconds, &mut self.rng, &mut self.particles);

        if let Some(id) = self.follower {
            if !self.anchors.set_position(id, self.emitter.position())
                && self.anchors.get(id).is_none()
            {
                warn!("Emitter anchor {:?} is no longer registered", id);
                self.follower = None;
            }
        }

        let projections = self.anchors.project_all(camera, viewport);
        debug!(
            "tick: {} particles (+{} -{}), {} anchors",
            self.particles.len(),
            spawned,
            evicted,
            projections.len()
        );

        FrameReport {
            evicted,
            spawned,
            projections,
        }
    }
}

fn clock_seed() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_millis() as u64,
        Err(_) => 0,
    }
}
