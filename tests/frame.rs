use approx::assert_abs_diff_eq;
use drift_scene::{
    camera::{Camera, OrbitCamera},
    emitter::{DriftConfig, DriftEmitter},
    entity::{HotspotInfo, Scene},
    overlay::{present, LabelOverlay},
    particle::{ParticleSystem, SmokeConfig},
    simulation::Simulation,
    window::Size,
};
use glam::vec3;

const VIEWPORT: Size = Size {
    width: 1280,
    height: 720,
};

fn orbit(scene: &Scene) -> OrbitCamera {
    let camera = Camera {
        aspect_ratio: VIEWPORT.aspect_ratio(),
        ..scene.camera
    };
    OrbitCamera::looking_at(camera, scene.camera_position, scene.camera_target)
}

fn simulation(scene: &Scene) -> Simulation<HotspotInfo> {
    let mut simulation = Simulation::new(
        ParticleSystem::new(scene.smoke),
        DriftEmitter::new(scene.drift.clone()),
        Some(7),
    );
    for hotspot in &scene.hotspots {
        simulation
            .anchors
            .register(hotspot.position, hotspot.info.clone());
    }
    simulation
}

#[test]
fn test_default_scene_hotspots_visible() {
    let scene = Scene::default();
    let camera = orbit(&scene).transform();
    let mut simulation = simulation(&scene);

    let report = simulation.tick(1.0 / 60.0, &camera, VIEWPORT);
    assert_eq!(report.projections.len(), 3);
    for projection in &report.projections {
        assert!(projection.visible);
        assert!(projection.pixel.x > 0.0 && projection.pixel.x < VIEWPORT.width as f32);
        assert!(projection.pixel.y > 0.0 && projection.pixel.y < VIEWPORT.height as f32);
    }
}

#[test]
fn test_tick_advances_before_emitting() {
    let scene = Scene {
        drift: DriftConfig {
            spawn_probability: 1.0,
            ..Default::default()
        },
        ..Default::default()
    };
    let camera = orbit(&scene).transform();
    let mut simulation = simulation(&scene);

    let report = simulation.tick(0.5, &camera, VIEWPORT);
    assert_eq!(report.spawned, 2);
    assert_eq!(report.evicted, 0);

    // Fresh spawns are not aged by the frame that created them.
    for particle in simulation.particles.particles() {
        assert_eq!(particle.opacity, 0.6);
        assert_eq!(particle.scale, 1.0);
    }

    let report = simulation.tick(0.5, &camera, VIEWPORT);
    assert_eq!(report.spawned, 2);
    assert_eq!(simulation.particles.len(), 4);

    // 48 more steps fade the first pair out, the second pair lingers.
    let report = simulation.tick(0.8, &camera, VIEWPORT);
    assert_eq!(report.evicted, 2);
    assert_eq!(simulation.particles.len(), 4);
}

#[test]
fn test_population_settles_with_steady_frames() {
    let scene = Scene::default();
    let camera = orbit(&scene).transform();
    let mut simulation = simulation(&scene);

    // Each puff lives roughly 75 steps, so at one step per frame the
    // population stays near two spawn points times 75 frames.
    for _ in 0..600 {
        simulation.tick(1.0 / 60.0, &camera, VIEWPORT);
        assert!(simulation.particles.len() <= 2 * 80);
        assert!(simulation
            .particles
            .particles()
            .iter()
            .all(|particle| particle.opacity > 0.0 && particle.scale.is_finite()));
    }
    assert!(!simulation.particles.is_empty());
}

#[test]
fn test_particle_cap_is_enforced() {
    let scene = Scene {
        smoke: SmokeConfig {
            max_count: Some(10),
            ..Default::default()
        },
        ..Default::default()
    };
    let camera = orbit(&scene).transform();
    let mut simulation = simulation(&scene);

    for _ in 0..120 {
        simulation.tick(1.0 / 60.0, &camera, VIEWPORT);
        assert!(simulation.particles.len() <= 10);
    }
}

#[test]
fn test_attached_anchor_follows_emitter() {
    let scene = Scene::default();
    let camera = orbit(&scene).transform();
    let mut simulation = simulation(&scene);
    let id = simulation.attach_to_emitter(HotspotInfo::new("Drifter", "circling"));

    for _ in 0..30 {
        simulation.tick(1.0 / 60.0, &camera, VIEWPORT);
    }

    let anchor = simulation.anchors.get(id).unwrap();
    let expected = simulation.emitter.position();
    assert!(anchor.position.abs_diff_eq(expected, 1e-6));
    assert_abs_diff_eq!(simulation.emitter.angle(), 0.6, epsilon = 1e-4);
    assert_ne!(anchor.position, vec3(5., 0., 0.));
}

#[test]
fn test_hidden_after_orbiting_behind() {
    let scene = Scene::default();
    let mut orbit = orbit(&scene);
    let mut simulation: Simulation<HotspotInfo> = Simulation::new(
        ParticleSystem::default(),
        DriftEmitter::default(),
        Some(1),
    );
    let id = simulation
        .anchors
        .register(vec3(0., 0., 4.), HotspotInfo::new("Near", "in front"));
    let mut overlay = LabelOverlay::new();

    let report = simulation.tick(0.0, &orbit.transform(), VIEWPORT);
    present(&mut overlay, &simulation.anchors, &report.projections);
    assert!(overlay.label(id).map(|label| label.visible).unwrap_or(false));

    // Pull the eye in past the anchor: it ends up behind the camera.
    orbit.rotate(0.0, -orbit.pitch);
    orbit.distance = 2.0;

    let report = simulation.tick(0.0, &orbit.transform(), VIEWPORT);
    present(&mut overlay, &simulation.anchors, &report.projections);
    let label = overlay.label(id).unwrap();
    assert!(!label.visible);
    assert!(label.position.is_finite());
}
