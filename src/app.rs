use anyhow::Result;
use glam::{vec4, Vec4};
use log::info;
use winit::{
    dpi::PhysicalPosition,
    event::{MouseScrollDelta, VirtualKeyCode},
    window::Window,
};

use drift_scene::{
    camera::{Camera, OrbitCamera},
    clock::FrameClock,
    emitter::DriftEmitter,
    entity::{HotspotInfo, Scene},
    overlay::{present, LabelOverlay},
    particle::ParticleSystem,
    simulation::Simulation,
    window::{HasSize, Size},
};

use crate::renderer::{Billboard, Renderer};

/// World-space diameter of a puff at scale 1.
const SMOKE_SIZE: f32 = 0.2;
const SMOKE_COLOR: Vec4 = glam::const_vec4!([0.33, 0.33, 0.33, 1.0]);
const HOTSPOT_SIZE: f32 = 0.25;
const HOTSPOT_COLOR: Vec4 = glam::const_vec4!([1.0, 0.78, 0.3, 1.0]);
const DRIFTER_SIZE: f32 = 0.8;
const DRIFTER_COLOR: Vec4 = glam::const_vec4!([0.85, 0.2, 0.15, 1.0]);

pub struct App {
    window: Window,
    orbit: OrbitCamera,
    simulation: Simulation<HotspotInfo>,
    overlay: LabelOverlay,
    clock: FrameClock,
    renderer: Renderer,
    dragging: bool,
}

impl App {
    pub async fn new(window: Window) -> Result<Self> {
        let scene = Scene {
            camera: Camera {
                aspect_ratio: window.size().aspect_ratio(),
                ..Default::default()
            },
            ..Default::default()
        };
        info!("{:#?}", &scene);

        let orbit = OrbitCamera::looking_at(scene.camera, scene.camera_position, scene.camera_target);

        let mut simulation = Simulation::new(
            ParticleSystem::new(scene.smoke),
            DriftEmitter::new(scene.drift.clone()),
            scene.seed,
        );
        for hotspot in &scene.hotspots {
            simulation
                .anchors
                .register(hotspot.position, hotspot.info.clone());
        }
        if let Some(info) = scene.drift_hotspot.clone() {
            simulation.attach_to_emitter(info);
        }

        let renderer = Renderer::new(&window).await?;

        Ok(Self {
            window,
            orbit,
            simulation,
            overlay: LabelOverlay::new(),
            clock: FrameClock::new(),
            renderer,
            dragging: false,
        })
    }

    pub fn on_resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        let size = Size::from(size);
        if !size.is_empty() {
            self.orbit.set_aspect_ratio(size.aspect_ratio());
        }
        self.renderer.resize(size);
    }

    pub fn on_mouse_button(&mut self, pressed: bool) {
        self.dragging = pressed;
    }

    pub fn on_key_up(&mut self, keycode: VirtualKeyCode) {
        match keycode {
            VirtualKeyCode::Tab => {
                if let Some(label) = self.overlay.focus_next() {
                    info!("{}: {}", label.title, label.description);
                }
            }
            VirtualKeyCode::Escape => {
                self.overlay.close();
            }
            VirtualKeyCode::C => {
                self.simulation.particles.clear();
                info!("Smoke cleared");
            }
            _ => (),
        }
    }

    pub fn on_mouse_move(&mut self, (x, y): (f64, f64)) {
        if !self.dragging {
            return;
        }
        self.orbit.rotate(x as f32 * -0.005, y as f32 * 0.005);
    }

    pub fn on_mouse_scroll(&mut self, delta: MouseScrollDelta) {
        let y = match delta {
            MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => y as f32,
            MouseScrollDelta::LineDelta(_, y) => y * 60.0,
        };
        self.orbit.zoom((y * -0.002).exp());
    }

    pub fn render(&mut self) {
        let delta = self.clock.delta();
        let viewport = self.window.size();
        let camera = self.orbit.transform();

        let report = self.simulation.tick(delta, &camera, viewport);
        present(&mut self.overlay, &self.simulation.anchors, &report.projections);

        let billboards = self.billboards();
        self.renderer.render(&camera, &billboards);
    }

    fn billboards(&self) -> Vec<Billboard> {
        let particles = self.simulation.particles.particles();
        let anchors = &self.simulation.anchors;

        let mut billboards = Vec::with_capacity(particles.len() + anchors.len() + 1);
        billboards.push(Billboard::new(
            self.simulation.emitter.position(),
            DRIFTER_SIZE,
            DRIFTER_COLOR,
        ));
        billboards.extend(
            anchors
                .iter()
                .map(|anchor| Billboard::new(anchor.position, HOTSPOT_SIZE, HOTSPOT_COLOR)),
        );
        billboards.extend(particles.iter().map(|particle| {
            Billboard::new(
                particle.position,
                SMOKE_SIZE * particle.scale,
                vec4(SMOKE_COLOR.x, SMOKE_COLOR.y, SMOKE_COLOR.z, particle.opacity),
            )
        }));
        billboards
    }
}
