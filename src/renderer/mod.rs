use anyhow::{Context, Result};
use log::warn;

use drift_scene::{camera::CameraTransform, window::Size};

mod billboard;

pub use billboard::Billboard;
use billboard::BillboardRenderer;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.04,
    b: 0.08,
    a: 1.0,
};

pub struct Renderer {
    surface: wgpu::Surface,
    surface_format: wgpu::TextureFormat,
    size: Size,
    device: wgpu::Device,
    queue: wgpu::Queue,
    billboard_renderer: BillboardRenderer,
}

impl Renderer {
    pub async fn new(window: &winit::window::Window) -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::Backends::PRIMARY);
        let surface = unsafe { instance.create_surface(window) };

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No adapter found")?;

        let surface_format = surface
            .get_preferred_format(&adapter)
            .context("No preferred format found")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default(), None)
            .await
            .context("No device found")?;

        let size: Size = window.inner_size().into();
        Self::configure_surface(&surface, &device, surface_format, size);

        let billboard_renderer = BillboardRenderer::new(&device, surface_format);

        Ok(Self {
            surface,
            surface_format,
            size,
            device,
            queue,
            billboard_renderer,
        })
    }

    fn configure_surface(
        surface: &wgpu::Surface,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: Size,
    ) {
        if size.is_empty() {
            return;
        }
        surface.configure(
            device,
            &wgpu::SurfaceConfiguration {
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                format,
                width: size.width,
                height: size.height,
                present_mode: wgpu::PresentMode::Fifo,
            },
        )
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
        Self::configure_surface(&self.surface, &self.device, self.surface_format, size);
    }

    pub fn render(&mut self, camera: &CameraTransform, billboards: &[Billboard]) {
        if self.size.is_empty() {
            return;
        }

        self.billboard_renderer
            .update(&self.device, &self.queue, camera, billboards);

        let surface_texture = match self.surface.get_current_texture() {
            Ok(surface_texture) => surface_texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost, reconfiguring");
                Self::configure_surface(&self.surface, &self.device, self.surface_format, self.size);
                return;
            }
            Err(e) => {
                warn!("Skipping frame: {}", e);
                return;
            }
        };

        let surface_texture_view = surface_texture.texture.create_view(&Default::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Command Encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Billboard Render Pass"),
                color_attachments: &[wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: true,
                    },
                }],
                depth_stencil_attachment: None,
            });
            self.billboard_renderer.draw(&mut rpass);
        }

        self.queue.submit(Some(encoder.finish()));

        surface_texture.present();
    }
}
