// Rendering system using wgpu

pub mod batch;
pub mod blur;
mod camera;
mod frame;
pub mod overlay;
mod sprite;
pub mod texture;
mod vertex;

pub use batch::{DrawCommand, SpriteBatch, SpriteFlip};
pub use blur::{BlurFrame, BlurKernel};
pub use camera::{Camera, CameraUniform};
pub use frame::Frame;
pub use overlay::{Alignment, OverlayCommand, TextAnchor};
pub use vertex::Vertex;

use crate::engine::assets::AssetManager;
use anyhow::Result;
use blur::BlurPass;
use glam::{Vec2, Vec4};
use log::info;
use overlay::OverlayPainter;
use sprite::SpritePipeline;
use std::sync::Arc;
use texture::{GpuTexture, TextureCache};
use winit::window::Window;

/// Offscreen targets the scene is drawn into before compositing
struct Targets {
    scene: GpuTexture,
    blur: GpuTexture,
}

impl Targets {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        config: &wgpu::SurfaceConfiguration,
    ) -> Self {
        let target = |label| {
            GpuTexture::render_target(
                device,
                layout,
                sampler,
                config.width,
                config.height,
                config.format,
                Some(label),
            )
        };
        Self {
            scene: target("Scene Target"),
            blur: target("Blur Target"),
        }
    }
}

fn to_wgpu_color(color: Vec4) -> wgpu::Color {
    wgpu::Color {
        r: color.x as f64,
        g: color.y as f64,
        b: color.z as f64,
        a: color.w as f64,
    }
}

/// Main renderer responsible for initializing wgpu and coordinating rendering
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    texture_layout: wgpu::BindGroupLayout,
    textures: TextureCache,
    sprites: SpritePipeline,
    blur: BlurPass,
    overlay: OverlayPainter,
    targets: Targets,
    camera: Camera,
}

impl Renderer {
    /// Create a new renderer for the given window
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        info!("Using GPU: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Surface reports no texture formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        let texture_layout = texture::texture_bind_group_layout(&device);
        let textures = TextureCache::new(&device);
        let sprites = SpritePipeline::new(&device, surface_format, &texture_layout);
        let blur = BlurPass::new(&device, surface_format, &texture_layout);
        let overlay = OverlayPainter::new(&device, surface_format);
        let targets = Targets::new(&device, &texture_layout, textures.sampler(), &config);
        let camera = Camera::screen_space(config.width as f32, config.height as f32);

        info!(
            "Renderer initialized with {}x{} resolution ({:?})",
            config.width, config.height, surface_format
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            texture_layout,
            textures,
            sprites,
            blur,
            overlay,
            targets,
            camera,
        })
    }

    /// Resize the renderer
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.targets = Targets::new(
                &self.device,
                &self.texture_layout,
                self.textures.sampler(),
                &self.config,
            );
            self.camera
                .resize(new_size.width as f32, new_size.height as f32);
            info!("Renderer resized to {}x{}", new_size.width, new_size.height);
        }
    }

    /// Reconfigure the surface after it was lost or became outdated
    pub fn reconfigure(&mut self) {
        self.resize(self.size);
    }

    /// An empty frame sized to the current surface
    pub fn begin_frame(&self) -> Frame {
        Frame::new(self.viewport())
    }

    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.config.width as f32, self.config.height as f32)
    }

    /// Render a frame
    pub fn render(&mut self, frame: &Frame, assets: &AssetManager) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.textures.prune(assets);
        match frame.camera_focus {
            Some(focus) => self.camera.set_position(focus),
            None => self.camera.set_position(self.viewport() * 0.5),
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.sprites.draw(
            &self.device,
            &self.queue,
            &mut encoder,
            &self.targets.scene.view,
            &self.texture_layout,
            &mut self.textures,
            assets,
            &self.camera,
            &frame.scene,
            to_wgpu_color(frame.clear_color),
        );

        self.blur.apply(
            &self.queue,
            &mut encoder,
            &self.targets.scene,
            &self.targets.blur,
            &view,
            frame.blur.as_ref(),
        );

        if !frame.overlay.is_empty() {
            self.overlay.paint(
                &self.device,
                &self.queue,
                &mut encoder,
                &view,
                [self.config.width, self.config.height],
                &frame.overlay,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Get the surface format
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }
}
