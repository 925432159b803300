// Separable blur post-process

use super::texture::GpuTexture;
use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use wgpu::util::DeviceExt;

/// Taps per blur direction, fixed by the shader
pub const BLUR_SAMPLES: usize = 15;

/// Weights and texture-coordinate offsets for one blur direction
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlurKernel {
    pub weights: Vec<f32>,
    pub offsets: Vec<Vec2>,
}

/// Horizontal and vertical kernels applied to one frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlurFrame {
    pub horizontal: BlurKernel,
    pub vertical: BlurKernel,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BlurUniform {
    /// x = weight, yz = offset, w unused
    samples: [[f32; 4]; BLUR_SAMPLES],
}

impl BlurUniform {
    /// Passes the source through untouched
    pub fn identity() -> Self {
        let mut samples = [[0.0; 4]; BLUR_SAMPLES];
        samples[0][0] = 1.0;
        Self { samples }
    }

    /// Pack a kernel. Kernel weights sum to two, so each tap is halved to keep
    /// the pass at unit gain. Taps beyond [`BLUR_SAMPLES`] are ignored.
    pub fn from_kernel(kernel: &BlurKernel) -> Self {
        let mut samples = [[0.0; 4]; BLUR_SAMPLES];
        for (slot, (weight, offset)) in samples
            .iter_mut()
            .zip(kernel.weights.iter().zip(kernel.offsets.iter()))
        {
            *slot = [weight * 0.5, offset.x, offset.y, 0.0];
        }
        Self { samples }
    }

    pub fn gain(&self) -> f32 {
        self.samples.iter().map(|s| s[0]).sum()
    }
}

struct UniformSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl UniformSlot {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&[BlurUniform::identity()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }
}

/// Fullscreen pass that blurs the scene target onto the surface
pub struct BlurPass {
    pipeline: wgpu::RenderPipeline,
    horizontal: UniformSlot,
    vertical: UniformSlot,
    identity: UniformSlot,
}

impl BlurPass {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        texture_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Blur Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/blur.wgsl").into()),
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Blur Uniform Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Blur Pipeline Layout"),
            bind_group_layouts: &[texture_layout, &uniform_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Blur Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        Self {
            pipeline,
            horizontal: UniformSlot::new(device, &uniform_layout, "Blur Horizontal"),
            vertical: UniformSlot::new(device, &uniform_layout, "Blur Vertical"),
            identity: UniformSlot::new(device, &uniform_layout, "Blur Identity"),
        }
    }

    /// Composite `scene` onto `output`, blurring through `intermediate` when
    /// a blur frame is given
    pub fn apply(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        scene: &GpuTexture,
        intermediate: &GpuTexture,
        output: &wgpu::TextureView,
        blur: Option<&BlurFrame>,
    ) {
        match blur {
            Some(frame) => {
                queue.write_buffer(
                    &self.horizontal.buffer,
                    0,
                    bytemuck::cast_slice(&[BlurUniform::from_kernel(&frame.horizontal)]),
                );
                queue.write_buffer(
                    &self.vertical.buffer,
                    0,
                    bytemuck::cast_slice(&[BlurUniform::from_kernel(&frame.vertical)]),
                );
                self.run(encoder, &scene.bind_group, &self.horizontal, &intermediate.view);
                self.run(encoder, &intermediate.bind_group, &self.vertical, output);
            }
            None => self.run(encoder, &scene.bind_group, &self.identity, output),
        }
    }

    fn run(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        source: &wgpu::BindGroup,
        uniform: &UniformSlot,
        target: &wgpu::TextureView,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Blur Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, source, &[]);
        pass.set_bind_group(1, &uniform.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_has_unit_gain() {
        assert_eq!(BlurUniform::identity().gain(), 1.0);
    }

    #[test]
    fn test_kernel_packing_halves_weights() {
        let kernel = BlurKernel {
            weights: vec![1.0, 0.5, 0.5],
            offsets: vec![Vec2::ZERO, Vec2::new(0.0015, 0.0), Vec2::new(-0.0015, 0.0)],
        };
        let uniform = BlurUniform::from_kernel(&kernel);
        assert_relative_eq!(uniform.gain(), 1.0);
        assert_eq!(uniform.samples[1], [0.25, 0.0015, 0.0, 0.0]);
        assert_eq!(uniform.samples[2], [0.25, -0.0015, 0.0, 0.0]);
        assert_eq!(uniform.samples[3], [0.0; 4]);
    }

    #[test]
    fn test_uniform_size_matches_shader_array() {
        assert_eq!(std::mem::size_of::<BlurUniform>(), 16 * BLUR_SAMPLES);
    }
}
