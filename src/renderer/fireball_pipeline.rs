//! Fireball WebGPU render pipeline
//!
//! One pass, one draw: the full-screen quad runs the raymarching fragment stage.

use std::borrow::Cow;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::error::RendererError;
use super::quad::{QUAD_VERTEX_COUNT, QUAD_VERTICES, QuadVertex};
use super::shader::{LinkedProgram, ProgramError, ProgramState, build_fireball_program};

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

/// Uniform block shared with `fireball_frag.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Globals {
    pub resolution: [f32; 3], // offset 0 (width, height, 1.0)
    pub time: f32,            // offset 12, seconds since start
}

impl Globals {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            resolution: [width as f32, height as f32, 1.0],
            time: 0.0,
        }
    }
}

/// Byte offset of `time`; the only field written per frame
pub const TIME_OFFSET: wgpu::BufferAddress = std::mem::offset_of!(Globals, time) as wgpu::BufferAddress;

enum PipelineState {
    Ready(wgpu::RenderPipeline),
    Unusable(ProgramError),
}

// ============================================================================
// FIREBALL RENDER STATE
// ============================================================================

pub struct FireballRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pipeline: PipelineState,

    globals_buffer: wgpu::Buffer,
    quad_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl FireballRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, RendererError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("fireball-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        // The shader writes display-ready color, so skip the sRGB encode when we can
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .ok_or(RendererError::UnsupportedSurface)?;

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        log::info!("Surface config: {}x{}", width, height);
        surface.configure(&device, &config);

        // Resolution is written here once; frames only touch `time`
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals::new(width, height)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let quad_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("fireball_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<Globals>() as u64),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("fireball_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let pipeline = match build_fireball_program() {
            ProgramState::Linked(program) => {
                let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
                let pipeline = create_pipeline(&device, &bind_group_layout, &program, config.format);
                match scope.pop().await {
                    None => PipelineState::Ready(pipeline),
                    Some(e) => {
                        let e = ProgramError::Pipeline(e.to_string());
                        log::error!("Fireball pipeline rejected, nothing will be drawn: {e}");
                        PipelineState::Unusable(e)
                    }
                }
            }
            ProgramState::Unusable(e) => {
                log::error!("Fireball program unusable, nothing will be drawn: {e}");
                PipelineState::Unusable(e)
            }
        };

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            quad_buffer,
            bind_group,
        })
    }

    /// Why no frame can be drawn, if the program failed to build
    pub fn program_error(&self) -> Option<&ProgramError> {
        match &self.pipeline {
            PipelineState::Ready(_) => None,
            PipelineState::Unusable(e) => Some(e),
        }
    }

    /// Re-apply the surface configuration after it was lost or outdated
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Draw one frame at `elapsed` seconds since start
    pub fn render(&self, elapsed: f32) -> Result<(), RendererError> {
        let pipeline = match &self.pipeline {
            PipelineState::Ready(pipeline) => pipeline,
            PipelineState::Unusable(e) => return Err(RendererError::ProgramUnusable(e.clone())),
        };

        self.queue
            .write_buffer(&self.globals_buffer, TIME_OFFSET, bytemuck::bytes_of(&elapsed));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("fireball_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("fireball_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
            render_pass.draw(0..QUAD_VERTEX_COUNT, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    program: &LinkedProgram,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let vertex = program.vertex();
    let fragment = program.fragment();

    let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(vertex.label()),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(vertex.source())),
    });
    let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(fragment.label()),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(fragment.source())),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("fireball_pipeline_layout"),
        bind_group_layouts: &[bind_group_layout],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("fireball_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &vertex_module,
            entry_point: Some(vertex.kind().entry_point()),
            buffers: &[QuadVertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &fragment_module,
            entry_point: Some(fragment.kind().entry_point()),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}
