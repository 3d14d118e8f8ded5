//! WebGPU render pipeline setup
//!
//! Vertices arrive in logical screen pixels (origin top-left, y down) and are
//! letterboxed into the surface so the playfield keeps its aspect ratio.

use anyhow::Context;
use wgpu::util::DeviceExt;

use super::scene::Scene;
use super::shapes::tessellate;
use super::vertex::Vertex;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    /// Viewport size in pixels
    pub size: (u32, u32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Self> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("crab-crossing-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .context("requesting WebGPU device")?;

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no texture formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Create shader module
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        // Create pipeline
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        // Create initial vertex buffer (will be updated each frame)
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vertex_buffer"),
            contents: bytemuck::cast_slice(&[Vertex::new(0.0, 0.0, [1.0; 4])]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        log::info!(
            "Render pipeline ready: {}x{} {:?}",
            width,
            height,
            config.format
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_count: 0,
            size: (width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Convert logical screen pixels to normalized device coordinates
    pub fn game_to_ndc(&self, x: f32, y: f32) -> (f32, f32) {
        screen_to_ndc(self.size, x, y)
    }

    /// Tessellate and draw a scene
    pub fn render_scene(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        let vertices = tessellate(scene);
        self.render(&vertices)
    }

    /// Upload vertices and render
    pub fn render(&mut self, vertices: &[Vertex]) -> Result<(), wgpu::SurfaceError> {
        // Convert vertices to NDC
        let ndc_vertices: Vec<Vertex> = vertices
            .iter()
            .map(|v| {
                let (x, y) = self.game_to_ndc(v.position[0], v.position[1]);
                Vertex::new(x, y, v.color)
            })
            .collect();

        // Recreate buffer if needed (simple approach; could optimize)
        self.vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("vertex_buffer"),
                contents: bytemuck::cast_slice(&ndc_vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        self.vertex_count = ndc_vertices.len() as u32;

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        // Letterbox bars
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

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.draw(0..self.vertex_count, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Map logical pixels into NDC for a viewport of `size`
///
/// The 500x700 playfield is scaled uniformly to fit and centred; the
/// remaining bars stay at the clear colour.
pub fn screen_to_ndc(size: (u32, u32), x: f32, y: f32) -> (f32, f32) {
    let (w, h) = (size.0.max(1) as f32, size.1.max(1) as f32);
    let scale = (w / SCREEN_WIDTH).min(h / SCREEN_HEIGHT);
    // Fraction of the viewport covered by the playfield on each axis
    let sx = SCREEN_WIDTH * scale / w;
    let sy = SCREEN_HEIGHT * scale / h;
    let nx = (x / SCREEN_WIDTH * 2.0 - 1.0) * sx;
    let ny = (1.0 - y / SCREEN_HEIGHT * 2.0) * sy;
    (nx, ny)
}

/// Inverse of [`screen_to_ndc`] for pointer input: viewport pixels (origin
/// top-left) back to logical screen pixels
pub fn client_to_screen(size: (f32, f32), px: f32, py: f32) -> (f32, f32) {
    let (w, h) = (size.0.max(1.0), size.1.max(1.0));
    let scale = (w / SCREEN_WIDTH).min(h / SCREEN_HEIGHT);
    let left = (w - SCREEN_WIDTH * scale) / 2.0;
    let top = (h - SCREEN_HEIGHT * scale) / 2.0;
    ((px - left) / scale, (py - top) / scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_fill_matching_viewport() {
        let size = (500, 700);
        assert_eq!(screen_to_ndc(size, 0.0, 0.0), (-1.0, 1.0));
        assert_eq!(screen_to_ndc(size, SCREEN_WIDTH, SCREEN_HEIGHT), (1.0, -1.0));
    }

    #[test]
    fn test_wide_viewport_pillarboxes() {
        // Twice as wide as the playfield at the same height
        let (left, top) = screen_to_ndc((1000, 700), 0.0, 0.0);
        let (right, _) = screen_to_ndc((1000, 700), SCREEN_WIDTH, 0.0);
        assert_eq!(top, 1.0);
        assert!((left + 0.5).abs() < 1e-6);
        assert!((right - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_pointer_maps_back_through_letterbox() {
        // 1000x700 viewport: playfield is 500 wide, centred with 250px bars
        assert_eq!(client_to_screen((1000.0, 700.0), 250.0, 0.0), (0.0, 0.0));
        assert_eq!(client_to_screen((1000.0, 700.0), 500.0, 350.0), (250.0, 350.0));
        // Half-size viewport doubles coordinates
        assert_eq!(client_to_screen((250.0, 350.0), 100.0, 200.0), (200.0, 400.0));
    }

    #[test]
    fn test_tall_viewport_letterboxes() {
        let (_, top) = screen_to_ndc((500, 1400), 0.0, 0.0);
        assert!((top - 0.5).abs() < 1e-6);
    }
}
