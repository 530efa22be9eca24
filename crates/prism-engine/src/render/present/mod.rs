//! Fullscreen present pass.
//!
//! Blits a caller-owned 2D texture to the full render target by drawing a
//! single oversized triangle whose vertices are synthesized in the vertex
//! shader from the vertex index — no vertex buffer, no geometry upload.
//!
//! The source texture is only read; the caller is responsible for not writing
//! it while the recorded pass executes.

use std::collections::HashMap;

use crate::render::{RenderCtx, RenderTarget};

mod fullscreen;

pub use fullscreen::{fullscreen_vertex, FullscreenVertex, FULLSCREEN_VERTEX_COUNT};

const SHADER_SRC: &str = include_str!("shaders/present.wgsl");

/// Fragment behavior of the present pass.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum SampleMode {
    /// Filtered lookup into the bound source texture.
    #[default]
    Textured,
    /// Ignore the texture contents and visualize the interpolated sampling
    /// coordinate as red/green. Useful to verify viewport coverage and the
    /// [0,1] coordinate mapping.
    DebugCoords,
}

impl SampleMode {
    fn fragment_entry(self) -> &'static str {
        match self {
            SampleMode::Textured => "fs_main",
            SampleMode::DebugCoords => "fs_coords",
        }
    }
}

/// Parameters for one recorded present.
pub struct PresentParams<'a> {
    /// View of the 2D float-sampled texture to present.
    pub source: &'a wgpu::TextureView,
    pub mode: SampleMode,
}

/// Present pass object.
///
/// Owns one render pipeline per `(target format, sample mode)` pair plus the
/// shared bind group layout and sampler. The bind group itself is rebuilt per
/// call since the source view may change every frame.
#[derive(Default)]
pub struct PresentPass {
    shader: Option<wgpu::ShaderModule>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    sampler: Option<wgpu::Sampler>,
    pipelines: HashMap<(wgpu::TextureFormat, SampleMode), wgpu::RenderPipeline>,
}

impl PresentPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a fullscreen present of `params.source` into `target`.
    ///
    /// Issues exactly one non-indexed draw of three vertices. The whole
    /// target is overwritten, so the pass loads the existing contents only to
    /// satisfy the attachment contract; no blending is applied.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        params: &PresentParams<'_>,
    ) {
        self.ensure_shader(ctx);
        self.ensure_layout(ctx);
        self.ensure_sampler(ctx);
        self.ensure_pipeline(ctx, params.mode);

        let Some(layout) = self.bind_group_layout.as_ref() else { return };
        let Some(sampler) = self.sampler.as_ref() else { return };
        let Some(pipeline) = self.pipelines.get(&(ctx.surface_format, params.mode)) else {
            return;
        };

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("prism present bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(params.source),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("prism present pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &bind_group, &[]);
        rpass.draw(0..FULLSCREEN_VERTEX_COUNT, 0..1);
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_shader(&mut self, ctx: &RenderCtx<'_>) {
        if self.shader.is_some() {
            return;
        }
        self.shader = Some(ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("prism present shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SRC.into()),
        }));
    }

    fn ensure_layout(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group_layout.is_some() {
            return;
        }

        // One explicit layout for both fragment entry points; fs_coords
        // simply leaves the bindings unused.
        self.bind_group_layout = Some(ctx.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("prism present bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            },
        ));
    }

    fn ensure_sampler(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_some() {
            return;
        }
        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("prism present sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }));
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, mode: SampleMode) {
        let key = (ctx.surface_format, mode);
        if self.pipelines.contains_key(&key) {
            return;
        }

        let Some(shader) = self.shader.as_ref() else { return };
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("prism present pipeline layout"),
            bind_group_layouts: &[bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("prism present pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },

            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some(mode.fragment_entry()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
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

        self.pipelines.insert(key, pipeline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_declares_the_synthesized_vertex_stage() {
        assert!(SHADER_SRC.contains("@vertex"));
        assert!(SHADER_SRC.contains("fn vs_main(@builtin(vertex_index)"));
        // No vertex inputs beyond the builtin index.
        assert!(!SHADER_SRC.contains("@location(0) position"));
    }

    #[test]
    fn shader_binds_texture_and_sampler_in_group_zero() {
        assert!(SHADER_SRC.contains("@group(0) @binding(0)"));
        assert!(SHADER_SRC.contains("var src_texture: texture_2d<f32>"));
        assert!(SHADER_SRC.contains("@group(0) @binding(1)"));
        assert!(SHADER_SRC.contains("var src_sampler: sampler"));
        assert!(SHADER_SRC.contains("textureSample(src_texture, src_sampler"));
    }

    #[test]
    fn debug_entry_visualizes_the_interpolated_coordinate() {
        // fs_coords must ignore the texture and emit (s, t, 0, 1).
        assert!(SHADER_SRC.contains("vec4<f32>(vertex.tex_coords, 0.0, 1.0)"));
    }

    #[test]
    fn every_sample_mode_has_a_fragment_entry_in_the_shader() {
        for mode in [SampleMode::Textured, SampleMode::DebugCoords] {
            let entry = mode.fragment_entry();
            assert!(
                SHADER_SRC.contains(&format!("fn {entry}(")),
                "missing fragment entry point {entry}"
            );
        }
    }

    #[test]
    fn default_mode_samples_the_texture() {
        assert_eq!(SampleMode::default(), SampleMode::Textured);
        assert_eq!(SampleMode::default().fragment_entry(), "fs_main");
    }
}
