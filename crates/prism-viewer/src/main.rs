//! Demo viewer: animates a procedural test card on the CPU, uploads it to a
//! caller-owned texture, and presents it every frame through the engine's
//! fullscreen pass.
//!
//! Keys: Space toggles the coordinate debug view, Escape quits.

use anyhow::Result;

use prism_engine::core::{App, AppControl, FrameCtx};
use prism_engine::device::GpuInit;
use prism_engine::logging::{init_logging, LoggingConfig};
use prism_engine::render::present::{PresentParams, PresentPass, SampleMode};
use prism_engine::window::{Runtime, RuntimeConfig};

use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

const CARD_SIZE: u32 = 512;

/// Source texture owned by the viewer, not the engine.
///
/// The texture must stay alive as long as frames sampling its view are in
/// flight, so it is kept alongside the view.
struct TestCard {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl TestCard {
    fn new(device: &wgpu::Device) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("viewer test card"),
            size: wgpu::Extent3d {
                width: CARD_SIZE,
                height: CARD_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self { texture, view }
    }

    /// Re-renders the card for time `t` and uploads it in one copy.
    fn upload(&self, queue: &wgpu::Queue, t: f32) {
        let pixels = card_pixels(t);

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(&pixels),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(CARD_SIZE * 4),
                rows_per_image: Some(CARD_SIZE),
            },
            wgpu::Extent3d {
                width: CARD_SIZE,
                height: CARD_SIZE,
                depth_or_array_layers: 1,
            },
        );
    }
}

/// Plasma-style RGBA pattern with a grid overlay, so both filtering and the
/// [0,1] coordinate mapping are easy to eyeball.
fn card_pixels(t: f32) -> Vec<[u8; 4]> {
    let mut pixels = Vec::with_capacity((CARD_SIZE * CARD_SIZE) as usize);

    for y in 0..CARD_SIZE {
        for x in 0..CARD_SIZE {
            let u = x as f32 / (CARD_SIZE - 1) as f32;
            let v = y as f32 / (CARD_SIZE - 1) as f32;

            let wave = ((u * 12.0 + t).sin() + (v * 12.0 - t * 0.7).cos()) * 0.25 + 0.5;

            let grid_line = x % 64 == 0 || y % 64 == 0;
            let (r, g, b) = if grid_line {
                (1.0, 1.0, 1.0)
            } else {
                (wave * u, wave * v, wave * (1.0 - u))
            };

            pixels.push([
                (r * 255.0) as u8,
                (g * 255.0) as u8,
                (b * 255.0) as u8,
                255,
            ]);
        }
    }

    pixels
}

struct Viewer {
    pass: PresentPass,
    card: Option<TestCard>,
    mode: SampleMode,
    t: f32,
}

impl Viewer {
    fn new() -> Self {
        Self {
            pass: PresentPass::new(),
            card: None,
            mode: SampleMode::Textured,
            t: 0.0,
        }
    }
}

impl App for Viewer {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(code),
                    state: ElementState::Pressed,
                    repeat: false,
                    ..
                },
            ..
        } = event
        else {
            return AppControl::Continue;
        };

        match code {
            KeyCode::Escape => AppControl::Exit,
            KeyCode::Space => {
                self.mode = match self.mode {
                    SampleMode::Textured => SampleMode::DebugCoords,
                    SampleMode::DebugCoords => SampleMode::Textured,
                };
                log::info!("sample mode: {:?}", self.mode);
                AppControl::Continue
            }
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.t += ctx.time.dt;

        let card = self
            .card
            .get_or_insert_with(|| TestCard::new(ctx.gpu.device()));
        card.upload(ctx.gpu.queue(), self.t);

        let pass = &mut self.pass;
        let mode = self.mode;
        let view = &card.view;

        ctx.render(wgpu::Color::BLACK, |rctx, target| {
            pass.render(
                rctx,
                target,
                &PresentParams {
                    source: view,
                    mode,
                },
            );
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    log::info!("prism viewer starting (Space: debug coords, Escape: quit)");

    Runtime::run(
        RuntimeConfig {
            title: "prism viewer".to_string(),
            initial_size: LogicalSize::new(960.0, 540.0),
        },
        GpuInit::default(),
        Viewer::new(),
    )
}
