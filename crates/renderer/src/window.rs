use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use fieldgen::SceneKind;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::context::GpuContext;
use crate::cpu::CpuPainter;
use crate::pipeline::{BlitPipeline, ScenePipeline};
use crate::session::{FrameInputs, SceneSession};
use crate::shaders;
use crate::types::{PainterBackend, RendererConfig, SurfaceExtent};
use crate::uniforms::SceneUniforms;

/// All GPU-side resources for one mounted backdrop. Held in an `Option` by
/// the event loop so a failed setup degrades to an empty surface instead of
/// tearing the window down.
struct GpuBits {
    context: GpuContext,
    painter: PainterBits,
    uniforms: SceneUniforms,
}

enum PainterBits {
    /// Field evaluated in the fragment shader.
    Scene(ScenePipeline),
    /// Field evaluated on the CPU, presented through a texture blit.
    Raster {
        blit: BlitPipeline,
        painter: CpuPainter,
    },
}

impl GpuBits {
    fn new(
        window: &winit::window::Window,
        config: &RendererConfig,
        extent: SurfaceExtent,
    ) -> Result<Self> {
        if !config.backend.supports(config.scene.kind) {
            anyhow::bail!(
                "scene '{}' cannot run on the {} backend",
                config.scene.kind.id(),
                config.backend
            );
        }
        let context = GpuContext::new(window, extent)?;
        let uniforms = SceneUniforms::new(&config.scene, extent);
        let painter = match config.backend {
            PainterBackend::Cpu => PainterBits::Raster {
                blit: BlitPipeline::new(&context.device, context.surface_format, extent)?,
                painter: CpuPainter::new(extent),
            },
            PainterBackend::Gpu => {
                let source = match config.scene.kind {
                    SceneKind::Plasma => shaders::plasma_source(),
                    SceneKind::Halftone => shaders::halftone_source(),
                    SceneKind::Drift => unreachable!("guarded by the backend support check"),
                };
                PainterBits::Scene(ScenePipeline::new(
                    &context.device,
                    context.surface_format,
                    config.scene.kind.id(),
                    &source,
                    &uniforms,
                )?)
            }
        };
        Ok(Self {
            context,
            painter,
            uniforms,
        })
    }

    fn resize(&mut self, extent: SurfaceExtent) {
        self.context.resize(extent);
        self.uniforms.set_extent(extent);
        if let PainterBits::Raster { blit, painter } = &mut self.painter {
            blit.resize(&self.context.device, extent);
            painter.resize(extent);
        }
    }

    fn render(
        &mut self,
        session: &SceneSession,
        inputs: &FrameInputs,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("backdrop encoder"),
                });

        match &mut self.painter {
            PainterBits::Scene(pipeline) => {
                self.uniforms.set_time(inputs.time.seconds);
                self.uniforms.set_fade(inputs.fade);
                self.uniforms.write_clicks(&session.scene().state().clicks);
                pipeline.upload(&self.context.queue, &self.uniforms);
                pipeline.draw(&mut encoder, &view);
            }
            PainterBits::Raster { blit, painter } => {
                let pixels = painter.paint(session.scene(), inputs.fade);
                blit.upload(&self.context.queue, pixels);
                blit.draw(&mut encoder, &view);
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

/// Opens the window and drives the event loop until the backdrop is torn
/// down.
pub(crate) fn run(config: RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let window_size = LogicalSize::new(config.window_size.0 as f64, config.window_size.1 as f64);
    let window = WindowBuilder::new()
        .with_title("Backdrop")
        .with_inner_size(window_size)
        .build(&event_loop)
        .context("failed to create window")?;
    let window = Arc::new(window);

    let mut session = SceneSession::new(&config, window.scale_factor(), Instant::now());

    // Fail closed on any capability problem: log the diagnostic, keep the
    // window alive with an empty surface, never retry.
    let mut gpu = match GpuBits::new(window.as_ref(), &config, session.extent()) {
        Ok(bits) => Some(bits),
        Err(err) => {
            tracing::error!("render context unavailable: {err:#}; backdrop stays empty");
            None
        }
    };

    window.request_redraw();

    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Wait);
            match event {
                Event::WindowEvent { window_id, event } if window_id == window.id() => {
                    match event {
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                            // One scoped teardown pass: stop the frame
                            // sequence, release GPU resources, exit.
                            session.stop();
                            gpu = None;
                            elwt.exit();
                        }
                        WindowEvent::Resized(new_size) => {
                            let extent = session.resize(
                                new_size.width,
                                new_size.height,
                                window.scale_factor(),
                            );
                            if let Some(bits) = gpu.as_mut() {
                                bits.resize(extent);
                            }
                        }
                        WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                            let size = window.inner_size();
                            let extent = session.resize(size.width, size.height, scale_factor);
                            if let Some(bits) = gpu.as_mut() {
                                bits.resize(extent);
                            }
                        }
                        WindowEvent::CursorMoved { position, .. } => {
                            session.pointer_moved(position.x, position.y);
                        }
                        WindowEvent::MouseInput {
                            state: ElementState::Pressed,
                            button: MouseButton::Left,
                            ..
                        } => {
                            session.pointer_pressed();
                        }
                        WindowEvent::RedrawRequested => {
                            let now = Instant::now();
                            // Liveness check: a late redraw after teardown
                            // samples nothing and touches nothing.
                            let Some(inputs) = session.begin_frame(now) else {
                                return;
                            };
                            let Some(bits) = gpu.as_mut() else {
                                return;
                            };
                            match bits.render(&session, &inputs) {
                                Ok(()) => session.mark_rendered(now),
                                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                    bits.resize(session.extent());
                                }
                                Err(wgpu::SurfaceError::OutOfMemory) => {
                                    tracing::error!("surface out of memory; exiting");
                                    session.stop();
                                    elwt.exit();
                                }
                                Err(other) => {
                                    tracing::warn!("surface error: {other:?}; retrying next frame");
                                }
                            }
                        }
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    let now = Instant::now();
                    if session.ready_for_frame(now) {
                        window.request_redraw();
                    } else if let Some(deadline) = session.next_deadline() {
                        elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
                    }
                }
                _ => {}
            }
        })
        .map_err(|err| anyhow::anyhow!("window event loop error: {err}"))?;

    Ok(())
}
