//! Renderer crate for backdrop.
//!
//! Glues the pure field functions from `fieldgen` to a `winit` window and a
//! `wgpu` surface. The overall flow is:
//!
//! ```text
//!   CLI / backdrop
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ SceneSession ──▶ winit event loop ──▶ render frame
//!          ▲          (extent, field     │
//!          │           state, phase)     ├─▶ GPU scene: uniforms ─▶ WGSL port
//!          │                             └─▶ CPU scene: pixel loop ─▶ blit
//! ```
//!
//! `SceneSession` owns everything the event loop mutates (surface extent,
//! click history, frame phase, entrance fade) and is deliberately free of
//! window and GPU handles so the whole mount/resize/pointer/teardown
//! choreography is testable headlessly. The GPU resources live in the event
//! loop as an `Option`: when context or shader setup fails the backdrop
//! logs one diagnostic and renders nothing, by design.

mod context;
mod cpu;
mod pipeline;
mod session;
mod shaders;
mod uniforms;
mod window;

pub mod runtime;
pub mod timeline;
pub mod types;

use anyhow::Result;

pub use runtime::{FrameDriver, FramePhase, TimeSample};
pub use session::{FrameInputs, SceneSession};
pub use timeline::{FadeCurve, FadeEnvelope};
pub use types::{PainterBackend, RendererConfig, SurfaceExtent, SCALE_CAP};

/// High-level entry point that owns the chosen configuration.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Opens the window and runs until it is closed.
    pub fn run(self) -> Result<()> {
        window::run(self.config)
    }
}
