use bytemuck::{Pod, Zeroable};
use fieldgen::{ClickLog, SceneParams, CLICK_CAPACITY};

use crate::types::SurfaceExtent;

/// CPU mirror of the WGSL `SceneUniforms` block; field order and packing
/// must match the prelude in `shaders.rs`.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct SceneUniforms {
    /// width, height, scale, time
    pub surface: [f32; 4],
    /// fade, intensity, frequency, drift
    pub effect: [f32; 4],
    /// speed, thickness, time_decay, distance_decay
    pub ripple: [f32; 4],
    /// octaves, lacunarity, gain, unused
    pub fbm: [f32; 4],
    pub background: [f32; 4],
    pub ink: [f32; 4],
    /// x, y, started; x < 0 marks an unused slot
    pub clicks: [[f32; 4]; CLICK_CAPACITY],
}

unsafe impl Zeroable for SceneUniforms {}
unsafe impl Pod for SceneUniforms {}

impl SceneUniforms {
    pub fn new(params: &SceneParams, extent: SurfaceExtent) -> Self {
        let palette = &params.palette;
        let mut uniforms = Self {
            surface: [0.0; 4],
            effect: [1.0, params.intensity, params.frequency, params.drift_rate],
            ripple: [
                params.ripple.speed,
                params.ripple.thickness,
                params.ripple.time_decay,
                params.ripple.distance_decay,
            ],
            fbm: [
                params.fbm.octaves as f32,
                params.fbm.lacunarity,
                params.fbm.gain,
                0.0,
            ],
            background: [
                palette.background.r,
                palette.background.g,
                palette.background.b,
                palette.background.a,
            ],
            ink: [palette.ink.r, palette.ink.g, palette.ink.b, palette.ink.a],
            clicks: [[-1.0, -1.0, 0.0, 0.0]; CLICK_CAPACITY],
        };
        uniforms.set_extent(extent);
        uniforms
    }

    pub fn set_extent(&mut self, extent: SurfaceExtent) {
        self.surface[0] = extent.width as f32;
        self.surface[1] = extent.height as f32;
        self.surface[2] = extent.scale as f32;
    }

    pub fn set_time(&mut self, seconds: f32) {
        self.surface[3] = seconds;
    }

    pub fn set_fade(&mut self, fade: f32) {
        self.effect[0] = fade;
    }

    /// Packs the click ring buffer; sentinel slots keep a negative x so the
    /// shader skips them the same way the CPU path does.
    pub fn write_clicks(&mut self, log: &ClickLog) {
        for (slot, event) in self.clicks.iter_mut().zip(log.slots()) {
            *slot = if event.is_sentinel() {
                [-1.0, -1.0, 0.0, 0.0]
            } else {
                [event.x, event.y, event.started, 0.0]
            };
        }
    }
}
